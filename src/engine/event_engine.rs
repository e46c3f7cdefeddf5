use std::collections::HashMap;
use tracing::{debug, info, trace};

use crate::common::events::{Event, EventKind};
use crate::common::traits::{EventHandler, EventSource};
use crate::engine::EventReceiver;

/// In-process event source
///
/// Handlers are kept per event kind in registration order and invoked
/// synchronously. [`EventEngine::run`] drains a channel one event at a time,
/// so every handler sees events in the order they were sent and never
/// concurrently with another event.
#[derive(Default)]
pub struct EventEngine {
    handlers: HashMap<EventKind, Vec<EventHandler>>,
}

impl EventEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers registered for a kind
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// Deliver one event to every handler of its kind.
    /// Returns the number of handlers invoked.
    pub fn process(&self, event: &Event) -> usize {
        let kind = event.kind();
        match self.handlers.get(&kind) {
            Some(handlers) => {
                trace!(%kind, handlers = handlers.len(), "dispatching event");
                for handler in handlers {
                    handler(event);
                }
                handlers.len()
            }
            None => {
                trace!(%kind, "no handler registered");
                0
            }
        }
    }

    /// Process events from the channel until every sender is dropped.
    /// Returns the number of events processed.
    pub async fn run(&self, mut receiver: EventReceiver) -> usize {
        let mut processed = 0;
        while let Some(event) = receiver.recv().await {
            self.process(&event);
            processed += 1;
        }
        info!(processed, "event channel closed");
        processed
    }
}

impl EventSource for EventEngine {
    fn register(&mut self, kind: EventKind, handler: EventHandler) {
        debug!(%kind, "registering handler");
        self.handlers.entry(kind).or_default().push(handler);
    }
}

impl std::fmt::Debug for EventEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<(EventKind, usize)> =
            self.handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        counts.sort_by_key(|(k, _)| k.to_string());
        f.debug_struct("EventEngine").field("handlers", &counts).finish()
    }
}
