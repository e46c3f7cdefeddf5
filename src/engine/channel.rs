//! Bounded queue feeding events into an [`EventEngine`](super::EventEngine)

use tokio::sync::mpsc;

use crate::common::events::Event;

/// Queue capacity used when the configuration does not set one
pub const DEFAULT_CHANNEL_SIZE: usize = 1000;

pub type EventSender = mpsc::Sender<Event>;
pub type EventReceiver = mpsc::Receiver<Event>;

/// Event queue holding `size` pending events (at least one)
pub fn event_channel(size: usize) -> (EventSender, EventReceiver) {
    mpsc::channel(size.max(1))
}
