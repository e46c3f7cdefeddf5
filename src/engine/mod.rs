//! Engine module - in-process event source and its input queue

mod channel;
mod event_engine;

pub use channel::{event_channel, EventReceiver, EventSender, DEFAULT_CHANNEL_SIZE};
pub use event_engine::EventEngine;
