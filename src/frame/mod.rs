//! Frame module - bar history and an in-memory trading frame

mod array_manager;
mod paper;

pub use array_manager::{ArrayManager, DEFAULT_AM_SIZE};
pub use paper::PaperFrame;
