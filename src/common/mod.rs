//! Common module - types, events and collaborator traits shared by the crate

pub mod errors;
pub mod events;
pub mod traits;
pub mod types;
