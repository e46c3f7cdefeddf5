//! TinyQuant strategy base
//!
//! Turns a session/quote/bar event feed into typed strategy callbacks,
//! holds quotes back while the market is closed, and aligns order prices
//! to the instrument's tick grid before they reach the trading frame.

pub mod common;
pub mod config;
pub mod engine;
pub mod frame;
pub mod strategy;

// Re-export commonly used types
pub use common::errors::{Result, StrateError};
pub use common::events::{Event, EventKind};
pub use common::traits::{EventHandler, EventSource, QuantFrame};
pub use common::types::{
    KlineType, OrderId, OrderStatus, Reply, Side, TinyBar, TinyPosition, TinyQuote, TinyTradeOrder,
};
pub use config::types::{AppConfig, GlobalSetting, PriceFallback};
pub use engine::EventEngine;
pub use frame::{ArrayManager, PaperFrame};

// Strategy types
pub use strategy::{
    regularize, regularize_price, BoxedStrategy, RoundDirection, SampleStrategy, SessionGate,
    Strategy, StrategyContext, StrategyHost,
};
