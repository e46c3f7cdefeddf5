//! Strategy module - lifecycle, event routing and trading operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    INIT (once)                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  StrategyHost::init_strate()                                │
//! │    - Overlays the strategy's setting block on its fields    │
//! │    - Validates that no declared field is left unset         │
//! │    - Binds the QuantFrame, subscribes four event kinds      │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    EVENTS (sync)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  before/after trading ──► SessionGate open/close ──► hook   │
//! │  quote change ──► dropped unless SessionGate is open        │
//! │  current bar ──► on_bar_min1 / on_bar_day by period kind    │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  StrategyContext.buy()/sell()                               │
//! │    - Aligns the price to the tick grid                      │
//! │    - Submits through the QuantFrame                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Strategy`]: Callbacks a concrete strategy implements
//! - [`StrategyHost`]: Initialization and event routing for one instance
//! - [`StrategyContext`]: Orders and queries available inside callbacks
//! - [`SessionGate`]: Market open/closed state
//! - [`regularize`]: Tick-grid price alignment

mod context;
mod host;
mod sample;
mod session;
mod tick;
mod traits;

pub use context::StrategyContext;
pub use host::StrategyHost;
pub use sample::SampleStrategy;
pub use session::SessionGate;
pub use tick::{regularize, regularize_price, RoundDirection, PRICE_FACTOR};
pub use traits::{BoxedStrategy, Strategy};
