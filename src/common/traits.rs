//! Trait definitions for the strategy's collaborators

use rust_decimal::Decimal;

use super::events::{Event, EventKind};
use super::types::{OrderId, Reply, TinyPosition, TinyQuote, TinyTradeOrder};
use crate::frame::ArrayManager;

/// Callback invoked by an event source for each delivered event
pub type EventHandler = Box<dyn Fn(&Event) + Send + Sync>;

/// Publish/subscribe contract the strategy host subscribes through
///
/// Handlers are invoked synchronously, in registration order, for every
/// event of the kind they registered for.
pub trait EventSource {
    /// Register a handler for one event kind
    fn register(&mut self, kind: EventKind, handler: EventHandler);
}

/// Trading frame the strategy delegates market queries and orders to
///
/// Every order operation answers with a [`Reply`]: status 0 with the payload,
/// or a nonzero status with an error message. Implementations own their
/// failure semantics; the strategy core passes replies through unchanged.
#[cfg_attr(test, mockall::automock)]
pub trait QuantFrame: Send + Sync {
    /// Latest real-time quote, `None` when the symbol has no data yet
    fn get_rt_tiny_quote(&self, symbol: &str) -> Option<TinyQuote>;

    /// Rolling one-minute bar history
    fn get_kl_min1_am(&self, symbol: &str) -> Option<ArrayManager>;

    /// Rolling daily bar history
    fn get_kl_day_am(&self, symbol: &str) -> Option<ArrayManager>;

    fn buy(&self, price: Decimal, volume: u64, symbol: &str) -> Reply<OrderId>;

    fn sell(&self, price: Decimal, volume: u64, symbol: &str) -> Reply<OrderId>;

    fn cancel_order(&self, order_id: &OrderId) -> Reply<()>;

    fn get_tiny_trade_order(&self, order_id: &OrderId) -> Reply<TinyTradeOrder>;

    /// Current holding, `None` when nothing is known for the symbol
    fn get_tiny_position(&self, symbol: &str) -> Option<TinyPosition>;

    /// Strategy log sink
    fn write_cta_log(&self, content: &str);
}
