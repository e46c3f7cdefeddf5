use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

use super::tick::{regularize, RoundDirection};
use crate::common::errors::Result;
use crate::common::traits::QuantFrame;
use crate::common::types::{OrderId, Reply, Side, TinyPosition, TinyQuote, TinyTradeOrder};
use crate::config::types::PriceFallback;
use crate::frame::ArrayManager;

/// Trading operations available to a strategy
///
/// Handed to every callback once `init_strate` has bound the frame. Order
/// prices are aligned to the tick grid before submission; everything else is
/// passed to the frame as is.
pub struct StrategyContext {
    name: String,
    frame: Arc<dyn QuantFrame>,
    price_fallback: PriceFallback,
}

impl StrategyContext {
    pub fn new(name: impl Into<String>, frame: Arc<dyn QuantFrame>, price_fallback: PriceFallback) -> Self {
        Self {
            name: name.into(),
            frame,
            price_fallback,
        }
    }

    /// Name of the owning strategy
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_fallback(&self) -> PriceFallback {
        self.price_fallback
    }

    pub fn get_rt_tiny_quote(&self, symbol: &str) -> Option<TinyQuote> {
        self.frame.get_rt_tiny_quote(symbol)
    }

    pub fn get_kl_min1_am(&self, symbol: &str) -> Option<ArrayManager> {
        self.frame.get_kl_min1_am(symbol)
    }

    pub fn get_kl_day_am(&self, symbol: &str) -> Option<ArrayManager> {
        self.frame.get_kl_day_am(symbol)
    }

    /// Align `input_price` to the symbol's tick grid.
    ///
    /// Status 0 carries the aligned price; status -1 carries the reason
    /// (no quote, no spread, or a price outside the tick range).
    pub fn regular_trade_price(&self, symbol: &str, input_price: Decimal, to_upper: bool) -> Reply<Decimal> {
        match self.regularize(symbol, input_price, RoundDirection::from_upper(to_upper)) {
            Ok(price) => Reply::ok(price),
            Err(err) => Reply::err(err.to_string()),
        }
    }

    fn regularize(&self, symbol: &str, price: Decimal, direction: RoundDirection) -> Result<Decimal> {
        let quote = self.frame.get_rt_tiny_quote(symbol);
        regularize(symbol, quote.as_ref(), price, direction)
    }

    /// Buy at `price` rounded up to the tick grid
    pub fn buy(&self, price: Decimal, volume: u64, symbol: &str) -> Reply<OrderId> {
        match self.order_price(Side::Buy, price, symbol) {
            Ok(price) => self.frame.buy(price, volume, symbol),
            Err(reply) => reply,
        }
    }

    /// Sell at `price` rounded down to the tick grid
    pub fn sell(&self, price: Decimal, volume: u64, symbol: &str) -> Reply<OrderId> {
        match self.order_price(Side::Sell, price, symbol) {
            Ok(price) => self.frame.sell(price, volume, symbol),
            Err(reply) => reply,
        }
    }

    fn order_price(&self, side: Side, price: Decimal, symbol: &str) -> std::result::Result<Decimal, Reply<OrderId>> {
        let err = match self.regularize(symbol, price, side.into()) {
            Ok(aligned) => return Ok(aligned),
            Err(err) => err,
        };

        match self.price_fallback {
            PriceFallback::UseRawPrice => {
                warn!(strategy = %self.name, %side, symbol, %price, error = %err, "order price not aligned, using raw price");
                Ok(price)
            }
            PriceFallback::Reject => {
                warn!(strategy = %self.name, %side, symbol, %price, error = %err, "order rejected, price not aligned");
                Err(Reply::err(err.to_string()))
            }
        }
    }

    pub fn cancel_order(&self, order_id: &OrderId) -> Reply<()> {
        self.frame.cancel_order(order_id)
    }

    pub fn get_tiny_trade_order(&self, order_id: &OrderId) -> Reply<TinyTradeOrder> {
        self.frame.get_tiny_trade_order(order_id)
    }

    pub fn get_tiny_position(&self, symbol: &str) -> Option<TinyPosition> {
        self.frame.get_tiny_position(symbol)
    }

    /// Write a line to the frame's strategy log, prefixed with the strategy name
    pub fn log(&self, content: impl AsRef<str>) {
        let line = format!("{}:{}", self.name, content.as_ref());
        self.frame.write_cta_log(&line);
    }
}

impl std::fmt::Debug for StrategyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyContext")
            .field("name", &self.name)
            .field("price_fallback", &self.price_fallback)
            .finish_non_exhaustive()
    }
}
