use chrono::{DateTime, Local};

use super::context::StrategyContext;
use crate::common::errors::Result;
use crate::common::types::{TinyBar, TinyQuote};
use crate::config::fields::FieldSet;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const BAR_DATETIME_FORMAT: &str = "%Y%m%d %H:%M:%S";

/// Core strategy trait
///
/// The host routes session, quote and bar events to these callbacks once
/// `init_strate` has completed. Every market callback has a default body that
/// only logs the payload, so a strategy overrides just the ones it trades on.
///
/// # Implementation Notes
///
/// - Callbacks run synchronously on the event source's delivery thread; no
///   blocking I/O
/// - Settings come in through [`Strategy::apply_settings`] after the setting
///   block has been overlaid and validated
/// - Orders and queries go through the [`StrategyContext`]
///
/// # Example
///
/// ```ignore
/// struct Breakout {
///     symbol: String,
/// }
///
/// impl Strategy for Breakout {
///     fn name(&self) -> &str { "breakout" }
///
///     fn declare_fields(&self) -> FieldSet {
///         FieldSet::new().required("symbol")
///     }
///
///     fn apply_settings(&mut self, fields: &FieldSet) -> Result<()> {
///         self.symbol = fields.get("symbol")?;
///         Ok(())
///     }
///
///     fn on_quote_changed(&mut self, ctx: &StrategyContext, quote: &TinyQuote) {
///         if quote.last_price > quote.high_price {
///             ctx.buy(quote.last_price, 100, &self.symbol);
///         }
///     }
/// }
/// ```
pub trait Strategy: Send {
    /// Key of this strategy's block in the global setting
    fn name(&self) -> &str;

    /// Fields read from the setting block, with code defaults where known
    fn declare_fields(&self) -> FieldSet {
        FieldSet::new()
    }

    /// Receive the overlaid and validated fields
    ///
    /// An error aborts initialization.
    fn apply_settings(&mut self, _fields: &FieldSet) -> Result<()> {
        Ok(())
    }

    /// Symbols whose market data the strategy needs
    fn symbol_pools(&self) -> Vec<String> {
        Vec::new()
    }

    /// Settings are loaded and subscriptions registered
    fn on_init_strate(&mut self, _ctx: &StrategyContext) {}

    /// Strategy started by the frame
    fn on_start(&mut self, _ctx: &StrategyContext) {}

    /// Quote or order book changed; only called while the market is open
    fn on_quote_changed(&mut self, ctx: &StrategyContext, quote: &TinyQuote) {
        ctx.log(format!(
            "on_quote_changed symbol={} open={} high={} close={} low={}",
            quote.symbol, quote.open_price, quote.high_price, quote.last_price, quote.low_price
        ));
    }

    /// A one-minute bar completed
    fn on_bar_min1(&mut self, ctx: &StrategyContext, bar: &TinyBar) {
        ctx.log(format!("on_bar_min1 {}", describe_bar(bar)));
    }

    /// The daily bar, pushed at the close
    fn on_bar_day(&mut self, ctx: &StrategyContext, bar: &TinyBar) {
        ctx.log(format!("on_bar_day {}", describe_bar(bar)));
    }

    /// Session opened
    fn on_before_trading(&mut self, ctx: &StrategyContext, date_time: DateTime<Local>) {
        ctx.log(format!("on_before_trading - {}", date_time.format(DATETIME_FORMAT)));
    }

    /// Session closed
    fn on_after_trading(&mut self, ctx: &StrategyContext, date_time: DateTime<Local>) {
        ctx.log(format!("on_after_trading - {}", date_time.format(DATETIME_FORMAT)));
    }
}

fn describe_bar(bar: &TinyBar) -> String {
    format!(
        "symbol={} open={} high={} close={} low={} vol={} dt={}",
        bar.symbol,
        bar.open,
        bar.high,
        bar.close,
        bar.low,
        bar.volume,
        bar.datetime.format(BAR_DATETIME_FORMAT)
    )
}

/// Boxed strategy for dynamic dispatch
pub type BoxedStrategy = Box<dyn Strategy>;
