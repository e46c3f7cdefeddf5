//! Moving-average sample strategy

use super::context::StrategyContext;
use super::traits::Strategy;
use crate::common::errors::{Result, StrateError};
use crate::common::types::TinyBar;
use crate::config::fields::FieldSet;

/// Trades one lot each minute against the `param1`-bar moving average:
/// buys when the close is above it and nothing is held, sells the holding
/// when the close drops below it.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStrategy {
    symbol_pools: Vec<String>,
    /// Moving-average window, in one-minute bars
    param1: usize,
    /// Volume per order
    param2: u64,
}

impl SampleStrategy {
    pub const NAME: &'static str = "tiny_strate_sample";

    pub fn new() -> Self {
        Self {
            symbol_pools: vec!["HK.00700".to_string()],
            param1: 0,
            param2: 0,
        }
    }

    pub fn window(&self) -> usize {
        self.param1
    }

    pub fn lot(&self) -> u64 {
        self.param2
    }
}

impl Default for SampleStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for SampleStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn declare_fields(&self) -> FieldSet {
        FieldSet::new()
            .with_default("symbol_pools", &self.symbol_pools)
            .required("param1")
            .required("param2")
    }

    fn apply_settings(&mut self, fields: &FieldSet) -> Result<()> {
        self.symbol_pools = fields.get("symbol_pools")?;
        self.param1 = fields.get("param1")?;
        self.param2 = fields.get("param2")?;

        if self.param1 == 0 || self.param2 == 0 {
            return Err(StrateError::Configuration(format!(
                "'{}' needs positive param1 and param2",
                Self::NAME
            )));
        }
        Ok(())
    }

    fn symbol_pools(&self) -> Vec<String> {
        self.symbol_pools.clone()
    }

    fn on_init_strate(&mut self, ctx: &StrategyContext) {
        ctx.log(format!(
            "on_init_strate symbol_pools={:?} param1={} param2={}",
            self.symbol_pools, self.param1, self.param2
        ));
    }

    fn on_start(&mut self, ctx: &StrategyContext) {
        ctx.log("on_start");
    }

    fn on_bar_min1(&mut self, ctx: &StrategyContext, bar: &TinyBar) {
        if !self.symbol_pools.contains(&bar.symbol) {
            return;
        }
        let Some(ma) = ctx.get_kl_min1_am(&bar.symbol).and_then(|am| am.sma(self.param1)) else {
            return;
        };

        let held = ctx
            .get_tiny_position(&bar.symbol)
            .map(|p| p.position - p.frozen)
            .unwrap_or(0);

        if bar.close > ma && held == 0 {
            let reply = ctx.buy(bar.close, self.param2, &bar.symbol);
            ctx.log(format!("buy {} close={} ma={} ret={}", bar.symbol, bar.close, ma, reply));
        } else if bar.close < ma && held > 0 {
            let reply = ctx.sell(bar.close, held as u64, &bar.symbol);
            ctx.log(format!("sell {} close={} ma={} ret={}", bar.symbol, bar.close, ma, reply));
        }
    }
}
