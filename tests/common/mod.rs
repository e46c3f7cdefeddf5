//! Common test utilities and fixtures

#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use tiny_quant::config::FieldSet;
use tiny_quant::{GlobalSetting, Result, Strategy, StrategyContext, TinyBar, TinyQuote};

/// 2024-01-02 09:30:00 UTC
pub const SESSION_OPEN_TS: i64 = 1704187800;
/// 2024-01-02 16:00:00 UTC
pub const SESSION_CLOSE_TS: i64 = 1704211200;

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Create a sample quote for testing
pub fn sample_quote(symbol: &str, last: Decimal, spread: Decimal) -> TinyQuote {
    TinyQuote {
        symbol: symbol.to_string(),
        datetime: at(10, 0),
        open_price: last,
        high_price: last,
        low_price: last,
        last_price: last,
        pre_close_price: last,
        volume: 1000,
        turnover: Decimal::ZERO,
        price_spread: spread,
    }
}

/// Create a sample bar for testing
pub fn sample_bar(symbol: &str, close: Decimal, minute: u32) -> TinyBar {
    TinyBar {
        symbol: symbol.to_string(),
        datetime: at(9, 30 + minute),
        open: close,
        high: close,
        low: close,
        close,
        volume: 500,
        turnover: Decimal::ZERO,
    }
}

/// Global setting with one block
pub fn global_setting(name: &str, block: serde_json::Value) -> GlobalSetting {
    let mut setting = GlobalSetting::new();
    setting.insert(
        name.to_string(),
        serde_json::from_value(block).expect("block must be an object"),
    );
    setting
}

/// Strategy that records every callback it receives
pub struct RecordingStrategy {
    name: String,
    fields: FieldSet,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingStrategy {
    pub fn new(name: &str, fields: FieldSet) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let strategy = Self {
            name: name.to_string(),
            fields,
            calls: Arc::clone(&calls),
        };
        (strategy, calls)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Strategy for RecordingStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn declare_fields(&self) -> FieldSet {
        self.fields.clone()
    }

    fn apply_settings(&mut self, fields: &FieldSet) -> Result<()> {
        let names: Vec<&str> = fields.names().collect();
        self.record(format!("apply_settings {}", names.join(",")));
        Ok(())
    }

    fn on_init_strate(&mut self, _ctx: &StrategyContext) {
        self.record("on_init_strate".to_string());
    }

    fn on_start(&mut self, _ctx: &StrategyContext) {
        self.record("on_start".to_string());
    }

    fn on_quote_changed(&mut self, _ctx: &StrategyContext, quote: &TinyQuote) {
        self.record(format!("on_quote_changed {}", quote.symbol));
    }

    fn on_bar_min1(&mut self, _ctx: &StrategyContext, bar: &TinyBar) {
        self.record(format!("on_bar_min1 {}", bar.close));
    }

    fn on_bar_day(&mut self, _ctx: &StrategyContext, bar: &TinyBar) {
        self.record(format!("on_bar_day {}", bar.close));
    }

    fn on_before_trading(&mut self, _ctx: &StrategyContext, date_time: DateTime<Local>) {
        self.record(format!("on_before_trading {}", date_time.timestamp()));
    }

    fn on_after_trading(&mut self, _ctx: &StrategyContext, date_time: DateTime<Local>) {
        self.record(format!("on_after_trading {}", date_time.timestamp()));
    }
}

/// Strategy relying on every default callback body
pub struct QuietStrategy;

impl Strategy for QuietStrategy {
    fn name(&self) -> &str {
        "quiet"
    }
}
