//! Events delivered by the event source

use serde::{Deserialize, Serialize};

use super::types::{KlineType, TinyBar, TinyQuote};

/// Event kind used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Trading session opened
    BeforeTrading,
    /// Trading session closed
    AfterTrading,
    /// Real-time quote changed
    QuoteChange,
    /// Current bar of some period updated
    CurKlineBar,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::BeforeTrading,
        EventKind::AfterTrading,
        EventKind::QuoteChange,
        EventKind::CurKlineBar,
    ];
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::BeforeTrading => "before_trading",
            EventKind::AfterTrading => "after_trading",
            EventKind::QuoteChange => "quote_change",
            EventKind::CurKlineBar => "cur_kline_bar",
        };
        f.write_str(name)
    }
}

/// Event with its per-kind payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    BeforeTrading {
        /// Unix epoch seconds
        #[serde(rename = "TimeStamp")]
        timestamp: i64,
    },
    AfterTrading {
        #[serde(rename = "TimeStamp")]
        timestamp: i64,
    },
    QuoteChange {
        #[serde(rename = "data")]
        quote: TinyQuote,
    },
    CurKlineBar {
        symbol: String,
        ktype: KlineType,
        #[serde(rename = "data")]
        bar: TinyBar,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BeforeTrading { .. } => EventKind::BeforeTrading,
            Event::AfterTrading { .. } => EventKind::AfterTrading,
            Event::QuoteChange { .. } => EventKind::QuoteChange,
            Event::CurKlineBar { .. } => EventKind::CurKlineBar,
        }
    }

    pub fn before_trading(timestamp: i64) -> Self {
        Event::BeforeTrading { timestamp }
    }

    pub fn after_trading(timestamp: i64) -> Self {
        Event::AfterTrading { timestamp }
    }

    pub fn quote_change(quote: TinyQuote) -> Self {
        Event::QuoteChange { quote }
    }

    pub fn cur_kline_bar(ktype: impl Into<KlineType>, bar: TinyBar) -> Self {
        Event::CurKlineBar {
            symbol: bar.symbol.clone(),
            ktype: ktype.into(),
            bar,
        }
    }
}
