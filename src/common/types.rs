//! Market data and trading records shared by the strategy core and its frame

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Bar period kind carried by current-bar events
///
/// Unknown tags are kept verbatim so that new period kinds can flow through
/// the feed without breaking deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KlineType {
    /// One-minute bars
    Min1,
    /// Daily bars
    Day,
    /// Any period kind the router does not handle
    Other(String),
}

impl KlineType {
    pub const MIN1_TAG: &'static str = "K_1M";
    pub const DAY_TAG: &'static str = "K_DAY";

    pub fn as_str(&self) -> &str {
        match self {
            KlineType::Min1 => Self::MIN1_TAG,
            KlineType::Day => Self::DAY_TAG,
            KlineType::Other(tag) => tag,
        }
    }
}

impl From<String> for KlineType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            Self::MIN1_TAG => KlineType::Min1,
            Self::DAY_TAG => KlineType::Day,
            _ => KlineType::Other(tag),
        }
    }
}

impl From<&str> for KlineType {
    fn from(tag: &str) -> Self {
        KlineType::from(tag.to_string())
    }
}

impl From<KlineType> for String {
    fn from(ktype: KlineType) -> Self {
        ktype.as_str().to_string()
    }
}

impl std::fmt::Display for KlineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Real-time quote snapshot for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinyQuote {
    pub symbol: String,
    pub datetime: NaiveDateTime,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub last_price: Decimal,
    #[serde(default)]
    pub pre_close_price: Decimal,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub turnover: Decimal,
    /// Minimum tick increment for order prices
    pub price_spread: Decimal,
}

/// OHLCV summary of one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinyBar {
    pub symbol: String,
    pub datetime: NaiveDateTime,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
    #[serde(default)]
    pub turnover: Decimal,
}

/// Identifier handed out by the trading frame on order submission
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of an order as reported by the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Submitted,
    PartiallyFilled,
    Filled,
    Cancelled,
    Failed,
}

impl OrderStatus {
    /// Whether the order can still be cancelled
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Submitted | OrderStatus::PartiallyFilled)
    }
}

/// Order details returned by `get_tiny_trade_order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinyTradeOrder {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    pub total_volume: u64,
    pub trade_volume: u64,
    pub status: OrderStatus,
}

/// Holding in one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinyPosition {
    pub symbol: String,
    /// Net quantity held (negative when short)
    pub position: i64,
    /// Quantity locked by working sell orders
    #[serde(default)]
    pub frozen: i64,
    /// Average cost per share
    pub cost_price: Decimal,
}

impl TinyPosition {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            position: 0,
            frozen: 0,
            cost_price: Decimal::ZERO,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position == 0
    }
}

/// Two-part result of every trading-frame call: a status code (0 = success)
/// and either the payload or a human-readable error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Ok(T),
    Err { status: i32, message: String },
}

/// Status code used for failures that carry no frame-specific code
pub const RET_ERROR: i32 = -1;

impl<T> Reply<T> {
    pub fn ok(data: T) -> Self {
        Reply::Ok(data)
    }

    /// Failure with the generic `-1` status
    pub fn err(message: impl Into<String>) -> Self {
        Self::fail(RET_ERROR, message)
    }

    /// Failure with a frame-specific status. A zero status is coerced to `-1`.
    pub fn fail(status: i32, message: impl Into<String>) -> Self {
        Reply::Err {
            status: if status == 0 { RET_ERROR } else { status },
            message: message.into(),
        }
    }

    pub fn status(&self) -> i32 {
        match self {
            Reply::Ok(_) => 0,
            Reply::Err { status, .. } => *status,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Reply::Ok(data) => Some(data),
            Reply::Err { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Reply::Ok(_) => None,
            Reply::Err { message, .. } => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Ok(data) => Reply::Ok(f(data)),
            Reply::Err { status, message } => Reply::Err { status, message },
        }
    }

    /// Split into `(status, payload-or-message)`
    pub fn into_parts(self) -> (i32, std::result::Result<T, String>) {
        match self {
            Reply::Ok(data) => (0, Ok(data)),
            Reply::Err { status, message } => (status, Err(message)),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, String> {
        self.into_parts().1
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Reply<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Ok(data) => write!(f, "(0, {})", data),
            Reply::Err { status, message } => write!(f, "({}, {})", status, message),
        }
    }
}
