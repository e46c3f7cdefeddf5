//! Error types for the strategy core

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using our StrateError
pub type Result<T> = std::result::Result<T, StrateError>;

/// Main error type for strategy initialization and price handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrateError {
    /// The global setting has no block for this strategy
    #[error("setting.json - no config '{strategy}'!")]
    ConfigMissing { strategy: String },

    /// A declared field is still unset after the overlay
    #[error("setting.json - '{strategy}' config no key:'{field}'")]
    ConfigIncomplete { strategy: String, field: String },

    /// Configuration could not be read or a value has the wrong type
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation needed a completed `init_strate`
    #[error("Strategy not initialized: {0}")]
    NotInitialized(String),

    /// No real-time quote is available for the symbol
    #[error("regular_trade_price error, no quote data!")]
    NoQuote { symbol: String },

    /// The quote carries no usable tick spread
    #[error("regular_trade_price error, no price spread!")]
    NoSpread { symbol: String },

    /// The price cannot be aligned at three-decimal precision
    #[error("regular_trade_price error, price {price} out of range!")]
    PriceOutOfRange { symbol: String, price: Decimal },

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StrateError {
    /// Whether this error aborts strategy startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StrateError::ConfigMissing { .. }
                | StrateError::ConfigIncomplete { .. }
                | StrateError::Configuration(_)
                | StrateError::NotInitialized(_)
        )
    }
}

impl From<config::ConfigError> for StrateError {
    fn from(err: config::ConfigError) -> Self {
        StrateError::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for StrateError {
    fn from(err: serde_json::Error) -> Self {
        StrateError::Configuration(err.to_string())
    }
}

impl From<toml::de::Error> for StrateError {
    fn from(err: toml::de::Error) -> Self {
        StrateError::Configuration(err.to_string())
    }
}
