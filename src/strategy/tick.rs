//! Order price alignment to the instrument's tick grid

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::common::errors::{Result, StrateError};
use crate::common::types::{Side, TinyQuote};

/// Prices and spreads are compared as integers scaled by this factor
/// (three decimal digits of tick precision).
pub const PRICE_FACTOR: i64 = 1000;
const PRICE_SCALE: u32 = 3;

/// Direction a misaligned price moves to reach the tick grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundDirection {
    Up,
    Down,
}

impl RoundDirection {
    pub fn from_upper(to_upper: bool) -> Self {
        if to_upper {
            RoundDirection::Up
        } else {
            RoundDirection::Down
        }
    }
}

impl From<Side> for RoundDirection {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => RoundDirection::Up,
            Side::Sell => RoundDirection::Down,
        }
    }
}

fn scale(value: Decimal) -> Option<i64> {
    value
        .checked_mul(Decimal::from(PRICE_FACTOR))?
        .trunc()
        .to_i64()
}

/// Align `price` to a multiple of `spread`.
///
/// Both values are truncated to three decimals first. Already aligned prices
/// come back unchanged in either direction. Returns `None` when the spread is
/// not positive at that precision, or when the price falls outside the
/// scaled integer range.
pub fn regularize_price(price: Decimal, spread: Decimal, direction: RoundDirection) -> Option<Decimal> {
    let spread = scale(spread).filter(|s| *s > 0)?;
    let price = scale(price)?;

    let mut aligned = price
        .checked_add(spread - 1)?
        .div_euclid(spread)
        .checked_mul(spread)?;
    if aligned != price && direction == RoundDirection::Down {
        aligned = aligned.checked_sub(spread)?;
    }

    Some(Decimal::new(aligned, PRICE_SCALE).normalize())
}

/// Align `price` to the tick grid of the symbol's current quote
pub fn regularize(
    symbol: &str,
    quote: Option<&TinyQuote>,
    price: Decimal,
    direction: RoundDirection,
) -> Result<Decimal> {
    let quote = quote.ok_or_else(|| StrateError::NoQuote {
        symbol: symbol.to_string(),
    })?;

    if scale(quote.price_spread).filter(|s| *s > 0).is_none() {
        return Err(StrateError::NoSpread {
            symbol: symbol.to_string(),
        });
    }

    regularize_price(price, quote.price_spread, direction).ok_or_else(|| {
        StrateError::PriceOutOfRange {
            symbol: symbol.to_string(),
            price,
        }
    })
}
