use rust_decimal::Decimal;
use std::collections::VecDeque;

use crate::common::types::TinyBar;

/// Default number of bars kept per series
pub const DEFAULT_AM_SIZE: usize = 100;

/// Rolling window of recent bars
///
/// Holds at most `size` bars; the oldest bar is dropped once the window is
/// full. Indicators are only meaningful after [`ArrayManager::inited`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayManager {
    size: usize,
    count: usize,
    open: VecDeque<Decimal>,
    high: VecDeque<Decimal>,
    low: VecDeque<Decimal>,
    close: VecDeque<Decimal>,
    volume: VecDeque<u64>,
}

impl Default for ArrayManager {
    fn default() -> Self {
        Self::new(DEFAULT_AM_SIZE)
    }
}

impl ArrayManager {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            count: 0,
            open: VecDeque::with_capacity(size),
            high: VecDeque::with_capacity(size),
            low: VecDeque::with_capacity(size),
            close: VecDeque::with_capacity(size),
            volume: VecDeque::with_capacity(size),
        }
    }

    pub fn update_bar(&mut self, bar: &TinyBar) {
        if self.close.len() == self.size {
            self.open.pop_front();
            self.high.pop_front();
            self.low.pop_front();
            self.close.pop_front();
            self.volume.pop_front();
        }

        self.open.push_back(bar.open);
        self.high.push_back(bar.high);
        self.low.push_back(bar.low);
        self.close.push_back(bar.close);
        self.volume.push_back(bar.volume);
        self.count += 1;
    }

    /// True once the window has been filled at least once
    pub fn inited(&self) -> bool {
        self.count >= self.size
    }

    /// Total bars seen, including dropped ones
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn open(&self) -> Vec<Decimal> {
        self.open.iter().copied().collect()
    }

    pub fn high(&self) -> Vec<Decimal> {
        self.high.iter().copied().collect()
    }

    pub fn low(&self) -> Vec<Decimal> {
        self.low.iter().copied().collect()
    }

    pub fn close(&self) -> Vec<Decimal> {
        self.close.iter().copied().collect()
    }

    pub fn volume(&self) -> Vec<u64> {
        self.volume.iter().copied().collect()
    }

    pub fn last_close(&self) -> Option<Decimal> {
        self.close.back().copied()
    }

    /// Simple moving average of the last `n` closes
    pub fn sma(&self, n: usize) -> Option<Decimal> {
        if n == 0 || self.close.len() < n {
            return None;
        }
        let sum: Decimal = self.close.iter().rev().take(n).sum();
        Some(sum / Decimal::from(n))
    }

    /// Highest high over the last `n` bars
    pub fn highest(&self, n: usize) -> Option<Decimal> {
        if n == 0 || self.high.len() < n {
            return None;
        }
        self.high.iter().rev().take(n).copied().max()
    }

    /// Lowest low over the last `n` bars
    pub fn lowest(&self, n: usize) -> Option<Decimal> {
        if n == 0 || self.low.len() < n {
            return None;
        }
        self.low.iter().rev().take(n).copied().min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn bar(close: Decimal) -> TinyBar {
        TinyBar {
            symbol: "HK.00700".to_string(),
            datetime: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 31, 0)
                .unwrap(),
            open: close,
            high: close + dec!(1),
            low: close - dec!(1),
            close,
            volume: 100,
            turnover: Decimal::ZERO,
        }
    }

    #[test]
    fn test_window_rolls_and_inits() {
        let mut am = ArrayManager::new(3);
        for close in [dec!(10), dec!(11), dec!(12)] {
            assert!(!am.inited());
            am.update_bar(&bar(close));
        }
        assert!(am.inited());

        am.update_bar(&bar(dec!(13)));
        assert_eq!(am.close(), vec![dec!(11), dec!(12), dec!(13)]);
        assert_eq!(am.count(), 4);
        assert_eq!(am.last_close(), Some(dec!(13)));
    }

    #[test]
    fn test_indicators() {
        let mut am = ArrayManager::new(5);
        for close in [dec!(10), dec!(12), dec!(14)] {
            am.update_bar(&bar(close));
        }

        assert_eq!(am.sma(2), Some(dec!(13)));
        assert_eq!(am.sma(4), None);
        assert_eq!(am.highest(3), Some(dec!(15)));
        assert_eq!(am.lowest(2), Some(dec!(11)));
    }
}
