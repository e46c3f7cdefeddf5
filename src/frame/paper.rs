use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::array_manager::{ArrayManager, DEFAULT_AM_SIZE};
use crate::common::events::{Event, EventKind};
use crate::common::traits::{EventSource, QuantFrame};
use crate::common::types::{
    KlineType, OrderId, OrderStatus, Reply, Side, TinyBar, TinyPosition, TinyQuote,
    TinyTradeOrder,
};

#[derive(Debug, Default)]
struct PaperState {
    quotes: HashMap<String, TinyQuote>,
    min1: HashMap<String, ArrayManager>,
    day: HashMap<String, ArrayManager>,
    orders: HashMap<OrderId, TinyTradeOrder>,
    positions: HashMap<String, TinyPosition>,
    next_order: u64,
    logs: Vec<String>,
}

/// In-memory trading frame
///
/// Keeps the latest quote and bar history per symbol. Orders that are
/// marketable against the last price fill in full at the order price;
/// others rest until a later quote crosses them or they are cancelled.
/// Sells are limited to the unfrozen position.
#[derive(Debug)]
pub struct PaperFrame {
    state: Mutex<PaperState>,
    am_size: usize,
}

impl Default for PaperFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl PaperFrame {
    pub fn new() -> Self {
        Self::with_am_size(DEFAULT_AM_SIZE)
    }

    /// Frame whose bar series keep `am_size` bars
    pub fn with_am_size(am_size: usize) -> Self {
        Self {
            state: Mutex::new(PaperState::default()),
            am_size,
        }
    }

    fn state(&self) -> MutexGuard<'_, PaperState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe the frame's market state to quote and bar events.
    ///
    /// Attach before any strategy so callbacks observe the updated state.
    pub fn attach(self: &Arc<Self>, source: &mut dyn EventSource) {
        let frame = Arc::clone(self);
        source.register(
            EventKind::QuoteChange,
            Box::new(move |event: &Event| {
                if let Event::QuoteChange { quote } = event {
                    frame.update_quote(quote.clone());
                }
            }),
        );

        let frame = Arc::clone(self);
        source.register(
            EventKind::CurKlineBar,
            Box::new(move |event: &Event| {
                if let Event::CurKlineBar { ktype, bar, .. } = event {
                    frame.update_bar(ktype, bar);
                }
            }),
        );
    }

    /// Store the latest quote and fill resting orders it crosses
    pub fn update_quote(&self, quote: TinyQuote) {
        let mut state = self.state();
        let symbol = quote.symbol.clone();
        let last = quote.last_price;
        state.quotes.insert(symbol.clone(), quote);

        let crossed: Vec<OrderId> = state
            .orders
            .values()
            .filter(|o| o.symbol == symbol && o.status.is_active() && is_marketable(o.side, o.price, last))
            .map(|o| o.order_id.clone())
            .collect();

        for order_id in crossed {
            fill(&mut state, &order_id);
        }
    }

    /// Append a bar to the series of its period; other periods are ignored
    pub fn update_bar(&self, ktype: &KlineType, bar: &TinyBar) {
        let am_size = self.am_size;
        let mut state = self.state();
        let series = match ktype {
            KlineType::Min1 => &mut state.min1,
            KlineType::Day => &mut state.day,
            KlineType::Other(_) => return,
        };
        series
            .entry(bar.symbol.clone())
            .or_insert_with(|| ArrayManager::new(am_size))
            .update_bar(bar);
    }

    /// Seed a holding, e.g. from a broker snapshot
    pub fn set_position(&self, position: TinyPosition) {
        self.state()
            .positions
            .insert(position.symbol.clone(), position);
    }

    /// Every line written through `write_cta_log`
    pub fn logs(&self) -> Vec<String> {
        self.state().logs.clone()
    }

    /// Every order submitted so far, oldest first
    pub fn orders(&self) -> Vec<TinyTradeOrder> {
        let mut orders: Vec<TinyTradeOrder> = self.state().orders.values().cloned().collect();
        orders.sort_by_key(|o| order_seq(&o.order_id));
        orders
    }

    fn submit(&self, side: Side, price: Decimal, volume: u64, symbol: &str) -> Reply<OrderId> {
        if volume == 0 {
            return Reply::err("order volume must be positive");
        }
        if price <= Decimal::ZERO {
            return Reply::err(format!("invalid order price {}", price));
        }

        let Ok(shares) = i64::try_from(volume) else {
            return Reply::err(format!("order volume {} out of range", volume));
        };

        let mut state = self.state();
        let last = match state.quotes.get(symbol) {
            Some(quote) => quote.last_price,
            None => return Reply::err(format!("no quote data for {}", symbol)),
        };

        if side == Side::Sell {
            let available = state
                .positions
                .get(symbol)
                .map(|p| p.position - p.frozen)
                .unwrap_or(0);
            if available < shares {
                return Reply::err(format!(
                    "insufficient position for {}: available {}, requested {}",
                    symbol, available, volume
                ));
            }
            if let Some(position) = state.positions.get_mut(symbol) {
                position.frozen += shares;
            }
        } else {
            let held = state.positions.get(symbol).map_or(0, |p| p.position);
            if held.checked_add(shares).is_none() {
                return Reply::err(format!("position for {} would overflow", symbol));
            }
        }

        state.next_order += 1;
        let order_id = OrderId::new(format!("paper-{}", state.next_order));
        state.orders.insert(
            order_id.clone(),
            TinyTradeOrder {
                order_id: order_id.clone(),
                symbol: symbol.to_string(),
                side,
                price,
                total_volume: volume,
                trade_volume: 0,
                status: OrderStatus::Submitted,
            },
        );
        debug!(%order_id, %side, %price, volume, symbol, "paper order submitted");

        if is_marketable(side, price, last) {
            fill(&mut state, &order_id);
        }

        Reply::ok(order_id)
    }
}

fn is_marketable(side: Side, price: Decimal, last: Decimal) -> bool {
    match side {
        Side::Buy => price >= last,
        Side::Sell => price <= last,
    }
}

fn order_seq(order_id: &OrderId) -> u64 {
    order_id
        .as_str()
        .rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Submitted volumes always fit `i64`
fn unfilled_shares(order: &TinyTradeOrder) -> i64 {
    i64::try_from(order.total_volume - order.trade_volume).unwrap_or(i64::MAX)
}

fn fill(state: &mut PaperState, order_id: &OrderId) {
    let Some(order) = state.orders.get_mut(order_id) else {
        return;
    };
    let remaining = unfilled_shares(order);
    order.trade_volume = order.total_volume;
    order.status = OrderStatus::Filled;
    let (symbol, side, price) = (order.symbol.clone(), order.side, order.price);

    let position = state
        .positions
        .entry(symbol.clone())
        .or_insert_with(|| TinyPosition::new(symbol));
    match side {
        Side::Buy => {
            let held = Decimal::from(position.position);
            let added = Decimal::from(remaining);
            position.cost_price = (position.cost_price * held + price * added) / (held + added);
            position.position += remaining;
        }
        Side::Sell => {
            position.position -= remaining;
            position.frozen = (position.frozen - remaining).max(0);
            if position.position == 0 {
                position.cost_price = Decimal::ZERO;
            }
        }
    }
    debug!(%order_id, %side, %price, volume = remaining, "paper order filled");
}

impl QuantFrame for PaperFrame {
    fn get_rt_tiny_quote(&self, symbol: &str) -> Option<TinyQuote> {
        self.state().quotes.get(symbol).cloned()
    }

    fn get_kl_min1_am(&self, symbol: &str) -> Option<ArrayManager> {
        self.state().min1.get(symbol).cloned()
    }

    fn get_kl_day_am(&self, symbol: &str) -> Option<ArrayManager> {
        self.state().day.get(symbol).cloned()
    }

    fn buy(&self, price: Decimal, volume: u64, symbol: &str) -> Reply<OrderId> {
        self.submit(Side::Buy, price, volume, symbol)
    }

    fn sell(&self, price: Decimal, volume: u64, symbol: &str) -> Reply<OrderId> {
        self.submit(Side::Sell, price, volume, symbol)
    }

    fn cancel_order(&self, order_id: &OrderId) -> Reply<()> {
        let mut state = self.state();
        let Some(order) = state.orders.get_mut(order_id) else {
            return Reply::err(format!("unknown order {}", order_id));
        };
        if !order.status.is_active() {
            return Reply::err(format!("order {} is {:?}", order_id, order.status));
        }

        order.status = OrderStatus::Cancelled;
        let unfilled = unfilled_shares(order);
        let (side, symbol) = (order.side, order.symbol.clone());
        if side == Side::Sell {
            if let Some(position) = state.positions.get_mut(&symbol) {
                position.frozen = (position.frozen - unfilled).max(0);
            }
        }
        Reply::ok(())
    }

    fn get_tiny_trade_order(&self, order_id: &OrderId) -> Reply<TinyTradeOrder> {
        match self.state().orders.get(order_id) {
            Some(order) => Reply::ok(order.clone()),
            None => Reply::err(format!("unknown order {}", order_id)),
        }
    }

    fn get_tiny_position(&self, symbol: &str) -> Option<TinyPosition> {
        self.state().positions.get(symbol).cloned()
    }

    fn write_cta_log(&self, content: &str) {
        info!(target: "cta", "{}", content);
        self.state().logs.push(content.to_string());
    }
}
