use chrono::{DateTime, Local, TimeZone};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, trace, warn};

use super::context::StrategyContext;
use super::session::SessionGate;
use super::traits::BoxedStrategy;
use crate::common::errors::{Result, StrateError};
use crate::common::events::{Event, EventKind};
use crate::common::traits::{EventHandler, EventSource, QuantFrame};
use crate::common::types::KlineType;
use crate::config::fields::{load_setting, FieldSet};
use crate::config::types::{GlobalSetting, PriceFallback};

struct HostState {
    strategy: BoxedStrategy,
    /// Bound by `init_strate`; `None` until then
    ctx: Option<StrategyContext>,
    gate: SessionGate,
    fields: Option<FieldSet>,
    price_fallback: PriceFallback,
}

impl HostState {
    fn dispatch(&mut self, event: &Event) {
        let Some(ctx) = self.ctx.as_ref() else {
            warn!(kind = %event.kind(), "event delivered before init_strate, dropped");
            return;
        };

        match event {
            Event::BeforeTrading { timestamp } => {
                self.gate.open();
                if let Some(date_time) = local_time(*timestamp) {
                    self.strategy.on_before_trading(ctx, date_time);
                }
            }
            Event::AfterTrading { timestamp } => {
                self.gate.close();
                if let Some(date_time) = local_time(*timestamp) {
                    self.strategy.on_after_trading(ctx, date_time);
                }
            }
            Event::QuoteChange { quote } => {
                if !self.gate.admits_quotes() {
                    trace!(symbol = %quote.symbol, "market closed, quote dropped");
                    return;
                }
                self.strategy.on_quote_changed(ctx, quote);
            }
            Event::CurKlineBar { symbol, ktype, bar } => match ktype {
                KlineType::Min1 => self.strategy.on_bar_min1(ctx, bar),
                KlineType::Day => self.strategy.on_bar_day(ctx, bar),
                KlineType::Other(tag) => trace!(%symbol, ktype = %tag, "bar period not routed"),
            },
        }
    }
}

fn local_time(timestamp: i64) -> Option<DateTime<Local>> {
    let date_time = Local.timestamp_opt(timestamp, 0).single();
    if date_time.is_none() {
        warn!(timestamp, "session event carries an invalid timestamp, callback skipped");
    }
    date_time
}

/// Lifecycle owner and event router for one strategy instance
///
/// `init_strate` loads the strategy's settings, binds the trading frame and
/// subscribes to session, quote and bar events. Cloning the host shares the
/// same instance. Events are dispatched under the instance lock, so at most
/// one event is processed at a time.
#[derive(Clone)]
pub struct StrategyHost {
    name: String,
    inner: Arc<Mutex<HostState>>,
}

impl StrategyHost {
    pub fn new(strategy: BoxedStrategy) -> Self {
        Self {
            name: strategy.name().to_string(),
            inner: Arc::new(Mutex::new(HostState {
                strategy,
                ctx: None,
                gate: SessionGate::new(),
                fields: None,
                price_fallback: PriceFallback::default(),
            })),
        }
    }

    /// Order price policy when alignment fails; takes effect at `init_strate`
    pub fn with_price_fallback(self, price_fallback: PriceFallback) -> Self {
        self.lock().price_fallback = price_fallback;
        self
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `init_strate` has completed
    pub fn is_initialized(&self) -> bool {
        self.lock().ctx.is_some()
    }

    pub fn market_opened(&self) -> bool {
        self.lock().gate.is_open()
    }

    /// Fields applied at initialization
    pub fn fields(&self) -> Option<FieldSet> {
        self.lock().fields.clone()
    }

    pub fn symbol_pools(&self) -> Vec<String> {
        self.lock().strategy.symbol_pools()
    }

    /// Initialize the strategy and subscribe it to `source`.
    ///
    /// Runs once: later calls return `Ok(true)` without touching settings or
    /// subscriptions. A failed call leaves the host unbound, so it can be
    /// retried with a corrected setting.
    #[instrument(skip_all, fields(strategy = %self.name))]
    pub fn init_strate(
        &self,
        global_setting: &GlobalSetting,
        frame: Arc<dyn QuantFrame>,
        source: &mut dyn EventSource,
    ) -> Result<bool> {
        let mut state = self.lock();
        if state.ctx.is_some() {
            debug!("already initialized");
            return Ok(true);
        }

        let mut fields = state.strategy.declare_fields();
        load_setting(global_setting, &self.name, &mut fields)?;
        state.strategy.apply_settings(&fields)?;
        state.fields = Some(fields);

        let ctx = StrategyContext::new(self.name.clone(), frame, state.price_fallback);
        for kind in EventKind::ALL {
            source.register(kind, self.handler());
        }

        ctx.log(format!("init_strate '{}' ret = {}", self.name, true));
        info!("strategy initialized");

        let HostState { strategy, ctx: slot, .. } = &mut *state;
        let ctx = slot.insert(ctx);
        strategy.on_init_strate(ctx);

        Ok(true)
    }

    fn handler(&self) -> EventHandler {
        let inner = Arc::clone(&self.inner);
        Box::new(move |event: &Event| {
            inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .dispatch(event)
        })
    }

    /// Start the strategy; requires a completed `init_strate`
    pub fn start(&self) -> Result<()> {
        let mut state = self.lock();
        let HostState { strategy, ctx, .. } = &mut *state;
        let ctx = ctx
            .as_ref()
            .ok_or_else(|| StrateError::NotInitialized(self.name.clone()))?;

        info!(strategy = %self.name, "strategy started");
        strategy.on_start(ctx);
        Ok(())
    }

    /// Route one event directly, as a subscribed handler would
    pub fn dispatch(&self, event: &Event) {
        self.lock().dispatch(event);
    }
}

impl std::fmt::Debug for StrategyHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyHost")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .field("market_opened", &self.market_opened())
            .finish()
    }
}
