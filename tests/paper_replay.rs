//! End-to-end replay of the demo event file through the sample strategy

mod common;

use common::{global_setting, sample_quote};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;
use tiny_quant::engine::{event_channel, DEFAULT_CHANNEL_SIZE};
use tiny_quant::config::{load_global_setting_from_str, SettingFormat};
use tiny_quant::{
    Event, EventEngine, OrderStatus, PaperFrame, PriceFallback, QuantFrame, SampleStrategy, Side,
    StrategyContext, StrategyHost,
};

const DEMO_EVENTS: &str = include_str!("../demos/events.json");
const DEMO_SETTING: &str = include_str!("../demos/setting.json");

fn sample_host(
    frame: &Arc<PaperFrame>,
    engine: &mut EventEngine,
    price_fallback: PriceFallback,
) -> StrategyHost {
    frame.attach(engine);
    let setting = load_global_setting_from_str(DEMO_SETTING, SettingFormat::Json).unwrap();
    let host = StrategyHost::new(Box::new(SampleStrategy::new())).with_price_fallback(price_fallback);
    let quant_frame: Arc<dyn QuantFrame> = frame.clone();
    host.init_strate(&setting, quant_frame, engine).unwrap();
    host.start().unwrap();
    host
}

#[test_log::test(tokio::test)]
async fn test_demo_replay_trades_on_tick_grid() {
    let frame = Arc::new(PaperFrame::new());
    let mut engine = EventEngine::new();
    let host = sample_host(&frame, &mut engine, PriceFallback::UseRawPrice);
    assert_eq!(host.symbol_pools(), vec!["HK.00700".to_string()]);

    let events: Vec<Event> = serde_json::from_str(DEMO_EVENTS).unwrap();
    let count = events.len();
    let (tx, rx) = event_channel(DEFAULT_CHANNEL_SIZE);
    let feeder = tokio::spawn(async move {
        for event in events {
            tx.send(event).await.unwrap();
        }
    });

    assert_eq!(engine.run(rx).await, count);
    feeder.await.unwrap();

    let orders: Vec<(Side, rust_decimal::Decimal, u64, OrderStatus)> = frame
        .orders()
        .into_iter()
        .map(|o| (o.side, o.price, o.total_volume, o.status))
        .collect();
    assert_eq!(
        orders,
        vec![
            (Side::Buy, dec!(101), 100, OrderStatus::Filled),
            (Side::Sell, dec!(99.8), 100, OrderStatus::Filled),
        ]
    );
    assert!(frame.get_tiny_position("HK.00700").unwrap().is_flat());
    assert!(!host.market_opened());

    let logs = frame.logs();
    assert!(logs.contains(&"tiny_strate_sample:on_start".to_string()));
    assert!(logs.iter().any(|l| l.starts_with("tiny_strate_sample:on_bar_day symbol=HK.00700")));
}

#[test]
fn test_sample_requires_its_params() {
    let frame: Arc<dyn QuantFrame> = Arc::new(PaperFrame::new());
    let mut engine = EventEngine::new();
    let host = StrategyHost::new(Box::new(SampleStrategy::new()));

    let err = host
        .init_strate(
            &global_setting(SampleStrategy::NAME, json!({"param1": 3})),
            frame,
            &mut engine,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "setting.json - 'tiny_strate_sample' config no key:'param2'");
}

#[test]
fn test_facade_without_quote_submits_raw_price() {
    let frame = Arc::new(PaperFrame::new());
    let ctx = StrategyContext::new("probe", frame.clone(), PriceFallback::UseRawPrice);

    // The paper frame refuses symbols it has no quote for, so the raw-price
    // submission comes back as the frame's own error.
    let reply = ctx.buy(dec!(10.003), 100, "US.AAPL");
    assert_eq!(reply.status(), -1);
    assert_eq!(reply.message(), Some("no quote data for US.AAPL"));
}

#[test]
fn test_reject_policy_blocks_zero_spread_orders() {
    let frame = Arc::new(PaperFrame::new());
    frame.update_quote(sample_quote("HK.00001", dec!(50), dec!(0)));

    let ctx = StrategyContext::new("probe", frame.clone(), PriceFallback::Reject);
    let reply = ctx.buy(dec!(50.01), 100, "HK.00001");

    assert_eq!(reply.message(), Some("regular_trade_price error, no price spread!"));
    assert!(frame.orders().is_empty());

    let lenient = StrategyContext::new("probe", frame.clone(), PriceFallback::UseRawPrice);
    let order_id = lenient.buy(dec!(50.01), 100, "HK.00001").into_result().unwrap();
    let order = lenient.get_tiny_trade_order(&order_id).into_result().unwrap();
    assert_eq!(order.price, dec!(50.01));
}
