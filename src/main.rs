//! TinyQuant - Main Entry Point
//!
//! Replays a recorded event file through the sample strategy on the
//! in-memory paper frame.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tiny_quant::config::{load_config, load_global_setting};
use tiny_quant::engine::event_channel;
use tiny_quant::{Event, EventEngine, PaperFrame, QuantFrame, SampleStrategy, StrategyHost};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to application configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Path to the strategy setting file (overrides the configuration)
    #[arg(short, long, env = "TINYQUANT_SETTING")]
    setting: Option<String>,

    /// JSON array of events to replay
    #[arg(short, long)]
    events: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let app_config = load_config(Some(&args.config)).context("loading configuration")?;
    let settings = app_config.settings;

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&settings.log_level);
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting TinyQuant replay");
    info!("Configuration file: {}", args.config);

    let setting_path = args.setting.unwrap_or(settings.setting_path);
    let global_setting = load_global_setting(&setting_path)
        .with_context(|| format!("loading strategy setting '{}'", setting_path))?;

    let raw = std::fs::read_to_string(&args.events)
        .with_context(|| format!("reading events '{}'", args.events))?;
    let events: Vec<Event> = serde_json::from_str(&raw).context("parsing events")?;

    let mut engine = EventEngine::new();
    let frame = Arc::new(PaperFrame::new());
    frame.attach(&mut engine);

    let host = StrategyHost::new(Box::new(SampleStrategy::new()))
        .with_price_fallback(settings.price_fallback);
    let quant_frame: Arc<dyn QuantFrame> = frame.clone();
    host.init_strate(&global_setting, quant_frame, &mut engine)?;
    host.start()?;
    info!(strategy = host.name(), symbols = ?host.symbol_pools(), "strategy running");

    let (tx, rx) = event_channel(settings.channel_size);
    let feeder = tokio::spawn(async move {
        for event in events {
            if tx.send(event).await.is_err() {
                break;
            }
        }
    });

    let processed = engine.run(rx).await;
    feeder.await?;

    for order in frame.orders() {
        info!(
            order_id = %order.order_id,
            side = %order.side,
            price = %order.price,
            volume = order.total_volume,
            status = ?order.status,
            "order"
        );
    }
    info!(processed, "replay finished");

    Ok(())
}
