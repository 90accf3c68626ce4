use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stormwatch_watcher::{
    config::Config,
    dispatch::Dispatcher,
    normalize::TextNormalizer,
    poller::PollLoop,
    server::Server,
    sinks::{EventSink, HttpEventSink, Notifier, TelegramNotifier, DEFAULT_API_BASE},
    source::{AlertSource, EventBlocklist, NwsSource, StaticSource, DEFAULT_BASE_URL},
    store::{FileStateStore, StateStore},
};

#[derive(Debug, Parser)]
#[command(name = "stormwatch", about = "Weather alert watcher and notifier")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to the persisted alert state file.
    #[arg(long, default_value = "last_alerts.json")]
    state: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    stormwatch_watcher::metrics::register_metrics();

    // Load configuration
    let config = Config::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    info!(
        "Loaded configuration: {} zone(s), poll every {}s",
        config.alerting.zone_codes.len(),
        config.weather_alerts.poll_interval_secs
    );

    let routing = config.routing();
    let blocklist = EventBlocklist::new(&config.alerting.global_blocked_events);

    // Initialize store
    let store: Arc<dyn StateStore> = Arc::new(FileStateStore::new(args.state));

    // Initialize alert source
    let source: Arc<dyn AlertSource> = if config.dev.inject {
        info!("DEV mode: serving injected alerts instead of the feed");
        Arc::new(StaticSource::new(&config.dev, &routing))
    } else {
        Arc::new(NwsSource::new(
            DEFAULT_BASE_URL,
            &config.webapp.user_agent,
            config.alerting.zone_codes.clone(),
            routing,
            blocklist,
            config.alerting.time_type,
        )?)
    };

    // Initialize notifier and optional log forwarding
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(
        DEFAULT_API_BASE,
        config.telegram.bot_token.clone(),
    )?);
    let event_sink: Option<Arc<dyn EventSink>> = match &config.webapp.log_endpoint {
        Some(endpoint) => Some(Arc::new(HttpEventSink::new(endpoint.clone())?)),
        None => None,
    };

    let dispatcher = Dispatcher::new(
        notifier,
        event_sink,
        TextNormalizer::new(config.describe.max_words),
        config.weather_alerts.uppercase,
    );

    let poll_loop = PollLoop::new(
        source,
        store.clone(),
        dispatcher,
        Duration::from_secs(config.weather_alerts.poll_interval_secs),
    );

    // Initialize server
    let server = Server::new(&config, store);
    let listen_addr = config.webapp.listen_addr.clone();
    info!("Starting server on {listen_addr}");

    tokio::select! {
        result = server.start(&listen_addr) => {
            result.with_context(|| format!("server on {listen_addr} exited"))?;
        }
        _ = poll_loop.run() => {}
    }

    Ok(())
}
