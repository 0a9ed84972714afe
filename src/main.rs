//! Antarctic Explorer
//!
//! Live temperature dashboard.
//!
//! - `serve` (default): run the HTTP/WebSocket dashboard
//! - `watch`: run the live feed in the terminal
//! - `config`: print or write the default configuration

use antarctic_explorer::api::{serve, shutdown_signal, AppState};
use antarctic_explorer::config::{generate_default_config, Config, LoggingConfig};
use antarctic_explorer::dashboard::DashboardVariant;
use antarctic_explorer::feed::{DashboardSnapshot, LiveFeed};
use antarctic_explorer::websocket::{ConnectionHub, HubConfig, ServerMessage, WsEvent};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Parser)]
#[command(name = "antarctic-explorer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live temperature dashboard with reading history and trend line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dashboard variant
    #[arg(long, value_enum, global = true)]
    pub variant: Option<DashboardVariant>,

    /// Seconds between readings
    #[arg(short, long, global = true)]
    pub interval: Option<u64>,

    /// Fixed random seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dashboard server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print readings in the terminal
    Watch {
        /// Stop after this many readings
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config { output }) = &cli.command {
        return write_default_config(output.as_ref());
    }

    // Logging settings live in the config, so loading it logs to a stderr fallback
    let mut config = tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), || {
        resolve_config(&cli)
    })?;

    init_tracing(&config.logging);

    match cli.command {
        Some(Commands::Watch { count }) => watch(&config, count).await,
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.api.host = host;
            }
            if let Some(port) = port {
                config.api.port = port;
            }
            run_server(&config).await
        }
        _ => run_server(&config).await,
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    apply_cli_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

/// Plain subscriber used until the configured one is installed
fn bootstrap_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("antarctic_explorer=info"))
        .with_ansi(false)
        .with_writer(writer)
        .finish()
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(variant) = cli.variant {
        config.dashboard.variant = variant;
    }
    if let Some(interval) = cli.interval {
        config.feed.interval_secs = interval;
    }
    if let Some(seed) = cli.seed {
        config.feed.seed = Some(seed);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "antarctic_explorer={},tower_http=info",
            logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing config to {}", path.display()))?;
            println!("Wrote default config to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

async fn run_server(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting Antarctic Explorer v{} ({} dashboard)",
        env!("CARGO_PKG_VERSION"),
        config.dashboard.variant
    );

    let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
    let feed = Arc::new(LiveFeed::new(config.live_feed_config(), Arc::clone(&hub))?);
    let feed_handle = feed.start();

    let api_config = config.server_config();
    let state = AppState::new(
        Arc::clone(&feed),
        hub,
        api_config.clone(),
        &config.page_options(),
    );
    serve(state, &api_config).await?;

    tracing::info!("Stopping live feed...");
    feed.shutdown().await;
    feed_handle.await?;

    tracing::info!("Antarctic Explorer stopped");
    Ok(())
}

async fn watch(config: &Config, count: Option<u64>) -> anyhow::Result<()> {
    let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
    let mut events = hub.subscribe_broadcast();
    let feed = Arc::new(LiveFeed::new(config.live_feed_config(), Arc::clone(&hub))?);
    let feed_handle = feed.start();

    println!("{}", config.dashboard.title);
    println!("{}", config.dashboard.subtitle);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut seen = 0u64;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(WsEvent { message: ServerMessage::Reading { .. }, .. }) => {
                    seen += 1;
                    print_snapshot(&feed.snapshot().await);
                    if count.is_some_and(|limit| seen >= limit) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Terminal output fell behind the feed");
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown => break,
        }
    }

    feed.shutdown().await;
    feed_handle.await?;
    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    let Some(latest) = snapshot.latest else {
        return;
    };

    println!();
    let decimals = snapshot.decimals;
    println!(
        "Current Temperature:    {} C (warmer than usual)",
        latest.formatted_temp(decimals)
    );
    println!("Current Date and Time:  {}", latest.formatted_timestamp());

    if snapshot.variant.shows_history() {
        println!("  {:>3}  {:>7}  {}", "#", "Temp", "Timestamp");
        for (i, reading) in snapshot.history.iter().enumerate() {
            println!(
                "  {:>3}  {:>7}  {}",
                i,
                reading.formatted_temp(decimals),
                reading.formatted_timestamp()
            );
        }
    }

    if snapshot.variant.shows_trend() {
        match &snapshot.trend {
            Some(view) => println!(
                "Trend: {} (slope {:.3} C/reading, r^2 {:.2})",
                view.trend.direction.as_str(),
                view.trend.slope,
                view.trend.r_squared
            ),
            None => println!("Trend: collecting readings..."),
        }
    }
}
