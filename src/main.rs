use anyhow::Result;
use clap::{Arg, Command};
use std::sync::Arc;
use tracing::{info, warn};

use content_aggregator::api::{start_http_server, AppState};
use content_aggregator::config::Config;
use content_aggregator::llm::{GeminiSummarizer, Summarizer};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Content Aggregator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Aggregates articles, YouTube videos, and Reddit threads into JSON")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on (overrides configuration)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose")
        || std::env::var("DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

    // Initialize logging before configuration so load-time warnings land
    let filter = if verbose {
        "content_aggregator=debug,tower_http=debug,info"
    } else {
        "content_aggregator=info,warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port.parse()?;
    }
    if verbose {
        config.server.debug = true;
    }

    info!("content aggregator v{} starting", env!("CARGO_PKG_VERSION"));
    info!("listen address: {}", config.listen_addr());

    let config = Arc::new(config);
    let summarizer: Arc<dyn Summarizer> = Arc::new(GeminiSummarizer::new(config.llm.clone()));
    if summarizer.is_available().await {
        info!("summarizer client ready");
    } else {
        warn!("summarizer client unavailable, downstream summarization disabled");
    }

    let state = AppState::new(config, summarizer);
    start_http_server(state).await
}
