use anyhow::Result;
use clap::Parser;
use reqwest::Client;

use graph_proxy::auth::client::AuthenticatedClient;
use graph_proxy::auth::provider::TokenProvider;
use graph_proxy::cache::token_cache::TokenCache;
use graph_proxy::config::loader;
use graph_proxy::graph::service::GraphService;
use graph_proxy::observability::metrics::get_metrics;
use graph_proxy::observability::routes::MetricsState;
use graph_proxy::observability::service_resources_metrics::collect_process_metrics;
use graph_proxy::server::account::AccountState;
use graph_proxy::server::server::{self, AppState};
use graph_proxy::utils::constants::DEFAULT_CONFIG_PATH;
use graph_proxy::utils::logging::{self, LogLevel};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args and YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level)?;

    // -------------------------------
    // 2. Create request client and token provider
    // -------------------------------

    let client = Client::new();
    let cache = TokenCache::new();
    let provider = TokenProvider::new(
        &service_config.credential,
        &service_config.graph,
        cache,
        client.clone(),
    )?;

    // -------------------------------
    // 3. Wire the directory service behind the signing client
    // -------------------------------

    let graph = GraphService::new(
        AuthenticatedClient::new(provider),
        client,
        service_config.graph.base_url.clone(),
    );

    // -------------------------------
    // 4. Start http server
    // -------------------------------

    let metrics = get_metrics().await;
    let state = AppState::new(
        graph,
        AccountState::new(&service_config.credential),
        MetricsState::new(metrics.registry.clone()),
    );
    let http_server = server::start(state, service_config.settings.clone());

    // -------------------------------
    // 5. Start scraping system resources consumption metrics
    // -------------------------------

    let service_metrics = collect_process_metrics(service_config.settings.metrics.is_enabled);
    info!("Service starting...");
    tokio::try_join!(http_server, service_metrics)?;

    Ok(())
}
