use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing::info;

use crate::config::settings::SettingsConfig;
use crate::graph::service::GraphService;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::server::account::AccountState;
use crate::server::routes;

#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<GraphService>,
    pub metrics_state: MetricsState,
    pub account_state: AccountState,
}

impl AppState {
    pub fn new(graph: GraphService, account_state: AccountState, metrics_state: MetricsState) -> Self {
        Self {
            graph: Arc::new(graph),
            metrics_state,
            account_state,
        }
    }
}

/// Assemble the full application router.
pub fn app_router(state: &AppState, settings_config: &SettingsConfig) -> Router {
    Router::new()
        .merge(routes::router())
        .merge(crate::server::account::router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state.clone())
}

/// Start the Axum server serving proxy, account, and metrics routes.
pub async fn start(state: AppState, settings_config: SettingsConfig) -> Result<()> {
    let metrics = get_metrics().await;
    let app = app_router(&state, &settings_config);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    info!("address: {}, port: {}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    metrics.up.set(1);
    axum::serve(listener, app).await?;

    Ok(())
}
