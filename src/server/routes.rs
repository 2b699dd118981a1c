use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::time::Instant;
use tracing::error;

use crate::graph::service::GraphError;
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;

static ERROR_MSG: &str = "error";
static USERS_ROUTE: &str = "users";
static USER_BY_ID_ROUTE: &str = "user_by_id";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user))
}

/// Retrieve all users
async fn list_users(State(state): State<AppState>) -> Response {
    let metrics = get_metrics().await;
    let start = Instant::now();
    metrics.proxy_requests.with_label_values(&[USERS_ROUTE]).inc();

    let result = state.graph.list_users().await;
    metrics
        .proxy_duration
        .with_label_values(&[USERS_ROUTE])
        .observe(start.elapsed().as_secs_f64());

    match result {
        Ok(users) => Json(users).into_response(),
        Err(e) => {
            metrics
                .proxy_failures
                .with_label_values(&[USERS_ROUTE, ERROR_MSG])
                .inc();
            error!("user listing failed: {}", e);
            graph_error_response(e)
        }
    }
}

/// Retrieve user by id
async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let metrics = get_metrics().await;
    let start = Instant::now();
    metrics
        .proxy_requests
        .with_label_values(&[USER_BY_ID_ROUTE])
        .inc();

    let result = state.graph.get_user(&id).await;
    metrics
        .proxy_duration
        .with_label_values(&[USER_BY_ID_ROUTE])
        .observe(start.elapsed().as_secs_f64());

    match result {
        Ok(Some(user)) => Json(user).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "user not found").into_response(),
        Err(e) => {
            metrics
                .proxy_failures
                .with_label_values(&[USER_BY_ID_ROUTE, ERROR_MSG])
                .inc();
            error!("user lookup for '{}' failed: {}", id, e);
            graph_error_response(e)
        }
    }
}

/// Upstream failures surface as 502; the proxy has no degraded mode.
fn graph_error_response(e: GraphError) -> Response {
    match e {
        GraphError::Api { status: 404 } => {
            (StatusCode::NOT_FOUND, "user not found").into_response()
        }
        e => (StatusCode::BAD_GATEWAY, format!("Error: {}", e)).into_response(),
    }
}
