pub mod config;
pub mod connect;
pub mod disconnect;
pub mod regions;
pub mod status;

use axum::Router;
use axum::http::HeaderMap;
use axum::routing::{get, post};

use crate::state::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status::node_status))
        .route("/connect", post(connect::connect_node))
        .route("/disconnect", post(disconnect::disconnect_nodes))
        .route("/regions", get(regions::list_regions))
        .route("/config", get(config::get_config).post(config::save_config))
        .with_state(state)
}

/// Read a header as an owned string, skipping non-UTF-8 values.
pub(crate) fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Treat empty strings from the dashboard form as absent.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
