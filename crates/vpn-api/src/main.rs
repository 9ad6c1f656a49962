mod config;
mod dto;
mod error;
mod routes;
mod state;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vpn_infra::CredentialStore;

use crate::config::AppConfig;
use crate::routes::api_router;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store = CredentialStore::new(&config.credential_path);

    let state = AppState {
        store,
        config: config.clone(),
    };

    let app = api_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!(addr = %config.listen_addr, "starting VPN node API");

    axum::serve(listener, app).await.expect("server error");
}
