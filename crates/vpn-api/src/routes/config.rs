use axum::Json;
use axum::extract::State;

use vpn_infra::Credentials;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /config
///
/// The merged credential record (stored file over env defaults).
pub async fn get_config(State(state): State<AppState>) -> Json<Credentials> {
    Json(state.store.load().await)
}

/// POST /config
///
/// Overwrite the stored credential file with the submitted record.
pub async fn save_config(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.save(&credentials).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
