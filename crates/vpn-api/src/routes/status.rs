use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::debug;

use do_api::DoClient;
use tailscale_api::TailscaleClient;
use vpn_infra::MeshContext;

use crate::dto::StatusResponse;
use crate::error::ApiError;
use crate::routes::{header_value, present};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub token: Option<String>,
}

/// GET /status
///
/// List tagged droplets reconciled against the tailnet. The compute
/// token may come from the `x-do-token` header, the `token` query
/// param, or the stored credentials; tailnet credentials come from
/// headers or the store and are optional.
pub async fn node_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, ApiError> {
    let stored = state.store.load().await;

    let token = present(header_value(&headers, "x-do-token"))
        .or(present(query.token))
        .or(stored.do_token)
        .ok_or_else(|| ApiError::Unauthorized("DigitalOcean token is required".into()))?;

    let tailscale_key = present(header_value(&headers, "x-tailscale-key")).or(stored.tailscale_key);
    let tailnet = present(header_value(&headers, "x-tailnet")).or(stored.tailnet);

    let mesh = match (tailscale_key, tailnet) {
        (Some(key), Some(tailnet)) => Some(MeshContext {
            client: TailscaleClient::new(key),
            tailnet,
        }),
        _ => {
            debug!("no tailnet credentials supplied, join state will not be verified");
            None
        }
    };

    let compute = DoClient::new(token);
    let active_nodes = vpn_infra::node_status(&compute, mesh.as_ref()).await?;

    Ok(Json(StatusResponse { active_nodes }))
}
