use axum::Json;
use axum::extract::State;
use tracing::info;

use do_api::{DoClient, Droplet};
use vpn_infra::ConnectParams;

use crate::dto::ConnectRequest;
use crate::error::ApiError;
use crate::routes::present;
use crate::state::AppState;

/// POST /connect
///
/// Launch one exit-node droplet. Token and auth key fall back to the
/// stored credentials; all three inputs must be present before any
/// external call is made.
pub async fn connect_node(
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<Droplet>, ApiError> {
    let stored = state.store.load().await;

    let token = present(req.do_token).or(stored.do_token);
    let auth_key = present(req.tailscale_auth_key).or(stored.tailscale_auth_key);
    let region = present(req.region);

    let (Some(token), Some(auth_key), Some(region)) = (token, auth_key, region) else {
        return Err(ApiError::BadRequest(
            "missing required parameters (DO token, Tailscale auth key, region)".into(),
        ));
    };

    let key_prefix: String = auth_key.chars().take(10).collect();
    info!(region = %region, key_prefix = %key_prefix, "creating exit node droplet");

    let compute = DoClient::new(token);
    let droplet = vpn_infra::launch_node(
        &compute,
        &ConnectParams {
            region,
            tailscale_auth_key: auth_key,
        },
    )
    .await?;

    Ok(Json(droplet))
}
