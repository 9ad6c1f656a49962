use axum::Json;
use axum::extract::State;

use do_api::DoClient;
use tailscale_api::TailscaleClient;
use vpn_infra::DisconnectOutcome;

use crate::dto::{DisconnectRequest, DisconnectResponse};
use crate::error::ApiError;
use crate::routes::present;
use crate::state::AppState;

/// POST /disconnect
///
/// Tear down every tagged droplet and its tailnet registrations.
/// Requires the management key (not the join auth key) and tailnet id.
pub async fn disconnect_nodes(
    State(state): State<AppState>,
    Json(req): Json<DisconnectRequest>,
) -> Result<Json<DisconnectResponse>, ApiError> {
    let stored = state.store.load().await;

    let token = present(req.do_token).or(stored.do_token);
    let tailscale_key = present(req.tailscale_key).or(stored.tailscale_key);
    let tailnet = present(req.tailnet).or(stored.tailnet);

    let (Some(token), Some(tailscale_key), Some(tailnet)) = (token, tailscale_key, tailnet) else {
        return Err(ApiError::BadRequest(
            "missing credentials (DO token, Tailscale API key, tailnet)".into(),
        ));
    };

    let compute = DoClient::new(token);
    let mesh = TailscaleClient::new(tailscale_key);

    let response = match vpn_infra::teardown_nodes(&compute, &mesh, &tailnet).await? {
        DisconnectOutcome::NoNodes => DisconnectResponse::NoNodes {
            message: "No active VPN nodes found".into(),
        },
        DisconnectOutcome::Cleaned(results) => DisconnectResponse::Cleaned { results },
    };

    Ok(Json(response))
}
