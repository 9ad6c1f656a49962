use serde::{Deserialize, Serialize};

use do_api::Region;
use vpn_infra::{CleanupResult, ReconciledNode};

// ── Requests ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub do_token: Option<String>,
    pub tailscale_auth_key: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    pub do_token: Option<String>,
    pub tailscale_key: Option<String>,
    pub tailnet: Option<String>,
}

// ── Responses ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(rename = "activeNodes")]
    pub active_nodes: Vec<ReconciledNode>,
}

#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<Region>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DisconnectResponse {
    NoNodes { message: String },
    Cleaned { results: Vec<CleanupResult> },
}
