use serde::{Deserialize, Serialize};

/// A device registered on the tailnet.
///
/// The control plane lowercases hostnames on registration, so callers
/// correlating devices against mixed-case machine names must pick a
/// comparison policy deliberately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    pub id: String,
    pub hostname: String,
    pub name: String,
    pub created: Option<String>,
    pub last_seen: Option<String>,
    pub key_expiry_disabled: bool,
    pub tags: Vec<String>,
    pub addresses: Vec<String>,
    pub client_version: String,
    pub os: String,
    pub advertised_routes: Vec<String>,
    pub enabled_routes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SetRoutesRequest {
    pub routes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesEnvelope {
    pub devices: Vec<Device>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
