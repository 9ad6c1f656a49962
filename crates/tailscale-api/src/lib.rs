//! Typed Rust client for the Tailscale control-plane REST API.
//!
//! Covers the subset needed for managing exit-node devices:
//! devices (list per tailnet, delete) and device routes (set enabled).

mod types;

pub use types::*;

use base64::Engine as _;

const BASE_URL: &str = "https://api.tailscale.com/api/v2";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tailscale api request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("tailscale api {endpoint} returned {status}: {message}")]
    Api {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the Tailscale control-plane REST API.
#[derive(Debug, Clone)]
pub struct TailscaleClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl TailscaleClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Client pointed at a non-default API endpoint (used by tests).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// HTTP Basic auth with the API key as username and empty password.
    fn auth(&self) -> String {
        let creds = base64::engine::general_purpose::STANDARD.encode(format!("{}:", self.api_key));
        format!("Basic {creds}")
    }

    async fn check(resp: reqwest::Response, endpoint: &'static str) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("Tailscale API error: {status}"));
            return Err(Error::Api { endpoint, status, message });
        }
        Ok(resp)
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices(&self, tailnet: &str) -> Result<Vec<Device>> {
        let resp = self
            .http
            .get(self.url(&format!("/tailnet/{tailnet}/devices")))
            .header("Authorization", self.auth())
            .send()
            .await?;

        let envelope: DevicesEnvelope = Self::check(resp, "list devices").await?.json().await?;
        Ok(envelope.devices)
    }

    pub async fn delete_device(&self, device_id: &str) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/device/{device_id}")))
            .header("Authorization", self.auth())
            .send()
            .await?;

        Self::check(resp, "delete device").await?;
        Ok(())
    }

    /// Replace the set of enabled subnet routes for a device. Used to
    /// approve the default routes a device advertises as an exit node.
    pub async fn set_device_routes(&self, device_id: &str, routes: &[&str]) -> Result<()> {
        let body = SetRoutesRequest {
            routes: routes.iter().map(|r| r.to_string()).collect(),
        };
        let resp = self
            .http
            .post(self.url(&format!("/device/{device_id}/routes")))
            .header("Authorization", self.auth())
            .json(&body)
            .send()
            .await?;

        Self::check(resp, "set device routes").await?;
        Ok(())
    }
}
