//! Typed Rust client for the DigitalOcean REST API.
//!
//! Covers the subset needed for managing VPN exit droplets:
//! regions (list) and droplets (list by tag, create, delete).

mod types;

pub use types::*;

const BASE_URL: &str = "https://api.digitalocean.com/v2";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("digitalocean api request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("digitalocean api {endpoint} returned {status}: {message}")]
    Api {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the DigitalOcean REST API.
#[derive(Debug, Clone)]
pub struct DoClient {
    token: String,
    base_url: String,
    http: reqwest::Client,
}

impl DoClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, BASE_URL)
    }

    /// Client pointed at a non-default API endpoint (used by tests).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Surface the provider's own `message` field when the body carries
    /// one, otherwise fall back to the HTTP status line.
    async fn check(resp: reqwest::Response, endpoint: &'static str) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("DigitalOcean API error: {status}"));
            return Err(Error::Api { endpoint, status, message });
        }
        Ok(resp)
    }

    // ── Regions ──────────────────────────────────────────────────────

    /// List regions that currently accept new droplets.
    pub async fn list_regions(&self) -> Result<Vec<Region>> {
        let resp = self
            .http
            .get(self.url("/regions"))
            .header("Authorization", self.auth())
            .send()
            .await?;

        let envelope: RegionsEnvelope = Self::check(resp, "list regions").await?.json().await?;
        Ok(envelope.regions.into_iter().filter(|r| r.available).collect())
    }

    // ── Droplets ─────────────────────────────────────────────────────

    /// List droplets carrying the given tag. The tag is the sole
    /// ownership scope: untagged droplets are never returned.
    pub async fn list_droplets(&self, tag: &str) -> Result<Vec<Droplet>> {
        let resp = self
            .http
            .get(self.url("/droplets"))
            .query(&[("tag_name", tag)])
            .header("Authorization", self.auth())
            .send()
            .await?;

        let envelope: DropletsEnvelope = Self::check(resp, "list droplets").await?.json().await?;
        Ok(envelope.droplets)
    }

    pub async fn create_droplet(&self, req: &CreateDropletRequest) -> Result<Droplet> {
        let resp = self
            .http
            .post(self.url("/droplets"))
            .header("Authorization", self.auth())
            .json(req)
            .send()
            .await?;

        let envelope: DropletEnvelope = Self::check(resp, "create droplet").await?.json().await?;
        Ok(envelope.droplet)
    }

    pub async fn delete_droplet(&self, droplet_id: u64) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/droplets/{droplet_id}")))
            .header("Authorization", self.auth())
            .send()
            .await?;

        Self::check(resp, "delete droplet").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn droplet_json(id: u64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "status": "active",
            "created_at": "2026-01-01T00:00:00Z",
            "region": { "slug": "nyc1", "name": "New York 1" },
            "tags": ["vpn-manager"],
        })
    }

    #[tokio::test]
    async fn list_regions_filters_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/regions"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "regions": [
                    { "slug": "nyc1", "name": "New York 1", "available": true },
                    { "slug": "sfo1", "name": "San Francisco 1", "available": false },
                ]
            })))
            .mount(&server)
            .await;

        let client = DoClient::with_base_url("tok", server.uri());
        let regions = client.list_regions().await.unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].slug, "nyc1");
    }

    #[tokio::test]
    async fn list_droplets_scopes_by_tag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/droplets"))
            .and(query_param("tag_name", "vpn-manager"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "droplets": [droplet_json(42, "nyc1-VPN")]
            })))
            .mount(&server)
            .await;

        let client = DoClient::with_base_url("tok", server.uri());
        let droplets = client.list_droplets("vpn-manager").await.unwrap();
        assert_eq!(droplets.len(), 1);
        assert_eq!(droplets[0].name, "nyc1-VPN");
        assert_eq!(droplets[0].status, DropletStatus::Active);
    }

    #[tokio::test]
    async fn error_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/droplets/7"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "id": "not_found", "message": "The resource you requested could not be found." })),
            )
            .mount(&server)
            .await;

        let client = DoClient::with_base_url("tok", server.uri());
        let err = client.delete_droplet(7).await.unwrap_err();
        match err {
            Error::Api { message, status, .. } => {
                assert_eq!(status.as_u16(), 404);
                assert!(message.contains("could not be found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn error_falls_back_to_status_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/droplets"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
            .mount(&server)
            .await;

        let client = DoClient::with_base_url("tok", server.uri());
        let err = client.list_droplets("vpn-manager").await.unwrap_err();
        match err {
            Error::Api { message, .. } => assert!(message.contains("500")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
