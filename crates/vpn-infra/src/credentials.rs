//! File-backed credential record with environment fallback.
//!
//! One JSON record holds the four secrets the dashboard needs. Values
//! saved through the settings form take precedence over process env
//! defaults, never the reverse. There is no delete path; the record is
//! only ever read or fully overwritten.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    /// DigitalOcean personal access token.
    pub do_token: Option<String>,
    /// Tailscale API key (management operations).
    pub tailscale_key: Option<String>,
    /// Tailscale ephemeral auth key (node join).
    pub tailscale_auth_key: Option<String>,
    /// Tailnet the exit node joins.
    pub tailnet: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        dotenvy::dotenv().ok();
        Self { path: path.into() }
    }

    /// Read the merged credential record: stored file values first,
    /// env defaults (`DO_TOKEN`, `TAILSCALE_KEY`, `TAILSCALE_AUTH_KEY`,
    /// `TAILSCALE_TAILNET`) for anything the file leaves unset.
    /// A missing or corrupt file degrades silently to env-only.
    pub async fn load(&self) -> Credentials {
        let file: Credentials = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "unreadable credential file, using env defaults");
                Credentials::default()
            }),
            Err(_) => Credentials::default(),
        };

        Credentials {
            do_token: file.do_token.or_else(|| env_default("DO_TOKEN")),
            tailscale_key: file.tailscale_key.or_else(|| env_default("TAILSCALE_KEY")),
            tailscale_auth_key: file
                .tailscale_auth_key
                .or_else(|| env_default("TAILSCALE_AUTH_KEY")),
            tailnet: file.tailnet.or_else(|| env_default("TAILSCALE_TAILNET")),
        }
    }

    /// Overwrite the whole stored record.
    pub async fn save(&self, credentials: &Credentials) -> Result<()> {
        let json = serde_json::to_string_pretty(credentials)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

fn env_default(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
