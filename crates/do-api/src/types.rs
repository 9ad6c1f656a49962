use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Droplet types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropletStatus {
    New,
    Active,
    Off,
    Archive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropletRegion {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Droplet {
    pub id: u64,
    pub name: String,
    pub status: DropletStatus,
    pub created_at: DateTime<Utc>,
    pub region: DropletRegion,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDropletRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: String,
    pub tags: Vec<String>,
    /// Cloud-init script run on first boot.
    pub user_data: String,
}

// ── Region types ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub slug: String,
    pub name: String,
    pub available: bool,
}

// ── Response envelopes ───────────────────────────────────────────────
//
// The DigitalOcean API wraps every payload in a keyed object.

#[derive(Debug, Deserialize)]
pub(crate) struct RegionsEnvelope {
    pub regions: Vec<Region>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DropletsEnvelope {
    pub droplets: Vec<Droplet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DropletEnvelope {
    pub droplet: Droplet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
