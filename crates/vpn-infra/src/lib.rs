//! Core orchestration for the on-demand VPN exit node.
//!
//! Correlates droplet state from the compute provider with device
//! state from the tailnet control plane, and drives the connect and
//! disconnect flows across both APIs.

pub mod connect;
pub mod credentials;
pub mod disconnect;
pub mod hostmatch;
pub mod reconcile;

pub use connect::{ConnectParams, launch_node};
pub use credentials::{CredentialStore, Credentials};
pub use disconnect::{CleanupResult, DisconnectOutcome, teardown_nodes};
pub use reconcile::{
    MeshContext, MeshSnapshot, ProvisioningStatus, ReconciledNode, node_status,
    pending_route_approvals, reconcile,
};

/// Tag applied to every droplet this system creates. It is the sole
/// ownership scope: untagged droplets are never listed or deleted.
pub const MEMBERSHIP_TAG: &str = "vpn-manager";

/// Approximate hourly price of the smallest droplet size ($4/mo).
pub const HOURLY_RATE_USD: f64 = 0.006;

pub const DROPLET_SIZE: &str = "s-1vcpu-512mb-10gb";
pub const DROPLET_IMAGE: &str = "ubuntu-22-04-x64";

/// Default routes a device must have enabled to serve as an exit node.
pub const EXIT_ROUTES: [&str; 2] = ["0.0.0.0/0", "::/0"];

/// Filtering resolver the exit node uses instead of cloud-init DNS.
pub const FILTERING_DNS: &str = "1.1.1.3";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("compute provider error: {0}")]
    Compute(#[from] do_api::Error),

    #[error("tailnet control plane error: {0}")]
    Mesh(#[from] tailscale_api::Error),

    #[error("credential store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("credential encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
