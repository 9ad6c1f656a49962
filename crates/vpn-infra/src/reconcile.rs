//! Status reconciliation across the compute provider and the tailnet.
//!
//! The two systems are independently eventually consistent; this
//! module joins their snapshots into one user-facing provisioning
//! status per droplet. The derivation itself is a pure function of the
//! snapshots and is recomputed on every query, never cached. Route
//! auto-approval is the one side effect, kept as an explicit post-read
//! step with its own swallowed error channel.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use do_api::{DoClient, Droplet};
use tailscale_api::{Device, TailscaleClient};

use crate::{EXIT_ROUTES, HOURLY_RATE_USD, MEMBERSHIP_TAG, Result, hostmatch};

/// What we know about the tailnet at reconciliation time.
#[derive(Debug, Clone)]
pub enum MeshSnapshot {
    /// No tailnet credentials configured at all. Join state cannot be
    /// verified, so droplets are assumed usable.
    Unconfigured,
    /// Credentials were supplied but the device listing failed.
    /// Treated as "not yet joined", not as "ready".
    Unavailable,
    /// Current device listing.
    Devices(Vec<Device>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningStatus {
    Starting,
    Ready,
    Offline,
}

/// Per-droplet view derived on every status query.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledNode {
    #[serde(flatten)]
    pub droplet: Droplet,
    #[serde(rename = "minutesRunning")]
    pub minutes_running: i64,
    /// Running cost in USD, rendered with 4 decimal digits.
    #[serde(rename = "costEstimate")]
    pub cost_estimate: String,
    #[serde(rename = "provisioningStatus")]
    pub provisioning_status: ProvisioningStatus,
}

/// Derive one [`ReconciledNode`] per droplet. Pure: never mutates the
/// inputs and performs no I/O.
///
/// A droplet counts as joined only when a device hostname exactly
/// equals the droplet name ([`hostmatch::exact`]); cleanup deliberately
/// uses the folded policy instead.
pub fn reconcile(
    droplets: &[Droplet],
    snapshot: &MeshSnapshot,
    now: DateTime<Utc>,
) -> Vec<ReconciledNode> {
    droplets
        .iter()
        .map(|droplet| {
            let minutes_running = (now - droplet.created_at).num_minutes();
            let cost = minutes_running as f64 / 60.0 * HOURLY_RATE_USD;

            let provisioning_status = match snapshot {
                MeshSnapshot::Unconfigured => ProvisioningStatus::Ready,
                MeshSnapshot::Unavailable => ProvisioningStatus::Starting,
                MeshSnapshot::Devices(devices) => {
                    if devices
                        .iter()
                        .any(|d| hostmatch::exact(&droplet.name, &d.hostname))
                    {
                        ProvisioningStatus::Ready
                    } else {
                        ProvisioningStatus::Starting
                    }
                }
            };

            ReconciledNode {
                droplet: droplet.clone(),
                minutes_running,
                cost_estimate: format!("{cost:.4}"),
                provisioning_status,
            }
        })
        .collect()
}

/// Devices that matched a droplet (exact policy) but do not yet have
/// both default routes enabled. Pure companion to [`reconcile`];
/// devices already enabling a superset of the exit routes are never
/// re-approved.
pub fn pending_route_approvals<'a>(
    droplets: &[Droplet],
    devices: &'a [Device],
) -> Vec<&'a Device> {
    let mut pending: Vec<&Device> = Vec::new();
    for droplet in droplets {
        for device in devices {
            if hostmatch::exact(&droplet.name, &device.hostname)
                && !has_exit_routes(device)
                && !pending.iter().any(|p| p.id == device.id)
            {
                pending.push(device);
            }
        }
    }
    pending
}

fn has_exit_routes(device: &Device) -> bool {
    EXIT_ROUTES
        .iter()
        .all(|route| device.enabled_routes.iter().any(|r| r == route))
}

/// Tailnet credentials for a status query.
#[derive(Debug, Clone)]
pub struct MeshContext {
    pub client: TailscaleClient,
    pub tailnet: String,
}

/// Run one status query: list tagged droplets, list tailnet devices,
/// derive the reconciled view, then auto-approve exit routes for any
/// freshly joined device.
///
/// A compute failure aborts the query. A mesh failure degrades to
/// [`MeshSnapshot::Unavailable`]; a route-approval failure is logged
/// and swallowed. Neither ever changes the compute-side result.
pub async fn node_status(
    compute: &DoClient,
    mesh: Option<&MeshContext>,
) -> Result<Vec<ReconciledNode>> {
    let droplets = compute.list_droplets(MEMBERSHIP_TAG).await?;

    let snapshot = match mesh {
        None => {
            debug!("no tailnet credentials configured, skipping join verification");
            MeshSnapshot::Unconfigured
        }
        Some(ctx) => match ctx.client.list_devices(&ctx.tailnet).await {
            Ok(devices) => {
                debug!(count = devices.len(), "fetched tailnet devices");
                MeshSnapshot::Devices(devices)
            }
            Err(e) => {
                warn!(error = %e, "tailnet device listing failed, continuing without join data");
                MeshSnapshot::Unavailable
            }
        },
    };

    let nodes = reconcile(&droplets, &snapshot, Utc::now());

    if let (Some(ctx), MeshSnapshot::Devices(devices)) = (mesh, &snapshot) {
        for device in pending_route_approvals(&droplets, devices) {
            match ctx.client.set_device_routes(&device.id, &EXIT_ROUTES).await {
                Ok(()) => info!(device = %device.hostname, "approved exit node routes"),
                Err(e) => {
                    warn!(device = %device.hostname, error = %e, "exit route approval failed")
                }
            }
        }
    }

    Ok(nodes)
}
