//! Disconnect flow: tear down every tagged droplet and its tailnet
//! registrations.
//!
//! Droplet deletion comes first and is never caught: a compute failure
//! aborts the remaining droplets, since a still-billing droplet is
//! worse than a stale tailnet entry. Tailnet cleanup is best effort
//! per droplet and uses the folded hostname policy to also catch
//! duplicate and casing-normalized registrations from earlier
//! connect/disconnect cycles.

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use do_api::DoClient;
use tailscale_api::TailscaleClient;

use crate::{MEMBERSHIP_TAG, Result, hostmatch};

/// Per-droplet teardown outcome, surfaced to the dashboard as-is.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResult {
    pub name: String,
    pub status: String,
}

#[derive(Debug)]
pub enum DisconnectOutcome {
    /// No tagged droplets existed; nothing was attempted.
    NoNodes,
    Cleaned(Vec<CleanupResult>),
}

/// Tear down all tagged droplets, one at a time. For each droplet the
/// matching tailnet devices are deleted concurrently and awaited
/// jointly. Idempotent: a second call finds zero droplets and no-ops.
pub async fn teardown_nodes(
    compute: &DoClient,
    mesh: &TailscaleClient,
    tailnet: &str,
) -> Result<DisconnectOutcome> {
    let droplets = compute.list_droplets(MEMBERSHIP_TAG).await?;

    if droplets.is_empty() {
        info!("no tagged droplets found, nothing to tear down");
        return Ok(DisconnectOutcome::NoNodes);
    }

    let mut results = Vec::with_capacity(droplets.len());

    for droplet in droplets {
        // Not caught: droplet deletion failure aborts the whole flow.
        compute.delete_droplet(droplet.id).await?;
        info!(droplet_id = droplet.id, name = %droplet.name, "droplet deleted");

        let status = match remove_tailnet_devices(mesh, tailnet, &droplet.name).await {
            Ok(0) => "Deleted droplet (no matching tailnet device)".to_string(),
            Ok(n) => format!("Deleted droplet. Removed {n} device(s) from the tailnet."),
            Err(e) => {
                warn!(name = %droplet.name, error = %e, "tailnet cleanup failed");
                "Deleted droplet (tailnet cleanup failed)".to_string()
            }
        };

        results.push(CleanupResult {
            name: droplet.name,
            status,
        });
    }

    Ok(DisconnectOutcome::Cleaned(results))
}

/// Delete every device whose hostname case-insensitively matches the
/// droplet name. Deletions run concurrently; all are awaited before
/// reporting, and any individual failure fails the batch.
async fn remove_tailnet_devices(
    mesh: &TailscaleClient,
    tailnet: &str,
    droplet_name: &str,
) -> tailscale_api::Result<usize> {
    let devices = mesh.list_devices(tailnet).await?;

    let matching: Vec<_> = devices
        .iter()
        .filter(|d| hostmatch::folded(droplet_name, &d.hostname))
        .collect();

    if matching.is_empty() {
        return Ok(0);
    }

    info!(
        name = droplet_name,
        count = matching.len(),
        "removing matching tailnet devices"
    );

    let outcomes = join_all(matching.iter().map(|d| mesh.delete_device(&d.id))).await;
    for outcome in outcomes {
        outcome?;
    }

    Ok(matching.len())
}
