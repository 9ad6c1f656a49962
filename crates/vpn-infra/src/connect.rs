//! Connect flow: launch one exit-node droplet.
//!
//! Fire-and-forget: the call returns as soon as the provider accepts
//! the creation request. The droplet shows as `starting` on status
//! polls until it has joined the tailnet. Calling connect twice
//! creates two droplets; the core never enforces a singleton.

use tracing::info;

use do_api::{CreateDropletRequest, DoClient, Droplet};

use crate::{DROPLET_IMAGE, DROPLET_SIZE, FILTERING_DNS, MEMBERSHIP_TAG, Result};

#[derive(Debug, Clone)]
pub struct ConnectParams {
    /// Region slug the droplet is created in.
    pub region: String,
    /// Ephemeral tailnet auth key embedded in the boot script.
    pub tailscale_auth_key: String,
}

/// Naming convention for exit-node droplets.
pub fn node_name(region: &str) -> String {
    format!("{region}-VPN")
}

/// Cloud-init script run on first boot: enable forwarding, pin DNS to
/// the filtering resolver, install the tailnet agent, and join as an
/// exit node with tailnet DNS declined.
pub fn provisioning_script(auth_key: &str, hostname: &str) -> String {
    format!(
        r#"#!/bin/bash
# Enable IP forwarding
echo 'net.ipv4.ip_forward = 1' | tee -a /etc/sysctl.d/99-tailscale.conf
echo 'net.ipv6.conf.all.forwarding = 1' | tee -a /etc/sysctl.d/99-tailscale.conf
sysctl -p /etc/sysctl.d/99-tailscale.conf

# Overwrite resolved.conf so the filtering resolver takes precedence
# over cloud-init defaults
echo "[Resolve]
DNS={dns} {dns}
Domains=~.
" > /etc/systemd/resolved.conf

systemctl restart systemd-resolved

# Install Tailscale
curl -fsSL https://tailscale.com/install.sh | sh

# Join the tailnet as an exit node
tailscale up --authkey={auth_key} --hostname={hostname} --advertise-exit-node --accept-dns=false
"#,
        dns = FILTERING_DNS,
    )
}

/// Create one tagged exit-node droplet in the given region. Any
/// provider error aborts with nothing created and surfaces verbatim.
pub async fn launch_node(compute: &DoClient, params: &ConnectParams) -> Result<Droplet> {
    let name = node_name(&params.region);

    let request = CreateDropletRequest {
        name: name.clone(),
        region: params.region.clone(),
        size: DROPLET_SIZE.to_string(),
        image: DROPLET_IMAGE.to_string(),
        tags: vec![MEMBERSHIP_TAG.to_string()],
        user_data: provisioning_script(&params.tailscale_auth_key, &name),
    };

    let droplet = compute.create_droplet(&request).await?;
    info!(droplet_id = droplet.id, name = %droplet.name, region = %params.region, "exit node droplet created");
    Ok(droplet)
}
