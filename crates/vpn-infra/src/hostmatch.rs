//! Hostname correlation policies.
//!
//! Droplets and tailnet devices share no foreign key; the only join is
//! the machine name. The control plane lowercases hostnames while
//! droplet names may be mixed case, so two distinct policies exist:
//! reconciliation uses [`exact`] (a device only counts as joined once
//! it registered under the name the droplet was created with), while
//! cleanup uses [`folded`] to also catch casing-normalized and stale
//! registrations.

/// Case-sensitive hostname equality. Used when deciding whether a
/// droplet has joined the tailnet.
pub fn exact(droplet_name: &str, device_hostname: &str) -> bool {
    device_hostname == droplet_name
}

/// Case-insensitive hostname equality. Used when tearing down all
/// device registrations left behind by a droplet.
pub fn folded(droplet_name: &str, device_hostname: &str) -> bool {
    device_hostname.eq_ignore_ascii_case(droplet_name)
}
