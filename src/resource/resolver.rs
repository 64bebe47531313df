//! Reference Resolver
//!
//! Follows VM -> NIC -> public IP identifiers through the extracted groups.
//! Resolution borrows from the groups and never modifies them, so resolving
//! the same VM twice yields the same result.

use super::extractor::ResourceGroups;
use super::record::{NetworkInterface, PublicIp, VirtualMachine};

/// A VM with its references attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedHost<'a> {
    pub vm: &'a VirtualMachine,
    pub network_interface: Option<ResolvedInterface<'a>>,
}

/// A NIC with its public IP attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedInterface<'a> {
    pub nic: &'a NetworkInterface,
    pub public_ip: Option<&'a PublicIp>,
}

impl<'a> ResolvedInterface<'a> {
    /// Address to connect to: the public IP unless private addresses are
    /// requested or no public IP resolved
    pub fn address(&self, use_private_address: bool) -> &'a str {
        match self.public_ip {
            Some(ip) if !use_private_address => &ip.address,
            _ => &self.nic.private_address,
        }
    }
}

/// Resolve a VM's interface and, through it, the public IP
pub fn resolve<'a>(vm: &'a VirtualMachine, groups: &'a ResourceGroups) -> ResolvedHost<'a> {
    let network_interface = vm
        .network_interface_id
        .as_deref()
        .and_then(|id| groups.nics.get(id))
        .map(|nic| resolve_interface(nic, groups));

    if network_interface.is_none() {
        tracing::debug!(
            "No network interface resolved for {} (id: {:?})",
            vm.name,
            vm.network_interface_id
        );
    }

    ResolvedHost {
        vm,
        network_interface,
    }
}

/// Resolve a NIC's public IP
pub fn resolve_interface<'a>(
    nic: &'a NetworkInterface,
    groups: &'a ResourceGroups,
) -> ResolvedInterface<'a> {
    let public_ip = nic
        .public_address_id
        .as_deref()
        .and_then(|id| groups.public_ips.get(id));

    if let (Some(id), None) = (&nic.public_address_id, public_ip) {
        tracing::warn!(
            "Public IP {} referenced by {} not found in state, using private address",
            id,
            nic.name
        );
    }

    ResolvedInterface { nic, public_ip }
}
