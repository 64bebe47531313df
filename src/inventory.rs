//! Inventory Builder
//!
//! Produces the Ansible dynamic-inventory document from extracted resources:
//!
//! ```json
//! {
//!   "_meta": { "hostvars": { "web1": { "ansible_host": "20.1.1.1" } } },
//!   "all": { "hosts": ["web1"] }
//! }
//! ```

use crate::error::{InventoryError, InventoryResult};
use crate::resource::{resolve, ResourceGroups};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Connection variables for one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVars {
    pub ansible_host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ansible_user: Option<String>,
}

/// `_meta` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub hostvars: BTreeMap<String, HostVars>,
}

/// `all` group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllGroup {
    pub hosts: Vec<String>,
}

/// Complete inventory as printed for `--list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDocument {
    #[serde(rename = "_meta")]
    pub meta: Meta,
    pub all: AllGroup,
}

impl InventoryDocument {
    /// Variables of a single host, as printed for `--host`
    pub fn host_vars(&self, name: &str) -> Option<&HostVars> {
        self.meta.hostvars.get(name)
    }

    fn add_host(&mut self, name: &str, vars: HostVars) {
        if self.meta.hostvars.insert(name.to_string(), vars).is_some() {
            tracing::warn!("Duplicate host name {}, keeping the last definition", name);
        } else {
            self.all.hosts.push(name.to_string());
        }
    }
}

/// Build the inventory from extracted resources
///
/// Every host must resolve to a network interface; a VM whose interface is
/// missing from the state fails the whole build.
pub fn build(groups: &ResourceGroups, use_private_address: bool) -> InventoryResult<InventoryDocument> {
    let mut inventory = InventoryDocument::default();

    for vm in groups.hosts.values() {
        let host = resolve(vm, groups);

        let Some(interface) = host.network_interface else {
            return Err(InventoryError::UnresolvedInterface {
                host: vm.name.clone(),
                interface_id: vm.network_interface_id.clone(),
            });
        };

        let vars = HostVars {
            ansible_host: interface.address(use_private_address).to_string(),
            ansible_user: vm.admin_user.clone(),
        };

        tracing::debug!("Host {} -> {}", vm.name, vars.ansible_host);
        inventory.add_host(&vm.name, vars);
    }

    tracing::info!("Built inventory with {} hosts", inventory.all.hosts.len());

    Ok(inventory)
}
