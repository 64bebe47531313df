//! Resource Registry - Terraform resource types the inventory understands
//!
//! Maps a state entry's `type` string to the group its records land in and
//! the constructor that parses an instance's attributes.

use super::record::{NetworkInterface, PublicIp, Resource, VirtualMachine};
use serde_json::Value;

/// Group a record is filed under after extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupAlias {
    Hosts,
    Nics,
    PublicIp,
}

impl GroupAlias {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hosts => "hosts",
            Self::Nics => "nics",
            Self::PublicIp => "public_ip",
        }
    }
}

/// Parser for one resource kind
pub type ParseFn = fn(&Value) -> Result<Resource, serde_json::Error>;

/// Resource kind definition
#[derive(Clone, Copy)]
pub struct ResourceKind {
    /// Terraform resource type, e.g. `azurerm_virtual_machine`
    pub type_name: &'static str,
    pub display_name: &'static str,
    pub alias: GroupAlias,
    pub parse: ParseFn,
}

impl std::fmt::Debug for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceKind")
            .field("type_name", &self.type_name)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// Supported resource kinds
pub const RESOURCE_KINDS: &[ResourceKind] = &[
    ResourceKind {
        type_name: "azurerm_virtual_machine",
        display_name: "Virtual Machine",
        alias: GroupAlias::Hosts,
        parse: parse_virtual_machine,
    },
    ResourceKind {
        type_name: "azurerm_public_ip",
        display_name: "Public IP",
        alias: GroupAlias::PublicIp,
        parse: parse_public_ip,
    },
    ResourceKind {
        type_name: "azurerm_network_interface",
        display_name: "Network Interface",
        alias: GroupAlias::Nics,
        parse: parse_network_interface,
    },
];

fn parse_virtual_machine(attributes: &Value) -> Result<Resource, serde_json::Error> {
    VirtualMachine::from_attributes(attributes).map(Resource::VirtualMachine)
}

fn parse_public_ip(attributes: &Value) -> Result<Resource, serde_json::Error> {
    PublicIp::from_attributes(attributes).map(Resource::PublicIp)
}

fn parse_network_interface(attributes: &Value) -> Result<Resource, serde_json::Error> {
    NetworkInterface::from_attributes(attributes).map(Resource::NetworkInterface)
}

/// Get a resource kind by Terraform type name
pub fn get_resource_kind(type_name: &str) -> Option<&'static ResourceKind> {
    RESOURCE_KINDS.iter().find(|kind| kind.type_name == type_name)
}

/// Get all supported Terraform type names
pub fn get_all_type_names() -> Vec<&'static str> {
    RESOURCE_KINDS.iter().map(|kind| kind.type_name).collect()
}
