//! Resource Records
//!
//! Typed views over the `attributes` object of a Terraform state instance.
//! Only the fields needed to reach a host are kept; everything else in the
//! attribute mapping is ignored.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Capability shared by every record kind
pub trait ResourceRecord {
    /// Provider-assigned identifier (the Azure resource ID)
    fn identifier(&self) -> &str;

    /// Human-readable name
    fn display_name(&self) -> &str;
}

/// A parsed record of any supported kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    VirtualMachine(VirtualMachine),
    NetworkInterface(NetworkInterface),
    PublicIp(PublicIp),
}

impl ResourceRecord for Resource {
    fn identifier(&self) -> &str {
        match self {
            Resource::VirtualMachine(r) => r.identifier(),
            Resource::NetworkInterface(r) => r.identifier(),
            Resource::PublicIp(r) => r.identifier(),
        }
    }

    fn display_name(&self) -> &str {
        match self {
            Resource::VirtualMachine(r) => r.display_name(),
            Resource::NetworkInterface(r) => r.display_name(),
            Resource::PublicIp(r) => r.display_name(),
        }
    }
}

/// `azurerm_virtual_machine`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualMachine {
    pub id: String,
    pub name: String,
    /// First entry of `network_interface_ids`; the rest are ignored
    pub network_interface_id: Option<String>,
    /// `os_profile[0].admin_username` when set and non-empty
    pub admin_user: Option<String>,
}

/// `azurerm_network_interface`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub id: String,
    pub name: String,
    pub private_address: String,
    /// `ip_configuration[0].public_ip_address_id`; later configurations are ignored
    pub public_address_id: Option<String>,
}

/// `azurerm_public_ip`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicIp {
    pub id: String,
    pub name: String,
    pub address: String,
}

#[derive(Deserialize)]
struct RawVirtualMachine {
    #[serde(deserialize_with = "non_empty_string")]
    id: String,
    name: String,
    #[serde(default)]
    network_interface_ids: Option<Vec<String>>,
    #[serde(default)]
    os_profile: Option<Vec<RawOsProfile>>,
}

#[derive(Deserialize)]
struct RawOsProfile {
    #[serde(default)]
    admin_username: Option<String>,
}

#[derive(Deserialize)]
struct RawNetworkInterface {
    #[serde(deserialize_with = "non_empty_string")]
    id: String,
    name: String,
    private_ip_address: String,
    #[serde(default)]
    ip_configuration: Option<Vec<RawIpConfiguration>>,
}

#[derive(Deserialize)]
struct RawIpConfiguration {
    #[serde(default)]
    public_ip_address_id: Option<String>,
}

#[derive(Deserialize)]
struct RawPublicIp {
    #[serde(deserialize_with = "non_empty_string")]
    id: String,
    name: String,
    ip_address: String,
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(serde::de::Error::custom("`id` must not be empty"));
    }
    Ok(value)
}

/// Take index 0 of an optional sequence, dropping empty strings
fn first_non_empty(values: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    values
        .into_iter()
        .next()
        .flatten()
        .filter(|s| !s.is_empty())
}

impl VirtualMachine {
    /// Parse from an instance `attributes` mapping
    pub fn from_attributes(attributes: &Value) -> Result<Self, serde_json::Error> {
        let raw = RawVirtualMachine::deserialize(attributes)?;

        let network_interface_id = first_non_empty(
            raw.network_interface_ids
                .unwrap_or_default()
                .into_iter()
                .map(Some),
        );
        let admin_user = first_non_empty(
            raw.os_profile
                .unwrap_or_default()
                .into_iter()
                .map(|profile| profile.admin_username),
        );

        Ok(Self {
            id: raw.id,
            name: raw.name,
            network_interface_id,
            admin_user,
        })
    }
}

impl NetworkInterface {
    /// Parse from an instance `attributes` mapping
    pub fn from_attributes(attributes: &Value) -> Result<Self, serde_json::Error> {
        let raw = RawNetworkInterface::deserialize(attributes)?;

        // NOTE: only the first IP configuration is considered
        let public_address_id = first_non_empty(
            raw.ip_configuration
                .unwrap_or_default()
                .into_iter()
                .map(|config| config.public_ip_address_id),
        );

        Ok(Self {
            id: raw.id,
            name: raw.name,
            private_address: raw.private_ip_address,
            public_address_id,
        })
    }
}

impl PublicIp {
    /// Parse from an instance `attributes` mapping
    pub fn from_attributes(attributes: &Value) -> Result<Self, serde_json::Error> {
        let raw = RawPublicIp::deserialize(attributes)?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            address: raw.ip_address,
        })
    }
}

macro_rules! impl_resource_record {
    ($($ty:ty),+) => {
        $(
            impl ResourceRecord for $ty {
                fn identifier(&self) -> &str {
                    &self.id
                }

                fn display_name(&self) -> &str {
                    &self.name
                }
            }
        )+
    };
}

impl_resource_record!(VirtualMachine, NetworkInterface, PublicIp);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vm_takes_first_interface_and_user() {
        let vm = VirtualMachine::from_attributes(&json!({
            "id": "v1",
            "name": "web1",
            "network_interface_ids": ["n1", "n2"],
            "os_profile": [{"admin_username": "azureuser"}, {"admin_username": "other"}]
        }))
        .unwrap();

        assert_eq!(vm.identifier(), "v1");
        assert_eq!(vm.display_name(), "web1");
        assert_eq!(vm.network_interface_id.as_deref(), Some("n1"));
        assert_eq!(vm.admin_user.as_deref(), Some("azureuser"));
    }

    #[test]
    fn test_vm_optional_structures_resolve_to_absent() {
        let missing = VirtualMachine::from_attributes(&json!({"id": "v1", "name": "web1"})).unwrap();
        assert_eq!(missing.network_interface_id, None);
        assert_eq!(missing.admin_user, None);

        let empty = VirtualMachine::from_attributes(&json!({
            "id": "v1",
            "name": "web1",
            "network_interface_ids": [],
            "os_profile": []
        }))
        .unwrap();
        assert_eq!(empty.network_interface_id, None);
        assert_eq!(empty.admin_user, None);

        let nulls = VirtualMachine::from_attributes(&json!({
            "id": "v1",
            "name": "web1",
            "network_interface_ids": null,
            "os_profile": null
        }))
        .unwrap();
        assert_eq!(nulls.network_interface_id, None);
        assert_eq!(nulls.admin_user, None);
    }

    #[test]
    fn test_vm_empty_admin_username_is_absent() {
        let vm = VirtualMachine::from_attributes(&json!({
            "id": "v1",
            "name": "web1",
            "os_profile": [{"admin_username": ""}]
        }))
        .unwrap();
        assert_eq!(vm.admin_user, None);

        let vm = VirtualMachine::from_attributes(&json!({
            "id": "v1",
            "name": "web1",
            "os_profile": [{"computer_name": "web1"}]
        }))
        .unwrap();
        assert_eq!(vm.admin_user, None);
    }

    #[test]
    fn test_missing_mandatory_fields_fail() {
        assert!(VirtualMachine::from_attributes(&json!({"name": "web1"})).is_err());
        assert!(VirtualMachine::from_attributes(&json!({"id": "v1"})).is_err());
        assert!(VirtualMachine::from_attributes(&json!({"id": "", "name": "web1"})).is_err());
        assert!(VirtualMachine::from_attributes(&Value::Null).is_err());
        assert!(NetworkInterface::from_attributes(&json!({"id": "n1", "name": "nic1"})).is_err());
        assert!(PublicIp::from_attributes(&json!({"id": "p1", "name": "pip1"})).is_err());
    }

    #[test]
    fn test_nic_first_ip_configuration() {
        let nic = NetworkInterface::from_attributes(&json!({
            "id": "n1",
            "name": "nic1",
            "private_ip_address": "10.0.0.5",
            "ip_configuration": [
                {"name": "primary", "public_ip_address_id": "p1"},
                {"name": "secondary", "public_ip_address_id": "p2"}
            ]
        }))
        .unwrap();

        assert_eq!(nic.private_address, "10.0.0.5");
        assert_eq!(nic.public_address_id.as_deref(), Some("p1"));
    }

    #[test]
    fn test_nic_without_public_ip() {
        for config in [json!([]), json!(null), json!([{"public_ip_address_id": ""}]), json!([{"name": "primary"}])] {
            let nic = NetworkInterface::from_attributes(&json!({
                "id": "n1",
                "name": "nic1",
                "private_ip_address": "10.0.0.5",
                "ip_configuration": config
            }))
            .unwrap();
            assert_eq!(nic.public_address_id, None);
        }
    }

    #[test]
    fn test_public_ip_address() {
        let ip = PublicIp::from_attributes(&json!({
            "id": "p1",
            "name": "pip1",
            "ip_address": "20.1.1.1",
            "allocation_method": "Static"
        }))
        .unwrap();
        assert_eq!(ip.address, "20.1.1.1");

        let resource = Resource::PublicIp(ip);
        assert_eq!(resource.identifier(), "p1");
        assert_eq!(resource.display_name(), "pip1");
    }
}
