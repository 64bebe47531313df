//! Resource Extractor
//!
//! Walks the flat `resources` list of a Terraform state document and files
//! every instance of a supported kind into its group.

use super::record::{NetworkInterface, PublicIp, Resource, ResourceRecord, VirtualMachine};
use super::registry::{get_resource_kind, GroupAlias};
use crate::error::{InventoryError, InventoryResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// Records of one kind keyed by identifier
pub type ResourceGroup<T> = BTreeMap<String, T>;

/// All extracted records, one group per kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceGroups {
    pub hosts: ResourceGroup<VirtualMachine>,
    pub nics: ResourceGroup<NetworkInterface>,
    pub public_ips: ResourceGroup<PublicIp>,
}

impl ResourceGroups {
    /// File a record under its identifier. Returns true if it replaced an
    /// existing record with the same identifier.
    pub fn insert(&mut self, resource: Resource) -> bool {
        let id = resource.identifier().to_string();
        match resource {
            Resource::VirtualMachine(vm) => self.hosts.insert(id, vm).is_some(),
            Resource::NetworkInterface(nic) => self.nics.insert(id, nic).is_some(),
            Resource::PublicIp(ip) => self.public_ips.insert(id, ip).is_some(),
        }
    }

    /// Number of records in a group
    pub fn len(&self, alias: GroupAlias) -> usize {
        match alias {
            GroupAlias::Hosts => self.hosts.len(),
            GroupAlias::Nics => self.nics.len(),
            GroupAlias::PublicIp => self.public_ips.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.nics.is_empty() && self.public_ips.is_empty()
    }
}

/// Extract and group all supported records from a state document
pub fn extract(document: &Value) -> InventoryResult<ResourceGroups> {
    let mut groups = ResourceGroups::default();

    let entries = match document.get("resources") {
        None | Some(Value::Null) => {
            tracing::debug!("State document has no resources");
            return Ok(groups);
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(InventoryError::MalformedState(format!(
                "`resources` must be an array, found {}",
                json_type_name(other)
            )));
        }
    };

    for entry in entries {
        let Some(type_name) = entry.get("type").and_then(|v| v.as_str()) else {
            tracing::debug!("Skipping resource entry without a type");
            continue;
        };

        let Some(kind) = get_resource_kind(type_name) else {
            tracing::trace!("Skipping unsupported resource type {}", type_name);
            continue;
        };

        let Some(instances) = entry.get("instances").and_then(|v| v.as_array()) else {
            continue;
        };

        let address = resource_address(entry, type_name);

        for (index, instance) in instances.iter().enumerate() {
            let attributes = instance.get("attributes").unwrap_or(&Value::Null);
            let resource =
                (kind.parse)(attributes).map_err(|source| InventoryError::InvalidRecord {
                    kind: kind.display_name,
                    resource: address.clone(),
                    index,
                    source,
                })?;

            let id = resource.identifier().to_string();
            if groups.insert(resource) {
                tracing::warn!(
                    "Duplicate {} id {} in {}, keeping the last one",
                    kind.alias.as_str(),
                    id,
                    address
                );
            }
        }
    }

    tracing::info!(
        "Extracted {} hosts, {} nics, {} public IPs",
        groups.len(GroupAlias::Hosts),
        groups.len(GroupAlias::Nics),
        groups.len(GroupAlias::PublicIp)
    );

    Ok(groups)
}

/// Terraform address of a state entry, e.g. `module.net.azurerm_public_ip.web`
fn resource_address(entry: &Value, type_name: &str) -> String {
    let name = entry.get("name").and_then(|v| v.as_str()).unwrap_or("-");
    match entry.get("module").and_then(|v| v.as_str()) {
        Some(module) => format!("{}.{}.{}", module, type_name, name),
        None => format!("{}.{}", type_name, name),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(type_name: &str, instances: Value) -> Value {
        json!({"mode": "managed", "type": type_name, "name": "main", "instances": instances})
    }

    #[test]
    fn test_document_without_resources_is_empty() {
        assert!(extract(&json!({"version": 4})).unwrap().is_empty());
        assert!(extract(&json!({"resources": null})).unwrap().is_empty());
        assert!(extract(&json!({"resources": []})).unwrap().is_empty());
    }

    #[test]
    fn test_resources_must_be_array() {
        let err = extract(&json!({"resources": {"type": "azurerm_public_ip"}})).unwrap_err();
        assert!(matches!(err, InventoryError::MalformedState(_)));
    }

    #[test]
    fn test_groups_by_kind_and_skips_unknown() {
        let document = json!({
            "resources": [
                entry("azurerm_resource_group", json!([{"attributes": {"id": "rg", "name": "rg"}}])),
                entry("azurerm_virtual_machine", json!([{"attributes": {"id": "v1", "name": "web1"}}])),
                entry("azurerm_network_interface", json!([
                    {"attributes": {"id": "n1", "name": "nic1", "private_ip_address": "10.0.0.4"}},
                    {"attributes": {"id": "n2", "name": "nic2", "private_ip_address": "10.0.0.5"}}
                ])),
                entry("azurerm_public_ip", json!([{"attributes": {"id": "p1", "name": "pip1", "ip_address": "20.1.1.1"}}])),
                {"type": "azurerm_virtual_machine", "name": "empty"},
                {"name": "untyped", "instances": []}
            ]
        });

        let groups = extract(&document).unwrap();
        assert_eq!(groups.len(GroupAlias::Hosts), 1);
        assert_eq!(groups.len(GroupAlias::Nics), 2);
        assert_eq!(groups.len(GroupAlias::PublicIp), 1);
        assert_eq!(groups.hosts["v1"].name, "web1");
        assert_eq!(groups.nics["n2"].private_address, "10.0.0.5");
    }

    #[test]
    fn test_duplicate_identifier_last_write_wins() {
        let document = json!({
            "resources": [
                entry("azurerm_public_ip", json!([{"attributes": {"id": "p1", "name": "old", "ip_address": "1.1.1.1"}}])),
                entry("azurerm_public_ip", json!([{"attributes": {"id": "p1", "name": "new", "ip_address": "2.2.2.2"}}]))
            ]
        });

        let groups = extract(&document).unwrap();
        assert_eq!(groups.public_ips.len(), 1);
        assert_eq!(groups.public_ips["p1"].name, "new");
        assert_eq!(groups.public_ips["p1"].address, "2.2.2.2");
    }

    #[test]
    fn test_malformed_record_aborts_extraction() {
        let document = json!({
            "resources": [
                entry("azurerm_virtual_machine", json!([
                    {"attributes": {"id": "v1", "name": "web1"}},
                    {"attributes": {"name": "web2"}}
                ]))
            ]
        });

        match extract(&document) {
            Err(InventoryError::InvalidRecord { kind, resource, index, .. }) => {
                assert_eq!(kind, "Virtual Machine");
                assert_eq!(resource, "azurerm_virtual_machine.main");
                assert_eq!(index, 1);
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_instance_without_attributes_is_malformed() {
        let document = json!({
            "resources": [entry("azurerm_public_ip", json!([{"schema_version": 0}]))]
        });
        assert!(matches!(
            extract(&document),
            Err(InventoryError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_resource_address_includes_module() {
        let entry = json!({"module": "module.web", "type": "azurerm_public_ip", "name": "pip"});
        assert_eq!(
            resource_address(&entry, "azurerm_public_ip"),
            "module.web.azurerm_public_ip.pip"
        );
    }
}
