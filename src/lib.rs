//! Ansible dynamic inventory from Terraform state
//!
//! Reads Azure virtual machines, network interfaces and public IPs out of a
//! Terraform state document, links them together and emits per-host
//! connection variables.
//!
//! ```
//! let state = serde_json::json!({"version": 4, "resources": []});
//! let inventory = tfinventory::generate(&state, false).unwrap();
//! assert!(inventory.all.hosts.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod inventory;
pub mod resource;
pub mod state;

pub use error::{InventoryError, InventoryResult};
pub use inventory::{build, HostVars, InventoryDocument};

use serde_json::Value;

/// Extract, resolve and build in one pass
pub fn generate(state: &Value, use_private_address: bool) -> InventoryResult<InventoryDocument> {
    let groups = resource::extract(state)?;
    inventory::build(&groups, use_private_address)
}
