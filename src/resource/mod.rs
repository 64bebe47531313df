//! Resource abstraction layer
//!
//! Turns the loosely-typed resource list of a Terraform state document into
//! typed, cross-referenced records.
//!
//! # Architecture
//!
//! - [`record`] - Typed records parsed from instance attributes
//! - [`registry`] - Maps Terraform resource types to groups and parsers
//! - [`extractor`] - Scans the state document and groups records by kind
//! - [`resolver`] - Follows VM -> NIC -> public IP references
//!
//! # Example
//!
//! ```
//! use tfinventory::resource::{extract, resolve};
//!
//! let state = serde_json::json!({"resources": []});
//! let groups = extract(&state).unwrap();
//! for vm in groups.hosts.values() {
//!     let host = resolve(vm, &groups);
//!     println!("{:?}", host.network_interface);
//! }
//! ```

mod extractor;
mod record;
mod registry;
mod resolver;

pub use extractor::{extract, ResourceGroup, ResourceGroups};
pub use record::{NetworkInterface, PublicIp, Resource, ResourceRecord, VirtualMachine};
pub use registry::*;
pub use resolver::{resolve, resolve_interface, ResolvedHost, ResolvedInterface};
