//! Error types for inventory generation
//!
//! Covers everything that can go wrong between receiving a parsed state
//! document and handing back an inventory. Loading the document is handled
//! with `anyhow` in [`crate::state`].

use thiserror::Error;

/// Errors raised while extracting, resolving or building the inventory
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The top-level document does not have the expected shape
    #[error("Malformed state document: {0}")]
    MalformedState(String),

    /// A resource instance of a recognized kind failed to parse
    #[error("Invalid {kind} instance #{index} in resource `{resource}`: {source}")]
    InvalidRecord {
        kind: &'static str,
        resource: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A virtual machine has no network interface that can be resolved
    #[error("Host `{host}` has no resolvable network interface (interface id: {})", .interface_id.as_deref().unwrap_or("none"))]
    UnresolvedInterface {
        host: String,
        interface_id: Option<String>,
    },
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;
