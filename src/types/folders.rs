//! Folder types.

use serde::{Deserialize, Serialize};

/// Orchestrator folder (organization unit).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Folder {
    /// Folder ID; the value sent as the organization-unit header.
    pub id: u64,

    /// Unique key.
    #[serde(default)]
    pub key: String,

    /// Display name.
    #[serde(default)]
    pub display_name: String,

    /// Full path, e.g. `Finance/Invoices`.
    #[serde(default)]
    pub fully_qualified_name: String,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this is a personal workspace.
    #[serde(default)]
    pub is_personal: bool,

    /// Parent folder ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,

    /// Parent folder key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,

    /// Provisioning type (`Manual`, `Automatic`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provision_type: Option<String>,

    /// Permission model (`InheritFromTenant`, `FineGrained`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_model: Option<String>,

    /// Package feed type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_type: Option<String>,
}

impl Folder {
    /// Returns true if this folder sits at the top of the hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
