//! Type definitions for the Orchestrator OData API.
//!
//! Field names follow the upstream PascalCase JSON. Optional fields are
//! omitted from request bodies when unset.

pub mod assets;
pub mod folders;
pub mod queue_definitions;
pub mod queue_items;

use serde::{Deserialize, Serialize};

pub use assets::{Asset, AssetTag, AssetValueScope, AssetValueType};
pub use folders::Folder;
pub use queue_definitions::QueueDefinition;
pub use queue_items::{
    ProcessingException, QueueItem, QueueItemCreateRequest, QueueItemPriority,
};

/// OData collection envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ODataList<T> {
    /// Number of matching entities, as reported by `@odata.count`.
    #[serde(rename = "@odata.count", default)]
    pub count: u64,

    /// Entities on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

impl<T> ODataList<T> {
    /// Returns the number of entities on this page.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns true if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Splits the envelope into its entities and reported count.
    pub fn into_parts(self) -> (Vec<T>, u64) {
        (self.value, self.count)
    }
}

impl<T> Default for ODataList<T> {
    fn default() -> Self {
        Self {
            count: 0,
            value: Vec::new(),
        }
    }
}
