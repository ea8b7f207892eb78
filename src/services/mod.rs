//! Resource services for the Orchestrator API.
//!
//! Each service borrows the client, builds entity URLs from the tenant base
//! URL and delegates to the authorized pipeline. Every service except
//! folders is scoped to one folder through the organization-unit header.

mod assets;
mod folders;
mod queue_definitions;
mod queue_items;

pub use assets::{AssetsService, ASSETS_ENDPOINT};
pub use folders::{FoldersService, FOLDERS_ENDPOINT};
pub use queue_definitions::{QueueDefinitionsService, QUEUE_DEFINITIONS_ENDPOINT};
pub use queue_items::{QueueItemsService, ADD_QUEUE_ITEM_ENDPOINT, QUEUE_ITEMS_ENDPOINT};

/// Returns the path of one entity in a collection.
pub(crate) fn entity_path(collection: &str, id: u64) -> String {
    format!("{}({})", collection, id)
}
