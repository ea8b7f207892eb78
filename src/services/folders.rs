//! Folder operations.

use tracing::instrument;

use crate::client::OrchestratorClient;
use crate::errors::OrchestratorResult;
use crate::transport::OutboundRequest;
use crate::types::{Folder, ODataList};

/// Folders collection.
pub const FOLDERS_ENDPOINT: &str = "Folders";

/// Service for folder operations.
///
/// Folders are tenant-wide, so requests carry no organization-unit header.
pub struct FoldersService<'a> {
    client: &'a OrchestratorClient,
}

impl<'a> FoldersService<'a> {
    /// Creates a new folders service.
    pub fn new(client: &'a OrchestratorClient) -> Self {
        Self { client }
    }

    /// Lists folders. `filters` are passed through as OData query options.
    #[instrument(skip(self))]
    pub async fn list(&self, filters: &[(&str, &str)]) -> OrchestratorResult<(Vec<Folder>, u64)> {
        let request = OutboundRequest::get(self.client.endpoint_url(FOLDERS_ENDPOINT))
            .queries(filters.iter().copied());

        let list: ODataList<Folder> = self
            .client
            .request_json(request, &self.client.context())
            .await?;
        Ok(list.into_parts())
    }
}
