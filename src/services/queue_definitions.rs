//! Queue definition operations.

use tracing::instrument;

use crate::client::OrchestratorClient;
use crate::errors::OrchestratorResult;
use crate::transport::OutboundRequest;
use crate::types::{ODataList, QueueDefinition};

/// Queue definitions collection.
pub const QUEUE_DEFINITIONS_ENDPOINT: &str = "QueueDefinitions";

/// Service for queue definition operations within one folder.
pub struct QueueDefinitionsService<'a> {
    client: &'a OrchestratorClient,
    folder_id: u64,
}

impl<'a> QueueDefinitionsService<'a> {
    /// Creates a new queue definitions service.
    pub fn new(client: &'a OrchestratorClient, folder_id: u64) -> Self {
        Self { client, folder_id }
    }

    /// Lists queue definitions. `filters` are passed through as OData query options.
    #[instrument(skip(self), fields(folder_id = self.folder_id))]
    pub async fn list(
        &self,
        filters: &[(&str, &str)],
    ) -> OrchestratorResult<(Vec<QueueDefinition>, u64)> {
        let request = OutboundRequest::get(self.client.endpoint_url(QUEUE_DEFINITIONS_ENDPOINT))
            .queries(filters.iter().copied());

        let list: ODataList<QueueDefinition> = self
            .client
            .request_json(request, &self.client.folder_context(self.folder_id))
            .await?;
        Ok(list.into_parts())
    }
}
