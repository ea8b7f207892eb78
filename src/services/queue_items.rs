//! Queue item operations.

use tracing::instrument;

use super::entity_path;
use crate::client::OrchestratorClient;
use crate::errors::OrchestratorResult;
use crate::transport::{OutboundRequest, RequestContext};
use crate::types::{ODataList, QueueItem, QueueItemCreateRequest};

/// Queue items collection.
pub const QUEUE_ITEMS_ENDPOINT: &str = "QueueItem";

/// Action that adds an item to a queue.
pub const ADD_QUEUE_ITEM_ENDPOINT: &str = "Queues/UiPathODataSvc.AddQueueItem";

/// Service for queue item operations within one folder.
pub struct QueueItemsService<'a> {
    client: &'a OrchestratorClient,
    folder_id: u64,
}

impl<'a> QueueItemsService<'a> {
    /// Creates a new queue items service.
    pub fn new(client: &'a OrchestratorClient, folder_id: u64) -> Self {
        Self { client, folder_id }
    }

    fn context(&self) -> RequestContext {
        self.client.folder_context(self.folder_id)
    }

    /// Adds an item to the queue named by `item.name`.
    #[instrument(skip(self, item), fields(folder_id = self.folder_id, queue = %item.name))]
    pub async fn store(&self, item: QueueItem) -> OrchestratorResult<QueueItem> {
        let body = QueueItemCreateRequest { item_data: item };
        let request =
            OutboundRequest::post(self.client.endpoint_url(ADD_QUEUE_ITEM_ENDPOINT)).json(&body)?;
        self.client.request_json(request, &self.context()).await
    }

    /// Gets a queue item by ID.
    #[instrument(skip(self), fields(folder_id = self.folder_id))]
    pub async fn get_by_id(&self, id: u64) -> OrchestratorResult<QueueItem> {
        let url = self
            .client
            .endpoint_url(&entity_path(QUEUE_ITEMS_ENDPOINT, id));
        self.client
            .request_json(OutboundRequest::get(url), &self.context())
            .await
    }

    /// Lists queue items. `filters` are passed through as OData query options.
    #[instrument(skip(self), fields(folder_id = self.folder_id))]
    pub async fn list(
        &self,
        filters: &[(&str, &str)],
    ) -> OrchestratorResult<(Vec<QueueItem>, u64)> {
        let request = OutboundRequest::get(self.client.endpoint_url(QUEUE_ITEMS_ENDPOINT))
            .queries(filters.iter().copied());

        let list: ODataList<QueueItem> =
            self.client.request_json(request, &self.context()).await?;
        Ok(list.into_parts())
    }
}
