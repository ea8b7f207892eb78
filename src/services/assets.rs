//! Asset operations.

use tracing::instrument;

use super::entity_path;
use crate::client::OrchestratorClient;
use crate::errors::OrchestratorResult;
use crate::transport::{OutboundRequest, RequestContext};
use crate::types::{Asset, ODataList};

/// Assets collection.
pub const ASSETS_ENDPOINT: &str = "Assets";

/// Service for asset operations within one folder.
pub struct AssetsService<'a> {
    client: &'a OrchestratorClient,
    folder_id: u64,
}

impl<'a> AssetsService<'a> {
    /// Creates a new assets service.
    pub fn new(client: &'a OrchestratorClient, folder_id: u64) -> Self {
        Self { client, folder_id }
    }

    fn context(&self) -> RequestContext {
        self.client.folder_context(self.folder_id)
    }

    /// Gets an asset by ID.
    #[instrument(skip(self), fields(folder_id = self.folder_id))]
    pub async fn get_by_id(&self, id: u64) -> OrchestratorResult<Asset> {
        let url = self.client.endpoint_url(&entity_path(ASSETS_ENDPOINT, id));
        self.client
            .request_json(OutboundRequest::get(url), &self.context())
            .await
    }

    /// Gets an asset by name, or `None` if the folder has no such asset.
    #[instrument(skip(self), fields(folder_id = self.folder_id))]
    pub async fn get_by_name(&self, name: &str) -> OrchestratorResult<Option<Asset>> {
        let filter = format!("Name eq '{}'", name.replace('\'', "''"));
        let request =
            OutboundRequest::get(self.client.endpoint_url(ASSETS_ENDPOINT)).query("$filter", filter);

        let list: ODataList<Asset> = self.client.request_json(request, &self.context()).await?;
        if list.count < 1 {
            return Ok(None);
        }
        Ok(list.value.into_iter().next())
    }

    /// Lists assets. `filters` are passed through as OData query options.
    #[instrument(skip(self), fields(folder_id = self.folder_id))]
    pub async fn list(&self, filters: &[(&str, &str)]) -> OrchestratorResult<(Vec<Asset>, u64)> {
        let request = OutboundRequest::get(self.client.endpoint_url(ASSETS_ENDPOINT))
            .queries(filters.iter().copied());

        let list: ODataList<Asset> = self.client.request_json(request, &self.context()).await?;
        Ok(list.into_parts())
    }

    /// Creates an asset and returns it as stored.
    #[instrument(skip(self, asset), fields(folder_id = self.folder_id, name = %asset.name))]
    pub async fn store(&self, asset: &Asset) -> OrchestratorResult<Asset> {
        let request = OutboundRequest::post(self.client.endpoint_url(ASSETS_ENDPOINT)).json(asset)?;
        self.client.request_json(request, &self.context()).await
    }

    /// Replaces an asset, then fetches the updated version.
    #[instrument(skip(self, asset), fields(folder_id = self.folder_id, id = asset.id))]
    pub async fn update(&self, asset: &Asset) -> OrchestratorResult<Asset> {
        let url = self.client.endpoint_url(&entity_path(ASSETS_ENDPOINT, asset.id));
        let request = OutboundRequest::put(url).json(asset)?;
        self.client
            .send_with_authorization(request, &self.context())
            .await?;

        self.get_by_id(asset.id).await
    }
}
