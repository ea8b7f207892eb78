//! Queue definition types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Orchestrator queue definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueDefinition {
    /// Queue definition ID.
    pub id: u64,

    /// Queue name.
    pub name: String,

    /// Unique key.
    #[serde(default)]
    pub key: String,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether failed items are retried automatically.
    #[serde(default)]
    pub accept_automatically_retry: bool,

    /// Whether references must be unique.
    #[serde(default)]
    pub enforce_unique_reference: bool,

    /// Whether item data is encrypted.
    #[serde(default)]
    pub encrypted: bool,

    /// Whether the processing release lives in the current folder.
    #[serde(default)]
    pub is_process_in_current_folder: bool,

    /// Maximum automatic retries.
    #[serde(default)]
    pub max_number_of_retries: i32,

    /// SLA in minutes.
    #[serde(default)]
    pub sla_in_minutes: i32,

    /// Risk SLA in minutes.
    #[serde(default)]
    pub risk_sla_in_minutes: i32,

    /// Number of folders the queue is shared with.
    #[serde(default)]
    pub folders_count: i32,

    /// Folder ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_unit_id: Option<u64>,

    /// Trigger schedule ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_schedule_id: Option<u64>,

    /// Processing release ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_id: Option<u64>,

    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,

    /// JSON schema for item specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_data_json_schema: Option<String>,

    /// JSON schema for item output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_data_json_schema: Option<String>,

    /// JSON schema for item analytics data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics_data_json_schema: Option<String>,

    /// Folder path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_unit_fully_qualified_name: Option<String>,

    /// Tags.
    #[serde(rename = "Tag", default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<super::AssetTag>,
}
