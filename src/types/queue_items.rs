//! Queue item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Processing priority of a queue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueueItemPriority {
    /// Low priority.
    Low,
    /// Normal priority.
    #[default]
    Normal,
    /// High priority.
    High,
}

/// Exception recorded against a failed queue item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessingException {
    /// Failure reason.
    #[serde(default)]
    pub reason: Option<String>,

    /// Failure details.
    #[serde(default)]
    pub details: Option<String>,

    /// Exception type (`ApplicationException` or `BusinessException`).
    #[serde(rename = "Type", default)]
    pub exception_type: Option<String>,

    /// Screenshot path captured at failure time.
    #[serde(default)]
    pub associated_image_file_path: Option<String>,

    /// When the exception was recorded.
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
}

/// Orchestrator queue item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueItem {
    /// Queue item ID.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: u64,

    /// Owning queue definition ID.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub queue_definition_id: u64,

    /// Earliest processing date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer_date: Option<DateTime<Utc>>,

    /// Latest processing date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Risk SLA date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_sla_date: Option<DateTime<Utc>>,

    /// Priority.
    #[serde(default)]
    pub priority: QueueItemPriority,

    /// Processing status (`New`, `InProgress`, `Successful`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Review status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_status: Option<String>,

    /// Assigned reviewer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_user_id: Option<u64>,

    /// Unique key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Caller-chosen reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Type of the processing exception, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_exception_type: Option<String>,

    /// Processing start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_processing: Option<DateTime<Utc>>,

    /// Processing end time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_processing: Option<DateTime<Utc>>,

    /// Seconds spent in earlier attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds_in_previous_attempts: Option<u64>,

    /// ID of the item this one retries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestor_id: Option<u64>,

    /// Retry number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_number: Option<u32>,

    /// Serialized specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_data: Option<String>,

    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,

    /// Progress reported by the robot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,

    /// Concurrency token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_version: Option<String>,

    /// Folder ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_unit_id: Option<u64>,

    /// Folder path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_unit_fully_qualified_name: Option<String>,

    /// Processing exception.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_exception: Option<ProcessingException>,

    /// Item payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_content: Option<Map<String, Value>>,

    /// Output written by the robot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Map<String, Value>>,

    /// Name of the queue. Required when adding an item.
    #[serde(default)]
    pub name: String,
}

impl QueueItem {
    /// Creates an item for the named queue.
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            name: queue_name.into(),
            ..Default::default()
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: QueueItemPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Adds an entry to the item payload.
    pub fn with_content(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.specific_content
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Body of an `AddQueueItem` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItemCreateRequest {
    /// The item to add.
    #[serde(rename = "itemData")]
    pub item_data: QueueItem,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
