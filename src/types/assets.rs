//! Asset types.

use serde::{Deserialize, Serialize};

/// Kind of value an asset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssetValueType {
    /// Free text.
    #[default]
    Text,
    /// 32-bit integer.
    Integer,
    /// Boolean.
    Bool,
    /// Username and password pair.
    Credential,
    /// Windows credential.
    WindowsCredential,
    /// Key/value list.
    KeyValueList,
    /// Secret text.
    Secret,
    /// A value type this client does not know.
    #[serde(other)]
    Unknown,
}

/// Visibility scope of an asset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssetValueScope {
    /// One value shared by every robot.
    #[default]
    Global,
    /// One value per robot.
    PerRobot,
    /// A scope this client does not know.
    #[serde(other)]
    Unknown,
}

/// Orchestrator asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Asset {
    /// Asset ID; zero for an asset that has not been stored yet.
    #[serde(default)]
    pub id: u64,

    /// Asset name, unique within a folder.
    pub name: String,

    /// Whether the asset can be deleted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub can_be_deleted: bool,

    /// Value scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_scope: Option<AssetValueScope>,

    /// Value type.
    pub value_type: AssetValueType,

    /// Display form of the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Text value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,

    /// Boolean value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,

    /// Integer value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int_value: Option<i64>,

    /// Credential username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_username: Option<String>,

    /// Credential password. Only ever sent, never returned by the upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_password: Option<String>,

    /// External name in a credential store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_name: Option<String>,

    /// Credential store ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_store_id: Option<u64>,

    /// Whether a default value exists.
    #[serde(rename = "HasDefault", default, skip_serializing_if = "std::ops::Not::not")]
    pub has_default_value: bool,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of folders the asset is shared with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_count: Option<u32>,

    /// Tags.
    #[serde(rename = "Tag", default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<AssetTag>,

    /// Key/value pairs of a `KeyValueList` asset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_value_list: Vec<serde_json::Value>,
}

impl Asset {
    /// Creates a text asset.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_scope: Some(AssetValueScope::Global),
            value_type: AssetValueType::Text,
            string_value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Creates an integer asset.
    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value_scope: Some(AssetValueScope::Global),
            value_type: AssetValueType::Integer,
            int_value: Some(value),
            ..Default::default()
        }
    }

    /// Creates a boolean asset.
    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value_scope: Some(AssetValueScope::Global),
            value_type: AssetValueType::Bool,
            bool_value: Some(value),
            ..Default::default()
        }
    }

    /// Creates a credential asset.
    pub fn credential(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_scope: Some(AssetValueScope::Global),
            value_type: AssetValueType::Credential,
            credential_username: Some(username.into()),
            credential_password: Some(password.into()),
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Asset tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssetTag {
    /// Tag name.
    pub name: String,

    /// Display name.
    #[serde(default)]
    pub display_name: String,

    /// Tag value.
    #[serde(default)]
    pub value: String,

    /// Display value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}
