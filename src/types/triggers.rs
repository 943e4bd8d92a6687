use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::components::ConfigurableProp;

/// Trigger instance deployed for an end user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployedTrigger {
    /// Deployed component id (`dc_...`)
    pub id: String,
    /// Source component id (`sc_...`)
    pub component_id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub configurable_props: Vec<ConfigurableProp>,
    #[serde(default)]
    pub configured_props: Map<String, Value>,
    #[serde(default)]
    pub active: bool,
    /// Unix seconds
    #[serde(default)]
    pub created_at: i64,
    /// Unix seconds
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_slug: String,
}

/// Fields to change on a deployed trigger; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeployedTriggerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured_props: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DeployedTriggerUpdate {
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.configured_props.is_none() && self.name.is_none()
    }
}

/// Event emitted by a deployed trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedEvent {
    /// Payload
    pub e: Value,
    /// Kind, e.g. `emit`
    pub k: String,
    /// Milliseconds since the epoch
    pub ts: i64,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookUrls {
    pub webhook_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowIds {
    pub workflow_ids: Vec<String>,
}
