use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::common::Pagination;
use crate::error::ConnectError;

/// Registry namespace a component is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Triggers,
    Actions,
    Components,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Triggers => "triggers",
            ComponentType::Actions => "actions",
            ComponentType::Components => "components",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "triggers" => Ok(ComponentType::Triggers),
            "actions" => Ok(ComponentType::Actions),
            "components" => Ok(ComponentType::Components),
            other => Err(ConnectError::validation(format!(
                "Invalid component_type: '{other}'. Must be one of triggers, actions, components"
            ))),
        }
    }
}

/// Property definition of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurableProp {
    pub name: String,
    #[serde(rename = "type")]
    pub prop_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// App slug when `type` is `app`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(
        rename = "remoteOptions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub remote_options: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
    #[serde(
        rename = "customResponse",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_response: Option<bool>,
    #[serde(rename = "useQuery", default, skip_serializing_if = "Option::is_none")]
    pub use_query: Option<bool>,
    #[serde(
        rename = "reloadProps",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reload_props: Option<bool>,
    /// Static configuration for timer interfaces
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_config: Option<Map<String, Value>>,
}

/// Listing entry for a registry component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub key: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub component_type: Option<String>,
}

/// Full component definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub key: String,
    pub name: String,
    pub version: String,
    pub configurable_props: Vec<ConfigurableProp>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub component_type: Option<String>,
}

/// Filters for `list_components`
#[derive(Debug, Clone, Default)]
pub struct ComponentListQuery {
    /// App id or name slug
    pub app: Option<String>,
    /// Free-text search
    pub q: Option<String>,
    pub pagination: Pagination,
}

/// Request the remote options of one prop
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigurePropRequest {
    /// Component key, e.g. `slack-send-message`
    pub id: String,
    pub external_user_id: String,
    pub prop_name: String,
    pub configured_props: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_props_id: Option<String>,
    /// Search string for props that support `useQuery`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_context: Option<Value>,
}

/// Options resolved for a prop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurePropResponse {
    #[serde(default)]
    pub options: Option<Vec<Value>>,
    #[serde(default)]
    pub string_options: Option<Vec<String>>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub observations: Option<Vec<Value>>,
    #[serde(default)]
    pub context: Option<Value>,
}

/// Re-resolve dynamic props after a prop value changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReloadPropsRequest {
    pub id: String,
    pub external_user_id: String,
    pub configured_props: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_props_id: Option<String>,
}

/// Dynamic props resolved by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicProps {
    pub id: String,
    #[serde(rename = "configurableProps")]
    pub configurable_props: Vec<ConfigurableProp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadPropsResponse {
    #[serde(rename = "dynamicProps")]
    pub dynamic_props: DynamicProps,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub observations: Option<Vec<Value>>,
}

/// Run an action on behalf of an end user
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunActionRequest {
    /// Action key, e.g. `gitlab-list-commits`
    pub id: String,
    pub external_user_id: String,
    pub configured_props: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_props_id: Option<String>,
}

/// Result of a run: named exports, observations (logs) and the return value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunActionResponse {
    pub exports: Value,
    pub os: Vec<Value>,
    pub ret: Value,
}

/// Deploy a trigger for an end user
///
/// Events go to `webhook_url` or to the workflow `workflow_id`, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeployTriggerRequest {
    /// Trigger key, e.g. `gitlab-new-issue`
    pub id: String,
    pub external_user_id: String,
    pub configured_props: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(rename = "workflowId", skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_props_id: Option<String>,
}
