use serde::{Deserialize, Serialize};

use super::common::Pagination;

/// App catalogue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_slug: Option<String>,
    #[serde(default)]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub img_src: Option<String>,
    /// JSON array encoded as a string
    #[serde(default)]
    pub custom_fields_json: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Filters for `list_apps`
#[derive(Debug, Clone, Default)]
pub struct AppListQuery {
    /// Free-text search
    pub q: Option<String>,
    pub has_components: bool,
    pub has_actions: bool,
    pub has_triggers: bool,
    pub pagination: Pagination,
}
