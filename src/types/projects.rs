use serde::{Deserialize, Serialize};

/// App linked to the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectApp {
    #[serde(default)]
    pub id: Option<String>,
    pub name_slug: String,
}

/// Project details returned by `get_project_info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub apps: Vec<ProjectApp>,
}
