use reqwest::Method;

use crate::client::request::{ApiRequest, QueryParams};
use crate::client::ConnectClient;
use crate::constants::paths;
use crate::error::ConnectResult;
use crate::types::{App, AppListQuery, DataEnvelope, Page, ProjectInfo};
use crate::validation::require_non_empty;

impl ConnectClient {
    // ===================================================================================
    // APPS AND PROJECT
    // ===================================================================================

    /// Search the app catalogue
    ///
    /// GET /v1/apps
    pub async fn list_apps(&self, query: &AppListQuery) -> ConnectResult<Page<App>> {
        query.pagination.validate()?;

        let mut params = QueryParams::new();
        params
            .push_opt("q", query.q.as_deref())
            .push_flag("has_components", query.has_components)
            .push_flag("has_actions", query.has_actions)
            .push_flag("has_triggers", query.has_triggers);
        query.pagination.apply(&mut params);

        let request = ApiRequest::new("list_apps", Method::GET, [paths::APPS]).query(params);
        self.send_decoded(request).await
    }

    /// Get one app by id or name slug
    ///
    /// GET /v1/apps/{app_id}
    pub async fn get_app(&self, app_id: &str) -> ConnectResult<App> {
        require_non_empty("app_id", app_id)?;

        let request = ApiRequest::new("get_app", Method::GET, [paths::APPS, app_id]);
        let envelope: DataEnvelope<App> = self.send_decoded(request).await?;
        Ok(envelope.data)
    }

    /// Project details, including the apps linked to it
    ///
    /// GET /v1/connect/{project_id}/projects/info
    pub async fn get_project_info(&self) -> ConnectResult<ProjectInfo> {
        let request = ApiRequest::new(
            "get_project_info",
            Method::GET,
            self.project_path(&[paths::PROJECTS, paths::INFO]),
        );
        self.send_decoded(request).await
    }
}
