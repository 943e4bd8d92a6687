use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::client::request::{ApiRequest, QueryParams};
use crate::client::ConnectClient;
use crate::constants::paths;
use crate::error::{ConnectError, ConnectResult};
use crate::types::{
    Component, ComponentListQuery, ComponentSummary, ComponentType, ConfigurePropRequest,
    ConfigurePropResponse, DataEnvelope, DeployTriggerRequest, DeployedTrigger, Page,
    ReloadPropsRequest, ReloadPropsResponse, RunActionRequest, RunActionResponse,
};
use crate::validation::{ensure_exclusive, require_non_empty, validate_props_payload};

fn props_body<T: Serialize>(
    request: &T,
    configured_props: &Map<String, Value>,
) -> ConnectResult<Value> {
    validate_props_payload(&Value::Object(configured_props.clone()))?;
    serde_json::to_value(request)
        .map_err(|e| ConnectError::validation(format!("Invalid request body: {e}")))
}

impl ConnectClient {
    // ===================================================================================
    // COMPONENT REGISTRY
    // ===================================================================================

    /// List registry components of one type
    ///
    /// GET /v1/connect/{project_id}/{component_type}
    pub async fn list_components(
        &self,
        component_type: ComponentType,
        query: &ComponentListQuery,
    ) -> ConnectResult<Page<ComponentSummary>> {
        query.pagination.validate()?;

        let mut params = QueryParams::new();
        params
            .push_opt("app", query.app.as_deref())
            .push_opt("q", query.q.as_deref());
        query.pagination.apply(&mut params);

        let request = ApiRequest::new(
            "list_components",
            Method::GET,
            self.project_path(&[component_type.as_str()]),
        )
        .query(params);

        self.send_decoded(request).await
    }

    /// Get a component definition, including its configurable props
    ///
    /// GET /v1/connect/{project_id}/{component_type}/{component_key}
    pub async fn get_component(
        &self,
        component_type: ComponentType,
        component_key: &str,
    ) -> ConnectResult<Component> {
        require_non_empty("component_key", component_key)?;

        let request = ApiRequest::new(
            "get_component",
            Method::GET,
            self.project_path(&[component_type.as_str(), component_key]),
        );

        let envelope: DataEnvelope<Component> = self.send_decoded(request).await?;
        Ok(envelope.data)
    }

    /// Fetch the remote options for one prop
    ///
    /// POST /v1/connect/{project_id}/{component_type}/configure
    pub async fn configure_component_prop(
        &self,
        component_type: ComponentType,
        request: &ConfigurePropRequest,
    ) -> ConnectResult<ConfigurePropResponse> {
        require_non_empty("component_key", &request.id)?;
        require_non_empty("external_user_id", &request.external_user_id)?;
        require_non_empty("prop_name", &request.prop_name)?;
        let body = props_body(request, &request.configured_props)?;

        let api_request = ApiRequest::new(
            "configure_component_prop",
            Method::POST,
            self.project_path(&[component_type.as_str(), paths::CONFIGURE]),
        )
        .json(body);

        self.send_decoded(api_request).await
    }

    /// Re-resolve a component's dynamic props
    ///
    /// POST /v1/connect/{project_id}/{component_type}/props
    pub async fn reload_component_props(
        &self,
        component_type: ComponentType,
        request: &ReloadPropsRequest,
    ) -> ConnectResult<ReloadPropsResponse> {
        require_non_empty("component_key", &request.id)?;
        require_non_empty("external_user_id", &request.external_user_id)?;
        let body = props_body(request, &request.configured_props)?;

        let api_request = ApiRequest::new(
            "reload_component_props",
            Method::POST,
            self.project_path(&[component_type.as_str(), paths::PROPS]),
        )
        .json(body);

        let response: ReloadPropsResponse = self.send_decoded(api_request).await?;
        debug!(
            dynamic_props_id = %response.dynamic_props.id,
            errors = response.errors.len(),
            "Reloaded component props"
        );
        Ok(response)
    }

    // ===================================================================================
    // ACTIONS AND TRIGGERS
    // ===================================================================================

    /// Run an action for an end user
    ///
    /// POST /v1/connect/{project_id}/actions/run
    pub async fn run_action(&self, request: &RunActionRequest) -> ConnectResult<RunActionResponse> {
        require_non_empty("action_key", &request.id)?;
        require_non_empty("external_user_id", &request.external_user_id)?;
        let body = props_body(request, &request.configured_props)?;

        let api_request = ApiRequest::new(
            "run_action",
            Method::POST,
            self.project_path(&[ComponentType::Actions.as_str(), paths::RUN]),
        )
        .json(body);

        let response: RunActionResponse = self.send_decoded(api_request).await?;
        info!(action_key = %request.id, "Ran action");
        Ok(response)
    }

    /// Deploy a trigger for an end user
    ///
    /// POST /v1/connect/{project_id}/triggers/deploy
    pub async fn deploy_trigger(
        &self,
        request: &DeployTriggerRequest,
    ) -> ConnectResult<DeployedTrigger> {
        require_non_empty("trigger_key", &request.id)?;
        require_non_empty("external_user_id", &request.external_user_id)?;
        ensure_exclusive(
            ("webhook_url", &request.webhook_url),
            ("workflow_id", &request.workflow_id),
        )?;
        let body = props_body(request, &request.configured_props)?;

        let api_request = ApiRequest::new(
            "deploy_trigger",
            Method::POST,
            self.project_path(&[ComponentType::Triggers.as_str(), paths::DEPLOY]),
        )
        .json(body);

        let envelope: DataEnvelope<DeployedTrigger> = self.send_decoded(api_request).await?;
        info!(
            trigger_key = %request.id,
            deployed_trigger_id = %envelope.data.id,
            "Deployed trigger"
        );
        Ok(envelope.data)
    }
}
