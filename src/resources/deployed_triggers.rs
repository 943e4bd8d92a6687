use reqwest::Method;
use serde_json::json;
use tracing::info;

use crate::client::request::{ApiRequest, ExpectedStatus, QueryParams};
use crate::client::ConnectClient;
use crate::constants::paths;
use crate::error::{ConnectError, ConnectResult};
use crate::types::{
    DataEnvelope, DeployedTrigger, DeployedTriggerUpdate, EmittedEvent, Page, Pagination,
    WebhookUrls, WorkflowIds,
};
use crate::validation::{require_non_empty, validate_props_payload};

fn user_query(external_user_id: &str) -> QueryParams {
    let mut params = QueryParams::new();
    params.push("external_user_id", external_user_id);
    params
}

fn require_trigger_ids(deployed_trigger_id: &str, external_user_id: &str) -> ConnectResult<()> {
    require_non_empty("deployed_trigger_id", deployed_trigger_id)?;
    require_non_empty("external_user_id", external_user_id)
}

impl ConnectClient {
    // ===================================================================================
    // DEPLOYED TRIGGERS
    // ===================================================================================

    /// List the triggers deployed for an end user
    ///
    /// GET /v1/connect/{project_id}/deployed-triggers
    pub async fn list_deployed_triggers(
        &self,
        external_user_id: &str,
        pagination: &Pagination,
    ) -> ConnectResult<Page<DeployedTrigger>> {
        require_non_empty("external_user_id", external_user_id)?;
        pagination.validate()?;

        let mut params = user_query(external_user_id);
        pagination.apply(&mut params);

        let request = ApiRequest::new(
            "list_deployed_triggers",
            Method::GET,
            self.project_path(&[paths::DEPLOYED_TRIGGERS]),
        )
        .query(params);

        self.send_decoded(request).await
    }

    /// GET /v1/connect/{project_id}/deployed-triggers/{id}
    pub async fn get_deployed_trigger(
        &self,
        deployed_trigger_id: &str,
        external_user_id: &str,
    ) -> ConnectResult<DeployedTrigger> {
        require_trigger_ids(deployed_trigger_id, external_user_id)?;

        let request = ApiRequest::new(
            "get_deployed_trigger",
            Method::GET,
            self.project_path(&[paths::DEPLOYED_TRIGGERS, deployed_trigger_id]),
        )
        .query(user_query(external_user_id));

        let envelope: DataEnvelope<DeployedTrigger> = self.send_decoded(request).await?;
        Ok(envelope.data)
    }

    /// Change a deployed trigger's active flag, props or name
    ///
    /// PUT /v1/connect/{project_id}/deployed-triggers/{id}
    pub async fn update_deployed_trigger(
        &self,
        deployed_trigger_id: &str,
        external_user_id: &str,
        update: &DeployedTriggerUpdate,
    ) -> ConnectResult<DeployedTrigger> {
        require_trigger_ids(deployed_trigger_id, external_user_id)?;
        if update.is_empty() {
            return Err(ConnectError::validation(
                "update_deployed_trigger requires at least one of active, configured_props, name",
            ));
        }
        if let Some(props) = &update.configured_props {
            validate_props_payload(&serde_json::Value::Object(props.clone()))?;
        }
        let body = serde_json::to_value(update)
            .map_err(|e| ConnectError::validation(format!("Invalid update body: {e}")))?;

        let request = ApiRequest::new(
            "update_deployed_trigger",
            Method::PUT,
            self.project_path(&[paths::DEPLOYED_TRIGGERS, deployed_trigger_id]),
        )
        .query(user_query(external_user_id))
        .json(body);

        let envelope: DataEnvelope<DeployedTrigger> = self.send_decoded(request).await?;
        info!(deployed_trigger_id = %deployed_trigger_id, "Updated deployed trigger");
        Ok(envelope.data)
    }

    /// Delete a deployed trigger
    ///
    /// DELETE /v1/connect/{project_id}/deployed-triggers/{id}
    ///
    /// `ignore_hook_errors` deletes the trigger even when its deactivation hook fails.
    pub async fn delete_deployed_trigger(
        &self,
        deployed_trigger_id: &str,
        external_user_id: &str,
        ignore_hook_errors: bool,
    ) -> ConnectResult<()> {
        require_trigger_ids(deployed_trigger_id, external_user_id)?;

        let mut params = user_query(external_user_id);
        params.push_flag("ignoreHookErrors", ignore_hook_errors);

        let request = ApiRequest::new(
            "delete_deployed_trigger",
            Method::DELETE,
            self.project_path(&[paths::DEPLOYED_TRIGGERS, deployed_trigger_id]),
        )
        .query(params)
        .expect(ExpectedStatus::Code(204));

        self.send_empty(request).await?;
        info!(deployed_trigger_id = %deployed_trigger_id, "Deleted deployed trigger");
        Ok(())
    }

    /// Most recent events emitted by a deployed trigger
    ///
    /// GET /v1/connect/{project_id}/deployed-triggers/{id}/events
    pub async fn get_deployed_trigger_events(
        &self,
        deployed_trigger_id: &str,
        external_user_id: &str,
        limit: Option<u32>,
    ) -> ConnectResult<Vec<EmittedEvent>> {
        require_trigger_ids(deployed_trigger_id, external_user_id)?;
        if limit == Some(0) {
            return Err(ConnectError::validation("limit must be greater than 0"));
        }

        let mut params = user_query(external_user_id);
        params.push_opt("limit", limit);

        let request = ApiRequest::new(
            "get_deployed_trigger_events",
            Method::GET,
            self.project_path(&[paths::DEPLOYED_TRIGGERS, deployed_trigger_id, paths::EVENTS]),
        )
        .query(params);

        let envelope: DataEnvelope<Vec<EmittedEvent>> = self.send_decoded(request).await?;
        Ok(envelope.data)
    }

    // -----------------------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------------------

    /// GET /v1/connect/{project_id}/deployed-triggers/{id}/webhooks
    pub async fn get_deployed_trigger_webhooks(
        &self,
        deployed_trigger_id: &str,
        external_user_id: &str,
    ) -> ConnectResult<WebhookUrls> {
        require_trigger_ids(deployed_trigger_id, external_user_id)?;

        let request = ApiRequest::new(
            "get_deployed_trigger_webhooks",
            Method::GET,
            self.project_path(&[paths::DEPLOYED_TRIGGERS, deployed_trigger_id, paths::WEBHOOKS]),
        )
        .query(user_query(external_user_id));

        self.send_decoded(request).await
    }

    /// Replace the webhook URLs listening to a deployed trigger; an empty list clears them
    ///
    /// PUT /v1/connect/{project_id}/deployed-triggers/{id}/webhooks
    pub async fn update_deployed_trigger_webhooks(
        &self,
        deployed_trigger_id: &str,
        external_user_id: &str,
        webhook_urls: &[String],
    ) -> ConnectResult<WebhookUrls> {
        require_trigger_ids(deployed_trigger_id, external_user_id)?;

        let request = ApiRequest::new(
            "update_deployed_trigger_webhooks",
            Method::PUT,
            self.project_path(&[paths::DEPLOYED_TRIGGERS, deployed_trigger_id, paths::WEBHOOKS]),
        )
        .query(user_query(external_user_id))
        .json(json!({ "webhook_urls": webhook_urls }));

        self.send_decoded(request).await
    }

    /// GET /v1/connect/{project_id}/deployed-triggers/{id}/workflows
    pub async fn get_deployed_trigger_workflows(
        &self,
        deployed_trigger_id: &str,
        external_user_id: &str,
    ) -> ConnectResult<WorkflowIds> {
        require_trigger_ids(deployed_trigger_id, external_user_id)?;

        let request = ApiRequest::new(
            "get_deployed_trigger_workflows",
            Method::GET,
            self.project_path(&[paths::DEPLOYED_TRIGGERS, deployed_trigger_id, paths::WORKFLOWS]),
        )
        .query(user_query(external_user_id));

        self.send_decoded(request).await
    }

    /// Replace the workflows listening to a deployed trigger; an empty list clears them
    ///
    /// PUT /v1/connect/{project_id}/deployed-triggers/{id}/workflows
    pub async fn update_deployed_trigger_workflows(
        &self,
        deployed_trigger_id: &str,
        external_user_id: &str,
        workflow_ids: &[String],
    ) -> ConnectResult<WorkflowIds> {
        require_trigger_ids(deployed_trigger_id, external_user_id)?;

        let request = ApiRequest::new(
            "update_deployed_trigger_workflows",
            Method::PUT,
            self.project_path(&[paths::DEPLOYED_TRIGGERS, deployed_trigger_id, paths::WORKFLOWS]),
        )
        .query(user_query(external_user_id))
        .json(json!({ "workflow_ids": workflow_ids }));

        self.send_decoded(request).await
    }
}
