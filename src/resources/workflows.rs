use serde_json::Value;
use tracing::debug;

use crate::client::request::{ApiRequest, ExpectedStatus};
use crate::client::ConnectClient;
use crate::constants::headers;
use crate::error::{ConnectError, ConnectResult};
use crate::types::{HttpAuthType, WorkflowInvocation, WorkflowTarget};
use crate::validation::require_non_empty;

impl ConnectClient {
    // ===================================================================================
    // WORKFLOW INVOCATION
    // ===================================================================================

    /// Invoke a workflow HTTP endpoint by URL or endpoint id
    ///
    /// Any 2xx counts as success. The body comes back as JSON, or wrapped as
    /// `{"raw_response": ...}` when the workflow answers with something else.
    pub async fn invoke_workflow(
        &self,
        url_or_endpoint_id: &str,
        invocation: WorkflowInvocation,
    ) -> ConnectResult<Value> {
        let request = self.workflow_request(url_or_endpoint_id, invocation)?;
        self.send(request).await
    }

    /// Invoke an OAuth-protected workflow on behalf of an end user
    ///
    /// Adds the `x-pd-external-user-id` header; the invocation must use
    /// [`HttpAuthType::OAuth`].
    pub async fn invoke_workflow_for_external_user(
        &self,
        url_or_endpoint_id: &str,
        external_user_id: &str,
        invocation: WorkflowInvocation,
    ) -> ConnectResult<Value> {
        require_non_empty("external_user_id", external_user_id)?;
        if invocation.auth != HttpAuthType::OAuth {
            return Err(ConnectError::validation(
                "invoke_workflow_for_external_user requires OAuth authentication",
            ));
        }

        let request = self
            .workflow_request(url_or_endpoint_id, invocation)?
            .header(headers::EXTERNAL_USER_ID, external_user_id);
        self.send(request).await
    }

    fn workflow_request(
        &self,
        url_or_endpoint_id: &str,
        invocation: WorkflowInvocation,
    ) -> ConnectResult<ApiRequest> {
        let url = WorkflowTarget::parse(url_or_endpoint_id)?.resolve(&self.workflow_domain)?;
        debug!(url = %url, method = %invocation.method, "Invoking workflow");

        let mut request = ApiRequest::absolute("invoke_workflow", invocation.method, url)
            .without_environment()
            .expect(ExpectedStatus::AnySuccess);

        request = match invocation.auth {
            HttpAuthType::OAuth => request,
            HttpAuthType::StaticBearer(token) => {
                require_non_empty("static bearer token", &token)?;
                request
                    .without_auth()
                    .header("authorization", format!("Bearer {token}"))
            }
            HttpAuthType::None => request.without_auth(),
        };

        for (name, value) in invocation.headers {
            request = request.header(name, value);
        }

        if let Some(body) = invocation.body {
            request = request.json(body);
        }

        Ok(request)
    }
}
