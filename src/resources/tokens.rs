use reqwest::Method;
use tracing::info;

use crate::client::request::ApiRequest;
use crate::client::ConnectClient;
use crate::constants::paths;
use crate::error::{ConnectError, ConnectResult};
use crate::types::tokens::ConnectTokenRequest;
use crate::types::{ConnectToken, ConnectTokenOptions};
use crate::validation::require_non_empty;

impl ConnectClient {
    // ===================================================================================
    // CONNECT TOKENS
    // ===================================================================================

    /// Create a short-lived token for an end user to connect an account
    ///
    /// POST /v1/connect/{project_id}/tokens
    pub async fn create_connect_token(
        &self,
        external_user_id: &str,
        options: ConnectTokenOptions,
    ) -> ConnectResult<ConnectToken> {
        require_non_empty("external_user_id", external_user_id)?;

        let body = serde_json::to_value(ConnectTokenRequest {
            external_user_id,
            options: &options,
        })
        .map_err(|e| ConnectError::validation(format!("Invalid connect token options: {e}")))?;

        let request = ApiRequest::new(
            "create_connect_token",
            Method::POST,
            self.project_path(&[paths::TOKENS]),
        )
        .json(body);

        let token: ConnectToken = self.send_decoded(request).await?;
        info!(
            external_user_id = %external_user_id,
            expires_at = %token.expires_at,
            "Created connect token"
        );
        Ok(token)
    }
}
