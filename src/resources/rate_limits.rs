use reqwest::Method;
use tracing::info;

use crate::client::request::ApiRequest;
use crate::client::ConnectClient;
use crate::constants::paths;
use crate::error::{ConnectError, ConnectResult};
use crate::types::{RateLimitRequest, RateLimitToken};
use crate::validation::require_positive;

impl ConnectClient {
    // ===================================================================================
    // RATE LIMITS
    // ===================================================================================

    /// Define a rate limit and get the token that carries it
    ///
    /// POST /v1/connect/rate_limits
    pub async fn create_rate_limit(
        &self,
        window_size_seconds: i64,
        requests_per_window: i64,
    ) -> ConnectResult<RateLimitToken> {
        require_positive("window_size_seconds", window_size_seconds)?;
        require_positive("requests_per_window", requests_per_window)?;

        let body = serde_json::to_value(RateLimitRequest {
            window_size_seconds,
            requests_per_window,
        })
        .map_err(|e| ConnectError::validation(format!("Invalid rate limit: {e}")))?;

        let request = ApiRequest::new(
            "create_rate_limit",
            Method::POST,
            [paths::CONNECT, paths::RATE_LIMITS],
        )
        .json(body);

        let token: RateLimitToken = self.send_decoded(request).await?;
        info!(
            window_size_seconds = window_size_seconds,
            requests_per_window = requests_per_window,
            "Created rate limit"
        );
        Ok(token)
    }
}
