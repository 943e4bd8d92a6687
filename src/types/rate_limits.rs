use serde::{Deserialize, Serialize};

/// Rate limit definition sent to `create_rate_limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitRequest {
    pub window_size_seconds: i64,
    pub requests_per_window: i64,
}

/// Token that carries a rate limit to end-user requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitToken {
    pub token: String,
}
