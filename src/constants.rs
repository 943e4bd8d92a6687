//! # API Constants
//!
//! Endpoint locations, header names and timing constants that define how the
//! client talks to the Connect API.

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.pipedream.com";

/// Versioned path prefix for every REST resource
pub const API_VERSION: &str = "v1";

/// Default domain that hosts workflow HTTP endpoints (`{endpoint_id}.{domain}`)
pub const DEFAULT_WORKFLOW_DOMAIN: &str = "m.pipedream.net";

/// Seconds subtracted from `expires_in` when caching an access token
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Token lifetime assumed when the token endpoint omits `expires_in`
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default connect timeout in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default number of idle pooled connections kept per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Custom request headers
pub mod headers {
    /// Project environment the request is scoped to
    pub const ENVIRONMENT: &str = "x-pd-environment";

    /// End user on whose behalf a workflow is invoked
    pub const EXTERNAL_USER_ID: &str = "x-pd-external-user-id";
}

/// Path segments shared by several resources
pub mod paths {
    pub const OAUTH: &str = "oauth";
    pub const TOKEN: &str = "token";
    pub const CONNECT: &str = "connect";
    pub const ACCOUNTS: &str = "accounts";
    pub const APPS: &str = "apps";
    pub const USERS: &str = "users";
    pub const TOKENS: &str = "tokens";
    pub const PROJECTS: &str = "projects";
    pub const INFO: &str = "info";
    pub const DEPLOYED_TRIGGERS: &str = "deployed-triggers";
    pub const EVENTS: &str = "events";
    pub const WEBHOOKS: &str = "webhooks";
    pub const WORKFLOWS: &str = "workflows";
    pub const RATE_LIMITS: &str = "rate_limits";
    pub const CONFIGURE: &str = "configure";
    pub const PROPS: &str = "props";
    pub const RUN: &str = "run";
    pub const DEPLOY: &str = "deploy";
}

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("pipedream-connect-rs/{}", env!("CARGO_PKG_VERSION"))
}
