//! # Connect API Client
//!
//! [`ConnectClient`] owns the pooled HTTP transport, the project credentials and
//! the token cache for one project. Resource operations live in
//! [`crate::resources`] as further `impl ConnectClient` blocks.
//!
//! ```rust,no_run
//! use pipedream_connect::{ConnectClient, Credentials, ProjectEnvironment};
//!
//! # async fn run() -> pipedream_connect::ConnectResult<()> {
//! let credentials = Credentials::new(
//!     "client-id",
//!     "client-secret",
//!     "proj_abc123",
//!     ProjectEnvironment::Development,
//! )?;
//! let client = ConnectClient::new(credentials)?;
//!
//! let token = client.create_connect_token("user-123", Default::default()).await?;
//! println!("Connect link: {}", token.connect_link_url);
//!
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod request;

use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{ClientConfig, Credentials, ProjectEnvironment};
use crate::constants::{
    paths, user_agent, API_VERSION, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_MS,
    DEFAULT_POOL_MAX_IDLE_PER_HOST, DEFAULT_TIMEOUT_MS, DEFAULT_WORKFLOW_DOMAIN,
};
use crate::error::{ConnectError, ConnectResult};
use auth::{Clock, SystemClock, TokenManager};

/// Async client for one Connect project
///
/// Not `Clone`: the instance owns its connection pool and token cache. Share it
/// behind an `Arc` when several tasks need it.
pub struct ConnectClient {
    pub(crate) http: Client,
    pub(crate) credentials: Credentials,
    pub(crate) base_url: Url,
    pub(crate) workflow_domain: String,
    pub(crate) tokens: TokenManager,
}

impl std::fmt::Debug for ConnectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectClient")
            .field("base_url", &self.base_url.as_str())
            .field("project_id", &self.credentials.project_id())
            .field("environment", &self.credentials.environment())
            .field("workflow_domain", &self.workflow_domain)
            .finish()
    }
}

impl ConnectClient {
    /// Create a client against the public API host with default transport settings
    pub fn new(credentials: Credentials) -> ConnectResult<Self> {
        Self::builder().credentials(credentials).build()
    }

    /// Create a client from a loaded [`ClientConfig`]
    pub fn from_config(config: &ClientConfig) -> ConnectResult<Self> {
        Self::builder()
            .credentials(config.credentials()?)
            .base_url(config.api.base_url.clone())
            .workflow_domain(config.api.workflow_domain.clone())
            .timeout(Duration::from_millis(config.api.timeout_ms))
            .connect_timeout(Duration::from_millis(config.api.connect_timeout_ms))
            .pool_max_idle_per_host(config.api.pool_max_idle_per_host)
            .build()
    }

    pub fn builder() -> ConnectClientBuilder {
        ConnectClientBuilder::default()
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        self.credentials.project_id()
    }

    #[must_use]
    pub fn environment(&self) -> ProjectEnvironment {
        self.credentials.environment()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    #[must_use]
    pub fn workflow_domain(&self) -> &str {
        &self.workflow_domain
    }

    /// Current OAuth bearer token, refreshed if the cached one has expired
    ///
    /// Useful when calling an OAuth-protected workflow with a client of your own.
    pub async fn access_token(&self) -> ConnectResult<String> {
        self.tokens.get_token().await
    }

    /// Drop the cached bearer token so the next call exchanges credentials again
    pub fn invalidate_token(&self) {
        self.tokens.invalidate();
    }

    /// Release the connection pool
    ///
    /// Consuming `self` makes reuse after close a compile error. Dropping the
    /// client has the same effect.
    pub fn close(self) {
        info!(project_id = %self.credentials.project_id(), "Closing Connect API client");
    }
}

/// Builder for [`ConnectClient`]
pub struct ConnectClientBuilder {
    credentials: Option<Credentials>,
    base_url: String,
    workflow_domain: String,
    timeout: Duration,
    connect_timeout: Duration,
    pool_max_idle_per_host: usize,
    http_client: Option<Client>,
    clock: Arc<dyn Clock>,
}

impl Default for ConnectClientBuilder {
    fn default() -> Self {
        Self {
            credentials: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            workflow_domain: DEFAULT_WORKFLOW_DOMAIN.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            http_client: None,
            clock: Arc::new(SystemClock),
        }
    }
}

impl ConnectClientBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// API host, without the `/v1` prefix
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn workflow_domain(mut self, domain: impl Into<String>) -> Self {
        self.workflow_domain = domain.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    /// Use an existing transport instead of building one; timeout settings are then ignored
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> ConnectResult<ConnectClient> {
        let credentials = self
            .credentials
            .ok_or_else(|| ConnectError::configuration("credentials are required"))?;

        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ConnectError::configuration(format!("Invalid base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConnectError::configuration(format!(
                "Invalid base URL: {} cannot carry a path",
                self.base_url
            )));
        }

        let workflow_domain = self.workflow_domain.trim_matches('.').to_string();
        if workflow_domain.is_empty() {
            return Err(ConnectError::configuration("workflow_domain must not be empty"));
        }

        let http = match self.http_client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout)
                .connect_timeout(self.connect_timeout)
                .pool_max_idle_per_host(self.pool_max_idle_per_host)
                .user_agent(user_agent())
                .build()
                .map_err(|e| {
                    ConnectError::configuration(format!("Failed to create HTTP client: {}", e))
                })?,
        };

        let token_url = token_endpoint(&base_url)?;
        debug!(token_url = %token_url, "Resolved OAuth token endpoint");

        let tokens = TokenManager::new(http.clone(), token_url, credentials.clone(), self.clock);

        info!(
            base_url = %base_url,
            project_id = %credentials.project_id(),
            environment = %credentials.environment(),
            timeout_ms = self.timeout.as_millis() as u64,
            "Created Connect API client"
        );

        Ok(ConnectClient {
            http,
            credentials,
            base_url,
            workflow_domain,
            tokens,
        })
    }
}

fn token_endpoint(base_url: &Url) -> ConnectResult<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ConnectError::configuration("Base URL cannot carry a path"))?
        .pop_if_empty()
        .extend([API_VERSION, paths::OAUTH, paths::TOKEN]);
    Ok(url)
}
