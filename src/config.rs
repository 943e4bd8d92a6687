//! # Client Configuration
//!
//! Credentials and endpoint settings for the Connect client.
//! Supports environment variables, config files, and programmatic construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_POOL_MAX_IDLE_PER_HOST,
    DEFAULT_TIMEOUT_MS, DEFAULT_WORKFLOW_DOMAIN,
};
use crate::error::{ConnectError, ConnectResult};

/// Project environment a request is scoped to
///
/// Sent on every Connect API call as the `x-pd-environment` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectEnvironment {
    Development,
    #[default]
    Production,
}

impl ProjectEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectEnvironment::Development => "development",
            ProjectEnvironment::Production => "production",
        }
    }
}

impl fmt::Display for ProjectEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectEnvironment {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(ProjectEnvironment::Development),
            "production" | "prod" => Ok(ProjectEnvironment::Production),
            other => Err(ConnectError::validation(format!(
                "Invalid environment '{other}': expected 'development' or 'production'"
            ))),
        }
    }
}

/// OAuth client credentials plus the project they act on
///
/// Immutable once constructed; build it through [`Credentials::new`] so empty
/// fields are rejected up front.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    project_id: String,
    environment: ProjectEnvironment,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        project_id: impl Into<String>,
        environment: ProjectEnvironment,
    ) -> ConnectResult<Self> {
        let credentials = Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            project_id: project_id.into(),
            environment,
        };

        if credentials.client_id.trim().is_empty()
            || credentials.client_secret.trim().is_empty()
            || credentials.project_id.trim().is_empty()
        {
            return Err(ConnectError::validation(
                "client_id, client_secret, and project_id are required",
            ));
        }

        Ok(credentials)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn environment(&self) -> ProjectEnvironment {
        self.environment
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("environment", &self.environment)
            .finish()
    }
}

/// Client configuration as stored on disk or assembled from the environment
///
/// # Examples
///
/// ```rust
/// use pipedream_connect::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.api.base_url, "https://api.pipedream.com");
/// assert_eq!(config.api.timeout_ms, 30000);
/// ```
///
/// ```rust,no_run
/// use pipedream_connect::config::ClientConfig;
///
/// let config = ClientConfig::load().expect("Failed to load config");
/// let credentials = config.credentials().expect("credentials not configured");
/// println!("Project: {}", credentials.project_id());
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Project the client operates on
    pub project_id: String,
    /// Project environment
    pub environment: ProjectEnvironment,
    /// Endpoint settings
    pub api: ApiEndpointConfig,
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpointConfig {
    /// Base URL of the API host (e.g., "<https://api.pipedream.com>")
    pub base_url: String,
    /// Domain that hosts workflow HTTP endpoints
    pub workflow_domain: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Connection establishment timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Idle pooled connections kept per host
    pub pool_max_idle_per_host: usize,
}

impl Default for ApiEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            workflow_domain: DEFAULT_WORKFLOW_DOMAIN.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("environment", &self.environment)
            .field("api", &self.api)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables and config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (./pipedream-connect.toml, ~/.pipedream/connect.toml, ...)
    /// 3. Default values
    ///
    /// A config file that is found but cannot be read or parsed is a
    /// configuration error rather than a silent fallback to defaults.
    pub fn load() -> ConnectResult<Self> {
        let config_path = Self::find_config_file();
        Self::load_with(config_path.as_deref(), |key| std::env::var(key).ok())
    }

    fn load_with<F>(config_path: Option<&Path>, lookup: F) -> ConnectResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) => {
                debug!("Loading config from: {}", path.display());
                Self::load_from_file(path).map_err(|e| {
                    warn!(path = %path.display(), error = %e, "Rejected config file");
                    e
                })?
            }
            None => Self::default(),
        };

        config.apply_overrides_from(lookup);

        debug!("Loaded client configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> ConnectResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConnectError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConnectError::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut candidates = vec![
            PathBuf::from("./pipedream-connect.toml"),
            PathBuf::from("./config/pipedream-connect.toml"),
        ];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".pipedream").join("connect.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("pipedream").join("connect.toml"));
        }

        candidates
            .into_iter()
            .find(|path| path.exists() && path.is_file())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(client_id) = lookup("PIPEDREAM_CLIENT_ID") {
            self.client_id = client_id;
        }
        if let Some(client_secret) = lookup("PIPEDREAM_CLIENT_SECRET") {
            self.client_secret = client_secret;
        }
        if let Some(project_id) = lookup("PIPEDREAM_PROJECT_ID") {
            self.project_id = project_id;
        }
        if let Some(environment) = lookup("PIPEDREAM_PROJECT_ENVIRONMENT") {
            match environment.parse() {
                Ok(env) => self.environment = env,
                Err(e) => debug!("Ignoring PIPEDREAM_PROJECT_ENVIRONMENT: {}", e),
            }
        }
        if let Some(url) = lookup("PIPEDREAM_API_URL") {
            self.api.base_url = url;
        }
        if let Some(domain) = lookup("PIPEDREAM_WORKFLOW_DOMAIN") {
            self.api.workflow_domain = domain;
        }
        if let Some(timeout) = lookup("PIPEDREAM_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse() {
                self.api.timeout_ms = timeout_ms;
            }
        }
    }

    /// Validated credentials taken from this configuration
    pub fn credentials(&self) -> ConnectResult<Credentials> {
        Credentials::new(
            self.client_id.clone(),
            self.client_secret.clone(),
            self.project_id.clone(),
            self.environment,
        )
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> ConnectResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConnectError::configuration(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ConnectError::configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content).map_err(|e| {
            ConnectError::configuration(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get default config file path
    pub fn default_config_path() -> ConnectResult<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ConnectError::configuration("Could not determine home directory"))?;

        Ok(home_dir.join(".pipedream").join("connect.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn sample_config() -> ClientConfig {
        ClientConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            project_id: "proj_abc".to_string(),
            environment: ProjectEnvironment::Development,
            api: ApiEndpointConfig::default(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "https://api.pipedream.com");
        assert_eq!(config.api.workflow_domain, "m.pipedream.net");
        assert_eq!(config.api.timeout_ms, 30000);
        assert_eq!(config.environment, ProjectEnvironment::Production);
        assert!(config.client_id.is_empty());
    }

    #[test]
    fn test_credentials_require_all_fields() {
        let err = Credentials::new("client", "", "proj", ProjectEnvironment::Production)
            .unwrap_err();
        assert!(err.is_validation());

        let err = ClientConfig::default().credentials().unwrap_err();
        assert!(err.is_validation());

        let creds = sample_config().credentials().unwrap();
        assert_eq!(creds.project_id(), "proj_abc");
        assert_eq!(creds.environment(), ProjectEnvironment::Development);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new(
            "client",
            "super-secret-value",
            "proj",
            ProjectEnvironment::Production,
        )
        .unwrap();
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super-secret-value"));

        let mut config = sample_config();
        config.client_secret = "another-secret".to_string();
        assert!(!format!("{:?}", config).contains("another-secret"));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "development".parse::<ProjectEnvironment>().unwrap(),
            ProjectEnvironment::Development
        );
        assert_eq!(
            "PROD".parse::<ProjectEnvironment>().unwrap(),
            ProjectEnvironment::Production
        );
        assert!("staging".parse::<ProjectEnvironment>().is_err());
        assert_eq!(ProjectEnvironment::Development.to_string(), "development");
    }

    #[test]
    fn test_config_serialization() {
        let config = sample_config();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("environment = \"development\""));

        let deserialized: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.project_id, deserialized.project_id);
        assert_eq!(config.api.base_url, deserialized.api.base_url);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
project_id = "proj_partial"

[api]
timeout_ms = 5000
"#,
        )
        .unwrap();
        assert_eq!(config.project_id, "proj_partial");
        assert_eq!(config.api.timeout_ms, 5000);
        assert_eq!(config.api.base_url, "https://api.pipedream.com");
        assert_eq!(config.environment, ProjectEnvironment::Production);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("connect.toml");

        let original_config = sample_config();
        original_config.save_to_file(&config_path).unwrap();

        let loaded_config = ClientConfig::load_from_file(&config_path).unwrap();
        assert_eq!(original_config.client_id, loaded_config.client_id);
        assert_eq!(original_config.environment, loaded_config.environment);
    }

    #[test]
    fn test_load_from_missing_file_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ClientConfig::load_from_file(&temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConnectError::Configuration(_)));
    }

    #[test]
    fn test_malformed_discovered_file_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("connect.toml");
        std::fs::write(&config_path, "client_id = [unterminated").unwrap();

        let err = ClientConfig::load_with(Some(&config_path), |_| None).unwrap_err();
        assert!(matches!(err, ConnectError::Configuration(_)));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides_discovered_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("connect.toml");
        sample_config().save_to_file(&config_path).unwrap();

        let config = ClientConfig::load_with(Some(&config_path), |key| {
            (key == "PIPEDREAM_PROJECT_ID").then(|| "proj_env".to_string())
        })
        .unwrap();
        assert_eq!(config.client_id, "client");
        assert_eq!(config.project_id, "proj_env");

        let defaults = ClientConfig::load_with(None, |_| None).unwrap();
        assert!(defaults.client_id.is_empty());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("PIPEDREAM_CLIENT_ID", "env-client"),
            ("PIPEDREAM_PROJECT_ENVIRONMENT", "development"),
            ("PIPEDREAM_API_URL", "http://127.0.0.1:9000"),
            ("PIPEDREAM_TIMEOUT_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = sample_config();
        config.environment = ProjectEnvironment::Production;
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.client_id, "env-client");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.environment, ProjectEnvironment::Development);
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.timeout_ms, 30000);
    }
}
