use reqwest::{Method, Url};
use serde_json::Value;

use crate::error::{ConnectError, ConnectResult};

/// How a workflow HTTP endpoint authenticates callers
#[derive(Clone, Default, PartialEq, Eq)]
pub enum HttpAuthType {
    #[default]
    None,
    /// Fixed token configured on the workflow's HTTP trigger
    StaticBearer(String),
    /// Bearer token from the client's own OAuth credentials
    OAuth,
}

impl std::fmt::Debug for HttpAuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpAuthType::None => f.write_str("None"),
            HttpAuthType::StaticBearer(_) => f.write_str("StaticBearer([REDACTED])"),
            HttpAuthType::OAuth => f.write_str("OAuth"),
        }
    }
}

/// Where a workflow invocation is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowTarget {
    Url(Url),
    /// Endpoint id such as `en123abc`, hosted at `{id}.{workflow_domain}`
    EndpointId(String),
}

impl WorkflowTarget {
    /// Accept a full http(s) URL or an endpoint id (`en...` / `eo...`)
    pub fn parse(input: &str) -> ConnectResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConnectError::validation("url_or_endpoint is required"));
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            let url = Url::parse(input).map_err(|e| {
                ConnectError::validation(format!("Invalid workflow URL '{input}': {e}"))
            })?;
            return Ok(WorkflowTarget::Url(url));
        }

        let is_endpoint_id = (input.starts_with("en") || input.starts_with("eo"))
            && input.len() > 2
            && input.chars().all(|c| c.is_ascii_alphanumeric());
        if is_endpoint_id {
            return Ok(WorkflowTarget::EndpointId(input.to_string()));
        }

        Err(ConnectError::validation(format!(
            "Invalid workflow target '{input}': expected an http(s) URL or an endpoint id"
        )))
    }

    pub fn resolve(&self, workflow_domain: &str) -> ConnectResult<Url> {
        match self {
            WorkflowTarget::Url(url) => Ok(url.clone()),
            WorkflowTarget::EndpointId(id) => Url::parse(&format!("https://{id}.{workflow_domain}"))
                .map_err(|e| {
                    ConnectError::validation(format!("Invalid workflow endpoint '{id}': {e}"))
                }),
        }
    }
}

/// Request sent to a workflow HTTP endpoint
#[derive(Debug, Clone)]
pub struct WorkflowInvocation {
    pub method: Method,
    pub body: Option<Value>,
    /// Extra headers passed through unchanged
    pub headers: Vec<(String, String)>,
    pub auth: HttpAuthType,
}

impl Default for WorkflowInvocation {
    fn default() -> Self {
        Self {
            method: Method::POST,
            body: None,
            headers: Vec::new(),
            auth: HttpAuthType::None,
        }
    }
}

impl WorkflowInvocation {
    pub fn post(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Default::default()
        }
    }

    pub fn with_auth(mut self, auth: HttpAuthType) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_target() {
        let target = WorkflowTarget::parse("https://en123.m.pipedream.net/path").unwrap();
        assert_eq!(
            target.resolve("ignored").unwrap().as_str(),
            "https://en123.m.pipedream.net/path"
        );
    }

    #[test]
    fn test_endpoint_id_resolution() {
        let target = WorkflowTarget::parse("eoabc123").unwrap();
        assert_eq!(target, WorkflowTarget::EndpointId("eoabc123".to_string()));
        assert_eq!(
            target.resolve("m.pipedream.net").unwrap().as_str(),
            "https://eoabc123.m.pipedream.net/"
        );
    }

    #[test]
    fn test_invalid_targets() {
        for input in ["", "  ", "ftp://example.com", "en", "xx123", "en-123", "https://"] {
            let err = WorkflowTarget::parse(input).unwrap_err();
            assert!(err.is_validation(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_static_bearer_debug_redacted() {
        let auth = HttpAuthType::StaticBearer("s3cr3t".to_string());
        assert!(!format!("{:?}", auth).contains("s3cr3t"));
    }
}
