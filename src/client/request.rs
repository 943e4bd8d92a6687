//! # Request Dispatch
//!
//! Request descriptors and the single code path every API call goes through:
//! URL resolution, query serialization, auth and environment headers, and
//! mapping of the response into JSON or a [`ConnectError`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::ConnectClient;
use crate::constants::{headers, API_VERSION};
use crate::error::{ConnectError, ConnectResult};
use crate::logging::log_api_failure;

/// Query string parameters in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Push only when a value is present
    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Push a boolean as lowercase `"true"`; `false` is omitted
    pub fn push_flag(&mut self, key: &str, enabled: bool) -> &mut Self {
        if enabled {
            self.push(key, enabled);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Status codes a request treats as success
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedStatus {
    Code(u16),
    OneOf(Vec<u16>),
    /// Any 2xx
    AnySuccess,
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        ExpectedStatus::Code(200)
    }
}

impl ExpectedStatus {
    pub fn matches(&self, status: StatusCode) -> bool {
        match self {
            ExpectedStatus::Code(code) => status.as_u16() == *code,
            ExpectedStatus::OneOf(codes) => codes.contains(&status.as_u16()),
            ExpectedStatus::AnySuccess => status.is_success(),
        }
    }
}

#[derive(Debug, Clone)]
enum Target {
    /// Segments appended to `{base}/v1/`
    Api(Vec<String>),
    Absolute(Url),
}

/// One outbound call, built per operation and consumed by [`ConnectClient::send`]
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) operation: &'static str,
    method: Method,
    target: Target,
    query: QueryParams,
    body: Option<Value>,
    headers: Vec<(String, String)>,
    requires_auth: bool,
    send_environment: bool,
    expected: ExpectedStatus,
}

impl ApiRequest {
    /// Request against a versioned API path made of `segments`
    pub fn new<I, S>(operation: &'static str, method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_target(
            operation,
            method,
            Target::Api(segments.into_iter().map(Into::into).collect()),
        )
    }

    /// Request against a fully qualified URL outside the API host
    pub fn absolute(operation: &'static str, method: Method, url: Url) -> Self {
        Self::with_target(operation, method, Target::Absolute(url))
    }

    fn with_target(operation: &'static str, method: Method, target: Target) -> Self {
        Self {
            operation,
            method,
            target,
            query: QueryParams::new(),
            body: None,
            headers: Vec::new(),
            requires_auth: true,
            send_environment: true,
            expected: ExpectedStatus::default(),
        }
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn without_auth(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn without_environment(mut self) -> Self {
        self.send_environment = false;
        self
    }

    pub fn expect(mut self, expected: ExpectedStatus) -> Self {
        self.expected = expected;
        self
    }
}

/// Best-effort error message from a failed response body
///
/// Prefers `error.message`, then a string `error` field, then the raw text.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.pointer("/error/message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        body.to_string()
    }
}

/// Decode a JSON value into the shape an operation documents
pub fn decode<T: DeserializeOwned>(value: Value, operation: &str) -> ConnectResult<T> {
    serde_json::from_value(value).map_err(|e| ConnectError::unexpected_response(operation, e))
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let mime = value.split(';').next().unwrap_or("").trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

impl ConnectClient {
    fn resolve_url(&self, target: &Target) -> ConnectResult<Url> {
        match target {
            Target::Absolute(url) => Ok(url.clone()),
            Target::Api(segments) => {
                let mut url = self.base_url.clone();
                {
                    let mut path = url.path_segments_mut().map_err(|_| {
                        ConnectError::configuration(format!(
                            "Base URL cannot carry a path: {}",
                            self.base_url
                        ))
                    })?;
                    path.pop_if_empty().push(API_VERSION);
                    for segment in segments {
                        path.push(segment);
                    }
                }
                Ok(url)
            }
        }
    }

    /// Send one request and return the decoded JSON payload
    ///
    /// 204 or an empty body yields `{}`; a non-JSON body is wrapped as
    /// `{"raw_response": <text>}`.
    pub async fn send(&self, request: ApiRequest) -> ConnectResult<Value> {
        let url = self.resolve_url(&request.target)?;
        let operation = request.operation;

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }

        if request.requires_auth {
            let token = self.tokens.get_token().await?;
            builder = builder.bearer_auth(token);
        }

        if request.send_environment {
            builder = builder.header(headers::ENVIRONMENT, self.credentials.environment().as_str());
        }

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ConnectError::validation(format!("Invalid header name {name}: {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ConnectError::validation(format!("Invalid value for header {name}: {e}"))
            })?;
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(
            operation = operation,
            method = %request.method,
            url = %url,
            "Dispatching Connect API request"
        );

        let response = builder.send().await.map_err(|e| {
            log_api_failure(operation, None, &e.to_string());
            ConnectError::api(None, format!("Network error during API request: {e}"))
        })?;

        let status = response.status();
        let is_json = is_json_content_type(response.headers());
        let text = response.text().await.map_err(|e| {
            ConnectError::api(
                Some(status.as_u16()),
                format!("Failed to read response body: {e}"),
            )
        })?;

        if !request.expected.matches(status) {
            let message = extract_error_message(&text);
            log_api_failure(operation, Some(status.as_u16()), &message);
            return Err(ConnectError::api_with_body(status.as_u16(), message, text));
        }

        debug!(
            operation = operation,
            status = status.as_u16(),
            "Connect API request succeeded"
        );

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(json!({}));
        }

        if is_json {
            return serde_json::from_str(&text).map_err(|e| {
                error!(operation = operation, error = %e, "Failed to decode JSON response");
                ConnectError::api_with_body(
                    status.as_u16(),
                    format!("Failed to decode JSON response: {e}"),
                    text.clone(),
                )
            });
        }

        Ok(json!({ "raw_response": text }))
    }

    /// Send a request and decode the payload into `T`
    pub async fn send_decoded<T: DeserializeOwned>(&self, request: ApiRequest) -> ConnectResult<T> {
        let operation = request.operation;
        let value = self.send(request).await?;
        decode(value, operation)
    }

    /// Send a request whose success response carries no content
    pub async fn send_empty(&self, request: ApiRequest) -> ConnectResult<()> {
        self.send(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_skip_none_and_lowercase_bools() {
        let mut query = QueryParams::new();
        query
            .push("limit", 2)
            .push_opt("after", None::<String>)
            .push_opt("app", Some("slack"))
            .push_flag("include_credentials", true)
            .push_flag("ignoreHookErrors", false)
            .push("active", false);

        assert_eq!(
            query.pairs(),
            &[
                ("limit".to_string(), "2".to_string()),
                ("app".to_string(), "slack".to_string()),
                ("include_credentials".to_string(), "true".to_string()),
                ("active".to_string(), "false".to_string()),
            ]
        );
        assert_eq!(query.get("app"), Some("slack"));
        assert_eq!(query.get("after"), None);
    }

    #[test]
    fn test_expected_status_matching() {
        assert!(ExpectedStatus::default().matches(StatusCode::OK));
        assert!(!ExpectedStatus::default().matches(StatusCode::CREATED));
        assert!(!ExpectedStatus::Code(204).matches(StatusCode::OK));
        assert!(ExpectedStatus::OneOf(vec![200, 202]).matches(StatusCode::ACCEPTED));
        assert!(ExpectedStatus::AnySuccess.matches(StatusCode::NO_CONTENT));
        assert!(!ExpectedStatus::AnySuccess.matches(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"Account not found"}}"#),
            "Account not found"
        );
        assert_eq!(
            extract_error_message(r#"{"error":"invalid_request"}"#),
            "invalid_request"
        );
        assert_eq!(
            extract_error_message(r#"{"detail":"nope"}"#),
            r#"{"detail":"nope"}"#
        );
        assert_eq!(extract_error_message("<html>bad gateway</html>"), "<html>bad gateway</html>");
        assert_eq!(extract_error_message(""), "Unknown error");
    }

    #[test]
    fn test_decode_reports_operation() {
        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            id: String,
        }

        let err = decode::<Needs>(json!({"name": "x"}), "get_account").unwrap_err();
        assert!(err.is_api());
        assert!(err
            .to_string()
            .contains("Unexpected response format for get_account"));
    }

    #[test]
    fn test_json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content_type(&headers));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json_content_type(&headers));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        assert!(!is_json_content_type(&headers));
    }
}
