//! # Mock Connect API
//!
//! In-process axum server standing in for the Connect API. Every request is
//! recorded; responses come from routes registered per test.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::Mutex;
use pipedream_connect::test_utils::ManualClock;
use pipedream_connect::{ConnectClient, Credentials, ProjectEnvironment};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const PROJECT_ID: &str = "proj_test";

/// One request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
    pub raw_body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// Canned response
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    content_type: Option<&'static str>,
    body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.to_string(),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn text(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some(content_type),
            body: body.into(),
        }
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match self.content_type {
            Some(content_type) => {
                (status, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
            }
            None => (status, self.body).into_response(),
        }
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    responder: Responder,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Running mock server; shut down on drop
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let raw_body = String::from_utf8_lossy(&body).to_string();
    let parsed = reqwest::Url::parse(&format!("http://mock{uri}")).expect("request uri");
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: parsed.path().to_string(),
        query: parsed.query_pairs().into_owned().collect(),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
        body: serde_json::from_str(&raw_body).ok(),
        raw_body,
    };
    state.requests.lock().push(recorded.clone());

    let responder = state
        .routes
        .lock()
        .iter()
        .rev()
        .find(|route| route.method == method && route.path == recorded.path)
        .map(|route| route.responder.clone());

    match responder {
        Some(responder) => responder(&recorded).into_response(),
        None => MockResponse::json(
            404,
            json!({"error": {"message": format!("no mock for {} {}", recorded.method, recorded.path)}}),
        )
        .into_response(),
    }
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server failed");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Register a responder; later registrations win over earlier ones
    pub fn route<F>(&self, method: Method, path: &str, responder: F)
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.state.routes.lock().push(Route {
            method,
            path: path.to_string(),
            responder: Arc::new(responder),
        });
    }

    /// Token endpoint returning `token` valid for `expires_in` seconds
    pub fn mount_token(&self, token: &str, expires_in: i64) {
        let body = json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": expires_in
        });
        self.route(Method::POST, "/v1/oauth/token", move |_| {
            MockResponse::ok(body.clone())
        });
    }

    /// Token endpoint issuing `tok1`, `tok2`, ... on successive calls
    pub fn mount_rotating_tokens(&self, expires_in: i64) {
        let issued = Arc::new(Mutex::new(0u32));
        self.route(Method::POST, "/v1/oauth/token", move |_| {
            let mut count = issued.lock();
            *count += 1;
            MockResponse::ok(json!({
                "access_token": format!("tok{}", *count),
                "expires_in": expires_in
            }))
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Requests other than token exchanges
    pub fn api_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path != "/v1/oauth/token")
            .collect()
    }

    pub fn token_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.path == "/v1/oauth/token")
            .count()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    pub fn client(&self) -> ConnectClient {
        self.client_with_clock(ManualClock::at_timestamp(1_700_000_000))
    }

    pub fn client_with_clock(&self, clock: ManualClock) -> ConnectClient {
        ConnectClient::builder()
            .credentials(test_credentials())
            .base_url(self.base_url())
            .clock(Arc::new(clock))
            .build()
            .expect("client builds")
    }
}

pub fn test_credentials() -> Credentials {
    Credentials::new(
        "test-client-id",
        "test-client-secret",
        PROJECT_ID,
        ProjectEnvironment::Development,
    )
    .expect("valid credentials")
}

pub fn project_path(rest: &str) -> String {
    format!("/v1/connect/{PROJECT_ID}/{rest}")
}

pub fn page_info(total: u64, count: u64, start: Option<&str>, end: Option<&str>) -> Value {
    json!({
        "total_count": total,
        "count": count,
        "start_cursor": start,
        "end_cursor": end
    })
}
