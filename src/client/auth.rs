//! # OAuth Token Management
//!
//! Client-credentials token acquisition with a single cached bearer token.
//! The cached token is reused until its (margin-adjusted) expiry and then
//! replaced wholesale by a fresh exchange.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::constants::{DEFAULT_TOKEN_LIFETIME_SECS, TOKEN_EXPIRY_MARGIN_SECS};
use crate::error::{ConnectError, ConnectResult};

/// Wall-clock source used for token expiry checks
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Token request body for client credentials flow
#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Lifetime in seconds; some deployments send it as a float
    #[serde(default)]
    pub expires_in: Option<f64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Cached access token with its margin-adjusted expiry
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Build the cache entry for a token issued at `issued_at`
    ///
    /// `expires_at = issued_at + expires_in - 60s`; a missing lifetime counts as one hour.
    /// A lifetime that is not a positive finite number, or that overflows the
    /// timestamp range, is rejected as an auth error.
    pub fn from_lifetime(
        value: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_in: Option<f64>,
    ) -> ConnectResult<Self> {
        let lifetime = match expires_in {
            None => DEFAULT_TOKEN_LIFETIME_SECS,
            Some(secs) if secs.is_finite() && secs > 0.0 && secs < i64::MAX as f64 => {
                secs as i64
            }
            Some(secs) => {
                return Err(ConnectError::auth(
                    Some(StatusCode::OK.as_u16()),
                    format!("Invalid expires_in in token response: {secs}"),
                ))
            }
        };

        let expires_at = Duration::try_seconds(lifetime - TOKEN_EXPIRY_MARGIN_SECS)
            .and_then(|remaining| issued_at.checked_add_signed(remaining))
            .ok_or_else(|| {
                ConnectError::auth(
                    Some(StatusCode::OK.as_u16()),
                    format!("Token lifetime out of range: {lifetime}s"),
                )
            })?;
        Ok(Self::new(value, expires_at))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Valid strictly before `expires_at`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Acquires and caches the OAuth bearer token for one client instance
///
/// The cache lock is only held for the read or the replacement, never across
/// the token exchange, so concurrent callers that all see an expired token may
/// each refresh. Every refresh yields an equivalent token and the last writer wins.
pub struct TokenManager {
    http: Client,
    token_url: Url,
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    cached: RwLock<Option<CachedToken>>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.credentials.client_id())
            .field("cached", &*self.cached.read())
            .finish()
    }
}

impl TokenManager {
    pub fn new(
        http: Client,
        token_url: Url,
        credentials: Credentials,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            token_url,
            credentials,
            clock,
            cached: RwLock::new(None),
        }
    }

    /// Return a valid bearer token, exchanging credentials only when the cache is empty or expired
    pub async fn get_token(&self) -> ConnectResult<String> {
        let now = self.clock.now();
        let cached = self.cached.read().clone();
        if let Some(token) = cached.filter(|token| token.is_valid_at(now)) {
            return Ok(token.value);
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *self.cached.write() = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call performs a fresh exchange
    pub fn invalidate(&self) {
        *self.cached.write() = None;
    }

    /// Snapshot of the current cache entry
    pub fn cached_token(&self) -> Option<CachedToken> {
        self.cached.read().clone()
    }

    async fn fetch_token(&self) -> ConnectResult<CachedToken> {
        let issued_at = self.clock.now();
        let request_body = TokenRequest {
            grant_type: "client_credentials",
            client_id: self.credentials.client_id(),
            client_secret: self.credentials.client_secret(),
        };

        debug!(
            url = %self.token_url,
            client_id = %self.credentials.client_id(),
            "Requesting OAuth access token"
        );

        let response = self
            .http
            .post(self.token_url.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Network error during token request");
                ConnectError::auth(None, format!("Network error during token request: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ConnectError::auth(
                Some(status.as_u16()),
                format!("Failed to read token response: {e}"),
            )
        })?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "OAuth token request rejected");
            return Err(ConnectError::auth(
                Some(status.as_u16()),
                format!("Failed to retrieve access token: {body}"),
            ));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ConnectError::auth(
                Some(status.as_u16()),
                format!("Failed to parse token response: {e}"),
            )
        })?;

        let access_token = parsed
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ConnectError::auth(
                    Some(status.as_u16()),
                    "Access token not found in response",
                )
            })?;

        let token = CachedToken::from_lifetime(access_token, issued_at, parsed.expires_in)?;
        info!(expires_at = %token.expires_at, "Obtained OAuth access token");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectEnvironment;
    use crate::test_utils::ManualClock;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_expiry_applies_margin() {
        let token = CachedToken::from_lifetime("tok1", at(1_000), Some(100.0)).unwrap();
        assert_eq!(token.expires_at(), at(1_040));
        assert!(token.is_valid_at(at(1_039)));
        assert!(!token.is_valid_at(at(1_040)));
    }

    #[test]
    fn test_missing_lifetime_defaults_to_one_hour() {
        let token = CachedToken::from_lifetime("tok1", at(0), None).unwrap();
        assert_eq!(token.expires_at(), at(3_600 - 60));
    }

    #[test]
    fn test_out_of_range_lifetimes_rejected() {
        for expires_in in [1e18, -1e19, 0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = CachedToken::from_lifetime("tok", at(0), Some(expires_in)).unwrap_err();
            assert!(err.is_auth(), "{expires_in} should be rejected");
            assert_eq!(err.status(), Some(200));
        }
    }

    #[test]
    fn test_fractional_lifetime_truncates() {
        let token = CachedToken::from_lifetime("tok", at(0), Some(120.9)).unwrap();
        assert_eq!(token.expires_at(), at(60));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = CachedToken::new("very-secret-token", at(0));
        let debug_str = format!("{:?}", token);
        assert!(!debug_str.contains("very-secret-token"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_token_response_accepts_missing_fields() {
        let parsed: TokenResponse = serde_json::from_str(r#"{"token_type":"Bearer"}"#).unwrap();
        assert!(parsed.access_token.is_none());
        assert!(parsed.expires_in.is_none());

        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc","expires_in":3600}"#).unwrap();
        assert_eq!(parsed.access_token.as_deref(), Some("abc"));
        assert_eq!(parsed.expires_in, Some(3600.0));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(TokenRequest {
            grant_type: "client_credentials",
            client_id: "id",
            client_secret: "secret",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "grant_type": "client_credentials",
                "client_id": "id",
                "client_secret": "secret"
            })
        );
    }

    #[tokio::test]
    async fn test_cached_token_served_without_network() {
        let clock = ManualClock::at_timestamp(1_000);
        let credentials =
            Credentials::new("id", "secret", "proj", ProjectEnvironment::Production).unwrap();
        // Unroutable endpoint: any network attempt would fail the test
        let manager = TokenManager::new(
            Client::new(),
            Url::parse("http://127.0.0.1:9/v1/oauth/token").unwrap(),
            credentials,
            Arc::new(clock.clone()),
        );
        let seeded = CachedToken::from_lifetime("tok1", at(1_000), Some(100.0)).unwrap();
        *manager.cached.write() = Some(seeded);

        assert_eq!(manager.get_token().await.unwrap(), "tok1");
        clock.advance_secs(39);
        assert_eq!(manager.get_token().await.unwrap(), "tok1");

        manager.invalidate();
        assert!(manager.cached_token().is_none());
    }

    proptest! {
        #[test]
        fn prop_valid_exactly_until_margin_adjusted_expiry(
            issued in 0i64..4_000_000_000,
            lifetime in 61i64..86_400,
            offset in 0i64..100_000,
        ) {
            let token =
                CachedToken::from_lifetime("tok", at(issued), Some(lifetime as f64)).unwrap();
            let boundary = issued + lifetime - TOKEN_EXPIRY_MARGIN_SECS;
            let now = issued + offset;
            prop_assert_eq!(token.is_valid_at(at(now)), now < boundary);
        }
    }
}
