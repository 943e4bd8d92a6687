use serde::{Deserialize, Serialize};

/// Short-lived token that lets an end user start an account-linking flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectToken {
    pub token: String,
    pub expires_at: String,
    pub connect_link_url: String,
}

/// Optional settings for `create_connect_token`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectTokenOptions {
    /// Origins allowed to use the token from a browser
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_origins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_redirect_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_redirect_uri: Option<String>,
    /// Receives auth events for accounts connected with this token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_uri: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct ConnectTokenRequest<'a> {
    pub external_user_id: &'a str,
    #[serde(flatten)]
    pub options: &'a ConnectTokenOptions,
}
