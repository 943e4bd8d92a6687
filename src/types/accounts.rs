use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::apps::App;
use super::common::{Page, PageInfo, Pagination};

/// Connected account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub healthy: Option<bool>,
    #[serde(default)]
    pub dead: Option<bool>,
    #[serde(default)]
    pub app: Option<App>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Only present when requested with `include_credentials`
    #[serde(default)]
    pub credentials: Option<Map<String, Value>>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub last_refreshed_at: Option<String>,
    #[serde(default)]
    pub next_refresh_at: Option<String>,
}

/// Filters for `list_accounts`
#[derive(Debug, Clone, Default)]
pub struct AccountListQuery {
    /// App id or name slug (e.g. `slack`)
    pub app: Option<String>,
    pub oauth_app_id: Option<String>,
    pub external_user_id: Option<String>,
    pub include_credentials: bool,
    pub pagination: Pagination,
}

/// `data` arrives either as the list itself or wrapped as `{ "accounts": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AccountsData {
    List(Vec<Account>),
    Wrapped { accounts: Vec<Account> },
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountsPage {
    page_info: PageInfo,
    data: AccountsData,
}

impl AccountsPage {
    pub(crate) fn into_page(self) -> Page<Account> {
        let data = match self.data {
            AccountsData::List(accounts) | AccountsData::Wrapped { accounts } => accounts,
        };
        Page {
            page_info: self.page_info,
            data,
        }
    }
}
