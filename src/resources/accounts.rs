use reqwest::Method;
use tracing::{debug, info};

use crate::client::request::{ApiRequest, ExpectedStatus, QueryParams};
use crate::client::ConnectClient;
use crate::constants::paths;
use crate::error::ConnectResult;
use crate::types::accounts::AccountsPage;
use crate::types::{Account, AccountListQuery, DataEnvelope, Page};
use crate::validation::require_non_empty;

impl ConnectClient {
    // ===================================================================================
    // ACCOUNTS
    // ===================================================================================

    /// List connected accounts in the project
    ///
    /// GET /v1/connect/{project_id}/accounts
    pub async fn list_accounts(&self, query: &AccountListQuery) -> ConnectResult<Page<Account>> {
        query.pagination.validate()?;

        let mut params = QueryParams::new();
        params
            .push_opt("app", query.app.as_deref())
            .push_opt("oauth_app_id", query.oauth_app_id.as_deref())
            .push_opt("external_user_id", query.external_user_id.as_deref())
            .push_flag("include_credentials", query.include_credentials);
        query.pagination.apply(&mut params);

        let request = ApiRequest::new(
            "list_accounts",
            Method::GET,
            self.project_path(&[paths::ACCOUNTS]),
        )
        .query(params);

        let page = self.send_decoded::<AccountsPage>(request).await?.into_page();
        debug!(count = page.data.len(), "Listed accounts");
        Ok(page)
    }

    /// Get one connected account
    ///
    /// GET /v1/connect/{project_id}/accounts/{account_id}
    pub async fn get_account(
        &self,
        account_id: &str,
        include_credentials: bool,
    ) -> ConnectResult<Account> {
        require_non_empty("account_id", account_id)?;

        let mut params = QueryParams::new();
        params.push_flag("include_credentials", include_credentials);

        let request = ApiRequest::new(
            "get_account",
            Method::GET,
            self.project_path(&[paths::ACCOUNTS, account_id]),
        )
        .query(params);

        let envelope: DataEnvelope<Account> = self.send_decoded(request).await?;
        Ok(envelope.data)
    }

    /// Delete one connected account
    ///
    /// DELETE /v1/connect/{project_id}/accounts/{account_id}
    pub async fn delete_account(&self, account_id: &str) -> ConnectResult<()> {
        require_non_empty("account_id", account_id)?;

        let request = ApiRequest::new(
            "delete_account",
            Method::DELETE,
            self.project_path(&[paths::ACCOUNTS, account_id]),
        )
        .expect(ExpectedStatus::Code(204));

        self.send_empty(request).await?;
        info!(account_id = %account_id, "Deleted account");
        Ok(())
    }

    /// Delete every account connected to an app
    ///
    /// DELETE /v1/connect/{project_id}/apps/{app_id}/accounts
    pub async fn delete_accounts_by_app(&self, app_id: &str) -> ConnectResult<()> {
        require_non_empty("app_id", app_id)?;

        let request = ApiRequest::new(
            "delete_accounts_by_app",
            Method::DELETE,
            self.project_path(&[paths::APPS, app_id, paths::ACCOUNTS]),
        )
        .expect(ExpectedStatus::Code(204));

        self.send_empty(request).await?;
        info!(app_id = %app_id, "Deleted accounts for app");
        Ok(())
    }

    /// Delete an end user together with all of their accounts
    ///
    /// DELETE /v1/connect/{project_id}/users/{external_user_id}
    pub async fn delete_external_user(&self, external_user_id: &str) -> ConnectResult<()> {
        require_non_empty("external_user_id", external_user_id)?;

        let request = ApiRequest::new(
            "delete_external_user",
            Method::DELETE,
            self.project_path(&[paths::USERS, external_user_id]),
        )
        .expect(ExpectedStatus::Code(204));

        self.send_empty(request).await?;
        info!(external_user_id = %external_user_id, "Deleted external user");
        Ok(())
    }
}
