//! End-to-end tour of the Connect client against a real project.
//!
//! Reads credentials from `PIPEDREAM_CLIENT_ID`, `PIPEDREAM_CLIENT_SECRET`,
//! `PIPEDREAM_PROJECT_ID` (and optionally `PIPEDREAM_PROJECT_ENVIRONMENT`) or
//! from a `pipedream-connect.toml` file.
//!
//! ```bash
//! PIPEDREAM_CLIENT_ID=... PIPEDREAM_CLIENT_SECRET=... PIPEDREAM_PROJECT_ID=proj_... \
//!     cargo run --example connect_walkthrough -- demo-user
//! ```

use pipedream_connect::logging::init_structured_logging;
use pipedream_connect::{
    AccountListQuery, ClientConfig, ComponentListQuery, ComponentType, ConnectClient,
    ConnectTokenOptions, Pagination,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let external_user_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demo-user".to_string());

    let config = ClientConfig::load()?;
    let client = ConnectClient::from_config(&config)?;
    info!(
        project_id = client.project_id(),
        environment = %client.environment(),
        "Connect client ready"
    );

    let token = client
        .create_connect_token(&external_user_id, ConnectTokenOptions::default())
        .await?;
    info!(expires_at = %token.expires_at, "Connect link: {}", token.connect_link_url);

    let accounts = client
        .list_accounts(&AccountListQuery {
            external_user_id: Some(external_user_id.clone()),
            pagination: Pagination::with_limit(10),
            ..Default::default()
        })
        .await?;
    for account in &accounts.data {
        info!(account_id = %account.id, healthy = ?account.healthy, "Connected account");
    }

    let actions = client
        .list_components(
            ComponentType::Actions,
            &ComponentListQuery {
                app: Some("slack".to_string()),
                pagination: Pagination::with_limit(5),
                ..Default::default()
            },
        )
        .await?;
    if let Some(first) = actions.data.first() {
        let component = client.get_component(ComponentType::Actions, &first.key).await?;
        let prop_names: Vec<&str> = component
            .configurable_props
            .iter()
            .map(|prop| prop.name.as_str())
            .collect();
        info!(key = %component.key, props = ?prop_names, "Action definition");
    }

    let triggers = client
        .list_deployed_triggers(&external_user_id, &Pagination::with_limit(10))
        .await?;
    info!(count = triggers.data.len(), "Deployed triggers");

    let rate_limit = client.create_rate_limit(60, 100).await?;
    info!(token_len = rate_limit.token.len(), "Created rate limit token");

    client.close();
    Ok(())
}
