#![allow(clippy::doc_markdown)] // Allow technical terms like OAuth, JSON in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Pipedream Connect Rust
//!
//! Async client for the Pipedream Connect REST API.
//!
//! ## Overview
//!
//! [`ConnectClient`] exposes typed methods for connect tokens, connected
//! accounts, the app and component registries, actions, triggers and their
//! deployments, rate limits and workflow invocation. Every call goes through a
//! single dispatcher that attaches the OAuth bearer token and the project
//! environment header and maps failures into [`ConnectError`].
//!
//! ## Module Organization
//!
//! - [`client`] - Client lifecycle, token caching and request dispatch
//! - [`resources`] - Resource operations on [`ConnectClient`]
//! - [`types`] - Request and response shapes
//! - [`config`] - Credentials and file/environment configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Optional `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pipedream_connect::{AccountListQuery, ClientConfig, ConnectClient, Pagination};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load()?;
//! let client = ConnectClient::from_config(&config)?;
//!
//! let query = AccountListQuery {
//!     pagination: Pagination::with_limit(10),
//!     ..Default::default()
//! };
//! let page = client.list_accounts(&query).await?;
//! for account in &page.data {
//!     println!("{} healthy={:?}", account.id, account.healthy);
//! }
//!
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod resources;
pub mod test_utils;
pub mod types;
pub mod validation;

pub use client::auth::{CachedToken, Clock, SystemClock, TokenManager};
pub use client::request::{ApiRequest, ExpectedStatus, QueryParams};
pub use client::{ConnectClient, ConnectClientBuilder};
pub use config::{ApiEndpointConfig, ClientConfig, Credentials, ProjectEnvironment};
pub use error::{ConnectError, ConnectResult};
pub use types::{
    Account, AccountListQuery, App, AppListQuery, Component, ComponentListQuery,
    ComponentSummary, ComponentType, ConfigurableProp, ConfigurePropRequest,
    ConfigurePropResponse, ConnectToken, ConnectTokenOptions, DeployTriggerRequest,
    DeployedTrigger, DeployedTriggerUpdate, EmittedEvent, HttpAuthType, Page, PageInfo,
    Pagination, ProjectInfo, RateLimitToken, ReloadPropsRequest, ReloadPropsResponse,
    RunActionRequest, RunActionResponse, WebhookUrls, WorkflowIds, WorkflowInvocation,
};
