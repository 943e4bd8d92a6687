//! Request and response shapes for the Connect API
//!
//! Response types enforce their required keys through serde; a payload missing
//! one surfaces as an "Unexpected response format" API error.

pub mod accounts;
pub mod apps;
pub mod common;
pub mod components;
pub mod projects;
pub mod rate_limits;
pub mod tokens;
pub mod triggers;
pub mod workflows;

pub use accounts::{Account, AccountListQuery};
pub use apps::{App, AppListQuery};
pub use common::{DataEnvelope, Page, PageInfo, Pagination};
pub use components::{
    Component, ComponentListQuery, ComponentSummary, ComponentType, ConfigurableProp,
    ConfigurePropRequest, ConfigurePropResponse, DeployTriggerRequest, DynamicProps,
    ReloadPropsRequest, ReloadPropsResponse, RunActionRequest, RunActionResponse,
};
pub use projects::{ProjectApp, ProjectInfo};
pub use rate_limits::{RateLimitRequest, RateLimitToken};
pub use tokens::{ConnectToken, ConnectTokenOptions};
pub use triggers::{DeployedTrigger, DeployedTriggerUpdate, EmittedEvent, WebhookUrls, WorkflowIds};
pub use workflows::{HttpAuthType, WorkflowInvocation, WorkflowTarget};
