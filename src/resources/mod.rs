//! Resource operations of the Connect API
//!
//! Each submodule adds an `impl ConnectClient` block. Every operation validates
//! its inputs, builds one [`ApiRequest`](crate::client::request::ApiRequest)
//! and decodes the response into its documented shape.

mod accounts;
mod apps;
mod components;
mod deployed_triggers;
mod rate_limits;
mod tokens;
mod workflows;

use crate::client::ConnectClient;
use crate::constants::paths;

impl ConnectClient {
    /// Segments for `connect/{project_id}/...`
    pub(crate) fn project_path<'a>(&'a self, rest: &[&'a str]) -> Vec<&'a str> {
        let mut segments = Vec::with_capacity(rest.len() + 2);
        segments.push(paths::CONNECT);
        segments.push(self.project_id());
        segments.extend_from_slice(rest);
        segments
    }
}
