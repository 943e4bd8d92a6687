use serde::{Deserialize, Serialize};

use crate::client::request::QueryParams;
use crate::error::{ConnectError, ConnectResult};

/// Pagination block returned with every listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total_count: u64,
    pub count: u64,
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Cursor to pass as `after` for the next page, if any
    pub fn next_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page_info: PageInfo,
    pub data: Vec<T>,
}

/// `{ "data": ... }` wrapper used by single-resource responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Page size and cursor for a listing call
///
/// `after` moves forward from a page's `end_cursor`, `before` moves back from
/// its `start_cursor`; at most one of them may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl Pagination {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    pub fn validate(&self) -> ConnectResult<()> {
        if self.limit == Some(0) {
            return Err(ConnectError::validation("limit must be greater than 0"));
        }
        crate::validation::ensure_exclusive(("after", &self.after), ("before", &self.before))
    }

    pub(crate) fn apply(&self, query: &mut QueryParams) {
        query
            .push_opt("limit", self.limit)
            .push_opt("after", self.after.as_deref())
            .push_opt("before", self.before.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_info_deserialization() {
        let info: PageInfo = serde_json::from_value(json!({
            "total_count": 5,
            "count": 2,
            "start_cursor": "c1",
            "end_cursor": "c2"
        }))
        .unwrap();
        assert_eq!(info.next_cursor(), Some("c2"));

        let info: PageInfo =
            serde_json::from_value(json!({"total_count": 0, "count": 0, "end_cursor": ""}))
                .unwrap();
        assert_eq!(info.next_cursor(), None);
    }

    #[test]
    fn test_pagination_validation() {
        assert!(Pagination::default().validate().is_ok());
        assert!(Pagination::with_limit(2).after("c2").validate().is_ok());
        assert!(Pagination::with_limit(0).validate().unwrap_err().is_validation());
        assert!(Pagination::default()
            .after("a")
            .before("b")
            .validate()
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_pagination_query() {
        let mut query = QueryParams::new();
        Pagination::with_limit(2).after("c2").apply(&mut query);
        assert_eq!(query.get("limit"), Some("2"));
        assert_eq!(query.get("after"), Some("c2"));
        assert_eq!(query.get("before"), None);
    }
}
