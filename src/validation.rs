//! Input validation for Connect API calls
//!
//! Every check here runs before a request is built, so a rejected call never
//! reaches the network.

use crate::error::{ConnectError, ConnectResult};
use serde_json::Value;

/// Maximum allowed size for a configured props payload (1MB)
const MAX_PROPS_SIZE_BYTES: usize = 1024 * 1024;

/// Maximum nesting depth for configured props objects/arrays
const MAX_PROPS_DEPTH: usize = 32;

/// Reject an empty or whitespace-only identifier
pub fn require_non_empty(field: &str, value: &str) -> ConnectResult<()> {
    if value.trim().is_empty() {
        return Err(ConnectError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject zero or negative counts
pub fn require_positive(field: &str, value: i64) -> ConnectResult<()> {
    if value <= 0 {
        return Err(ConnectError::validation(format!(
            "{field} must be greater than 0, got {value}"
        )));
    }
    Ok(())
}

/// Reject two options that may not be supplied together
pub fn ensure_exclusive<A, B>(
    first: (&str, &Option<A>),
    second: (&str, &Option<B>),
) -> ConnectResult<()> {
    if first.1.is_some() && second.1.is_some() {
        return Err(ConnectError::validation(format!(
            "{} and {} cannot be specified together",
            first.0, second.0
        )));
    }
    Ok(())
}

/// Validates a configured props payload for size and nesting constraints
///
/// Both limits are imposed by this client before any request is sent, not
/// by the Connect API: payloads over 1 MiB serialized or nested deeper than
/// 32 levels are rejected as validation errors.
pub fn validate_props_payload(value: &Value) -> ConnectResult<()> {
    let serialized = serde_json::to_string(value)
        .map_err(|e| ConnectError::validation(format!("Invalid props structure: {e}")))?;

    if serialized.len() > MAX_PROPS_SIZE_BYTES {
        return Err(ConnectError::validation(format!(
            "Props payload too large: {} bytes (max: {})",
            serialized.len(),
            MAX_PROPS_SIZE_BYTES
        )));
    }

    validate_depth(value, 0)
}

fn validate_depth(value: &Value, current_depth: usize) -> ConnectResult<()> {
    if current_depth > MAX_PROPS_DEPTH {
        return Err(ConnectError::validation(format!(
            "Props nesting too deep: {current_depth} (max: {MAX_PROPS_DEPTH})"
        )));
    }

    match value {
        Value::Object(map) => map
            .values()
            .try_for_each(|val| validate_depth(val, current_depth + 1)),
        Value::Array(arr) => arr
            .iter()
            .try_for_each(|item| validate_depth(item, current_depth + 1)),
        _ => Ok(()),
    }
}
