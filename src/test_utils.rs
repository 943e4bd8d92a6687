//! # Test Utilities
//!
//! Helpers shared by unit and integration tests. `ManualClock` lets token
//! expiry be exercised by moving time forward instead of sleeping.

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::client::auth::Clock;

/// Settable clock for tests
///
/// Clones share the same underlying instant, so a test can keep one handle
/// while the client owns another.
///
/// ```rust
/// use pipedream_connect::client::auth::Clock;
/// use pipedream_connect::test_utils::ManualClock;
///
/// let clock = ManualClock::at_timestamp(1_000);
/// clock.advance_secs(40);
/// assert_eq!(clock.now().timestamp(), 1_040);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Start at a unix timestamp (seconds); out-of-range values fall back to the epoch
    pub fn at_timestamp(secs: i64) -> Self {
        let start = Utc
            .timestamp_opt(secs, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self::new(start)
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.write() = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}
