//! Clock port
//!
//! Freshness queries are evaluated at query time, so the repositories take
//! their notion of "now" from this port instead of reading the system clock
//! directly. Tests substitute a fixed implementation.

use chrono::{DateTime, Utc};

use crate::value_objects::TimestampMs;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_ms(&self) -> TimestampMs {
        self.now().timestamp_millis()
    }
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
