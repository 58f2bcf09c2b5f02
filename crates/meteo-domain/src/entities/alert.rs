//! Storm alerts and their derived notice twin
//!
//! An alert carries two independent activity signals: the `is_active` flag
//! set by operators, and the `[valid_from, valid_to]` window evaluated on
//! the derived notice. Both are queryable on their own and are never
//! merged into a single predicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AlertLevel, NoticeSeverity, TimestampMs};

/// A storm warning for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub level: AlertLevel,
    /// Hazard kind, e.g. "Squall wind".
    pub kind: String,
    pub region: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub description: String,
    pub is_active: bool,
}

impl Alert {
    /// Derive the notice twin stored alongside the alert.
    pub fn notice(&self) -> AlertNotice {
        AlertNotice {
            id: self.id.clone(),
            kind: self.kind.clone(),
            message: self.description.clone(),
            created_at: self.valid_from.timestamp_millis(),
            expires_at: self.valid_to.timestamp_millis(),
            severity: self.level.notice_severity(),
        }
    }
}

/// Compact legacy-shape twin of an [`Alert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertNotice {
    /// Shares the identifier of the alert it was derived from.
    pub id: String,
    pub kind: String,
    pub message: String,
    pub created_at: TimestampMs,
    pub expires_at: TimestampMs,
    pub severity: NoticeSeverity,
}

impl AlertNotice {
    /// Whether `now` falls inside the notice validity window, inclusive.
    ///
    /// Independent of the canonical alert's `is_active` flag.
    pub fn is_current(&self, now: TimestampMs) -> bool {
        self.created_at <= now && now <= self.expires_at
    }
}
