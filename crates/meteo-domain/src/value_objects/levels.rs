//! Alert severity scales
//!
//! Two related but distinct scales exist: [`AlertLevel`] on the canonical
//! alert and [`NoticeSeverity`] on its derived notice twin. The mappings
//! between them are total in both directions; the critical level collapses
//! onto the warning severity because the notice shape predates it.

use serde::{Deserialize, Serialize};

/// Severity level of a canonical alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Ok,
    Warning,
    Critical,
    Danger,
}

impl AlertLevel {
    /// All levels, in ascending severity order.
    pub const ALL: [AlertLevel; 4] = [
        AlertLevel::Ok,
        AlertLevel::Warning,
        AlertLevel::Critical,
        AlertLevel::Danger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Ok => "ok",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
            AlertLevel::Danger => "danger",
        }
    }

    /// Severity of the notice derived from an alert at this level.
    pub fn notice_severity(&self) -> NoticeSeverity {
        match self {
            AlertLevel::Ok => NoticeSeverity::Info,
            AlertLevel::Warning | AlertLevel::Critical => NoticeSeverity::Warning,
            AlertLevel::Danger => NoticeSeverity::Danger,
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity carried by a derived alert notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Info,
    Warning,
    Danger,
}

impl NoticeSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeSeverity::Info => "info",
            NoticeSeverity::Warning => "warning",
            NoticeSeverity::Danger => "danger",
        }
    }

    /// Alert level a notice at this severity corresponds to.
    pub fn alert_level(&self) -> AlertLevel {
        match self {
            NoticeSeverity::Info => AlertLevel::Ok,
            NoticeSeverity::Warning => AlertLevel::Warning,
            NoticeSeverity::Danger => AlertLevel::Danger,
        }
    }
}

impl std::fmt::Display for NoticeSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_collapses_to_warning_severity() {
        assert_eq!(
            AlertLevel::Critical.notice_severity(),
            NoticeSeverity::Warning
        );
    }

    #[test]
    fn severity_round_trips_except_critical() {
        for level in [AlertLevel::Ok, AlertLevel::Warning, AlertLevel::Danger] {
            assert_eq!(level.notice_severity().alert_level(), level);
        }
    }
}
