//! Health status model and aggregation.
//!
//! A [`SystemHealth`] report is derived from an ordered list of
//! [`HealthCheck`] results. The overall status is a pure function of the
//! check statuses:
//!
//! - every check healthy (including no checks at all) → healthy
//! - otherwise any check unhealthy → unhealthy
//! - otherwise → degraded
//!
//! Timestamps are supplied by the caller so aggregation stays deterministic
//! under test.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single probe or of the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Derive the overall status of a set of check statuses.
    ///
    /// # Examples
    /// ```
    /// use sprint_zero::domain::HealthStatus;
    ///
    /// let statuses = [HealthStatus::Healthy, HealthStatus::Degraded];
    /// assert_eq!(HealthStatus::aggregate(statuses), HealthStatus::Degraded);
    /// assert_eq!(HealthStatus::aggregate(std::iter::empty()), HealthStatus::Healthy);
    /// ```
    pub fn aggregate(statuses: impl IntoIterator<Item = Self>) -> Self {
        let mut overall = Self::Healthy;
        for status in statuses {
            match status {
                Self::Unhealthy => return Self::Unhealthy,
                Self::Degraded => overall = Self::Degraded,
                Self::Healthy => {}
            }
        }
        overall
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors raised when constructing a [`HealthCheck`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthCheckValidationError {
    EmptyName,
}

impl fmt::Display for HealthCheckValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "health check name must not be empty"),
        }
    }
}

impl std::error::Error for HealthCheckValidationError {}

/// Result of one named probe.
///
/// Name given to [`HealthCheck::unnamed`] results.
pub const UNNAMED_CHECK: &str = "unnamed";

/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - Values are immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    name: String,
    status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    timestamp: DateTime<Utc>,
}

impl HealthCheck {
    /// Build a check result without a message.
    pub fn try_new(
        name: impl Into<String>,
        status: HealthStatus,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, HealthCheckValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(HealthCheckValidationError::EmptyName);
        }
        Ok(Self {
            name,
            status,
            message: None,
            timestamp,
        })
    }

    /// Unhealthy check standing in for a probe that reported a blank name.
    pub fn unnamed(timestamp: DateTime<Utc>) -> Self {
        Self {
            name: UNNAMED_CHECK.to_owned(),
            status: HealthStatus::Unhealthy,
            message: None,
            timestamp,
        }
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Probe name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Probe outcome.
    pub fn status(&self) -> HealthStatus {
        self.status
    }

    /// Optional detail text.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Instant the check was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Aggregated health of the running service.
///
/// `status` is always [`HealthStatus::aggregate`] of the check statuses;
/// the only way to build a value is through [`SystemHealth::aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemHealth {
    status: HealthStatus,
    checks: Vec<HealthCheck>,
    timestamp: DateTime<Utc>,
}

impl SystemHealth {
    /// Aggregate checks into a report, preserving their order.
    pub fn aggregate(checks: Vec<HealthCheck>, timestamp: DateTime<Utc>) -> Self {
        let status = HealthStatus::aggregate(checks.iter().map(HealthCheck::status));
        Self {
            status,
            checks,
            timestamp,
        }
    }

    /// Overall status.
    pub fn status(&self) -> HealthStatus {
        self.status
    }

    /// Individual checks in the order they were supplied.
    pub fn checks(&self) -> &[HealthCheck] {
        self.checks.as_slice()
    }

    /// Instant the report was assembled.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use HealthStatus::{Degraded, Healthy, Unhealthy};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("valid fixture timestamp")
    }

    fn check(name: &str, status: HealthStatus, at: DateTime<Utc>) -> HealthCheck {
        HealthCheck::try_new(name, status, at).expect("valid check")
    }

    #[rstest]
    #[case(vec![], Healthy)]
    #[case(vec![Healthy], Healthy)]
    #[case(vec![Healthy, Healthy, Healthy], Healthy)]
    #[case(vec![Healthy, Degraded], Degraded)]
    #[case(vec![Degraded, Degraded], Degraded)]
    #[case(vec![Healthy, Unhealthy], Unhealthy)]
    #[case(vec![Degraded, Unhealthy, Healthy], Unhealthy)]
    #[case(vec![Unhealthy, Degraded], Unhealthy)]
    fn aggregation_rules(#[case] statuses: Vec<HealthStatus>, #[case] expected: HealthStatus) {
        assert_eq!(HealthStatus::aggregate(statuses), expected);
    }

    #[rstest]
    fn aggregation_is_order_independent() {
        let statuses = [Healthy, Degraded, Unhealthy];
        let forward = HealthStatus::aggregate(statuses);
        let backward = HealthStatus::aggregate(statuses.into_iter().rev());
        assert_eq!(forward, backward);
    }

    #[rstest]
    fn system_health_preserves_order_and_derives_status(now: DateTime<Utc>) {
        let checks = vec![
            check("memory", Degraded, now),
            check("system", Healthy, now),
            check("application", Healthy, now),
        ];
        let health = SystemHealth::aggregate(checks, now);

        assert_eq!(health.status(), Degraded);
        let names: Vec<_> = health.checks().iter().map(HealthCheck::name).collect();
        assert_eq!(names, ["memory", "system", "application"]);
        assert_eq!(health.timestamp(), now);
    }

    #[rstest]
    fn empty_report_is_healthy(now: DateTime<Utc>) {
        let health = SystemHealth::aggregate(Vec::new(), now);
        assert_eq!(health.status(), Healthy);
        assert!(health.checks().is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn blank_check_names_are_rejected(now: DateTime<Utc>, #[case] name: &str) {
        let err = HealthCheck::try_new(name, Healthy, now).expect_err("blank name");
        assert_eq!(err, HealthCheckValidationError::EmptyName);
    }

    #[rstest]
    fn serialises_lowercase_and_omits_missing_message(now: DateTime<Utc>) {
        let health = SystemHealth::aggregate(
            vec![
                check("system", Healthy, now).with_message("Uptime: 12s"),
                check("application", Unhealthy, now),
            ],
            now,
        );
        let value = serde_json::to_value(&health).expect("serialise health");

        assert_eq!(
            value,
            json!({
                "status": "unhealthy",
                "checks": [
                    {
                        "name": "system",
                        "status": "healthy",
                        "message": "Uptime: 12s",
                        "timestamp": "2026-01-02T03:04:05Z"
                    },
                    {
                        "name": "application",
                        "status": "unhealthy",
                        "timestamp": "2026-01-02T03:04:05Z"
                    }
                ],
                "timestamp": "2026-01-02T03:04:05Z"
            })
        );
    }
}
