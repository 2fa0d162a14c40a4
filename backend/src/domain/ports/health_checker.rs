//! Ports for system health reporting.
//!
//! [`HealthChecker`] is what the health use case calls. Adapters usually
//! assemble the report from several [`HealthProbe`]s, each reading one
//! aspect of the running process through a narrow sampling port such as
//! [`UptimeSource`] or [`MemorySampler`].

use async_trait::async_trait;

use crate::domain::{HealthStatus, SystemHealth};

use super::port_error;

port_error! {
    /// Failures raised while sampling process or host metrics.
    pub enum ProbeError {
        /// The metric could not be read.
        Sample { message: String } => "{message}",
    }
}

/// Produces an aggregated health report. Implementations never fail; probe
/// failures are reported as unhealthy checks instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// Run every probe and aggregate the results.
    async fn check_health(&self) -> SystemHealth;
}

/// Outcome of a successful probe run, before it is timestamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Probe verdict.
    pub status: HealthStatus,
    /// Human-readable detail.
    pub message: String,
}

impl ProbeReport {
    /// Convenience constructor.
    pub fn new(status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// One named health probe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Stable probe name reported in the check list.
    fn name(&self) -> &'static str;

    /// Inspect the process and report a verdict.
    async fn probe(&self) -> Result<ProbeReport, ProbeError>;
}

/// Source of process uptime.
#[cfg_attr(test, mockall::automock)]
pub trait UptimeSource: Send + Sync {
    /// Seconds since the process started.
    fn uptime_secs(&self) -> Result<f64, ProbeError>;
}

/// Snapshot of memory usage in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySample {
    /// Resident memory of the current process.
    pub used_bytes: u64,
    /// Total memory available to the host.
    pub total_bytes: u64,
}

/// Source of memory usage samples.
#[cfg_attr(test, mockall::automock)]
pub trait MemorySampler: Send + Sync {
    /// Read current process and host memory.
    fn sample(&self) -> Result<MemorySample, ProbeError>;
}
