//! Built-in health probes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::HealthStatus;
use crate::domain::ports::{HealthProbe, MemorySampler, ProbeError, ProbeReport, UptimeSource};

/// Used memory above this many megabytes marks the memory probe degraded.
pub const DEFAULT_MEMORY_THRESHOLD_MB: u64 = 100;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Convert bytes to megabytes, rounding half up.
pub(super) fn bytes_to_rounded_mb(bytes: u64) -> u64 {
    bytes.saturating_add(BYTES_PER_MB / 2) / BYTES_PER_MB
}

/// Reports process memory against host memory.
///
/// Healthy while used memory is at or below the threshold, degraded above
/// it. Message: `Memory: {used}MB/{total}MB`.
#[derive(Clone)]
pub struct MemoryProbe {
    sampler: Arc<dyn MemorySampler>,
    threshold_mb: u64,
}

impl MemoryProbe {
    /// Create a probe with an explicit degradation threshold in megabytes.
    pub fn new(sampler: Arc<dyn MemorySampler>, threshold_mb: u64) -> Self {
        Self {
            sampler,
            threshold_mb,
        }
    }
}

#[async_trait]
impl HealthProbe for MemoryProbe {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn probe(&self) -> Result<ProbeReport, ProbeError> {
        let sample = self.sampler.sample()?;
        let used = bytes_to_rounded_mb(sample.used_bytes);
        let total = bytes_to_rounded_mb(sample.total_bytes);
        let status = if used > self.threshold_mb {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        Ok(ProbeReport::new(status, format!("Memory: {used}MB/{total}MB")))
    }
}

/// Reports process uptime under the name `system`.
///
/// Healthy when uptime is positive. Message: `Uptime: {seconds}s`.
#[derive(Clone)]
pub struct UptimeProbe {
    source: Arc<dyn UptimeSource>,
}

impl UptimeProbe {
    /// Create a probe reading from `source`.
    pub fn new(source: Arc<dyn UptimeSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl HealthProbe for UptimeProbe {
    fn name(&self) -> &'static str {
        "system"
    }

    async fn probe(&self) -> Result<ProbeReport, ProbeError> {
        let uptime = self.source.uptime_secs()?;
        let status = if uptime > 0.0 {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };
        Ok(ProbeReport::new(status, format!("Uptime: {}s", uptime.round())))
    }
}

/// Liveness of the application itself; always healthy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationProbe;

#[async_trait]
impl HealthProbe for ApplicationProbe {
    fn name(&self) -> &'static str {
        "application"
    }

    async fn probe(&self) -> Result<ProbeReport, ProbeError> {
        Ok(ProbeReport::new(
            HealthStatus::Healthy,
            "Application is running",
        ))
    }
}
