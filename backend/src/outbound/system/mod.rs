//! Process and host health probes.
//!
//! [`SystemHealthChecker`] runs a list of [`HealthProbe`]s concurrently and
//! aggregates the results. Probe failures, including panics, become
//! unhealthy checks so the checker itself never fails.
//!
//! [`HealthProbe`]: crate::domain::ports::HealthProbe

mod checker;
mod probes;
mod sources;

pub use checker::SystemHealthChecker;
pub use probes::{
    ApplicationProbe, DEFAULT_MEMORY_THRESHOLD_MB, MemoryProbe, UptimeProbe,
};
pub use sources::{InstantUptime, SysinfoMemorySampler};
