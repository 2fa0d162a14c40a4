//! Concrete metric sources backed by `std::time` and `sysinfo`.

use std::sync::Mutex;
use std::time::Instant;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use crate::domain::ports::{MemorySample, MemorySampler, ProbeError, UptimeSource};

/// Uptime measured from the moment the value was created.
///
/// Build one during startup so the reading tracks process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct InstantUptime {
    started: Instant,
}

impl InstantUptime {
    /// Start measuring from now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for InstantUptime {
    fn default() -> Self {
        Self::start()
    }
}

impl UptimeSource for InstantUptime {
    fn uptime_secs(&self) -> Result<f64, ProbeError> {
        Ok(self.started.elapsed().as_secs_f64())
    }
}

/// Samples resident memory of the current process and host total memory.
#[derive(Debug, Default)]
pub struct SysinfoMemorySampler {
    system: Mutex<System>,
}

impl SysinfoMemorySampler {
    /// Create a sampler with an empty `sysinfo` snapshot; every sample
    /// refreshes only what it reads.
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl MemorySampler for SysinfoMemorySampler {
    fn sample(&self) -> Result<MemorySample, ProbeError> {
        let pid = sysinfo::get_current_pid().map_err(ProbeError::sample)?;
        let mut system = self
            .system
            .lock()
            .map_err(|_| ProbeError::sample("sysinfo snapshot lock poisoned"))?;

        system.refresh_memory();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::new().with_memory(),
        );

        let process = system
            .process(pid)
            .ok_or_else(|| ProbeError::sample(format!("process {pid} not found")))?;
        Ok(MemorySample {
            used_bytes: process.memory(),
            total_bytes: system.total_memory(),
        })
    }
}
