//! Liveness and readiness reports.
//!
//! Each report is built fresh per request from the process clock, the memory
//! counters exposed by a [`Probe`], and the read-only [`AppInfoConfig`].
//! Nothing here holds state between calls.
//!
//! The connectivity and dependency checks are placeholders: they always report
//! `connected` / `ready` and do not talk to any backing service.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use crate::config::{AppInfoConfig, BYTES_PER_MB, CHECK_CONNECTED, CHECK_READY};

/// Error raised while assembling a report.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to resolve current pid: {0}")]
    Pid(&'static str),

    #[error("Process {0} not found in process table")]
    ProcessNotFound(String),

    #[error("Dependency check failed: {0}")]
    Dependency(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

/// Process memory in whole megabytes. `used <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub used: u64,
    pub total: u64,
}

impl MemorySnapshot {
    /// Build a snapshot from byte counts, rounding each to the nearest megabyte.
    pub fn from_bytes(used_bytes: u64, total_bytes: u64) -> Self {
        let used = bytes_to_mb(used_bytes);
        let total = bytes_to_mb(total_bytes).max(used);
        Self { used, total }
    }
}

fn bytes_to_mb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_MB).round() as u64
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: &'static str,
    pub redis: &'static str,
    pub memory: MemorySnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: String,
    /// Seconds since process start
    pub uptime: f64,
    pub environment: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessChecks {
    pub database: &'static str,
    pub redis: &'static str,
    pub external_apis: &'static str,
    pub file_system: &'static str,
}

impl ReadinessChecks {
    pub fn all_ready() -> Self {
        Self {
            database: CHECK_READY,
            redis: CHECK_READY,
            external_apis: CHECK_READY,
            file_system: CHECK_READY,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub status: ReadinessStatus,
    pub timestamp: String,
    pub checks: ReadinessChecks,
}

/// Source of process-level measurements and dependency status.
pub trait Probe: Send + Sync {
    /// Current memory usage of this process.
    fn memory(&self) -> Result<MemorySnapshot, ProbeError>;

    /// Availability of the services this process depends on.
    fn dependencies(&self) -> Result<ReadinessChecks, ProbeError>;
}

/// Probe backed by the OS process table.
///
/// Memory is the resident set size over the virtual memory size of the
/// current process. Dependencies are reported as ready without probing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessProbe;

impl Probe for ProcessProbe {
    fn memory(&self) -> Result<MemorySnapshot, ProbeError> {
        let pid = sysinfo::get_current_pid().map_err(ProbeError::Pid)?;

        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        let process = system
            .process(pid)
            .ok_or_else(|| ProbeError::ProcessNotFound(pid.to_string()))?;

        Ok(MemorySnapshot::from_bytes(
            process.memory(),
            process.virtual_memory(),
        ))
    }

    fn dependencies(&self) -> Result<ReadinessChecks, ProbeError> {
        Ok(ReadinessChecks::all_ready())
    }
}

/// Format a UTC instant the way browsers print `Date.toISOString()`.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn health_report(
    probe: &dyn Probe,
    app: &AppInfoConfig,
    uptime: Duration,
    now: DateTime<Utc>,
) -> Result<HealthReport, ProbeError> {
    let memory = probe.memory()?;

    Ok(HealthReport {
        status: HealthStatus::Healthy,
        timestamp: iso_timestamp(now),
        uptime: uptime.as_secs_f64(),
        environment: app.environment.clone(),
        version: app.version.clone(),
        checks: HealthChecks {
            database: CHECK_CONNECTED,
            redis: CHECK_CONNECTED,
            memory,
        },
    })
}

pub fn readiness_report(
    probe: &dyn Probe,
    now: DateTime<Utc>,
) -> Result<ReadinessReport, ProbeError> {
    let checks = probe.dependencies()?;

    Ok(ReadinessReport {
        status: ReadinessStatus::Ready,
        timestamp: iso_timestamp(now),
        checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedProbe;

    impl Probe for FixedProbe {
        fn memory(&self) -> Result<MemorySnapshot, ProbeError> {
            Ok(MemorySnapshot { used: 12, total: 48 })
        }

        fn dependencies(&self) -> Result<ReadinessChecks, ProbeError> {
            Ok(ReadinessChecks::all_ready())
        }
    }

    struct BrokenProbe;

    impl Probe for BrokenProbe {
        fn memory(&self) -> Result<MemorySnapshot, ProbeError> {
            Err(ProbeError::ProcessNotFound("42".to_string()))
        }

        fn dependencies(&self) -> Result<ReadinessChecks, ProbeError> {
            Err(ProbeError::Dependency("database unreachable".to_string()))
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_iso_timestamp_format() {
        assert_eq!(iso_timestamp(fixed_now()), "2024-03-09T14:05:07.000Z");
    }

    #[test]
    fn test_memory_rounds_to_nearest_mb() {
        let mb = 1024 * 1024;
        let snapshot = MemorySnapshot::from_bytes(mb + mb / 2, 10 * mb + mb / 2 - 1);
        assert_eq!(snapshot, MemorySnapshot { used: 2, total: 10 });
    }

    #[test]
    fn test_memory_used_never_exceeds_total() {
        let snapshot = MemorySnapshot::from_bytes(64 * 1024 * 1024, 1024);
        assert_eq!(snapshot.used, 64);
        assert_eq!(snapshot.total, 64);
    }

    #[test]
    fn test_health_report_fields() {
        let app = AppInfoConfig {
            environment: "staging".to_string(),
            version: "9.9.9".to_string(),
        };
        let report =
            health_report(&FixedProbe, &app, Duration::from_millis(1500), fixed_now()).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "healthy",
                "timestamp": "2024-03-09T14:05:07.000Z",
                "uptime": 1.5,
                "environment": "staging",
                "version": "9.9.9",
                "checks": {
                    "database": "connected",
                    "redis": "connected",
                    "memory": { "used": 12, "total": 48 }
                }
            })
        );
    }

    #[test]
    fn test_readiness_report_fields() {
        let report = readiness_report(&FixedProbe, fixed_now()).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "ready",
                "timestamp": "2024-03-09T14:05:07.000Z",
                "checks": {
                    "database": "ready",
                    "redis": "ready",
                    "external_apis": "ready",
                    "file_system": "ready"
                }
            })
        );
    }

    #[test]
    fn test_probe_failures_propagate() {
        let app = AppInfoConfig::default();
        assert!(matches!(
            health_report(&BrokenProbe, &app, Duration::ZERO, fixed_now()),
            Err(ProbeError::ProcessNotFound(_))
        ));
        assert!(matches!(
            readiness_report(&BrokenProbe, fixed_now()),
            Err(ProbeError::Dependency(_))
        ));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(
            serde_json::to_value(HealthStatus::Unhealthy).unwrap(),
            "unhealthy"
        );
        assert_eq!(
            serde_json::to_value(ReadinessStatus::NotReady).unwrap(),
            "not_ready"
        );
    }

    #[test]
    fn test_process_probe_reads_own_memory() {
        let snapshot = ProcessProbe.memory().unwrap();
        assert!(snapshot.used <= snapshot.total);
        assert!(snapshot.total > 0);
    }
}
