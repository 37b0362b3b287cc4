//! Abstraction over where device readings come from.

use std::time::Duration;

use thiserror::Error;

/// Static description of the device. Expected not to change during the
/// process lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemInfo {
    pub manufacturer: String,
    pub model: String,
    pub os_release: String,
    pub cpu_core_count: usize,
}

/// A source of device readings.
///
/// Implementations are called from [`Collector::collect`] and must not block.
///
/// [`Collector::collect`]: prometheus_collector::collector::Collector::collect
pub trait DeviceSource: std::fmt::Debug + Send + Sync + 'static {
    /// Battery charge between `0.0` and `1.0`, `None` without a battery.
    fn battery_charge_ratio(&self) -> Result<Option<f64>, SourceError>;

    /// Time since the device booted.
    fn uptime(&self) -> Result<Duration, SourceError>;

    fn system_info(&self) -> Result<SystemInfo, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected content in {path}: {content:?}")]
    Malformed { path: String, content: String },
    #[cfg(target_os = "linux")]
    #[error(transparent)]
    Procfs(#[from] procfs::ProcError),
}
