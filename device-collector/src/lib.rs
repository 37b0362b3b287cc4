//! [`Collector`] exposing battery, uptime and system information of the device
//! the process runs on.

use std::time::Instant;

use parking_lot::RwLock;
use prometheus_collector::{
    collector::{Collector, Result},
    error::CollectionError,
    metrics::{family::MetricFamily, MetricType},
};

#[cfg(target_os = "linux")]
mod linux;
pub mod source;

#[cfg(target_os = "linux")]
pub use linux::ProcfsSource;
pub use source::{DeviceSource, SourceError, SystemInfo};

const DEFAULT_NAMESPACE: &str = "device";

#[derive(Debug)]
pub struct DeviceCollector<S> {
    namespace: String,
    source: S,
    // Sampled once, static for the process lifetime.
    system_info: RwLock<Option<SystemInfo>>,
}

impl<S: DeviceSource> DeviceCollector<S> {
    pub fn new(source: S) -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE, source)
    }

    /// An empty namespace leaves metric names unprefixed.
    pub fn with_namespace(namespace: impl Into<String>, source: S) -> Self {
        Self {
            namespace: namespace.into(),
            source,
            system_info: RwLock::new(None),
        }
    }

    fn name(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", self.namespace, name)
        }
    }

    fn system_info(&self) -> Result<SystemInfo> {
        if let Some(info) = self.system_info.read().as_ref() {
            return Ok(info.clone());
        }

        let info = self.source.system_info().map_err(sampling)?;
        *self.system_info.write() = Some(info.clone());
        Ok(info)
    }
}

#[cfg(target_os = "linux")]
impl DeviceCollector<ProcfsSource> {
    pub fn procfs() -> Self {
        Self::new(ProcfsSource::default())
    }
}

impl<S: DeviceSource> Collector for DeviceCollector<S> {
    fn collect(&self) -> Result<Vec<MetricFamily>> {
        tracing::debug!(namespace = %self.namespace, "collecting device metrics");
        let start = Instant::now();
        let mut families = Vec::with_capacity(4);

        if let Some(ratio) = self.source.battery_charge_ratio().map_err(sampling)? {
            families.push(MetricFamily::gauge(
                self.name("battery_charge_ratio"),
                "Current battery charge",
                ratio,
            )?);
        }

        let uptime = self.source.uptime().map_err(sampling)?;
        families.push(MetricFamily::gauge(
            self.name("uptime_seconds"),
            "Uptime in seconds",
            uptime.as_secs_f64(),
        )?);

        let info = self.system_info()?;
        families.push(
            MetricFamily::builder(
                self.name("system_info"),
                "Static information about the device",
                MetricType::Gauge,
            )
            .label_names(["manufacturer", "model", "os_release", "cpu_core_count"])
            .sample(
                [
                    info.manufacturer,
                    info.model,
                    info.os_release,
                    info.cpu_core_count.to_string(),
                ],
                1.0,
            )
            .build()?,
        );

        families.push(MetricFamily::gauge(
            self.name("scrape_duration_seconds"),
            "Duration of the metric scrape",
            start.elapsed().as_secs_f64(),
        )?);

        tracing::debug!(families = families.len(), "device metrics collected");
        Ok(families)
    }
}

fn sampling(error: SourceError) -> CollectionError {
    CollectionError::sampling("device", error)
}
