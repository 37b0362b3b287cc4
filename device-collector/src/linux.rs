use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use procfs::{CpuInfo, Current, Uptime};

use crate::source::{DeviceSource, SourceError, SystemInfo};

const UNKNOWN: &str = "unknown";
const OS_RELEASE: &str = "/proc/sys/kernel/osrelease";

/// [`DeviceSource`] reading procfs and sysfs of a Linux host.
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    sysfs: PathBuf,
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::with_sysfs_root("/sys")
    }
}

impl ProcfsSource {
    /// Reads battery and DMI information below `root` instead of `/sys`.
    pub fn with_sysfs_root(root: impl Into<PathBuf>) -> Self {
        Self { sysfs: root.into() }
    }

    fn dmi(&self, file: &str) -> Result<String, SourceError> {
        Ok(read_trimmed(&self.sysfs.join("class/dmi/id").join(file))?
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()))
    }
}

impl DeviceSource for ProcfsSource {
    fn battery_charge_ratio(&self) -> Result<Option<f64>, SourceError> {
        let dir = self.sysfs.join("class/power_supply");
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_error(&dir, source)),
        };

        let mut supplies = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| io_error(&dir, source))?;
        // read_dir order is unspecified.
        supplies.sort();

        for supply in supplies {
            if read_trimmed(&supply.join("type"))?.as_deref() != Some("Battery") {
                continue;
            }

            let path = supply.join("capacity");
            let Some(capacity) = read_trimmed(&path)? else {
                continue;
            };
            let percent: f64 = capacity.parse().map_err(|_| SourceError::Malformed {
                path: path.display().to_string(),
                content: capacity.clone(),
            })?;
            return Ok(Some(percent / 100.0));
        }

        Ok(None)
    }

    fn uptime(&self) -> Result<Duration, SourceError> {
        // Monotonic, unaffected by wall clock adjustments.
        Ok(Uptime::current()?.uptime_duration())
    }

    fn system_info(&self) -> Result<SystemInfo, SourceError> {
        Ok(SystemInfo {
            manufacturer: self.dmi("sys_vendor")?,
            model: self.dmi("product_name")?,
            os_release: read_trimmed(Path::new(OS_RELEASE))?
                .unwrap_or_else(|| UNKNOWN.to_string()),
            cpu_core_count: CpuInfo::current()?.num_cores(),
        })
    }
}

/// Contents of `path` without surrounding whitespace, `None` if it does not
/// exist.
fn read_trimmed(path: &Path) -> Result<Option<String>, SourceError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(io_error(path, source)),
    }
}

fn io_error(path: &Path, source: io::Error) -> SourceError {
    SourceError::Io {
        path: path.display().to_string(),
        source,
    }
}
