use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sysinfo::{Disks, System};

/// One instantaneous reading of host utilisation, in percent.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Sample {
    pub cpu_load: f64,
    pub ram_usage: f64,
    pub disk_usage: f64,
}

impl Sample {
    pub fn new(cpu_load: f64, ram_usage: f64, disk_usage: f64) -> Self {
        Self {
            cpu_load,
            ram_usage,
            disk_usage,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("no mounted volume contains {0}")]
    NoMatchingVolume(String),

    #[error("volume mounted at {0} reports zero capacity")]
    EmptyVolume(String),

    #[error("host reports zero total memory")]
    MemoryUnavailable,
}

/// Anything that can produce a point-in-time [`Sample`] of the host.
pub trait MetricsSource {
    fn sample(&mut self) -> Result<Sample, MetricsError>;
}

#[derive(Debug, Serialize, Clone)]
pub struct DiskSummary {
    pub name: String,
    pub total: u64,
    pub available: u64,
    pub file_system: String,
    pub mount_point: String,
}

/// De-duplicate disks across all OSes by (name, total, fs).
/// If multiple entries match, prefer mount_point "/", otherwise prefer the shortest path.
fn dedupe_disks(disks: Vec<DiskSummary>) -> Vec<DiskSummary> {
    fn mount_score(mp: &str) -> (u8, usize) {
        let root_rank = if mp == "/" { 0 } else { 1 };
        (root_rank, mp.len())
    }

    let mut pick: HashMap<(String, u64, String), DiskSummary> = HashMap::new();
    for d in disks {
        let key = (d.name.clone(), d.total, d.file_system.clone());
        match pick.get(&key) {
            None => {
                pick.insert(key, d);
            }
            Some(prev) => {
                if mount_score(&d.mount_point) < mount_score(&prev.mount_point) {
                    pick.insert(key, d);
                }
            }
        }
    }
    pick.into_values().collect()
}

/// Picks the volume holding `target`: the one whose mount point is the
/// longest path prefix of it.
fn volume_for<'a>(disks: &'a [DiskSummary], target: &Path) -> Option<&'a DiskSummary> {
    disks
        .iter()
        .filter(|d| target.starts_with(Path::new(&d.mount_point)))
        .max_by_key(|d| Path::new(&d.mount_point).components().count())
}

/// Used share of `total`, in percent. `None` when `total` is zero.
fn used_percent(total: u64, available: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let used = total - available.min(total);
    Some(used as f64 / total as f64 * 100.0)
}

/// Rounds to one decimal place, the resolution readings are reported at.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `sysinfo`-backed source for CPU, memory and the volume holding `disk_path`.
///
/// CPU usage is measured between consecutive refreshes, so the first sample
/// after construction can read 0.
pub struct HostMetrics {
    system: System,
    disk_path: PathBuf,
}

impl HostMetrics {
    pub fn new(disk_path: impl Into<PathBuf>) -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        Self {
            system,
            disk_path: disk_path.into(),
        }
    }

    fn disk_summaries() -> Vec<DiskSummary> {
        let disks = Disks::new_with_refreshed_list();
        let collected = disks
            .list()
            .iter()
            .map(|d| DiskSummary {
                name: d.name().to_string_lossy().to_string(),
                total: d.total_space(),
                available: d.available_space(),
                file_system: d.file_system().to_string_lossy().to_string(),
                mount_point: d.mount_point().to_string_lossy().to_string(),
            })
            .collect();
        dedupe_disks(collected)
    }

    fn disk_usage(&self) -> Result<f64, MetricsError> {
        let disks = Self::disk_summaries();
        let volume = volume_for(&disks, &self.disk_path).ok_or_else(|| {
            MetricsError::NoMatchingVolume(self.disk_path.display().to_string())
        })?;
        used_percent(volume.total, volume.available)
            .ok_or_else(|| MetricsError::EmptyVolume(volume.mount_point.clone()))
    }
}

impl MetricsSource for HostMetrics {
    fn sample(&mut self) -> Result<Sample, MetricsError> {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpu_load = f64::from(self.system.global_cpu_usage());
        let ram_usage = used_percent(self.system.total_memory(), self.system.available_memory())
            .ok_or(MetricsError::MemoryUnavailable)?;
        let disk_usage = self.disk_usage()?;

        let sample = Sample::new(round1(cpu_load), round1(ram_usage), round1(disk_usage));
        tracing::trace!(?sample, disk_path = %self.disk_path.display(), "host sampled");
        Ok(sample)
    }
}
