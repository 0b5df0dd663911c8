use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use log::warn;
use tokio::fs;

/// Battery status as reported by the sysfs `status` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatteryStatus {
    Charging,
    Discharging,
    Full,
    Unknown,
}

impl BatteryStatus {
    /// Case-sensitive mapping of the raw file content. Anything the kernel
    /// reports other than the known words lands on `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match trim_sysfs(raw) {
            "Charging" => Self::Charging,
            "Discharging" => Self::Discharging,
            "Full" => Self::Full,
            _ => Self::Unknown,
        }
    }

    /// Every non-discharging status is treated as "on external power".
    pub fn is_discharging(&self) -> bool {
        matches!(self, Self::Discharging)
    }
}

/// Strip the trailing newline/NUL/space padding sysfs files carry.
fn trim_sysfs(raw: &str) -> &str {
    raw.trim_matches(|c| c == '\n' || c == '\0' || c == ' ')
}

/// The two pseudo-files this tool samples.
pub struct BatterySource {
    status_path: PathBuf,
    capacity_path: PathBuf,
}

impl BatterySource {
    pub fn new(status_path: impl Into<PathBuf>, capacity_path: impl Into<PathBuf>) -> Self {
        Self {
            status_path: status_path.into(),
            capacity_path: capacity_path.into(),
        }
    }

    /// Read failures are fatal for the whole process, the caller propagates.
    pub async fn read_status(&self) -> Result<BatteryStatus> {
        let raw = fs::read_to_string(&self.status_path)
            .await
            .with_context(|| format!("reading battery status from {}", self.status_path.display()))?;
        Ok(BatteryStatus::parse(&raw))
    }

    /// Reads the capacity percentage. I/O errors are fatal, but a garbled
    /// value only logs a warning and counts as 0%.
    pub async fn read_capacity(&self) -> Result<u8> {
        let raw = fs::read_to_string(&self.capacity_path)
            .await
            .with_context(|| {
                format!("reading battery capacity from {}", self.capacity_path.display())
            })?;
        let trimmed = trim_sysfs(&raw);
        Ok(match trimmed.parse::<u8>() {
            Ok(percentage) => percentage,
            Err(_) => {
                warn!(
                    "unreadable capacity value {trimmed:?} in {}, treating as 0%",
                    self.capacity_path.display()
                );
                0
            }
        })
    }
}

/// First `/sys/class/power_supply/BAT*` entry in sorted order, falling back
/// to `BAT0` for hosts where the glob comes up empty.
pub fn default_supply_dir() -> PathBuf {
    if let Ok(entries) = glob("/sys/class/power_supply/BAT*") {
        let mut batteries: Vec<PathBuf> = entries.flatten().collect();
        batteries.sort();
        if let Some(first) = batteries.into_iter().next() {
            return first;
        }
    }
    Path::new("/sys/class/power_supply/BAT0").to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::tempdir;

    fn source_with(dir: &Path, status: &str, capacity: &str) -> BatterySource {
        stdfs::write(dir.join("status"), status).unwrap();
        stdfs::write(dir.join("capacity"), capacity).unwrap();
        BatterySource::new(dir.join("status"), dir.join("capacity"))
    }

    #[test]
    fn parses_known_statuses() {
        assert_eq!(BatteryStatus::parse("Charging"), BatteryStatus::Charging);
        assert_eq!(BatteryStatus::parse("Discharging"), BatteryStatus::Discharging);
        assert_eq!(BatteryStatus::parse("Full"), BatteryStatus::Full);
        assert_eq!(BatteryStatus::parse("Not charging"), BatteryStatus::Unknown);
    }

    #[test]
    fn status_match_is_case_sensitive() {
        assert_eq!(BatteryStatus::parse("discharging"), BatteryStatus::Unknown);
        assert!(!BatteryStatus::parse("DISCHARGING").is_discharging());
    }

    #[test]
    fn padding_is_equivalent_to_the_bare_word() {
        assert_eq!(
            BatteryStatus::parse("Discharging\n\0\0"),
            BatteryStatus::parse("Discharging")
        );
        assert_eq!(BatteryStatus::parse(" Full \n"), BatteryStatus::Full);
    }

    #[tokio::test]
    async fn reads_padded_sysfs_files() {
        let dir = tempdir().unwrap();
        let source = source_with(dir.path(), "Discharging\n", "42\n\0");
        assert!(source.read_status().await.unwrap().is_discharging());
        assert_eq!(source.read_capacity().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn garbled_capacity_falls_back_to_zero() {
        let dir = tempdir().unwrap();
        let source = source_with(dir.path(), "Discharging\n", "garbage\n");
        assert_eq!(source.read_capacity().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_files_are_errors() {
        let dir = tempdir().unwrap();
        let source = BatterySource::new(dir.path().join("status"), dir.path().join("capacity"));
        assert!(source.read_status().await.is_err());
        assert!(source.read_capacity().await.is_err());
    }
}
