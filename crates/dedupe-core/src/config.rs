use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default Hamming distance at or below which two fingerprints are
/// considered duplicates.
pub const DEFAULT_THRESHOLD: u32 = 5;

/// Disposition applied to every non-kept member of a duplicate group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Compute and report decisions without touching the filesystem
    DryRun,

    /// Delete duplicate files from disk
    Delete,

    /// Move duplicate files into the given directory, preserving filenames
    Move(PathBuf),
}

impl Mode {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// Configuration for the image deduplication process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum Hamming distance for two images to count as duplicates (0-64)
    pub threshold: u32,

    /// What to do with duplicates
    pub mode: Mode,

    /// Where to write the CSV report, if anywhere
    pub report_path: Option<PathBuf>,

    /// Number of worker threads for the inspect stage (0 = available CPUs)
    pub threads: usize,

    /// Maximum directory depth for scanning
    pub max_depth: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            mode: Mode::DryRun,
            report_path: None,
            threads: 0, // Auto
            max_depth: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Configuration(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Runs before the inspect stage so a bad configuration can never leave
    /// the filesystem in a partially modified state.
    pub fn validate(&self) -> Result<()> {
        if self.threshold > 64 {
            return Err(Error::Configuration(format!(
                "threshold must be between 0 and 64, got {}",
                self.threshold
            )));
        }

        if let Mode::Move(target) = &self.mode {
            if target.as_os_str().is_empty() {
                return Err(Error::Configuration(
                    "move mode requires a target directory".to_string(),
                ));
            }
            if target.exists() {
                if !target.is_dir() {
                    return Err(Error::Configuration(format!(
                        "move target {} exists and is not a directory",
                        target.display()
                    )));
                }
            } else if let Some(ancestor) = nearest_existing_ancestor(target) {
                // The target will be created later; it must be creatable,
                // which means nothing on the way down may be a plain file
                if !ancestor.is_dir() {
                    return Err(Error::Configuration(format!(
                        "move target {} cannot be created: {} is not a directory",
                        target.display(),
                        ancestor.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Effective worker count for the inspect stage
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

/// Closest ancestor of `path` that exists on disk
fn nearest_existing_ancestor(path: &Path) -> Option<&Path> {
    path.ancestors().find(|a| a.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_threshold_over_hash_width() {
        let config = Config {
            threshold: 65,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn rejects_empty_move_target() {
        let config = Config {
            mode: Mode::Move(PathBuf::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_move_target_that_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, b"x").unwrap();

        let config = Config {
            mode: Mode::Move(file),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_uncreatable_move_target_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blocker");
        std::fs::write(&file, b"x").unwrap();

        let config = Config {
            mode: Mode::Move(file.join("dupes")),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn accepts_creatable_nested_move_target() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config {
            mode: Mode::Move(dir.path().join("a/b/dupes")),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            threshold: 8,
            mode: Mode::Move(PathBuf::from("dupes")),
            report_path: Some(PathBuf::from("report.csv")),
            threads: 4,
            max_depth: Some(3),
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.threshold, 8);
        assert_eq!(loaded.mode, Mode::Move(PathBuf::from("dupes")));
        assert_eq!(loaded.threads, 4);
    }
}
