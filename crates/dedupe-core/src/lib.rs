//! Core functionality for finding and resolving visually duplicate images.
//!
//! This library provides the foundational components for image deduplication:
//! - File discovery and candidate enumeration
//! - Image inspection and perceptual hash generation
//! - Similarity grouping with transitive merge
//! - Best-candidate selection and safe file dispositions

// -- External Dependencies --

use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::{Config, Mode, DEFAULT_THRESHOLD};
pub use error::{Error, Result};
pub use types::*;

// -- Public Modules --
pub mod action;
pub mod config;
pub mod discovery;
pub mod grouping;
pub mod index;
pub mod logging;
pub mod processing;
pub mod progress;
pub mod report;
pub mod selection;
pub mod types;

use progress::{notify, ProgressEvent, ProgressFn};

/// Everything a run produced, for the reporting layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Every duplicate group, singletons included
    pub groups: Vec<DuplicateGroup>,

    /// The full audit trail, one record per processed duplicate
    pub actions: Vec<ActionRecord>,

    /// Files that failed to decode
    pub skipped: Vec<SkippedFile>,

    /// User-visible counters
    pub summary: RunSummary,
}

/// Main entry point for the deduplication process
pub struct Deduper {
    config: Config,
    observer: Option<Box<ProgressFn>>,
}

impl Deduper {
    /// Create a new `Deduper` with the provided configuration.
    ///
    /// The configuration is validated eagerly so a bad mode or threshold is
    /// rejected before any filesystem work begins.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: None,
        })
    }

    /// Attach a progress observer, notified after each unit of work
    pub fn with_observer(
        mut self,
        observer: impl Fn(ProgressEvent) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Discover candidate images in the provided directories
    pub fn discover_images(&self, directories: &[impl AsRef<Path>]) -> Result<Vec<PathBuf>> {
        discovery::discover_images(directories, &self.config)
    }

    /// Run the full pipeline over the provided directories
    pub fn run(&self, directories: &[impl AsRef<Path>]) -> Result<RunOutcome> {
        let paths = self.discover_images(directories)?;
        info!("Found {} candidate images", paths.len());
        self.run_on_paths(&paths)
    }

    /// Run the full pipeline over an explicit list of candidate paths.
    ///
    /// Inspect -> group -> select -> resolve -> report. Per-file failures
    /// are aggregated, never fatal.
    pub fn run_on_paths(&self, paths: &[PathBuf]) -> Result<RunOutcome> {
        let observer = self.observer.as_deref();

        // Inspect every candidate in parallel
        let index = processing::inspect_all(paths, &self.config, observer)?;
        info!(
            "Inspected {} images, skipped {}",
            index.len(),
            index.skipped().len()
        );

        // Cluster by transitive fingerprint similarity
        let clusters = grouping::group(index.records(), self.config.threshold);
        notify(
            observer,
            ProgressEvent::Grouped {
                clusters: clusters.len(),
            },
        );

        let (records, skipped) = index.into_records();

        // Resolve each cluster to one kept image
        let groups: Vec<DuplicateGroup> = clusters
            .into_iter()
            .map(|members| {
                selection::select(members.into_iter().map(|i| records[i].clone()).collect())
            })
            .collect();

        let duplicate_groups = groups.iter().filter(|g| g.member_count() > 1).count();
        info!(
            "{} groups, {} containing duplicates",
            groups.len(),
            duplicate_groups
        );

        // Apply dispositions, group by group
        action::prepare(&self.config.mode)?;
        let mut actions = Vec::new();
        for group in &groups {
            actions.extend(action::resolve(group, &self.config.mode));
            notify(observer, ProgressEvent::Resolved { done: actions.len() });
        }

        if let Some(report_path) = &self.config.report_path {
            report::write_report(report_path, &actions)?;
        }

        let summary = RunSummary {
            inspected: records.len(),
            skipped: skipped.len(),
            groups: duplicate_groups,
            kept: groups.len(),
            actions: actions.len(),
            failed_actions: actions.iter().filter(|a| !a.succeeded()).count(),
        };

        Ok(RunOutcome {
            groups,
            actions,
            skipped,
            summary,
        })
    }
}
