//! Image inspection: decode, measure, fingerprint.
//!
//! The inspect stage is embarrassingly parallel. Each file is decoded and
//! hashed on a rayon worker pool; outcomes flow over a channel to a single
//! collector that owns the index, so no shared container is ever locked.

use std::path::{Path, PathBuf};

use image::GenericImageView;
use log::{debug, warn};
use rayon::prelude::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::FingerprintIndex;
use crate::progress::{notify, ProgressEvent, ProgressFn};
use crate::types::{ImageRecord, SkippedFile};

pub mod perceptual;

pub use perceptual::{dhash, Dhash};

/// Outcome of inspecting one candidate file
enum InspectOutcome {
    Record(ImageRecord),
    Skip(SkippedFile),
}

/// Inspect a single image file.
///
/// Decodes the file, extracts its comparable attributes and computes its
/// fingerprint. Pure function of the file bytes; nothing on disk is touched
/// beyond the read.
pub fn inspect(path: &Path) -> Result<ImageRecord> {
    let byte_size = std::fs::metadata(path)?.len();
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    let fingerprint = dhash(&img);

    Ok(ImageRecord {
        path: path.to_path_buf(),
        fingerprint,
        width,
        height,
        byte_size,
    })
}

/// Inspect every candidate path in parallel and accumulate the index.
///
/// Files that fail to decode are recorded as skips and the run continues;
/// a single unreadable file never aborts the stage. Records are sorted by
/// path afterwards so downstream output is independent of worker timing.
pub fn inspect_all(
    paths: &[PathBuf],
    config: &Config,
    observer: Option<&ProgressFn>,
) -> Result<FingerprintIndex> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_threads())
        .build()
        .map_err(|e| Error::Configuration(format!("failed to build thread pool: {}", e)))?;

    notify(observer, ProgressEvent::InspectStarted { total: paths.len() });

    let (tx, rx) = crossbeam::channel::unbounded();

    let index = std::thread::scope(|s| {
        let collector = s.spawn(move || {
            let mut index = FingerprintIndex::new();
            let mut done = 0;
            for outcome in rx {
                match outcome {
                    InspectOutcome::Record(record) => index.push(record),
                    InspectOutcome::Skip(skip) => index.push_skipped(skip),
                }
                done += 1;
                notify(observer, ProgressEvent::Inspected { done });
            }
            index
        });

        pool.install(|| {
            paths.par_iter().for_each_with(tx, |tx, path| {
                let outcome = match inspect(path) {
                    Ok(record) => {
                        debug!("Inspected {}", path.display());
                        InspectOutcome::Record(record)
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        InspectOutcome::Skip(SkippedFile {
                            path: path.clone(),
                            reason: e.to_string(),
                        })
                    }
                };
                // Receiver outlives every sender clone
                let _ = tx.send(outcome);
            });
        });

        collector.join().expect("inspect collector thread panicked")
    });

    let (mut records, skipped) = index.into_records();
    records.sort_by(|a, b| a.path.cmp(&b.path));

    let mut sorted = FingerprintIndex::new();
    for record in records {
        sorted.push(record);
    }
    for skip in skipped {
        sorted.push_skipped(skip);
    }
    Ok(sorted)
}
