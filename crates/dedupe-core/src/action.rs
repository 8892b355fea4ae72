//! Resolution executor: applies the configured disposition to every
//! non-kept member of a duplicate group and emits the audit trail.
//!
//! The kept file is never modified. A failed file operation is recorded as a
//! failed `ActionRecord` and processing continues; one bad file must not
//! abort the run.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::config::Mode;
use crate::error::Result;
use crate::logging::log_fs_modification;
use crate::types::{ActionRecord, ActionTaken, DuplicateGroup, ImageRecord};

/// One-time setup before any disposition is applied. Creates the move
/// target directory; a no-op for delete and dry-run modes.
pub fn prepare(mode: &Mode) -> Result<()> {
    if let Mode::Move(target) = mode {
        fs::create_dir_all(target)?;
    }
    Ok(())
}

/// Apply `mode` to every duplicate in the group, in group order.
///
/// Returns one `ActionRecord` per duplicate, successful or failed. Dry-run
/// produces the same decisions as delete/move while guaranteeing zero
/// filesystem mutation.
pub fn resolve(group: &DuplicateGroup, mode: &Mode) -> Vec<ActionRecord> {
    group
        .duplicates
        .iter()
        .map(|duplicate| {
            let outcome = match mode {
                Mode::DryRun => Ok(ActionTaken::DryRun),
                Mode::Delete => delete(duplicate).map(|_| ActionTaken::Deleted),
                Mode::Move(target) => move_into(duplicate, target).map(|_| ActionTaken::Moved),
            };

            let (action, error) = match outcome {
                Ok(action) => (action, None),
                Err(e) => {
                    warn!(
                        "Failed to resolve duplicate {}: {}",
                        duplicate.path.display(),
                        e
                    );
                    // Record the intended action with the failure attached
                    let intended = match mode {
                        Mode::DryRun => ActionTaken::DryRun,
                        Mode::Delete => ActionTaken::Deleted,
                        Mode::Move(_) => ActionTaken::Moved,
                    };
                    (intended, Some(e.to_string()))
                }
            };

            build_record(&group.kept, duplicate, action, error)
        })
        .collect()
}

fn build_record(
    kept: &ImageRecord,
    duplicate: &ImageRecord,
    action: ActionTaken,
    error: Option<String>,
) -> ActionRecord {
    ActionRecord {
        kept_path: kept.path.clone(),
        duplicate_path: duplicate.path.clone(),
        hash_distance: kept.fingerprint.distance(&duplicate.fingerprint),
        kept_resolution: kept.resolution(),
        duplicate_resolution: duplicate.resolution(),
        kept_size: kept.byte_size,
        duplicate_size: duplicate.byte_size,
        action,
        error,
    }
}

fn delete(record: &ImageRecord) -> Result<()> {
    fs::remove_file(&record.path)?;
    log_fs_modification("delete", &record.path, None);
    Ok(())
}

fn move_into(record: &ImageRecord, target: &Path) -> Result<()> {
    let dest = unique_destination(target, &record.path);

    // rename fails across filesystems; fall back to copy + remove
    if fs::rename(&record.path, &dest).is_err() {
        fs::copy(&record.path, &dest)?;
        fs::remove_file(&record.path)?;
    }

    log_fs_modification(
        "move",
        &record.path,
        Some(&format!("-> {}", dest.display())),
    );
    Ok(())
}

/// Destination inside `target` preserving the filename. On collision, a
/// counter is suffixed to the stem (`name_1.ext`, `name_2.ext`, ...) so the
/// chosen name is deterministic.
fn unique_destination(target: &Path, source: &Path) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "unnamed".into());

    let candidate = target.join(&file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    let ext = source.extension().map(|e| e.to_string_lossy().into_owned());

    let mut counter = 1;
    loop {
        let name = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = target.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
