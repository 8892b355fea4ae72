use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::processing::Dhash;

/// One successfully inspected image file.
///
/// Every record in the index decoded successfully; files that fail to decode
/// never become records and are tracked separately as skips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Full path to the image file, unique within a run
    pub path: PathBuf,

    /// 64-bit perceptual fingerprint (dHash)
    pub fingerprint: Dhash,

    /// Pixel width at decode time
    pub width: u32,

    /// Pixel height at decode time
    pub height: u32,

    /// File size on disk in bytes
    pub byte_size: u64,
}

impl ImageRecord {
    /// Pixel area, the primary quality key when choosing which copy to keep
    pub fn pixel_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Dimensions as a (width, height) pair for reporting
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A file that could not be inspected and was excluded from the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Path of the file that failed to decode
    pub path: PathBuf,

    /// Human-readable decode failure
    pub reason: String,
}

/// A maximal set of images deemed visually equivalent.
///
/// Groups partition the index: every inspected record lands in exactly one
/// group. Singleton groups have an empty `duplicates` list and produce no
/// downstream action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The image to keep, chosen by the selection policy
    pub kept: ImageRecord,

    /// The remaining members, highest quality first
    pub duplicates: Vec<ImageRecord>,
}

impl DuplicateGroup {
    /// Total number of images in the group, kept included; never zero
    pub fn member_count(&self) -> usize {
        1 + self.duplicates.len()
    }
}

/// Disposition applied to a duplicate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionTaken {
    /// File was deleted from disk
    Deleted,

    /// File was moved into the duplicates directory
    Moved,

    /// Dry run: decision recorded, filesystem untouched
    DryRun,
}

impl ActionTaken {
    /// Stable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Moved => "moved",
            Self::DryRun => "dry-run",
        }
    }
}

/// One audit row, emitted per duplicate at the moment its disposition is
/// applied. Immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Path of the image that was kept
    pub kept_path: PathBuf,

    /// Path of the duplicate that was acted on
    pub duplicate_path: PathBuf,

    /// Hamming distance between the two fingerprints
    pub hash_distance: u32,

    /// (width, height) of the kept image
    pub kept_resolution: (u32, u32),

    /// (width, height) of the duplicate
    pub duplicate_resolution: (u32, u32),

    /// Byte size of the kept image
    pub kept_size: u64,

    /// Byte size of the duplicate
    pub duplicate_size: u64,

    /// Disposition that was applied (or would be, in a dry run)
    pub action: ActionTaken,

    /// Set when the filesystem operation failed; the run continues
    pub error: Option<String>,
}

impl ActionRecord {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Counters surfaced to the user at the end of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files successfully inspected
    pub inspected: usize,

    /// Files that failed to decode and were skipped
    pub skipped: usize,

    /// Duplicate groups of size 2 or more
    pub groups: usize,

    /// Images kept (one per group, singletons included)
    pub kept: usize,

    /// Dispositions applied (or flagged in a dry run)
    pub actions: usize,

    /// Dispositions that failed with an I/O error
    pub failed_actions: usize,
}
