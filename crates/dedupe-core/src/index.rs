use crate::types::{ImageRecord, SkippedFile};

/// In-memory collection of every successfully inspected image for one run.
///
/// Pure storage: accumulation plus skip bookkeeping. All comparison logic
/// lives in the grouping engine. The index owns its records; groups refer
/// back into it by position.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    records: Vec<ImageRecord>,
    skipped: Vec<SkippedFile>,
}

impl FingerprintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a successfully inspected image
    pub fn push(&mut self, record: ImageRecord) {
        self.records.push(record);
    }

    /// Record a file that failed to decode. Skips are reported at the end of
    /// the run, never silently dropped.
    pub fn push_skipped(&mut self, skipped: SkippedFile) {
        self.skipped.push(skipped);
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the index, yielding its records
    pub fn into_records(self) -> (Vec<ImageRecord>, Vec<SkippedFile>) {
        (self.records, self.skipped)
    }
}
