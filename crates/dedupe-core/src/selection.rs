//! Best-candidate selection within a duplicate cluster.
//!
//! Deterministic total order over candidates: pixel area descending, then
//! byte size descending, then path ascending. The path tie-break guarantees
//! a reproducible choice independent of enumeration order. Resolution ranks
//! above file size on purpose; swapping them changes which file survives in
//! ambiguous cases.

use std::cmp::Ordering;

use crate::types::{DuplicateGroup, ImageRecord};

/// The quality order: greater-quality records sort first
fn quality_order(a: &ImageRecord, b: &ImageRecord) -> Ordering {
    b.pixel_area()
        .cmp(&a.pixel_area())
        .then_with(|| b.byte_size.cmp(&a.byte_size))
        .then_with(|| a.path.cmp(&b.path))
}

/// Resolve a cluster into one kept image and an ordered list of duplicates.
///
/// Pure function; accepts the members in any order and always returns the
/// same result. The duplicates retain the quality order (best remaining
/// first) for stable reporting.
///
/// # Panics
///
/// Panics if `members` is empty; clusters always contain at least one record.
pub fn select(mut members: Vec<ImageRecord>) -> DuplicateGroup {
    assert!(!members.is_empty(), "cluster must have at least one member");

    members.sort_by(quality_order);
    let kept = members.remove(0);

    DuplicateGroup {
        kept,
        duplicates: members,
    }
}
