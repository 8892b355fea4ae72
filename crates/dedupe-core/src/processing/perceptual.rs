//! # Perceptual Hashing
//!
//! Difference hash (dHash) implementation used to fingerprint images for
//! similarity comparison.
//!
//! The hash is deliberately coarse: it survives recompression and resizing
//! while remaining sensitive to structural changes. The goal is high recall
//! on near-duplicates, not cryptographic uniqueness.
//!
//! ## Hamming Distance Interpretation
//!
//! - 0: identical pixel content
//! - 1-5: very similar (recompressed or rescaled copies)
//! - 6-10: similar subject, moderate differences
//! - >10: different images

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// A 64-bit difference hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dhash(pub u64);

impl Dhash {
    /// Calculate the Hamming distance between two hashes
    pub fn distance(&self, other: &Dhash) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Check if two hashes are within a similarity threshold
    pub fn is_similar(&self, other: &Dhash, threshold: u32) -> bool {
        self.distance(other) <= threshold
    }
}

/// Calculate the 64-bit dHash of an image.
///
/// The image is downsampled to a 9x8 luminance grid so each of the 8 rows
/// yields 8 horizontally adjacent sample pairs. Bit `y * 8 + x` is set when
/// the sample at column `x` is brighter than the one at column `x + 1` in
/// row `y`, so bit 0 is the leftmost comparison of the top row.
pub fn dhash(img: &DynamicImage) -> Dhash {
    let small = img.resize_exact(9, 8, FilterType::Lanczos3);
    let gray = small.to_luma8();

    let mut hash: u64 = 0;
    for y in 0..8 {
        for x in 0..8 {
            let left = gray.get_pixel(x, y)[0];
            let right = gray.get_pixel(x + 1, y)[0];
            if left > right {
                hash |= 1 << (y * 8 + x);
            }
        }
    }

    Dhash(hash)
}
