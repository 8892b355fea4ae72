//! Shared helpers for generating synthetic test images.

use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Luma};
use std::path::Path;

fn next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

/// Generate a blocky pseudo-random image from a seed.
///
/// The image is a 9x8 grid of solid blocks whose luminance follows a random
/// walk over four well-separated levels, so horizontally adjacent blocks
/// always differ by at least 70 grays. That makes the dHash of the image a
/// seed-determined bit pattern that is stable under downscaling and JPEG
/// recompression, while different seeds produce structurally different
/// images.
pub fn patterned_image(seed: u64, width: u32, height: u32) -> DynamicImage {
    const COLS: u32 = 9;
    const ROWS: u32 = 8;
    const LEVELS: [u8; 4] = [40, 110, 180, 250];

    let mut state = seed.wrapping_add(1);
    let mut grid = [[0u8; COLS as usize]; ROWS as usize];
    for row in grid.iter_mut() {
        let mut level = (next(&mut state) % 4) as usize;
        row[0] = LEVELS[level];
        for cell in row.iter_mut().skip(1) {
            // Always step one level, reflecting at the ends
            let up = next(&mut state) & 1 == 1;
            level = match (level, up) {
                (3, true) => 2,
                (0, false) => 1,
                (l, true) => l + 1,
                (l, false) => l - 1,
            };
            *cell = LEVELS[level];
        }
    }

    let buf = ImageBuffer::from_fn(width, height, |x, y| {
        let bx = (x * COLS / width).min(COLS - 1) as usize;
        let by = (y * ROWS / height).min(ROWS - 1) as usize;
        Luma([grid[by][bx]])
    });
    DynamicImage::ImageLuma8(buf)
}

/// Save an image to `path`, format chosen from the extension
pub fn save_image(img: &DynamicImage, path: &Path) {
    img.save(path).unwrap();
}

/// Write a downscaled copy of `img` to `path`
pub fn save_downscaled(img: &DynamicImage, path: &Path, width: u32, height: u32) {
    let small = img.resize_exact(width, height, FilterType::Lanczos3);
    small.save(path).unwrap();
}
