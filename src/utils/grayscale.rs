//! RGB/RGBA to luminance conversion
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, computed with fast integer
//! arithmetic: Y = (76*R + 150*G + 29*B) >> 8

use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8).min(255) as u8
}

/// Convert RGB image bytes (3 per pixel) to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];

    // Process 8 pixels at a time with manual unrolling
    let mut i = 0;
    while i + 8 <= pixel_count {
        for j in 0..8 {
            let idx = (i + j) * 3;
            gray[i + j] = luma(rgb[idx], rgb[idx + 1], rgb[idx + 2]);
        }
        i += 8;
    }
    for i in i..pixel_count {
        let idx = i * 3;
        gray[i] = luma(rgb[idx], rgb[idx + 1], rgb[idx + 2]);
    }

    gray
}

/// Convert RGBA image bytes (4 per pixel) to grayscale, ignoring alpha
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];

    let mut i = 0;
    while i + 8 <= pixel_count {
        for j in 0..8 {
            let idx = (i + j) * 4;
            gray[i + j] = luma(rgba[idx], rgba[idx + 1], rgba[idx + 2]);
        }
        i += 8;
    }
    for i in i..pixel_count {
        let idx = i * 4;
        gray[i] = luma(rgba[idx], rgba[idx + 1], rgba[idx + 2]);
    }

    gray
}

/// Convert RGB to grayscale using parallel processing
///
/// Processes rows in parallel for multi-core speedup on large frames.
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * 3;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * 3;
            *out = luma(rgb[idx], rgb[idx + 1], rgb[idx + 2]);
        }
    });

    gray
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        // Pure white
        let gray = rgb_to_grayscale(&[255, 255, 255], 1, 1);
        assert!(gray[0] >= 254);

        // Pure black
        let gray = rgb_to_grayscale(&[0, 0, 0], 1, 1);
        assert_eq!(gray[0], 0);

        // Green dominates red dominates blue
        let r = rgb_to_grayscale(&[255, 0, 0], 1, 1)[0];
        let g = rgb_to_grayscale(&[0, 255, 0], 1, 1)[0];
        let b = rgb_to_grayscale(&[0, 0, 255], 1, 1)[0];
        assert!(g > r && r > b);
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let opaque = rgba_to_grayscale(&[120, 80, 200, 255], 1, 1);
        let transparent = rgba_to_grayscale(&[120, 80, 200, 0], 1, 1);
        assert_eq!(opaque, transparent);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let rgb: Vec<u8> = (0..64 * 48 * 3).map(|i| (i % 256) as u8).collect();
        assert_eq!(
            rgb_to_grayscale(&rgb, 64, 48),
            rgb_to_grayscale_parallel(&rgb, 64, 48)
        );
    }
}
