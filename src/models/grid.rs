use crate::error::DetectError;
use crate::utils::grayscale::{rgb_to_grayscale, rgba_to_grayscale};

/// Owned grayscale pixel grid
///
/// Luminance samples in row-major order, one byte per pixel. The grid is
/// immutable once built; the scanning session borrows it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImage {
    /// Build a grid from raw luminance samples
    ///
    /// Fails if either dimension is zero or if `data` does not hold
    /// exactly `width * height` samples.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DetectError> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(DetectError::PixelLengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid from raw RGB bytes (3 bytes per pixel)
    pub fn from_rgb(rgb: &[u8], width: usize, height: usize) -> Result<Self, DetectError> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        let expected = width * height * 3;
        if rgb.len() != expected {
            return Err(DetectError::PixelLengthMismatch {
                width,
                height,
                expected,
                actual: rgb.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data: rgb_to_grayscale(rgb, width, height),
        })
    }

    /// Build a grid from raw RGBA bytes (4 bytes per pixel, alpha ignored)
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> Result<Self, DetectError> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(DetectError::PixelLengthMismatch {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data: rgba_to_grayscale(rgba, width, height),
        })
    }

    /// Grid width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Luminance at (x, y); out-of-bounds coordinates read as 0
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y * self.width + x]
    }

    /// Raw samples in row-major order
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let img = GrayImage::from_raw(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert_eq!(img.get(2, 0), 3);
        assert_eq!(img.get(0, 1), 4);
        assert_eq!(img.get(9, 9), 0);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            GrayImage::from_raw(0, 10, vec![]),
            Err(DetectError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
        assert_eq!(
            GrayImage::from_raw(10, 0, vec![]),
            Err(DetectError::InvalidDimensions {
                width: 10,
                height: 0
            })
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = GrayImage::from_raw(4, 4, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            DetectError::PixelLengthMismatch {
                width: 4,
                height: 4,
                expected: 16,
                actual: 15,
            }
        );
    }

    #[test]
    fn test_from_rgb() {
        // 1x1 pure white collapses to (76 + 150 + 29) * 255 >> 8 = 254
        let img = GrayImage::from_rgb(&[255, 255, 255], 1, 1).unwrap();
        assert!(img.get(0, 0) >= 254);

        let err = GrayImage::from_rgb(&[255, 255], 1, 1).unwrap_err();
        assert!(matches!(err, DetectError::PixelLengthMismatch { .. }));
    }
}
