//! Core data structures
//!
//! This module holds the owned grids and value types shared by the
//! detection pipeline:
//! - Pixel grids (grayscale luminance)
//! - Integral images (plain and squared summed-area tables)
//! - Detection rectangles

/// Owned grayscale pixel grids
pub mod grid;
/// Summed-area tables and the rectangle-sum query
pub mod integral;
/// Detection rectangles and candidate windows
pub mod rect;

pub use grid::GrayImage;
pub use integral::{IntegralImage, IntegralPair};
pub use rect::{Rect, Window};
