//! Detection search and postprocessing
//!
//! This module drives the multiscale sliding-window search and collapses
//! the raw hits into the final detection set:
//! - Window enumeration over scales and positions (lazy iterators)
//! - Scan drivers (serial, instrumented, rayon-parallel)
//! - Overlap merging of raw detections

/// Overlap merging of raw detections
pub mod merge;
/// Multiscale window enumeration and scan drivers
pub mod scanner;

pub use merge::merge_detections;
pub use scanner::{ScaleIter, ScalePlan, ScanGrid, WindowIter};
