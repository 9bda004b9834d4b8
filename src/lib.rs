//! RustHaar - Haar cascade object detection in pure Rust
//!
//! A pure Rust sliding-window detector for pre-trained Haar cascade
//! models: integral-image construction, per-window feature evaluation
//! with variance normalization, ordered early-exit stage evaluation,
//! multiscale window search and overlap merging.
//!
//! ```no_run
//! use rust_haar::{CascadeDef, CascadeModel, Detector, GrayImage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("cascades/frontalface.json")?;
//! let def: CascadeDef = serde_json::from_str(&json)?;
//! let detector = Detector::new(CascadeModel::build(&def)?);
//!
//! let image = GrayImage::from_raw(640, 480, vec![0u8; 640 * 480])?;
//! for face in detector.detect(&image)? {
//!     println!("{} {} {} {}", face.x, face.y, face.width, face.height);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Cascade model, description ingestion and per-window evaluation
pub mod cascade;
/// Window enumeration, scan drivers and detection merging
pub mod detector;
/// Core data structures (GrayImage, IntegralPair, Rect, Window)
pub mod models;
/// Utility functions (grayscale conversion)
pub mod utils;

mod debug;
mod error;

pub use cascade::{
    Branch, CascadeDef, CascadeModel, Feature, FeatureRect, FeatureRectDef, Node, NodeDef, Stage,
    StageDef, Tree, TreeDef, WindowDecision, WindowStats,
};
pub use detector::{ScanGrid, merge_detections};
pub use error::{CascadeError, DetectError};
pub use models::{GrayImage, IntegralImage, IntegralPair, Rect, Window};

use detector::scanner;

/// Search parameters for a detection run
///
/// The defaults reproduce the classic sweep: scale grows by 1.25 per
/// level and the spatial step is 2.4 pixels scaled with the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorOptions {
    /// Multiplier applied to the scale at each level of the sweep
    pub scale_factor: f64,
    /// Base spatial step in pixels, multiplied by the current scale
    pub step_base: f64,
    /// Fan scale levels out across worker threads
    pub parallel: bool,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            scale_factor: 1.25,
            step_base: 2.4,
            parallel: false,
        }
    }
}

/// Stage-level counters collected by an instrumented detection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionTelemetry {
    /// Scale levels the sweep visited
    pub scales: usize,
    /// Candidate windows evaluated
    pub windows: usize,
    /// Total stages evaluated across all windows (early exits included)
    pub stages_evaluated: usize,
    /// Detections collected before merging
    pub raw_detections: usize,
    /// Detections remaining after merging
    pub merged_detections: usize,
}

/// Detect objects in a grayscale image
///
/// # Arguments
/// * `cascade` - Validated cascade model
/// * `gray` - Luminance bytes (1 byte per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Merged detection rectangles in scan order
pub fn detect(
    cascade: &CascadeModel,
    gray: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<Rect>, DetectError> {
    let image = GrayImage::from_raw(width, height, gray.to_vec())?;
    run(cascade, &image, &DetectorOptions::default())
}

/// Detect objects in an RGB image (3 bytes per pixel)
///
/// The image is reduced to luminance first; see
/// [`utils::grayscale`] for the channel weights.
pub fn detect_rgb(
    cascade: &CascadeModel,
    rgb: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<Rect>, DetectError> {
    let image = GrayImage::from_rgb(rgb, width, height)?;
    run(cascade, &image, &DetectorOptions::default())
}

fn run(
    cascade: &CascadeModel,
    image: &GrayImage,
    options: &DetectorOptions,
) -> Result<Vec<Rect>, DetectError> {
    let integral = IntegralPair::build(image)?;
    let grid = scan_grid(cascade, image, options);

    let raw = if options.parallel {
        scanner::scan_parallel(cascade, &integral, &grid)
    } else {
        scanner::scan(cascade, &integral, &grid)
    };
    let merged = merge_detections(&raw);

    if cfg!(debug_assertions) && debug::debug_enabled() {
        eprintln!(
            "DEBUG: {} raw detections, {} after merge",
            raw.len(),
            merged.len()
        );
    }

    Ok(merged)
}

fn scan_grid(cascade: &CascadeModel, image: &GrayImage, options: &DetectorOptions) -> ScanGrid {
    ScanGrid::new(
        image.width(),
        image.height(),
        cascade.window_width(),
        cascade.window_height(),
        options.scale_factor,
        options.step_base,
    )
}

/// Detector coupling a cascade model with search options
///
/// The model is loaded once and shared read-only across arbitrarily many
/// detection runs; each run owns its own integral images.
#[derive(Debug, Clone)]
pub struct Detector {
    cascade: CascadeModel,
    options: DetectorOptions,
}

impl Detector {
    /// Create a detector with default search options
    pub fn new(cascade: CascadeModel) -> Self {
        Self {
            cascade,
            options: DetectorOptions::default(),
        }
    }

    /// Create a detector with explicit search options
    pub fn with_options(cascade: CascadeModel, options: DetectorOptions) -> Self {
        Self { cascade, options }
    }

    /// The cascade model this detector runs
    pub fn cascade(&self) -> &CascadeModel {
        &self.cascade
    }

    /// Detect objects in a grayscale image
    ///
    /// Returns merged detection rectangles in scan order.
    pub fn detect(&self, image: &GrayImage) -> Result<Vec<Rect>, DetectError> {
        run(&self.cascade, image, &self.options)
    }

    /// Detect objects and return the raw, unmerged candidate list
    pub fn detect_raw(&self, image: &GrayImage) -> Result<Vec<Rect>, DetectError> {
        let integral = IntegralPair::build(image)?;
        let grid = scan_grid(&self.cascade, image, &self.options);
        Ok(if self.options.parallel {
            scanner::scan_parallel(&self.cascade, &integral, &grid)
        } else {
            scanner::scan(&self.cascade, &integral, &grid)
        })
    }

    /// Detect objects while collecting stage-level counters
    ///
    /// Always scans serially so the counters reflect the canonical
    /// ordered sweep.
    pub fn detect_with_telemetry(
        &self,
        image: &GrayImage,
    ) -> Result<(Vec<Rect>, DetectionTelemetry), DetectError> {
        let integral = IntegralPair::build(image)?;
        let grid = scan_grid(&self.cascade, image, &self.options);
        let (raw, mut telemetry) = scanner::scan_with_telemetry(&self.cascade, &integral, &grid);
        let merged = merge_detections(&raw);
        telemetry.merged_detections = merged.len();

        if cfg!(debug_assertions) && debug::debug_enabled() {
            eprintln!(
                "DEBUG: {} scales, {} windows, {} stage evaluations, {} raw, {} merged",
                telemetry.scales,
                telemetry.windows,
                telemetry.stages_evaluated,
                telemetry.raw_detections,
                telemetry.merged_detections
            );
        }

        Ok((merged, telemetry))
    }
}
