//! Error types for input validation and cascade construction
//!
//! Both enums fail fast: inputs and models are checked once, before the
//! scan loop starts, so a long detection run never aborts halfway through.

use thiserror::Error;

/// Errors raised while validating image input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// Image width or height is zero
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions {
        /// Stated width in pixels
        width: usize,
        /// Stated height in pixels
        height: usize,
    },
    /// Pixel buffer does not hold `width * height` samples
    #[error("pixel buffer holds {actual} samples, expected {expected} for {width}x{height}")]
    PixelLengthMismatch {
        /// Stated width in pixels
        width: usize,
        /// Stated height in pixels
        height: usize,
        /// Samples required by the stated dimensions
        expected: usize,
        /// Samples actually provided
        actual: usize,
    },
}

/// Errors raised while building a [`CascadeModel`](crate::CascadeModel)
/// from a parsed description
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CascadeError {
    /// Canonical window width or height is zero
    #[error("canonical window size must be non-zero, got {width}x{height}")]
    EmptyWindow {
        /// Canonical window width
        width: usize,
        /// Canonical window height
        height: usize,
    },
    /// The description carries no stages
    #[error("cascade has no stages")]
    NoStages,
    /// A tree has no nodes, so there is no root to start traversal at
    #[error("stage {stage}, tree {tree}: tree has no nodes")]
    EmptyTree {
        /// Stage index in the cascade
        stage: usize,
        /// Tree index within the stage
        tree: usize,
    },
    /// A feature carries no rectangles or more than three
    #[error("stage {stage}, tree {tree}, node {node}: feature needs 1-3 rectangles, got {count}")]
    BadRectCount {
        /// Stage index in the cascade
        stage: usize,
        /// Tree index within the stage
        tree: usize,
        /// Node index within the tree
        node: usize,
        /// Number of rectangles in the description
        count: usize,
    },
    /// A feature rectangle reaches outside the canonical window
    #[error(
        "stage {stage}, tree {tree}, node {node}: rectangle {rect} reaches outside the canonical window"
    )]
    RectOutsideWindow {
        /// Stage index in the cascade
        stage: usize,
        /// Tree index within the stage
        tree: usize,
        /// Node index within the tree
        node: usize,
        /// Rectangle index within the feature
        rect: usize,
    },
    /// A branch carries neither a leaf value nor a child index
    #[error("stage {stage}, tree {tree}, node {node}: {side} branch carries neither value nor child")]
    MissingBranch {
        /// Stage index in the cascade
        stage: usize,
        /// Tree index within the stage
        tree: usize,
        /// Node index within the tree
        node: usize,
        /// `"left"` or `"right"`
        side: &'static str,
    },
    /// A branch carries both a leaf value and a child index
    #[error("stage {stage}, tree {tree}, node {node}: {side} branch carries both value and child")]
    AmbiguousBranch {
        /// Stage index in the cascade
        stage: usize,
        /// Tree index within the stage
        tree: usize,
        /// Node index within the tree
        node: usize,
        /// `"left"` or `"right"`
        side: &'static str,
    },
    /// A branch references a node index outside the tree
    #[error(
        "stage {stage}, tree {tree}, node {node}: child index {child} out of range ({nodes} nodes)"
    )]
    ChildOutOfRange {
        /// Stage index in the cascade
        stage: usize,
        /// Tree index within the stage
        tree: usize,
        /// Node index within the tree
        node: usize,
        /// Offending child reference
        child: usize,
        /// Number of nodes in the tree
        nodes: usize,
    },
    /// Node references form a cycle, detected by a bounded-depth walk
    #[error("stage {stage}, tree {tree}: node references form a cycle")]
    NodeCycle {
        /// Stage index in the cascade
        stage: usize,
        /// Tree index within the stage
        tree: usize,
    },
}
