//! Per-window cascade evaluation
//!
//! Feature values are weighted rectangle sums over the integral image,
//! scaled to the current window and normalized by the window's local
//! contrast, which makes the comparison against trained node thresholds
//! invariant to brightness and lighting. Stages run strictly in order and
//! a window is rejected at the first failing stage; cheap early stages
//! discard the vast majority of windows before the expensive ones run.

use crate::cascade::model::{Branch, CascadeModel, Feature, Stage, Tree};
use crate::models::{IntegralImage, IntegralPair, Window};

/// Normalization terms shared by every feature of one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    inv_area: f64,
    variance_norm: f64,
}

impl WindowStats {
    /// Measure a window's area and local contrast
    ///
    /// `variance_norm` is the standard deviation of the window's pixels,
    /// clamped to 1 when the variance is at most 1 so near-flat windows
    /// normalize to unity instead of dividing by almost zero. The window
    /// must have non-zero area and lie inside the image.
    pub fn measure(integral: &IntegralPair, window: &Window) -> Self {
        debug_assert!(window.width > 0 && window.height > 0);
        let inv_area = 1.0 / (window.width * window.height) as f64;
        let sum = integral
            .values
            .rect_sum(window.x, window.y, window.width, window.height) as f64;
        let sq_sum = integral
            .squares
            .rect_sum(window.x, window.y, window.width, window.height) as f64;
        let mean = sum * inv_area;
        let variance = sq_sum * inv_area - mean * mean;
        let variance_norm = if variance > 1.0 { variance.sqrt() } else { 1.0 };
        Self {
            inv_area,
            variance_norm,
        }
    }

    /// Reciprocal of the window area in pixels
    pub fn inv_area(&self) -> f64 {
        self.inv_area
    }

    /// Local contrast normalization factor
    pub fn variance_norm(&self) -> f64 {
        self.variance_norm
    }
}

/// Outcome of running the full cascade on one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// Every stage passed
    Accept,
    /// Evaluation stopped at the first failing stage
    Reject {
        /// Index of the failing stage; later stages were never evaluated
        stage: usize,
    },
}

impl WindowDecision {
    /// True if every stage passed
    pub fn is_accept(&self) -> bool {
        matches!(self, WindowDecision::Accept)
    }

    /// Number of stages that were evaluated before the decision
    pub fn stages_evaluated(&self, stage_count: usize) -> usize {
        match self {
            WindowDecision::Accept => stage_count,
            WindowDecision::Reject { stage } => stage + 1,
        }
    }
}

impl Feature {
    /// Weighted rectangle sum at a window origin and scale
    ///
    /// Each rectangle's offset and size are scaled by truncation and
    /// anchored at `(ox, oy)`; validation against the canonical window
    /// guarantees the scaled rectangles never leave the image.
    pub fn sum_at(&self, values: &IntegralImage, ox: usize, oy: usize, scale: f64) -> f64 {
        let mut total = 0.0;
        for r in &self.rects {
            let rx = ox + (r.x as f64 * scale) as usize;
            let ry = oy + (r.y as f64 * scale) as usize;
            let rw = (r.width as f64 * scale) as usize;
            let rh = (r.height as f64 * scale) as usize;
            total += r.weight * values.rect_sum(rx, ry, rw, rh) as f64;
        }
        total
    }
}

impl Tree {
    /// Walk the decision tree for one window, returning the leaf value
    ///
    /// Starts at node 0; at each node the normalized feature value picks
    /// the below or at-or-above branch until a leaf terminates the walk.
    pub fn evaluate(&self, integral: &IntegralPair, window: &Window, stats: &WindowStats) -> f64 {
        let nodes = self.nodes();
        let mut idx = 0;
        loop {
            let node = &nodes[idx];
            let feature_sum = node.feature.sum_at(&integral.values, window.x, window.y, window.scale);
            let branch = if feature_sum * stats.inv_area() < node.threshold * stats.variance_norm() {
                &node.left
            } else {
                &node.right
            };
            match *branch {
                Branch::Leaf(value) => return value,
                Branch::Child(child) => idx = child,
            }
        }
    }
}

impl Stage {
    /// Sum of all tree outputs for one window
    pub fn evaluate(&self, integral: &IntegralPair, window: &Window, stats: &WindowStats) -> f64 {
        self.trees()
            .iter()
            .map(|tree| tree.evaluate(integral, window, stats))
            .sum()
    }
}

impl CascadeModel {
    /// Run all stages on one window, in order, stopping at the first
    /// failure
    pub fn evaluate_window(&self, integral: &IntegralPair, window: &Window) -> WindowDecision {
        let stats = WindowStats::measure(integral, window);
        for (idx, stage) in self.stages().iter().enumerate() {
            if stage.evaluate(integral, window, &stats) < stage.threshold() {
                return WindowDecision::Reject { stage: idx };
            }
        }
        WindowDecision::Accept
    }
}
