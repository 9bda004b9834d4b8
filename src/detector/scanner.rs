//! Multiscale sliding-window search
//!
//! [`ScanGrid`] enumerates candidate windows as a lazy, finite,
//! restartable sequence: the outer axis grows the scale multiplicatively,
//! the middle axis advances y and the inner axis advances x by a
//! scale-proportional step. Enumeration is decoupled from evaluation, so
//! the same grid can feed the serial scan, the instrumented scan or the
//! per-scale parallel fan-out. Scan order is deterministic and every
//! window is visited exactly once.

use rayon::prelude::*;

use crate::DetectionTelemetry;
use crate::cascade::CascadeModel;
use crate::models::{IntegralPair, Rect, Window};

/// Window enumeration plan for one image and cascade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanGrid {
    image_width: usize,
    image_height: usize,
    window_width: usize,
    window_height: usize,
    scale_factor: f64,
    step_base: f64,
}

/// One scale level of the search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePlan {
    /// Scale factor relative to the canonical window
    pub scale: f64,
    /// Window width at this scale, `round(scale * canonical width)`
    pub window_width: usize,
    /// Window height at this scale, `round(scale * canonical height)`
    pub window_height: usize,
    /// Spatial step at this scale, `round(scale * step base)`, at least 1
    pub step: usize,
}

impl ScanGrid {
    /// Plan a search over an image for a cascade's canonical window size
    ///
    /// `scale_factor` multiplies the scale each level (default 1.25) and
    /// `step_base` sizes the spatial stride (default 2.4); the sweep runs
    /// while the scaled window is smaller than the image in both
    /// dimensions, so it always terminates.
    pub fn new(
        image_width: usize,
        image_height: usize,
        window_width: usize,
        window_height: usize,
        scale_factor: f64,
        step_base: f64,
    ) -> Self {
        Self {
            image_width,
            image_height,
            window_width,
            window_height,
            scale_factor,
            step_base,
        }
    }

    /// Iterate the scale levels of the sweep
    pub fn scales(&self) -> ScaleIter<'_> {
        ScaleIter {
            grid: self,
            scale: 1.0,
        }
    }

    /// Iterate every candidate window in scan order
    ///
    /// Outer: scale ascending. Middle: y. Inner: x. Each call returns a
    /// fresh iterator over the full sequence.
    pub fn windows(&self) -> WindowIter<'_> {
        WindowIter {
            grid: self,
            scales: self.scales(),
            plan: None,
            x: 0,
            y: 0,
        }
    }
}

/// Lazy iterator over the scale levels of a [`ScanGrid`]
#[derive(Debug, Clone)]
pub struct ScaleIter<'a> {
    grid: &'a ScanGrid,
    scale: f64,
}

impl Iterator for ScaleIter<'_> {
    type Item = ScalePlan;

    fn next(&mut self) -> Option<ScalePlan> {
        let scale = self.scale;
        let window_width = (scale * self.grid.window_width as f64).round() as usize;
        let window_height = (scale * self.grid.window_height as f64).round() as usize;
        if window_width >= self.grid.image_width || window_height >= self.grid.image_height {
            return None;
        }
        let step = ((scale * self.grid.step_base).round() as usize).max(1);
        self.scale = scale * self.grid.scale_factor;
        Some(ScalePlan {
            scale,
            window_width,
            window_height,
            step,
        })
    }
}

/// Lazy iterator over every candidate window of a [`ScanGrid`]
#[derive(Debug, Clone)]
pub struct WindowIter<'a> {
    grid: &'a ScanGrid,
    scales: ScaleIter<'a>,
    plan: Option<ScalePlan>,
    x: usize,
    y: usize,
}

impl Iterator for WindowIter<'_> {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        loop {
            match self.plan {
                None => {
                    self.plan = Some(self.scales.next()?);
                    self.x = 0;
                    self.y = 0;
                }
                Some(plan) => {
                    let max_x = self.grid.image_width - plan.window_width;
                    let max_y = self.grid.image_height - plan.window_height;
                    if self.y > max_y {
                        self.plan = None;
                        continue;
                    }
                    let window = Window {
                        x: self.x,
                        y: self.y,
                        width: plan.window_width,
                        height: plan.window_height,
                        scale: plan.scale,
                    };
                    if self.x + plan.step > max_x {
                        self.x = 0;
                        self.y += plan.step;
                    } else {
                        self.x += plan.step;
                    }
                    return Some(window);
                }
            }
        }
    }
}

/// Run the cascade over every window, collecting raw detections in scan
/// order
pub fn scan(cascade: &CascadeModel, integral: &IntegralPair, grid: &ScanGrid) -> Vec<Rect> {
    grid.windows()
        .filter(|window| cascade.evaluate_window(integral, window).is_accept())
        .map(|window| window.to_rect())
        .collect()
}

/// Like [`scan`], but counts scales, windows and evaluated stages
pub fn scan_with_telemetry(
    cascade: &CascadeModel,
    integral: &IntegralPair,
    grid: &ScanGrid,
) -> (Vec<Rect>, DetectionTelemetry) {
    let mut telemetry = DetectionTelemetry::default();
    let stage_count = cascade.stages().len();
    let mut raw = Vec::new();

    telemetry.scales = grid.scales().count();
    for window in grid.windows() {
        telemetry.windows += 1;
        let decision = cascade.evaluate_window(integral, &window);
        telemetry.stages_evaluated += decision.stages_evaluated(stage_count);
        if decision.is_accept() {
            raw.push(window.to_rect());
        }
    }
    telemetry.raw_detections = raw.len();

    (raw, telemetry)
}

/// Run the cascade with scale levels fanned out across worker threads
///
/// Each scale is scanned independently and the per-scale results are
/// concatenated in scale order, so the output matches [`scan`] exactly
/// and the downstream merge sees a stable candidate order.
pub fn scan_parallel(cascade: &CascadeModel, integral: &IntegralPair, grid: &ScanGrid) -> Vec<Rect> {
    let plans: Vec<ScalePlan> = grid.scales().collect();
    plans
        .par_iter()
        .map(|plan| {
            let mut hits = Vec::new();
            let max_x = grid.image_width - plan.window_width;
            let max_y = grid.image_height - plan.window_height;
            let mut y = 0;
            while y <= max_y {
                let mut x = 0;
                while x <= max_x {
                    let window = Window {
                        x,
                        y,
                        width: plan.window_width,
                        height: plan.window_height,
                        scale: plan.scale,
                    };
                    if cascade.evaluate_window(integral, &window).is_accept() {
                        hits.push(window.to_rect());
                    }
                    x += plan.step;
                }
                y += plan.step;
            }
            hits
        })
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GrayImage;

    fn grid_200() -> ScanGrid {
        ScanGrid::new(200, 200, 20, 20, 1.25, 2.4)
    }

    #[test]
    fn test_scale_sweep_terminates() {
        // 20 * 1.25^10 = 186 < 200, 20 * 1.25^11 = 233 >= 200
        let scales: Vec<ScalePlan> = grid_200().scales().collect();
        assert_eq!(scales.len(), 11);
        assert!(scales.len() <= 30);
        assert_eq!(scales[0].window_width, 20);
        assert_eq!(scales[0].step, 2);
        assert!(scales.last().unwrap().window_width < 200);
    }

    #[test]
    fn test_window_for_image_not_larger_than_window_yields_nothing() {
        let grid = ScanGrid::new(20, 20, 20, 20, 1.25, 2.4);
        assert_eq!(grid.windows().count(), 0);

        let grid = ScanGrid::new(10, 10, 20, 20, 1.25, 2.4);
        assert_eq!(grid.windows().count(), 0);
    }

    #[test]
    fn test_windows_stay_inside_image() {
        for window in grid_200().windows() {
            assert!(window.x + window.width <= 200);
            assert!(window.y + window.height <= 200);
        }
    }

    #[test]
    fn test_windows_are_unique_and_ordered() {
        let windows: Vec<Window> = grid_200().windows().collect();
        for pair in windows.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            // Scale ascending, then y, then x
            let key = |w: &Window| (w.width, w.y, w.x);
            assert!(key(a) < key(b), "windows out of order: {a:?} then {b:?}");
        }
    }

    #[test]
    fn test_window_iterator_is_restartable() {
        let grid = grid_200();
        let first: Vec<Window> = grid.windows().collect();
        let second: Vec<Window> = grid.windows().collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_step_grows_with_scale() {
        let scales: Vec<ScalePlan> = ScanGrid::new(1000, 1000, 24, 24, 1.25, 2.4)
            .scales()
            .collect();
        assert!(scales.first().unwrap().step < scales.last().unwrap().step);
        assert!(scales.iter().all(|p| p.step >= 1));
    }

    #[test]
    fn test_parallel_scan_matches_serial() {
        // Accept-everything cascade: leaf 1.0 on both branches, stage
        // threshold 0.0
        use crate::cascade::def::{CascadeDef, FeatureRectDef, NodeDef, StageDef, TreeDef};

        let def = CascadeDef {
            window_width: 8,
            window_height: 8,
            stages: vec![StageDef {
                threshold: 0.0,
                trees: vec![TreeDef {
                    nodes: vec![NodeDef {
                        rects: vec![FeatureRectDef {
                            x: 0,
                            y: 0,
                            width: 4,
                            height: 4,
                            weight: 1.0,
                        }],
                        threshold: 0.0,
                        left_value: Some(1.0),
                        left_node: None,
                        right_value: Some(1.0),
                        right_node: None,
                    }],
                }],
            }],
        };
        let cascade = CascadeModel::build(&def).unwrap();
        let data: Vec<u8> = (0..40 * 30).map(|i| (i * 13 % 240) as u8).collect();
        let image = GrayImage::from_raw(40, 30, data).unwrap();
        let integral = IntegralPair::build(&image).unwrap();
        let grid = ScanGrid::new(40, 30, 8, 8, 1.25, 2.4);

        let serial = scan(&cascade, &integral, &grid);
        let parallel = scan_parallel(&cascade, &integral, &grid);
        assert!(!serial.is_empty());
        assert_eq!(serial, parallel);
    }
}
