//! Overlap merging of raw detections
//!
//! A greedy, single-pass, order-dependent clustering: candidates arrive
//! in scan order and a candidate is dropped iff its center lies strictly
//! inside a rectangle that was already kept. This is not a score-based
//! non-maximum suppression; partially overlapping rectangles whose
//! centers stay outside each other both survive, and an earlier smaller
//! detection can absorb a later larger one. Known limitation, kept
//! as-is for compatibility with the trained-cascade ecosystem.

use crate::models::Rect;

/// Collapse overlapping raw detections into one representative per
/// cluster
///
/// Processes candidates in discovery order; the first candidate is always
/// kept. Running the merge on its own output changes nothing.
pub fn merge_detections(raw: &[Rect]) -> Vec<Rect> {
    let mut kept: Vec<Rect> = Vec::new();
    for candidate in raw {
        let (cx, cy) = candidate.center();
        let absorbed = kept.iter().any(|rect| rect.contains_interior(cx, cy));
        if !absorbed {
            kept.push(*candidate);
        }
    }
    kept
}
