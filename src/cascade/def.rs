//! Plain-data cascade description
//!
//! The shape a cascade document has after an external parser has read it:
//! a canonical window size and a sequence of stages, each stage a
//! threshold plus a sequence of trees, each tree a flat node list. Branch
//! slots keep the on-disk convention of "either a terminal value or a
//! node reference" as two optional fields; building a
//! [`CascadeModel`](crate::CascadeModel) turns them into explicit tagged
//! branches and rejects descriptions where a slot is empty or doubly
//! filled. The core depends only on this logical shape, not on any
//! serialization syntax.

use serde::{Deserialize, Serialize};

/// Parsed cascade document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeDef {
    /// Canonical training window width in pixels
    pub window_width: usize,
    /// Canonical training window height in pixels
    pub window_height: usize,
    /// Stages in evaluation order
    pub stages: Vec<StageDef>,
}

/// One stage: a rejection threshold and its weak classifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDef {
    /// Stage passes iff the summed tree outputs reach this threshold
    pub threshold: f64,
    /// Weak classifiers contributing to the stage score
    pub trees: Vec<TreeDef>,
}

/// One weak classifier: a flat list of decision nodes, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDef {
    /// Decision nodes; branch references index into this list
    pub nodes: Vec<NodeDef>,
}

/// One decision node with its feature and two branch slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    /// Weighted rectangles of the Haar feature
    pub rects: Vec<FeatureRectDef>,
    /// Decision threshold the normalized feature value is compared to
    pub threshold: f64,
    /// Terminal value of the below-threshold branch, if it is a leaf
    #[serde(default)]
    pub left_value: Option<f64>,
    /// Node index of the below-threshold branch, if it continues
    #[serde(default)]
    pub left_node: Option<usize>,
    /// Terminal value of the at-or-above branch, if it is a leaf
    #[serde(default)]
    pub right_value: Option<f64>,
    /// Node index of the at-or-above branch, if it continues
    #[serde(default)]
    pub right_node: Option<usize>,
}

/// One weighted rectangle, offsets relative to the canonical window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRectDef {
    /// Horizontal offset inside the window
    pub x: usize,
    /// Vertical offset inside the window
    pub y: usize,
    /// Rectangle width
    pub width: usize,
    /// Rectangle height
    pub height: usize,
    /// Signed weight applied to the rectangle's pixel sum
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_slots_default_to_empty() {
        let json = r#"{
            "rects": [{"x": 0, "y": 0, "width": 2, "height": 2, "weight": 1.0}],
            "threshold": 0.5,
            "left_value": -1.0,
            "right_node": 1
        }"#;
        let node: NodeDef = serde_json::from_str(json).unwrap();
        assert_eq!(node.left_value, Some(-1.0));
        assert_eq!(node.left_node, None);
        assert_eq!(node.right_value, None);
        assert_eq!(node.right_node, Some(1));
    }

    #[test]
    fn test_round_trip() {
        let def = CascadeDef {
            window_width: 20,
            window_height: 20,
            stages: vec![StageDef {
                threshold: -1.5,
                trees: vec![TreeDef {
                    nodes: vec![NodeDef {
                        rects: vec![FeatureRectDef {
                            x: 2,
                            y: 2,
                            width: 16,
                            height: 8,
                            weight: -1.0,
                        }],
                        threshold: 0.02,
                        left_value: Some(0.2),
                        left_node: None,
                        right_value: Some(-0.9),
                        right_node: None,
                    }],
                }],
            }],
        };
        let json = serde_json::to_string(&def).unwrap();
        let back: CascadeDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back.window_width, 20);
        assert_eq!(back.stages[0].trees[0].nodes[0].rects[0].weight, -1.0);
    }
}
