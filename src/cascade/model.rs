//! Validated in-memory cascade model
//!
//! Built once from a [`CascadeDef`] and shared read-only across
//! arbitrarily many detection runs. Validation happens entirely here so
//! the evaluation hot path never has to re-check branch references or
//! rectangle bounds.

use crate::cascade::def::{CascadeDef, NodeDef, TreeDef};
use crate::error::CascadeError;

/// Immutable cascade: ordered stages over a canonical window size
///
/// Stage order matters: stages are evaluated in sequence and a window is
/// rejected at the first failing stage.
#[derive(Debug, Clone)]
pub struct CascadeModel {
    window_width: usize,
    window_height: usize,
    stages: Vec<Stage>,
}

/// A rejection threshold plus an ordered sequence of weak classifiers
#[derive(Debug, Clone)]
pub struct Stage {
    threshold: f64,
    trees: Vec<Tree>,
}

/// A binary decision tree, root at node index 0
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

/// One internal decision node
#[derive(Debug, Clone)]
pub struct Node {
    /// Haar feature evaluated at this node
    pub feature: Feature,
    /// Decision threshold the normalized feature value is compared to
    pub threshold: f64,
    /// Branch taken when the feature value falls below the threshold
    pub left: Branch,
    /// Branch taken otherwise
    pub right: Branch,
}

/// Branch of a decision node: terminal leaf or a reference to another node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Branch {
    /// Traversal ends, contributing this value to the tree total
    Leaf(f64),
    /// Traversal continues at the referenced node index
    Child(usize),
}

/// A small set of weighted rectangles forming one Haar feature
#[derive(Debug, Clone)]
pub struct Feature {
    /// Weighted rectangles, offsets relative to the canonical window
    pub rects: Vec<FeatureRect>,
}

/// One weighted rectangle of a feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRect {
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

impl CascadeModel {
    /// Build and validate a model from a parsed description
    ///
    /// Rejects descriptions with a degenerate window, no stages, empty
    /// trees, bad feature rectangles, branch slots that are empty or
    /// doubly filled, out-of-range child references, or cyclic node
    /// graphs.
    pub fn build(def: &CascadeDef) -> Result<Self, CascadeError> {
        if def.window_width == 0 || def.window_height == 0 {
            return Err(CascadeError::EmptyWindow {
                width: def.window_width,
                height: def.window_height,
            });
        }
        if def.stages.is_empty() {
            return Err(CascadeError::NoStages);
        }

        let mut stages = Vec::with_capacity(def.stages.len());
        for (stage_idx, stage_def) in def.stages.iter().enumerate() {
            let mut trees = Vec::with_capacity(stage_def.trees.len());
            for (tree_idx, tree_def) in stage_def.trees.iter().enumerate() {
                trees.push(build_tree(def, stage_idx, tree_idx, tree_def)?);
            }
            stages.push(Stage {
                threshold: stage_def.threshold,
                trees,
            });
        }

        Ok(Self {
            window_width: def.window_width,
            window_height: def.window_height,
            stages,
        })
    }

    /// Canonical training window width in pixels
    pub fn window_width(&self) -> usize {
        self.window_width
    }

    /// Canonical training window height in pixels
    pub fn window_height(&self) -> usize {
        self.window_height
    }

    /// Stages in evaluation order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

impl Stage {
    /// Score a window must reach for the stage to pass
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Weak classifiers contributing to the stage score
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }
}

impl Tree {
    /// Decision nodes; index 0 is the root
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

fn build_tree(
    def: &CascadeDef,
    stage: usize,
    tree: usize,
    tree_def: &TreeDef,
) -> Result<Tree, CascadeError> {
    if tree_def.nodes.is_empty() {
        return Err(CascadeError::EmptyTree { stage, tree });
    }

    let mut nodes = Vec::with_capacity(tree_def.nodes.len());
    for (node_idx, node_def) in tree_def.nodes.iter().enumerate() {
        nodes.push(build_node(def, stage, tree, node_idx, node_def, tree_def.nodes.len())?);
    }

    check_acyclic(&nodes, stage, tree)?;
    Ok(Tree { nodes })
}

fn build_node(
    def: &CascadeDef,
    stage: usize,
    tree: usize,
    node: usize,
    node_def: &NodeDef,
    node_count: usize,
) -> Result<Node, CascadeError> {
    let count = node_def.rects.len();
    if count == 0 || count > 3 {
        return Err(CascadeError::BadRectCount {
            stage,
            tree,
            node,
            count,
        });
    }

    let mut rects = Vec::with_capacity(count);
    for (rect_idx, r) in node_def.rects.iter().enumerate() {
        // Bounds against the canonical window keep every scaled integral
        // query inside the image, at every scale.
        if r.width == 0
            || r.height == 0
            || r.x + r.width > def.window_width
            || r.y + r.height > def.window_height
        {
            return Err(CascadeError::RectOutsideWindow {
                stage,
                tree,
                node,
                rect: rect_idx,
            });
        }
        rects.push(FeatureRect {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
            weight: r.weight,
        });
    }

    let left = build_branch(
        node_def.left_value,
        node_def.left_node,
        node_count,
        stage,
        tree,
        node,
        "left",
    )?;
    let right = build_branch(
        node_def.right_value,
        node_def.right_node,
        node_count,
        stage,
        tree,
        node,
        "right",
    )?;

    Ok(Node {
        feature: Feature { rects },
        threshold: node_def.threshold,
        left,
        right,
    })
}

fn build_branch(
    value: Option<f64>,
    child: Option<usize>,
    node_count: usize,
    stage: usize,
    tree: usize,
    node: usize,
    side: &'static str,
) -> Result<Branch, CascadeError> {
    match (value, child) {
        (Some(v), None) => Ok(Branch::Leaf(v)),
        (None, Some(idx)) => {
            if idx >= node_count {
                return Err(CascadeError::ChildOutOfRange {
                    stage,
                    tree,
                    node,
                    child: idx,
                    nodes: node_count,
                });
            }
            Ok(Branch::Child(idx))
        }
        (None, None) => Err(CascadeError::MissingBranch {
            stage,
            tree,
            node,
            side,
        }),
        (Some(_), Some(_)) => Err(CascadeError::AmbiguousBranch {
            stage,
            tree,
            node,
            side,
        }),
    }
}

/// Depth-first walk from the root, bounded to one visit per node.
/// Reaching a node that is already on the current path means the
/// references form a cycle.
fn check_acyclic(nodes: &[Node], stage: usize, tree: usize) -> Result<(), CascadeError> {
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    fn walk(nodes: &[Node], idx: usize, state: &mut [u8]) -> bool {
        match state[idx] {
            ON_PATH => return false,
            DONE => return true,
            _ => {}
        }
        state[idx] = ON_PATH;
        let node = &nodes[idx];
        for branch in [&node.left, &node.right] {
            if let Branch::Child(child) = branch {
                if !walk(nodes, *child, state) {
                    return false;
                }
            }
        }
        state[idx] = DONE;
        true
    }

    let mut state = vec![0u8; nodes.len()];
    if walk(nodes, 0, &mut state) {
        Ok(())
    } else {
        Err(CascadeError::NodeCycle { stage, tree })
    }
}
