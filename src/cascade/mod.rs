//! Cascade model and per-window evaluation
//!
//! This module contains the classifier side of the pipeline:
//! - Plain-data cascade description as produced by an external parser
//! - Validated immutable model (stages, trees, tagged branch nodes)
//! - Feature, tree, stage and full-cascade evaluation over integral images

/// Plain-data cascade description from an external parser
pub mod def;
/// Feature, tree, stage and cascade evaluation
pub mod eval;
/// Validated immutable cascade model
pub mod model;

pub use def::{CascadeDef, FeatureRectDef, NodeDef, StageDef, TreeDef};
pub use eval::{WindowDecision, WindowStats};
pub use model::{Branch, CascadeModel, Feature, FeatureRect, Node, Stage, Tree};
