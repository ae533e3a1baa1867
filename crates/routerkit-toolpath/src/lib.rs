//! # RouterKit Toolpath
//!
//! From nested parts to instruction trees:
//!
//! - `geometry`: points, arcs and paths, arc detection, offsetting and walking
//! - `nest`: the nesting engine's sheet and part model
//! - `toolpath`: per-operation toolpath strategies
//! - `emit`: lowering toolpaths into the instruction tree for a router

pub mod emit;
pub mod geometry;
pub mod nest;
pub mod toolpath;

pub use emit::Emitter;
pub use geometry::{
    arc_to_points, bulge_to_arc, Arc, BulgePoint, Path, Point2, Rect2, Walk, Waypoint,
};
pub use nest::{ArcGeometry, ChainGeometry, Feature, Nest, Part, PartGeometry, Sheet};
pub use toolpath::{
    ramp_length, GroupFailure, OperationKind, PartCategory, SheetToolpath, Toolpath,
    ToolpathGenerator, ToolpathOperation, ToolpathSegment, ToolpathSegmentType,
};
