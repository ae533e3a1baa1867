//! 2D geometry engine
//!
//! Points, bounding rectangles, circular arcs and paths. Paths detect runs of
//! points that look like sampled arcs so they can be emitted as arc moves, and
//! closed paths can be offset for tool compensation.

pub mod arc;
pub mod offset;
pub mod path;
pub mod rect;
pub mod vector;

pub use arc::{arc_to_points, bulge_to_arc, Arc};
pub use path::{BulgePoint, Path, Walk, Waypoint};
pub use rect::Rect2;
pub use vector::{closest_point_on_segment, Point2};
