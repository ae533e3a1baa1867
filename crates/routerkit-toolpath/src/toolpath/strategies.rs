//! Toolpath strategies per operation kind.

use super::{ramp_length, Instance, OperationKind, PartCategory, Shape, Toolpath, ToolpathOperation};
use crate::geometry::{Path, Point2, Rect2};
use routerkit_core::{Config, GeometryError, OperationRecord, Tool, ToolpathError};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Upper bound on concentric pocket rings per shape
const MAX_POCKET_RINGS: usize = 10_000;

/// Everything a strategy needs besides the geometry
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub record: &'a OperationRecord,
    pub tool: &'a Tool,
    pub kind: OperationKind,
    pub config: &'a Config,
}

impl Context<'_> {
    /// Signed tool compensation from the record's offset side
    pub fn compensation(&self) -> f64 {
        self.record.offset.compensation(self.tool.cut_diameter)
    }

    /// Final Z for an instance, raised by the onion skin when requested
    pub fn cut_z(&self, instance: &Instance<'_>, onion: bool) -> f64 {
        let depth = if instance.depth > 0.0 {
            instance.depth
        } else {
            self.record.cut_depth
        };
        let z = self.record.cut_height - depth;
        if onion {
            z + self.config.toolpath.onion_skin
        } else {
            z
        }
    }

    fn category(&self, instance: &Instance<'_>) -> PartCategory {
        PartCategory::classify(&instance.part.footprint(), &self.config.toolpath.categories)
    }
}

/// Dispatch to the strategy for the operation kind
pub fn run(
    context: &Context<'_>,
    instances: &[Instance<'_>],
    operation: &mut ToolpathOperation,
) -> Result<(), ToolpathError> {
    match context.kind {
        OperationKind::Cut
        | OperationKind::Rabbet
        | OperationKind::Groove
        | OperationKind::DadoBack
        | OperationKind::DrawBolts => route(context, instances, operation),
        OperationKind::Pocket => pocket(context, instances, operation),
        OperationKind::Drill | OperationKind::BlockDrillSystem | OperationKind::BlockDrillPilot => {
            drill(context, instances, operation);
            Ok(())
        }
    }
}

fn skip(operation: &mut ToolpathOperation, instance: &Instance<'_>, error: GeometryError) {
    warn!(
        operation = %operation.name,
        part = %instance.part.name,
        "skipping shape: {}",
        error
    );
    operation.diagnostics.push(error);
}

/// Sheet-space path of a chain or arc instance
fn instance_path(context: &Context<'_>, instance: &Instance<'_>) -> Result<Option<Path>, GeometryError> {
    let geometry = &context.config.geometry;
    match instance.shape {
        Shape::Chain(chain) => Ok(Some(instance.part.place_chain(chain, geometry))),
        Shape::Arc(arc) => {
            let arc = instance.part.place_arc(arc);
            let mut path = Path::new(arc.to_points(geometry.max_arc_segment_angle)?, false);
            path.derive_arcs(geometry);
            Ok(Some(path))
        }
        Shape::Point(_) => Ok(None),
    }
}

/// Routed contours along chains and arcs
fn route(
    context: &Context<'_>,
    instances: &[Instance<'_>],
    operation: &mut ToolpathOperation,
) -> Result<(), ToolpathError> {
    // Reject a bad ramp angle once for the whole group
    ramp_length(context.record.ramp, 1.0)?;

    for instance in instances {
        let path = match instance_path(context, instance) {
            Ok(Some(path)) if path.len() >= 2 => path,
            Ok(_) => {
                debug!(part = %instance.part.name, "nothing to route");
                continue;
            }
            Err(error) => {
                skip(operation, instance, error);
                continue;
            }
        };
        operation.diagnostics.extend_from_slice(path.diagnostics());

        let category = context.category(instance);
        let onion = context.kind == OperationKind::Cut && category.should_onion();
        let z = context.cut_z(instance, onion);

        let toolpaths = if path.is_closed() {
            contour_closed(context, &path, z, category)
        } else {
            Ok(vec![contour_open(context, &path, z)])
        };
        match toolpaths {
            Ok(toolpaths) => operation.toolpaths.extend(toolpaths),
            Err(ToolpathError::Geometry(error)) => skip(operation, instance, error),
            Err(error) => return Err(error),
        }
    }
    Ok(())
}

/// Compensated closed contour, one toolpath per loop the compensation leaves,
/// each ramped in along its loop when the record asks for it
pub fn contour_closed(
    context: &Context<'_>,
    path: &Path,
    z: f64,
    category: PartCategory,
) -> Result<Vec<Toolpath>, ToolpathError> {
    let compensation = context.compensation();
    let loops = if compensation != 0.0 {
        path.offset_all(compensation, true, &context.config.geometry)?
    } else {
        vec![path.clone()]
    };
    if loops.len() > 1 {
        debug!(operation = %context.record.name, loops = loops.len(), "compensation split the contour");
    }

    loops
        .into_iter()
        .map(|path| {
            let path = if category.should_down_cut() {
                path.reversed()
            } else {
                path
            };
            contour_loop(context, &path, z)
        })
        .collect()
}

fn contour_loop(context: &Context<'_>, path: &Path, z: f64) -> Result<Toolpath, ToolpathError> {
    let record = context.record;
    let start = *path.points().first().ok_or(GeometryError::EmptyPath)?;

    let mut toolpath = Toolpath::new(context.tool.cut_diameter, z);
    let top = record.cut_height;
    let ramp = ramp_length(record.ramp, top - z)?;

    if ramp > 0.0 {
        // Walk backwards from the start so the ramp ends exactly on it
        let behind = path.reversed();
        let mut waypoints: Vec<_> = behind.walk(start, ramp).collect();
        waypoints.reverse();
        let (first, last) = match (waypoints.first(), waypoints.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(GeometryError::EmptyPath.into()),
        };
        let span = first.distance - last.distance;

        toolpath.rapid_to(first.position, record.feed_height);
        toolpath.line_to(first.position, top, f64::from(record.plunge_rate));
        for waypoint in waypoints.iter().skip(1) {
            let t = if span > 0.0 {
                (first.distance - waypoint.distance) / span
            } else {
                1.0
            };
            toolpath.line_to(waypoint.position, top + (z - top) * t, f64::from(record.feed_rate));
        }
    } else {
        toolpath.rapid_to(start, record.feed_height);
        toolpath.line_to(start, z, f64::from(record.plunge_rate));
    }

    cut_along(&mut toolpath, path, z, f64::from(record.feed_rate));
    if path.points().last() != Some(&start) {
        toolpath.line_to(start, z, f64::from(record.feed_rate));
    }
    toolpath.rapid_to(start, record.feed_height);
    Ok(toolpath)
}

/// Open chains are cut on the line, plunging at the first point
pub fn contour_open(context: &Context<'_>, path: &Path, z: f64) -> Toolpath {
    let record = context.record;
    if context.compensation() != 0.0 {
        debug!(operation = %record.name, "open chain cut without compensation");
    }
    let mut toolpath = Toolpath::new(context.tool.cut_diameter, z);
    let points = path.points();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        toolpath.rapid_to(*first, record.feed_height);
        toolpath.line_to(*first, z, f64::from(record.plunge_rate));
        cut_along(&mut toolpath, path, z, f64::from(record.feed_rate));
        toolpath.rapid_to(*last, record.feed_height);
    }
    toolpath
}

/// Cut through every point of `path` from the current position at its
/// first point, replacing each valid detected arc run with one arc move.
pub fn cut_along(toolpath: &mut Toolpath, path: &Path, z: f64, feed_rate: f64) {
    let points = path.points();
    let arcs: HashMap<usize, _> = path
        .arcs()
        .iter()
        .filter(|arc| arc.is_valid() && arc.indices.len() >= 3)
        .map(|arc| (arc.indices.start, arc))
        .collect();

    let mut i = 0;
    while i + 1 < points.len() {
        match arcs.get(&i) {
            Some(arc) => {
                toolpath.arc_along(arc, z, feed_rate);
                i = arc.indices.end - 1;
            }
            None => {
                if toolpath.position() != Some(points[i + 1]) {
                    toolpath.line_to(points[i + 1], z, feed_rate);
                }
                i += 1;
            }
        }
    }
}

/// Drill hits: points, arc centres and the centres of chains
fn drill(context: &Context<'_>, instances: &[Instance<'_>], operation: &mut ToolpathOperation) {
    let record = context.record;
    for instance in instances {
        let part = instance.part;
        let hit = match instance.shape {
            Shape::Point(point) => Some(part.place(point)),
            Shape::Arc(arc) => Some(part.place(arc.position)),
            Shape::Chain(chain) => chain
                .points
                .iter()
                .map(|bp| part.place(bp.position()))
                .fold(None, |acc: Option<(Point2, Point2)>, p| match acc {
                    Some((min, max)) => Some((
                        Point2::new(min.x.min(p.x), min.y.min(p.y)),
                        Point2::new(max.x.max(p.x), max.y.max(p.y)),
                    )),
                    None => Some((p, p)),
                })
                .map(|(min, max)| min.lerp(max, 0.5)),
        };
        let Some(hit) = hit else {
            debug!(part = %part.name, "empty chain has no drill position");
            continue;
        };

        let z = context.cut_z(instance, false);
        let mut toolpath = Toolpath::new(context.tool.cut_diameter, z);
        toolpath.rapid_to(hit, record.feed_height);
        toolpath.drill_at(hit, z, f64::from(record.plunge_rate));
        operation.toolpaths.push(toolpath);
    }
}

/// Concentric rings stepping inwards until the shape is used up
fn pocket(
    context: &Context<'_>,
    instances: &[Instance<'_>],
    operation: &mut ToolpathOperation,
) -> Result<(), ToolpathError> {
    let record = context.record;
    let geometry = &context.config.geometry;
    let radius = context.tool.radius();
    let stepover = context.config.toolpath.pocket_stepover * context.tool.cut_diameter;

    for instance in instances {
        let path = match instance_path(context, instance) {
            Ok(Some(path)) if path.is_closed() && path.len() >= 3 => path,
            Ok(_) => {
                debug!(part = %instance.part.name, "pockets need a closed chain");
                continue;
            }
            Err(error) => {
                skip(operation, instance, error);
                continue;
            }
        };
        // Negative offsets shrink counter-clockwise rings
        let path = if path.signed_area() < 0.0 {
            path.reversed()
        } else {
            path
        };

        // Every loop of every step, outermost step first
        let mut rings = Vec::new();
        let mut delta = -radius;
        for _ in 0..MAX_POCKET_RINGS {
            match path.offset_all(delta, true, geometry) {
                Ok(loops) => rings.extend(loops),
                Err(GeometryError::OffsetCollapsed { .. }) => break,
                Err(error) => return Err(error.into()),
            }
            delta -= stepover;
        }
        if rings.is_empty() {
            skip(operation, instance, GeometryError::OffsetCollapsed { delta: -radius });
            continue;
        }

        let z = context.cut_z(instance, false);
        let feed = f64::from(record.feed_rate);
        let mut toolpath = Toolpath::new(context.tool.cut_diameter, z);
        let mut previous: Option<Rect2> = None;
        for ring in rings.iter().rev() {
            let (Some(start), Some(bounds)) = (ring.points().first().copied(), ring.bounds()) else {
                continue;
            };
            // Step out at depth only into a ring around the one just cut
            let stay_down = previous.is_some_and(|inner| encloses(&bounds, &inner));
            if stay_down {
                toolpath.line_to(start, z, feed);
            } else {
                if let Some(at) = toolpath.position() {
                    toolpath.rapid_to(at, record.feed_height);
                }
                toolpath.rapid_to(start, record.feed_height);
                toolpath.line_to(start, z, f64::from(record.plunge_rate));
            }
            cut_along(&mut toolpath, ring, z, feed);
            previous = Some(bounds);
        }
        if let Some(end) = toolpath.position() {
            toolpath.rapid_to(end, record.feed_height);
        }
        operation.toolpaths.push(toolpath);
    }
    Ok(())
}

fn encloses(outer: &Rect2, inner: &Rect2) -> bool {
    outer.contains(inner.position) && outer.contains(inner.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BulgePoint;
    use crate::nest::{ChainGeometry, Part};
    use crate::toolpath::ToolpathSegmentType;
    use routerkit_core::OffsetSide;

    fn square_chain(side: f64) -> ChainGeometry {
        ChainGeometry {
            points: vec![
                BulgePoint::new(0.0, 0.0, 0.0),
                BulgePoint::new(side, 0.0, 0.0),
                BulgePoint::new(side, side, 0.0),
                BulgePoint::new(0.0, side, 0.0),
            ],
            closed: true,
        }
    }

    /// Two 10 x 10 lobes joined by a 0.4 wide neck
    fn dumbbell_chain() -> ChainGeometry {
        let points = [
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.8),
            (11.0, 4.8),
            (11.0, 0.0),
            (21.0, 0.0),
            (21.0, 10.0),
            (11.0, 10.0),
            (11.0, 5.2),
            (10.0, 5.2),
            (10.0, 10.0),
            (0.0, 10.0),
        ];
        ChainGeometry {
            points: points.iter().map(|&(x, y)| BulgePoint::new(x, y, 0.0)).collect(),
            closed: true,
        }
    }

    fn record() -> OperationRecord {
        OperationRecord::new("PartCut", "cut", "T1")
            .with_rates(200, 50, 18000)
            .with_heights(0.75, 0.75, 1.5)
    }

    #[test]
    fn test_closed_contour_plunge() {
        let config = Config::default();
        let tool = Tool::new("T1", "Compression", 0.5);
        let record = record().with_offset(OffsetSide::Right);
        let context = Context {
            record: &record,
            tool: &tool,
            kind: OperationKind::Cut,
            config: &config,
        };
        let part = Part::new("Side", Point2::new(40.0, 40.0), Point2::ZERO);
        let path = part.place_chain(&square_chain(40.0), &config.geometry);

        let toolpaths = contour_closed(&context, &path, 0.0, PartCategory::Large).unwrap();
        assert_eq!(toolpaths.len(), 1);
        let segments = &toolpaths[0].segments;
        assert_eq!(segments[0].segment_type, ToolpathSegmentType::RapidMove);
        assert_eq!(segments[0].z, 1.5);
        assert_eq!(segments[1].z, 0.0);
        assert_eq!(segments[1].feed_rate, 50.0);
        assert_eq!(segments.last().unwrap().z, 1.5);

        // Cutter centre rides a quarter inch outside the part
        for s in &segments[1..segments.len() - 1] {
            let p = s.end;
            let inside = Point2::new(p.x.clamp(0.0, 40.0), p.y.clamp(0.0, 40.0));
            assert!((p.distance_to(inside) - 0.25).abs() < 1e-6);
        }
        // Rounded corners are emitted as arcs
        assert!(segments.iter().any(|s| s.segment_type == ToolpathSegmentType::ArcCCW));
    }

    #[test]
    fn test_down_cut_reverses_direction() {
        let config = Config::default();
        let tool = Tool::new("T1", "Compression", 0.5);
        let record = record();
        let context = Context {
            record: &record,
            tool: &tool,
            kind: OperationKind::Cut,
            config: &config,
        };
        let part = Part::new("Block", Point2::new(10.0, 10.0), Point2::ZERO);
        let path = part.place_chain(&square_chain(10.0), &config.geometry);

        let toolpath = contour_closed(&context, &path, 0.0, PartCategory::Tiny).unwrap().remove(0);
        let cut: Vec<Point2> = toolpath.segments[2..].iter().map(|s| s.end).collect();
        // Starts at the old last point and runs clockwise
        assert_eq!(toolpath.segments[1].end, Point2::new(0.0, 10.0));
        assert_eq!(cut[0], Point2::new(10.0, 10.0));
        assert_eq!(cut[1], Point2::new(10.0, 0.0));
    }

    #[test]
    fn test_ramp_descends_along_path() {
        let config = Config::default();
        let tool = Tool::new("T1", "Compression", 0.5);
        let record = record().with_ramp(45.0);
        let context = Context {
            record: &record,
            tool: &tool,
            kind: OperationKind::Cut,
            config: &config,
        };
        let part = Part::new("Side", Point2::new(40.0, 40.0), Point2::ZERO);
        let path = part.place_chain(&square_chain(40.0), &config.geometry);

        let toolpath = contour_closed(&context, &path, 0.0, PartCategory::Large).unwrap().remove(0);
        let segments = &toolpath.segments;
        // Ramp starts 0.75 behind the start on the closing edge
        assert!(segments[0].end.is_equal_approx(Point2::new(0.0, 0.75)));
        assert_eq!(segments[1].z, 0.75);
        assert_eq!(segments[2].end, Point2::new(0.0, 0.0));
        assert!(segments[2].z.abs() < 1e-12);
        assert_eq!(segments[3].end, Point2::new(40.0, 0.0));
    }

    #[test]
    fn test_split_contour_cuts_every_loop() {
        let config = Config::default();
        let tool = Tool::new("T1", "Compression", 0.5);
        let record = record().with_offset(OffsetSide::Left);
        let context = Context {
            record: &record,
            tool: &tool,
            kind: OperationKind::Cut,
            config: &config,
        };
        let part = Part::new("Bells", Point2::new(21.0, 10.0), Point2::ZERO);
        let path = part.place_chain(&dumbbell_chain(), &config.geometry);

        // Inside compensation pinches off the neck
        let toolpaths = contour_closed(&context, &path, 0.0, PartCategory::Large).unwrap();
        assert_eq!(toolpaths.len(), 2);
        let mut sides: Vec<bool> = toolpaths
            .iter()
            .map(|toolpath| {
                let left = toolpath.segments.iter().all(|s| s.end.x < 10.5);
                let right = toolpath.segments.iter().all(|s| s.end.x > 10.5);
                assert!(left || right, "toolpath crosses the neck");
                left
            })
            .collect();
        sides.sort();
        assert_eq!(sides, [false, true]);
    }
}
