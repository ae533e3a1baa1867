//! Polygon offsetting for closed paths.
//!
//! Positive distances offset to the right of the direction of travel, which is
//! outward for a counter-clockwise ring. This matches the sign of
//! [`routerkit_core::OffsetSide::compensation`].
//!
//! Offsets go through cavalier, which trims self-intersections and can split a
//! ring into several loops. Mitred offsets start from the same rounded result
//! and replace each run of join arcs with the corner its neighbouring edges
//! meet at.

use super::path::{BulgePoint, Path};
use super::vector::Point2;
use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use routerkit_core::{GeometryConfig, GeometryError};
use std::panic;
use tracing::{debug, warn};

/// Corners sharper than this (`1 + cos(turn)`) are bevelled instead of mitred
const MITER_MIN_DENOMINATOR: f64 = 0.5;

/// Bulges below this are straight segments
const STRAIGHT_BULGE: f64 = 1e-12;

/// Edge directions closer than this (cross product) are parallel
const PARALLEL_EPSILON: f64 = 1e-9;

const REPEAT_EPSILON: f64 = 1e-9;

impl Path {
    /// Offset a closed path by `delta`.
    ///
    /// With `rolling` set, convex corners are rounded so a cutter rolls around
    /// them; otherwise corners are mitred. The result is closed, repeats its
    /// first point at the end and has its arcs re-derived.
    ///
    /// When the offset splits the ring only the loop enclosing the most area
    /// is returned; use [`Path::offset_all`] to keep every loop.
    pub fn offset(&self, delta: f64, rolling: bool, config: &GeometryConfig) -> Result<Path, GeometryError> {
        let loops = self.offset_all(delta, rolling, config)?;
        if loops.len() > 1 {
            warn!(delta, loops = loops.len(), "offset split the ring, keeping the largest loop");
        }
        loops
            .into_iter()
            .next()
            .ok_or(GeometryError::OffsetCollapsed { delta })
    }

    /// Offset a closed path by `delta`, keeping every loop the offset leaves.
    ///
    /// Loops come back largest first. Each starts on a straight edge when it
    /// has one, so no detected arc runs through its first point.
    pub fn offset_all(&self, delta: f64, rolling: bool, config: &GeometryConfig) -> Result<Vec<Path>, GeometryError> {
        if !self.is_closed() {
            return Err(GeometryError::OpenPathOffset);
        }
        let ring = ring_points(self.points());
        if ring.len() < 3 {
            return Err(GeometryError::EmptyPath);
        }

        let mut loops: Vec<(f64, Path)> = parallel_offset(&ring, delta)?
            .iter()
            .map(|pline| {
                let vertices = start_on_straight(pline_vertices(pline));
                let vertices = if rolling { vertices } else { mitre_joins(&vertices) };
                let mut path = Path::sample_bulges(true, &vertices, config);
                let mut points = path.points().to_vec();
                if let Some(first) = points.first().copied() {
                    points.push(first);
                }
                path.set_points(points, config);
                (path.signed_area().abs(), path)
            })
            .filter(|(_, path)| path.len() >= 3)
            .collect();
        if loops.is_empty() {
            return Err(GeometryError::OffsetCollapsed { delta });
        }

        loops.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(loops.into_iter().map(|(_, path)| path).collect())
    }
}

/// Points with consecutive duplicates and a repeated closing point removed
fn ring_points(points: &[Point2]) -> Vec<Point2> {
    let mut ring: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last().is_none_or(|last| !last.is_equal_approx(*p)) {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && ring[0].is_equal_approx(ring[ring.len() - 1]) {
        ring.pop();
    }
    ring
}

fn parallel_offset(ring: &[Point2], delta: f64) -> Result<Vec<Polyline<f64>>, GeometryError> {
    let mut polyline: Polyline<f64> = Polyline::new();
    for p in ring {
        polyline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    polyline.set_is_closed(true);

    // Positive cavalier offsets go left of the direction of travel
    let offsets = match panic::catch_unwind(panic::AssertUnwindSafe(|| polyline.parallel_offset(-delta))) {
        Ok(offsets) => offsets,
        Err(_) => {
            warn!(delta, "panic during parallel offset of {} point ring", ring.len());
            return Err(GeometryError::OffsetCollapsed { delta });
        }
    };

    let offsets: Vec<Polyline<f64>> = offsets
        .into_iter()
        .map(|pline| pline.remove_repeat_pos(REPEAT_EPSILON).unwrap_or(pline))
        .filter(|pline| pline.vertex_count() >= 2)
        .collect();
    debug!(delta, loops = offsets.len(), "parallel offset");
    Ok(offsets)
}

fn pline_vertices(pline: &Polyline<f64>) -> Vec<BulgePoint> {
    pline
        .vertex_data
        .iter()
        .map(|v| BulgePoint::new(v.x, v.y, v.bulge))
        .collect()
}

fn is_straight(vertex: &BulgePoint) -> bool {
    vertex.bulge.abs() < STRAIGHT_BULGE
}

/// Rotate a closed vertex ring so its first segment is straight
fn start_on_straight(mut vertices: Vec<BulgePoint>) -> Vec<BulgePoint> {
    if let Some(first) = vertices.iter().position(is_straight) {
        vertices.rotate_left(first);
    }
    vertices
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Join {
    /// Both edges extend to meet here
    Miter(Point2),
    /// Straight chord between the arc run's ends
    Bevel,
    /// Edges diverge, keep the arcs
    Round,
}

/// Join for edge `a` (arriving along `d_in`) and edge `b` (leaving along `d_out`)
fn corner_join(a: Point2, d_in: Point2, b: Point2, d_out: Point2) -> Join {
    if 1.0 + d_in.dot(d_out) < MITER_MIN_DENOMINATOR {
        return Join::Bevel;
    }
    let turn = d_in.cross(d_out);
    if turn.abs() < PARALLEL_EPSILON {
        return Join::Bevel;
    }
    let w = b - a;
    let ahead = w.cross(d_out) / turn;
    let behind = d_in.cross(w) / turn;
    if ahead < -PARALLEL_EPSILON || behind < -PARALLEL_EPSILON {
        return Join::Round;
    }
    Join::Miter(a + d_in * ahead)
}

/// Replace every run of join arcs with the corner of its neighbouring straight
/// edges. The ring must start on a straight segment.
fn mitre_joins(ring: &[BulgePoint]) -> Vec<BulgePoint> {
    let m = ring.len();
    if m < 3 || !ring.first().is_some_and(is_straight) {
        return ring.to_vec();
    }
    let straight = |p: Point2| BulgePoint::new(p.x, p.y, 0.0);

    let mut out: Vec<BulgePoint> = Vec::with_capacity(m);
    let mut i = 0;
    while i < m {
        if is_straight(&ring[i]) {
            out.push(ring[i]);
            i += 1;
            continue;
        }
        let mut j = i;
        while j < m && !is_straight(&ring[j]) {
            j += 1;
        }

        // Segment i - 1 and segment j % m are straight
        let a = ring[i].position();
        let b = ring[j % m].position();
        let d_in = ring[i - 1].position().direction_to(a);
        let d_out = b.direction_to(ring[(j + 1) % m].position());
        match corner_join(a, d_in, b, d_out) {
            Join::Miter(corner) if j == m => {
                out[0] = straight(corner);
                i = m;
            }
            Join::Miter(corner) => {
                out.push(straight(corner));
                i = j + 1;
            }
            Join::Bevel => {
                out.push(straight(a));
                i = j;
            }
            Join::Round => {
                out.extend_from_slice(&ring[i..j]);
                i = j;
            }
        }
    }
    out
}
