//! Polyline paths with detected arc runs.

use super::arc::{arc_to_points, bulge_to_arc, Arc};
use super::rect::Rect2;
use super::vector::{closest_point_on_segment, Point2};
use routerkit_core::{GeometryConfig, GeometryError};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// A polyline vertex with the bulge of the segment leaving it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BulgePoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub bulge: f64,
}

impl BulgePoint {
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// A position reached while walking a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Point2,
    /// Path vertex at this position, `None` when between vertices
    pub index: Option<usize>,
    /// Distance from the start of the path
    pub distance: f64,
}

/// An ordered point sequence, open or closed
///
/// A closed path includes the edge from its last point back to its first.
/// Arcs are stored as index runs into the path's own points, so they can be
/// refitted whenever the points change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    points: Vec<Point2>,
    arcs: Vec<Arc>,
    closed: bool,
    diagnostics: Vec<GeometryError>,
}

impl Path {
    /// Wrap a point sequence without detecting arcs
    pub fn new(points: Vec<Point2>, closed: bool) -> Self {
        Self {
            points,
            arcs: Vec::new(),
            closed,
            diagnostics: Vec::new(),
        }
    }

    /// Build a path from bulge vertices, sampling every bulged segment.
    ///
    /// Each consecutive pair is one segment, plus the segment from the last
    /// vertex back to the first when `closed`. Bulges too small to describe an
    /// arc become straight segments and are recorded in [`Path::diagnostics`].
    pub fn from_bulge_points(closed: bool, vertices: &[BulgePoint], config: &GeometryConfig) -> Self {
        let mut path = Self::sample_bulges(closed, vertices, config);
        path.derive_arcs(config);
        path
    }

    /// Bulge sampling without arc detection
    pub(super) fn sample_bulges(closed: bool, vertices: &[BulgePoint], config: &GeometryConfig) -> Self {
        let mut vertices = vertices;
        if closed && vertices.len() > 1 {
            let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
            if first.position().is_equal_approx(last.position()) {
                vertices = &vertices[..vertices.len() - 1];
            }
        }

        let mut path = Path::new(Vec::new(), closed);
        let Some(first) = vertices.first() else {
            return path;
        };
        path.points.push(first.position());

        let count = vertices.len();
        let segments = if closed { count } else { count - 1 };
        for i in 0..segments {
            let this = vertices[i];
            let next = vertices[(i + 1) % count].position();
            if this.bulge != 0.0 {
                let sampled = bulge_to_arc(this.position(), next, this.bulge, config.degenerate_epsilon)
                    .and_then(|arc| {
                        arc_to_points(
                            arc.position,
                            arc.radius,
                            arc.angle_start,
                            arc.angle_end,
                            config.max_arc_segment_angle,
                        )
                    });
                match sampled {
                    Ok(points) => {
                        // Interior samples only; the end vertex is pushed below
                        let interior = points.len().saturating_sub(1);
                        path.points.extend(points.into_iter().take(interior).skip(1));
                    }
                    Err(err) => {
                        debug!(segment = i, "treating bulge segment as straight: {}", err);
                        path.diagnostics.push(err);
                    }
                }
            }
            path.points.push(next);
        }

        if closed && path.points.len() > 1 {
            // The closing segment ended back on the first vertex
            path.points.pop();
        }
        path
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Degenerate geometry met while building the path or detecting arcs
    pub fn diagnostics(&self) -> &[GeometryError] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Replace the points and re-derive the arcs
    pub fn set_points(&mut self, points: Vec<Point2>, config: &GeometryConfig) {
        self.points = points;
        self.derive_arcs(config);
    }

    /// Detect arc runs in the current points and fit an arc to each.
    ///
    /// Runs that fail to fit are dropped and recorded as diagnostics.
    pub fn derive_arcs(&mut self, config: &GeometryConfig) {
        self.arcs.clear();
        for run in self.find_arcs(config) {
            let mut arc = Arc::over(run);
            match arc.fit(&self.points, config.degenerate_epsilon) {
                Ok(()) => self.arcs.push(arc),
                Err(err) => {
                    debug!(run = ?arc.indices, "arc fit failed: {}", err);
                    self.diagnostics.push(err);
                }
            }
        }
    }

    /// Refit one arc against the current points
    pub fn refit_arc(&mut self, index: usize, epsilon: f64) -> Result<(), GeometryError> {
        let arc = self.arcs.get_mut(index).ok_or(GeometryError::EmptyPath)?;
        arc.fit(&self.points, epsilon)
    }

    /// Runs of point indices that look like a sampled arc.
    ///
    /// A run ends at a point whose outgoing edge is longer than
    /// `max_arc_segment_length` or turns more than `max_arc_turn_angle` from
    /// the previous edge; that point belongs to the run it ends. Runs shorter
    /// than three points are discarded.
    ///
    /// Runs are index ranges, so on a closed path they never wrap past the
    /// last point: an arc through the first point is found as two runs, and a
    /// piece shorter than three points is lost. Offset rings are rotated to
    /// start on a straight edge for this reason.
    pub fn find_arcs(&self, config: &GeometryConfig) -> Vec<Range<usize>> {
        let n = self.points.len();
        let max_len2 = config.max_arc_segment_length * config.max_arc_segment_length;
        let edges = self.edge_count();
        let mut runs = Vec::new();
        let mut run_start = 0;
        let mut last_dir = Point2::ZERO;

        for i in 0..edges {
            let here = self.points[i];
            let next = self.points[(i + 1) % n];
            let dir = here.direction_to(next);
            let turn = dir.angle_to(last_dir);
            if here.distance_squared_to(next) > max_len2 || turn.abs() > config.max_arc_turn_angle {
                if i + 1 - run_start >= 3 {
                    runs.push(run_start..i + 1);
                }
                run_start = i + 1;
            }
            last_dir = dir;
        }
        if n.saturating_sub(run_start) >= 3 {
            runs.push(run_start..n);
        }
        runs
    }

    /// Number of edges, counting the closing edge of a closed path
    pub fn edge_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Start and end index of an edge
    fn edge(&self, i: usize) -> (usize, usize) {
        (i, (i + 1) % self.points.len())
    }

    /// Index following `i`, wrapping on closed paths
    pub fn next_index(&self, i: usize) -> Option<usize> {
        if i + 1 < self.points.len() {
            Some(i + 1)
        } else if self.closed && !self.points.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    /// Total length, including the closing edge of a closed path
    pub fn length(&self) -> f64 {
        (0..self.edge_count())
            .map(|i| {
                let (a, b) = self.edge(i);
                self.points[a].distance_to(self.points[b])
            })
            .sum()
    }

    /// Length along the path from the first point to point `index`
    pub fn length_to_index(&self, index: usize) -> f64 {
        let end = (index + 1).min(self.points.len());
        self.points[..end]
            .windows(2)
            .map(|w| w[0].distance_to(w[1]))
            .sum()
    }

    /// Shoelace area treating the points as a ring; positive when counter-clockwise
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].cross(self.points[(i + 1) % n]))
            .sum::<f64>()
            * 0.5
    }

    pub fn bounds(&self) -> Option<Rect2> {
        Rect2::from_points(&self.points)
    }

    /// The same path traversed backwards, arcs included
    pub fn reversed(&self) -> Path {
        let n = self.points.len();
        let mut points = self.points.clone();
        points.reverse();
        let arcs = self
            .arcs
            .iter()
            .rev()
            .map(|arc| Arc {
                indices: (n - arc.indices.end)..(n - arc.indices.start),
                ..arc.reversed()
            })
            .collect();
        Path {
            points,
            arcs,
            closed: self.closed,
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// Nearest edge and the closest point on it; the first minimum wins
    fn nearest(&self, to: Point2) -> Option<(usize, usize, Point2)> {
        let mut best: Option<(usize, usize, Point2)> = None;
        let mut best_d = f64::INFINITY;
        for i in 0..self.edge_count() {
            let (a, b) = self.edge(i);
            let p = closest_point_on_segment(to, self.points[a], self.points[b]);
            let d = to.distance_squared_to(p);
            if d < best_d {
                best_d = d;
                best = Some((a, b, p));
            }
        }
        best
    }

    /// Indices of the edge nearest to `to`
    pub fn nearest_edge(&self, to: Point2) -> Option<(usize, usize)> {
        self.nearest(to).map(|(a, b, _)| (a, b))
    }

    /// Closest point on the path to `to`
    pub fn nearest_position(&self, to: Point2) -> Option<Point2> {
        match self.points.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => self.nearest(to).map(|(_, _, p)| p),
        }
    }

    /// Walk `distance` along the path from the point nearest to `from`.
    ///
    /// The first waypoint is the start position itself. Each vertex passed is
    /// a waypoint, and the walk ends on the point where the distance runs out
    /// or at the end of an open path. Closed paths wrap around.
    pub fn walk(&self, from: Point2, distance: f64) -> Walk<'_> {
        let Some((a, b, position)) = self.nearest(from) else {
            return Walk::finished(self);
        };
        let index = if position == self.points[a] {
            Some(a)
        } else if position == self.points[b] {
            Some(b)
        } else {
            None
        };
        let travelled = self.length_to_index(a) + self.points[a].distance_to(position);
        let next = (self.length() > 0.0).then_some(b);

        Walk {
            path: self,
            position,
            index,
            next,
            remaining: distance,
            travelled,
            started: false,
            done: false,
        }
    }
}

/// Lazy iterator over the waypoints of [`Path::walk`]
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    path: &'a Path,
    position: Point2,
    index: Option<usize>,
    next: Option<usize>,
    remaining: f64,
    travelled: f64,
    started: bool,
    done: bool,
}

impl<'a> Walk<'a> {
    fn finished(path: &'a Path) -> Self {
        Walk {
            path,
            position: Point2::ZERO,
            index: None,
            next: None,
            remaining: 0.0,
            travelled: 0.0,
            started: true,
            done: true,
        }
    }

    fn waypoint(&self) -> Waypoint {
        Waypoint {
            position: self.position,
            index: self.index,
            distance: self.travelled,
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = Waypoint;

    fn next(&mut self) -> Option<Waypoint> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            if self.remaining <= 0.0 || self.next.is_none() {
                self.done = true;
            }
            return Some(self.waypoint());
        }

        loop {
            let Some(j) = self.next else {
                self.done = true;
                return None;
            };
            let target = self.path.points[j];
            let seg2 = self.position.distance_squared_to(target);
            let r2 = self.remaining * self.remaining;

            if seg2 < r2 {
                let seg = seg2.sqrt();
                self.position = target;
                self.index = Some(j);
                self.remaining -= seg;
                self.travelled += seg;
                self.next = self.path.next_index(j);
                if seg == 0.0 {
                    continue;
                }
                if self.next.is_none() {
                    self.done = true;
                }
                return Some(self.waypoint());
            }

            let step = self.remaining;
            self.position = if seg2 == r2 {
                target
            } else {
                self.position + self.position.direction_to(target) * step
            };
            self.index = (seg2 == r2).then_some(j);
            self.travelled += step;
            self.remaining = 0.0;
            self.done = true;
            return Some(self.waypoint());
        }
    }
}
