//! Circular arcs: fitting, bulge conversion and sampling.
//!
//! All angles are in radians. An arc runs from `angle_start` to `angle_end`;
//! `angle_end > angle_start` is counter-clockwise.

use super::vector::Point2;
use routerkit_core::GeometryError;
use std::f64::consts::TAU;
use std::ops::Range;

/// A circular arc, optionally detected over a run of path points
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// Centre
    pub position: Point2,
    /// Zero marks a failed fit; such arcs are not usable geometry
    pub radius: f64,
    pub angle_start: f64,
    pub angle_end: f64,
    /// Indices of the owning path's points this arc was fitted over
    pub indices: Range<usize>,
}

impl Arc {
    pub fn new(position: Point2, radius: f64, angle_start: f64, angle_end: f64) -> Self {
        Self {
            position,
            radius,
            angle_start,
            angle_end,
            indices: 0..0,
        }
    }

    /// An unfitted arc over a run of path points
    pub fn over(indices: Range<usize>) -> Self {
        Self {
            position: Point2::ZERO,
            radius: 0.0,
            angle_start: 0.0,
            angle_end: 0.0,
            indices,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.radius > 0.0 && self.radius.is_finite() && self.position.is_finite()
    }

    /// Signed included angle, positive counter-clockwise
    pub fn sweep(&self) -> f64 {
        self.angle_end - self.angle_start
    }

    pub fn is_clockwise(&self) -> bool {
        self.sweep() < 0.0
    }

    pub fn point_at(&self, angle: f64) -> Point2 {
        self.position + Point2::from_angle(angle) * self.radius
    }

    pub fn start_point(&self) -> Point2 {
        self.point_at(self.angle_start)
    }

    pub fn end_point(&self) -> Point2 {
        self.point_at(self.angle_end)
    }

    /// AutoCAD bulge factor of this arc: `tan(sweep / 4)`
    pub fn bulge(&self) -> f64 {
        (self.sweep() / 4.0).tan()
    }

    /// Same arc traversed the other way
    pub fn reversed(&self) -> Arc {
        Arc {
            angle_start: self.angle_end,
            angle_end: self.angle_start,
            ..self.clone()
        }
    }

    /// Sample the arc with at most `max_step` radians between points
    pub fn to_points(&self, max_step: f64) -> Result<Vec<Point2>, GeometryError> {
        arc_to_points(
            self.position,
            self.radius,
            self.angle_start,
            self.angle_end,
            max_step,
        )
    }

    /// Fit the circle through the first point, the last point and the point
    /// halfway along the run `self.indices` of `points`.
    ///
    /// On failure the arc keeps `radius == 0` with its position at the
    /// halfway point, and the error says why.
    pub fn fit(&mut self, points: &[Point2], epsilon: f64) -> Result<(), GeometryError> {
        let run = match points.get(self.indices.clone()) {
            Some(run) if run.len() >= 3 => run,
            _ => return Err(GeometryError::EmptyPath),
        };
        let e1 = run[0];
        let e2 = run[run.len() - 1];
        let np = point_at_length(run, polyline_length(run) * 0.5);

        self.position = np;
        self.radius = 0.0;

        let a = e1.distance_to(e2);
        let b = e1.distance_to(np);
        let c = e2.distance_to(np);
        let product = (a + b + c) * (a + b - c) * (a - b + c) * (b + c - a);
        if product <= 0.0 {
            return Err(GeometryError::DegenerateArc {
                reason: "collinear or coincident points".to_string(),
            });
        }

        // Perpendicular bisectors of e1-np and e2-np meet at the centre
        let va = e1 - np;
        let vb = e2 - np;
        let d = va.dot((e1 + np) * 0.5);
        let e = vb.dot((e2 + np) * 0.5);
        let denominator = va.cross(vb);
        if denominator.abs() < epsilon {
            return Err(GeometryError::DegenerateArc {
                reason: "ill-conditioned centre solve".to_string(),
            });
        }
        let center = Point2::new(
            (d * vb.y - e * va.y) / denominator,
            (va.x * e - vb.x * d) / denominator,
        );

        let ccw = (np - e1).cross(e2 - np) > 0.0;
        let start = center.angle_to_point(e1);
        let mut sweep = (center.angle_to_point(e2) - start).rem_euclid(TAU);
        if !ccw && sweep > 0.0 {
            sweep -= TAU;
        }

        self.position = center;
        self.radius = a * b * c / product.sqrt();
        self.angle_start = start;
        self.angle_end = start + sweep;
        Ok(())
    }
}

/// Sample an arc into points no more than `max_step` radians apart.
///
/// Emits `ceil(|Δangle| / max_step) + 1` points running from `start` towards
/// `end`; the last point lands exactly on `end` and never beyond it.
pub fn arc_to_points(
    center: Point2,
    radius: f64,
    start: f64,
    end: f64,
    max_step: f64,
) -> Result<Vec<Point2>, GeometryError> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(GeometryError::InvalidRadius { radius });
    }
    if !(max_step > 0.0) {
        return Err(GeometryError::DegenerateArc {
            reason: format!("non-positive angular step {}", max_step),
        });
    }

    let span = (end - start).abs();
    let direction = (end - start).signum();
    // Guard against a span that is a step multiple up to rounding
    let steps = (span / max_step - 1e-9).ceil().max(0.0) as usize;

    Ok((0..=steps)
        .map(|i| {
            let swept = (i as f64 * max_step).min(span);
            center + Point2::from_angle(start + direction * swept) * radius
        })
        .collect())
}

/// Convert a bulge segment from `start` to `end` into an arc.
///
/// The included angle is `4·atan(bulge)`; positive bulges run
/// counter-clockwise. Bulges with magnitude below `epsilon` describe a
/// straight segment and are rejected.
pub fn bulge_to_arc(
    start: Point2,
    end: Point2,
    bulge: f64,
    epsilon: f64,
) -> Result<Arc, GeometryError> {
    if !(bulge.abs() >= epsilon) {
        return Err(GeometryError::DegenerateBulge { bulge });
    }
    let chord = start.distance_to(end);
    if chord < epsilon {
        return Err(GeometryError::DegenerateArc {
            reason: "bulge segment has zero length".to_string(),
        });
    }

    let radius = chord * (1.0 + bulge * bulge) / (4.0 * bulge);
    let angle = start.angle_to_point(end) + std::f64::consts::FRAC_PI_2 - 2.0 * bulge.atan();
    let center = start + Point2::from_angle(angle) * radius;
    let angle_start = center.angle_to_point(start);

    Ok(Arc::new(
        center,
        radius.abs(),
        angle_start,
        angle_start + 4.0 * bulge.atan(),
    ))
}

pub(crate) fn polyline_length(points: &[Point2]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(w[1])).sum()
}

/// Point at arc length `distance` along an open polyline
pub(crate) fn point_at_length(points: &[Point2], distance: f64) -> Point2 {
    let mut remaining = distance;
    for w in points.windows(2) {
        let len = w[0].distance_to(w[1]);
        if remaining <= len {
            return w[0] + w[0].direction_to(w[1]) * remaining;
        }
        remaining -= len;
    }
    points.last().copied().unwrap_or_default()
}
