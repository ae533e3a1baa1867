//! Axis-aligned bounding rectangles.

use super::vector::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its minimum corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect2 {
    pub position: Point2,
    pub size: Point2,
}

impl Rect2 {
    pub fn new(position: Point2, size: Point2) -> Self {
        Self { position, size }
    }

    /// Smallest rectangle containing every point, or `None` for no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut rect = Rect2::new(first, Point2::ZERO);
        for p in points {
            rect = rect.expand(*p);
        }
        Some(rect)
    }

    pub fn end(&self) -> Point2 {
        self.position + self.size
    }

    pub fn center(&self) -> Point2 {
        self.position + self.size * 0.5
    }

    pub fn area(&self) -> f64 {
        self.size.x * self.size.y
    }

    /// The shorter side
    pub fn min_dimension(&self) -> f64 {
        self.size.x.min(self.size.y)
    }

    /// Grown to include `point`
    pub fn expand(&self, point: Point2) -> Rect2 {
        let end = self.end();
        let min = Point2::new(self.position.x.min(point.x), self.position.y.min(point.y));
        let max = Point2::new(end.x.max(point.x), end.y.max(point.y));
        Rect2::new(min, max - min)
    }

    /// Smallest rectangle containing both
    pub fn merge(&self, other: &Rect2) -> Rect2 {
        self.expand(other.position).expand(other.end())
    }

    pub fn contains(&self, point: Point2) -> bool {
        let end = self.end();
        point.x >= self.position.x && point.y >= self.position.y && point.x <= end.x && point.y <= end.y
    }
}
