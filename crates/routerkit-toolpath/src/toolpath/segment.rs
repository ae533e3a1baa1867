//! Toolpath segment types and data structures.

use crate::geometry::{Arc, Point2};
use std::f64::consts::TAU;

/// Types of toolpath segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolpathSegmentType {
    RapidMove,
    LinearMove,
    ArcCW,
    ArcCCW,
    /// Plunge at `end` to `z` and retract
    Drill,
}

/// A single segment of a toolpath.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolpathSegment {
    pub segment_type: ToolpathSegmentType,
    pub start: Point2,
    pub end: Point2,
    pub center: Option<Point2>,
    pub feed_rate: f64,
    /// Z at the end of the segment
    pub z: f64,
}

impl ToolpathSegment {
    /// Creates a new toolpath segment.
    pub fn new(segment_type: ToolpathSegmentType, start: Point2, end: Point2, z: f64, feed_rate: f64) -> Self {
        Self {
            segment_type,
            start,
            end,
            center: None,
            feed_rate,
            z,
        }
    }

    /// Creates a new arc segment.
    pub fn new_arc(
        segment_type: ToolpathSegmentType,
        start: Point2,
        end: Point2,
        center: Point2,
        z: f64,
        feed_rate: f64,
    ) -> Self {
        Self {
            segment_type,
            start,
            end,
            center: Some(center),
            feed_rate,
            z,
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self.segment_type, ToolpathSegmentType::ArcCW | ToolpathSegmentType::ArcCCW)
    }

    /// Length in the XY plane
    pub fn length(&self) -> f64 {
        match self.center {
            Some(center) if self.is_arc() => {
                let from = center.angle_to_point(self.start);
                let to = center.angle_to_point(self.end);
                let sweep = match self.segment_type {
                    ToolpathSegmentType::ArcCCW => (to - from).rem_euclid(TAU),
                    _ => (from - to).rem_euclid(TAU),
                };
                center.distance_to(self.start) * sweep
            }
            _ => self.start.distance_to(self.end),
        }
    }
}

/// A complete toolpath made up of multiple segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Toolpath {
    pub segments: Vec<ToolpathSegment>,
    pub tool_diameter: f64,
    pub depth: f64,
}

impl Toolpath {
    /// Creates a new empty toolpath.
    pub fn new(tool_diameter: f64, depth: f64) -> Self {
        Self {
            segments: Vec::new(),
            tool_diameter,
            depth,
        }
    }

    /// Adds a segment to the toolpath.
    pub fn add_segment(&mut self, segment: ToolpathSegment) {
        self.segments.push(segment);
    }

    /// End of the last segment
    pub fn position(&self) -> Option<Point2> {
        self.segments.last().map(|s| s.end)
    }

    pub fn start_point(&self) -> Option<Point2> {
        self.segments.first().map(|s| s.start)
    }

    fn from_here(&self, fallback: Point2) -> Point2 {
        self.position().unwrap_or(fallback)
    }

    pub fn rapid_to(&mut self, to: Point2, z: f64) {
        let start = self.from_here(to);
        self.add_segment(ToolpathSegment::new(ToolpathSegmentType::RapidMove, start, to, z, 0.0));
    }

    pub fn line_to(&mut self, to: Point2, z: f64, feed_rate: f64) {
        let start = self.from_here(to);
        self.add_segment(ToolpathSegment::new(ToolpathSegmentType::LinearMove, start, to, z, feed_rate));
    }

    /// Cut along `arc` from its start to its end point
    pub fn arc_along(&mut self, arc: &Arc, z: f64, feed_rate: f64) {
        let segment_type = if arc.is_clockwise() {
            ToolpathSegmentType::ArcCW
        } else {
            ToolpathSegmentType::ArcCCW
        };
        let start = self.from_here(arc.start_point());
        self.add_segment(ToolpathSegment::new_arc(
            segment_type,
            start,
            arc.end_point(),
            arc.position,
            z,
            feed_rate,
        ));
    }

    pub fn drill_at(&mut self, at: Point2, z: f64, feed_rate: f64) {
        let start = self.from_here(at);
        self.add_segment(ToolpathSegment::new(ToolpathSegmentType::Drill, start, at, z, feed_rate));
    }

    /// Gets the total length of the toolpath.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(ToolpathSegment::length).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
