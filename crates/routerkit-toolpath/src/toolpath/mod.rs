//! Toolpath generation
//!
//! Geometry on a sheet is grouped by operation name. Each group is resolved
//! against the operation and tool libraries and handed to the strategy for
//! its operation kind. A failing group is reported and skipped while its
//! siblings carry on.

pub mod segment;
pub mod strategies;

pub use segment::{Toolpath, ToolpathSegment, ToolpathSegmentType};

use crate::geometry::{Point2, Rect2};
use crate::nest::{ArcGeometry, ChainGeometry, Nest, Part, Sheet};
use rayon::prelude::*;
use routerkit_core::{
    CategoryThresholds, Config, DataLibrary, GeometryError, OperationRecord, Tool, ToolpathError,
};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Size class of a part, deciding how aggressively it is held down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartCategory {
    Huge,
    Large,
    Medium,
    Small,
    Tiny,
}

impl PartCategory {
    /// Classify a part footprint. Nothing is classified as `Huge`.
    pub fn classify(rect: &Rect2, thresholds: &CategoryThresholds) -> Self {
        let area = rect.area();
        let min = rect.min_dimension();
        if area < thresholds.tiny_area {
            Self::Tiny
        } else if area < thresholds.small_area || min < thresholds.small_min_dimension {
            Self::Small
        } else if area < thresholds.medium_area || min < thresholds.medium_min_dimension {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// Leave an onion skin under the final pass
    pub fn should_onion(&self) -> bool {
        !matches!(self, Self::Huge | Self::Large)
    }

    /// Reverse the cutting direction
    pub fn should_down_cut(&self) -> bool {
        matches!(self, Self::Small | Self::Tiny)
    }
}

/// Strategy selector for an operation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Cut,
    Drill,
    Pocket,
    BlockDrillSystem,
    BlockDrillPilot,
    Rabbet,
    Groove,
    DadoBack,
    DrawBolts,
}

impl OperationKind {
    fn parse(text: &str) -> Option<Self> {
        let kind = match text.to_ascii_lowercase().as_str() {
            "cut" | "partcut" | "profile" => Self::Cut,
            "drill" => Self::Drill,
            "pocket" => Self::Pocket,
            "blockdrillsystem" => Self::BlockDrillSystem,
            "blockdrillpilot" => Self::BlockDrillPilot,
            "rabbet" | "rabbet2525" => Self::Rabbet,
            "groove" | "groove25" => Self::Groove,
            "dadoback" => Self::DadoBack,
            "drawbolts" => Self::DrawBolts,
            _ => return None,
        };
        Some(kind)
    }

    /// Kind from the record's type, falling back to its name
    pub fn resolve(record: &OperationRecord) -> Result<Self, ToolpathError> {
        Self::parse(&record.op_type)
            .or_else(|| Self::parse(&record.name))
            .ok_or_else(|| ToolpathError::UnrecognizedOperation {
                name: if record.op_type.is_empty() {
                    record.name.clone()
                } else {
                    format!("{} ({})", record.name, record.op_type)
                },
            })
    }

    /// Runs on the gang drill rather than the spindle
    pub fn uses_gang_drill(&self) -> bool {
        matches!(self, Self::BlockDrillSystem | Self::BlockDrillPilot)
    }

    /// Cuts along the geometry with tool compensation
    pub fn is_routed(&self) -> bool {
        matches!(
            self,
            Self::Cut | Self::Rabbet | Self::Groove | Self::DadoBack | Self::DrawBolts
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cut => "cut",
            Self::Drill => "drill",
            Self::Pocket => "pocket",
            Self::BlockDrillSystem => "block drill system",
            Self::BlockDrillPilot => "block drill pilot",
            Self::Rabbet => "rabbet",
            Self::Groove => "groove",
            Self::DadoBack => "dado back",
            Self::DrawBolts => "draw bolts",
        };
        f.write_str(name)
    }
}

/// Horizontal distance needed to descend `height` at `angle` degrees.
///
/// An angle of zero means a straight plunge and needs no distance.
pub fn ramp_length(angle: f64, height: f64) -> Result<f64, ToolpathError> {
    if angle == 0.0 {
        return Ok(0.0);
    }
    if !(angle > 0.0 && angle < 90.0) {
        return Err(ToolpathError::InvalidRamp { angle });
    }
    Ok(height.abs() / angle.to_radians().tan())
}

/// One geometry instance of an operation group
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Chain(&'a ChainGeometry),
    Arc(&'a ArcGeometry),
    Point(Point2),
}

/// A shape with the part it belongs to
#[derive(Debug, Clone, Copy)]
pub struct Instance<'a> {
    pub part: &'a Part,
    pub shape: Shape<'a>,
    pub depth: f64,
}

/// Every instance of one operation name on a sheet
#[derive(Debug, Clone)]
pub struct OperationGroup<'a> {
    pub name: &'a str,
    pub instances: Vec<Instance<'a>>,
}

/// Group a sheet's geometry by operation name in first-appearance order
pub fn group_sheet(sheet: &Sheet) -> Vec<OperationGroup<'_>> {
    let mut groups: Vec<OperationGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for part in &sheet.parts {
        let geometry = &part.geometry;
        let chains = geometry
            .chains
            .iter()
            .map(|f| (f.operation.as_str(), Shape::Chain(&f.geometry), f.depth));
        let arcs = geometry
            .arcs
            .iter()
            .map(|f| (f.operation.as_str(), Shape::Arc(&f.geometry), f.depth));
        let points = geometry
            .points
            .iter()
            .map(|f| (f.operation.as_str(), Shape::Point(f.geometry), f.depth));

        for (name, shape, depth) in chains.chain(arcs).chain(points) {
            let slot = match index.get(name) {
                Some(slot) => *slot,
                None => {
                    groups.push(OperationGroup {
                        name,
                        instances: Vec::new(),
                    });
                    index.insert(name, groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[slot].instances.push(Instance { part, shape, depth });
        }
    }
    groups
}

/// Toolpaths of one operation group
#[derive(Debug, Clone, PartialEq)]
pub struct ToolpathOperation {
    pub name: String,
    pub kind: OperationKind,
    /// Tool id
    pub tool: String,
    pub tool_diameter: f64,
    pub spindle_rpm: u32,
    pub feed_rate: f64,
    pub plunge_rate: f64,
    /// Safe Z for rapids
    pub feed_height: f64,
    pub toolpaths: Vec<Toolpath>,
    /// Degenerate geometry met while building the toolpaths
    pub diagnostics: Vec<GeometryError>,
}

impl ToolpathOperation {
    pub fn new(record: &OperationRecord, kind: OperationKind, tool: &Tool) -> Self {
        Self {
            name: record.name.clone(),
            kind,
            tool: tool.id.0.clone(),
            tool_diameter: tool.cut_diameter,
            spindle_rpm: record.spindle_rpm,
            feed_rate: f64::from(record.feed_rate),
            plunge_rate: f64::from(record.plunge_rate),
            feed_height: record.feed_height,
            toolpaths: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn uses_gang_drill(&self) -> bool {
        self.kind.uses_gang_drill()
    }

    pub fn segment_count(&self) -> usize {
        self.toolpaths.iter().map(|t| t.segments.len()).sum()
    }
}

/// An operation group that could not be toolpathed
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFailure {
    pub operation: String,
    pub error: ToolpathError,
}

/// Toolpaths for one sheet, in group order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetToolpath {
    pub sheet_number: u32,
    pub operations: Vec<ToolpathOperation>,
    pub failures: Vec<GroupFailure>,
}

/// Turns nests into toolpaths using the data libraries
#[derive(Debug, Clone, Copy)]
pub struct ToolpathGenerator<'a> {
    data: &'a DataLibrary,
    config: &'a Config,
}

impl<'a> ToolpathGenerator<'a> {
    pub fn new(data: &'a DataLibrary, config: &'a Config) -> Self {
        Self { data, config }
    }

    pub fn generate(&self, nest: &Nest) -> Vec<SheetToolpath> {
        info!(
            job = %nest.jobname,
            sheets = nest.sheets.len(),
            "generating toolpaths"
        );
        nest.sheets.iter().map(|sheet| self.generate_sheet(sheet)).collect()
    }

    pub fn generate_sheet(&self, sheet: &Sheet) -> SheetToolpath {
        let groups = group_sheet(sheet);
        debug!(
            sheet = sheet.sheet_number,
            groups = groups.len(),
            "toolpathing sheet"
        );

        // Collecting an indexed parallel iterator keeps group order
        let results: Vec<Result<ToolpathOperation, ToolpathError>> = if self.config.toolpath.parallel {
            groups.par_iter().map(|group| self.toolpath_group(group)).collect()
        } else {
            groups.iter().map(|group| self.toolpath_group(group)).collect()
        };

        let mut out = SheetToolpath {
            sheet_number: sheet.sheet_number,
            ..Default::default()
        };
        for (group, result) in groups.iter().zip(results) {
            match result {
                Ok(operation) => out.operations.push(operation),
                Err(error) => {
                    warn!(
                        sheet = sheet.sheet_number,
                        operation = group.name,
                        "skipping operation group: {}",
                        error
                    );
                    out.failures.push(GroupFailure {
                        operation: group.name.to_string(),
                        error,
                    });
                }
            }
        }
        out
    }

    /// Resolve and toolpath one operation group
    pub fn toolpath_group(&self, group: &OperationGroup<'_>) -> Result<ToolpathOperation, ToolpathError> {
        let record = self.data.operations.get_operation_by_name(group.name)?;
        let kind = OperationKind::resolve(record)?;
        let tool = self.data.tools.resolve(&record.tool)?;

        let mut operation = ToolpathOperation::new(record, kind, tool);
        let context = strategies::Context {
            record,
            tool,
            kind,
            config: self.config,
        };
        strategies::run(&context, &group.instances, &mut operation)?;
        operation.toolpaths = order_nearest(operation.toolpaths, Point2::ZERO);

        debug!(
            operation = %operation.name,
            kind = %kind,
            toolpaths = operation.toolpaths.len(),
            segments = operation.segment_count(),
            "toolpathed operation group"
        );
        Ok(operation)
    }
}

/// Order toolpaths greedily, each starting nearest to where the last ended
pub fn order_nearest(mut toolpaths: Vec<Toolpath>, from: Point2) -> Vec<Toolpath> {
    let mut ordered = Vec::with_capacity(toolpaths.len());
    let mut at = from;
    while !toolpaths.is_empty() {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (i, toolpath) in toolpaths.iter().enumerate() {
            let d = toolpath
                .start_point()
                .map_or(f64::INFINITY, |p| p.distance_squared_to(at));
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        let next = toolpaths.remove(best);
        at = next.position().unwrap_or(at);
        ordered.push(next);
    }
    ordered
}
