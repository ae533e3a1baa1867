//! Nest input model
//!
//! Sheets of placed parts as written by the nesting engine. Part geometry is
//! stored in part-local coordinates; [`Part::place`] maps it onto the sheet.

use crate::geometry::{Arc, BulgePoint, Path, Point2, Rect2};
use routerkit_core::{GeometryConfig, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

/// An open or closed bulge polyline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChainGeometry {
    #[serde(default)]
    pub points: Vec<BulgePoint>,
    #[serde(default, deserialize_with = "flag", serialize_with = "flag_int")]
    pub closed: bool,
}

/// A circular arc; angles in radians
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub radius: f64,
    #[serde(default)]
    pub start_angle: f64,
    #[serde(default)]
    pub sweep: f64,
    pub position: Point2,
}

impl ArcGeometry {
    pub fn to_arc(&self) -> Arc {
        Arc::new(self.position, self.radius, self.start_angle, self.start_angle + self.sweep)
    }
}

/// A piece of geometry tagged with the operation that machines it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<G> {
    pub geometry: G,
    pub operation: String,
    /// Depth override, 0 to use the operation's cut depth
    #[serde(default)]
    pub depth: f64,
}

impl<G> Feature<G> {
    pub fn new(geometry: G, operation: impl Into<String>, depth: f64) -> Self {
        Self {
            geometry,
            operation: operation.into(),
            depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartGeometry {
    #[serde(rename = "Points", default)]
    pub points: Vec<Feature<Point2>>,
    #[serde(rename = "Chains", default)]
    pub chains: Vec<Feature<ChainGeometry>>,
    #[serde(rename = "Arcs", default)]
    pub arcs: Vec<Feature<ArcGeometry>>,
}

impl PartGeometry {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.chains.is_empty() && self.arcs.is_empty()
    }

    /// Bounds of the chain geometry in part coordinates
    pub fn chain_bounds(&self) -> Option<Rect2> {
        self.chains
            .iter()
            .flat_map(|c| c.geometry.points.iter())
            .map(BulgePoint::position)
            .fold(None, |acc: Option<Rect2>, p| match acc {
                Some(rect) => Some(rect.expand(p)),
                None => Some(Rect2::new(p, Point2::ZERO)),
            })
    }
}

/// A part placed on a sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    /// Unrotated size
    pub size: Point2,
    /// Lower-left corner of the placed footprint on the sheet
    pub origin: Point2,
    #[serde(default)]
    pub limit: Point2,
    #[serde(
        rename = "isRotated",
        default,
        deserialize_with = "flag",
        serialize_with = "flag_int"
    )]
    pub is_rotated: bool,
    #[serde(default)]
    pub area: f64,
    #[serde(rename = "sheet", default)]
    pub sheet_number: u32,
    #[serde(rename = "partId", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(
        rename = "canRotate",
        default,
        deserialize_with = "flag",
        serialize_with = "flag_int"
    )]
    pub can_rotate: bool,
    #[serde(rename = "unitNumber", default, skip_serializing_if = "String::is_empty")]
    pub unit_number: String,
    #[serde(default)]
    pub thickness: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(rename = "unitLetter", default, skip_serializing_if = "String::is_empty")]
    pub unit_letter: String,
    #[serde(default)]
    pub geometry: PartGeometry,
}

impl Part {
    pub fn new(name: impl Into<String>, size: Point2, origin: Point2) -> Self {
        Self {
            name: name.into(),
            size,
            origin,
            ..Default::default()
        }
    }

    pub fn rotated(mut self, rotated: bool) -> Self {
        self.is_rotated = rotated;
        self
    }

    pub fn with_geometry(mut self, geometry: PartGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Map a part-local point onto the sheet.
    ///
    /// Rotated parts are turned a quarter turn counter-clockwise, then shifted
    /// so their footprint starts at `origin` again.
    pub fn place(&self, local: Point2) -> Point2 {
        let turned = if self.is_rotated {
            Point2::new(self.size.y - local.y, local.x)
        } else {
            local
        };
        turned + self.origin
    }

    /// Placed footprint on the sheet
    pub fn footprint(&self) -> Rect2 {
        let size = if self.is_rotated {
            Point2::new(self.size.y, self.size.x)
        } else {
            self.size
        };
        Rect2::new(self.origin, size)
    }

    /// Sheet-space path of a chain
    pub fn place_chain(&self, chain: &ChainGeometry, config: &GeometryConfig) -> Path {
        let vertices: Vec<BulgePoint> = chain
            .points
            .iter()
            .map(|bp| {
                let p = self.place(bp.position());
                BulgePoint::new(p.x, p.y, bp.bulge)
            })
            .collect();
        let path = Path::from_bulge_points(chain.closed, &vertices, config);
        if !path.diagnostics().is_empty() {
            debug!(
                part = %self.name,
                count = path.diagnostics().len(),
                "degenerate geometry in chain"
            );
        }
        path
    }

    /// Sheet-space copy of an arc
    pub fn place_arc(&self, arc: &ArcGeometry) -> Arc {
        let turn = if self.is_rotated { FRAC_PI_2 } else { 0.0 };
        Arc::new(
            self.place(arc.position),
            arc.radius,
            arc.start_angle + turn,
            arc.start_angle + arc.sweep + turn,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub sheet_number: u32,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Output of the nesting engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Nest {
    #[serde(default)]
    pub partgap: f64,
    #[serde(default)]
    pub sheetsize: Point2,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    /// Parts that did not fit on any sheet
    #[serde(default)]
    pub nofits: Vec<Part>,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub jobname: String,
}

impl Nest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let nest = Self::from_json_str(&content)?;
        debug!(
            sheets = nest.sheets.len(),
            nofits = nest.nofits.len(),
            "loaded nest {}",
            path.display()
        );
        Ok(nest)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn part_count(&self) -> usize {
        self.sheets.iter().map(|s| s.parts.len()).sum()
    }
}

/// Accept either `0`/`1` or `false`/`true`
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

fn flag_int<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}
