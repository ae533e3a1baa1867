//! Operation library
//!
//! An operation record names the tool, feeds, depths and compensation side used
//! for every piece of geometry tagged with that operation name.

use crate::error::LookupError;
use serde::{Deserialize, Serialize};

/// Side of the nominal geometry the tool runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetSide {
    Left,
    Right,
    /// Tool centre on the line
    #[default]
    #[serde(other)]
    None,
}

impl OffsetSide {
    /// Signed tool compensation for a cutter of the given diameter
    pub fn compensation(&self, cut_diameter: f64) -> f64 {
        match self {
            Self::Right => cut_diameter * 0.5,
            Self::Left => -cut_diameter * 0.5,
            Self::None => 0.0,
        }
    }
}

impl std::fmt::Display for OffsetSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::None => write!(f, "none"),
        }
    }
}

/// A named machining operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub name: String,
    /// Strategy selector, e.g. "cut", "drill", "pocket"
    #[serde(rename = "type", default)]
    pub op_type: String,
    /// Tool id or name
    pub tool: String,
    /// Ramp-in angle in degrees, 0 for a straight plunge
    #[serde(default)]
    pub ramp: f64,
    #[serde(default)]
    pub feed_rate: u32,
    #[serde(default)]
    pub plunge_rate: u32,
    #[serde(default)]
    pub spindle_rpm: u32,
    #[serde(default)]
    pub offset: OffsetSide,
    /// Depth below the cut height
    #[serde(default)]
    pub cut_depth: f64,
    /// Z of the material surface
    #[serde(default)]
    pub cut_height: f64,
    /// Safe Z for rapid moves
    #[serde(default)]
    pub feed_height: f64,
}

impl OperationRecord {
    pub fn new(name: impl Into<String>, op_type: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op_type: op_type.into(),
            tool: tool.into(),
            ramp: 0.0,
            feed_rate: 0,
            plunge_rate: 0,
            spindle_rpm: 0,
            offset: OffsetSide::None,
            cut_depth: 0.0,
            cut_height: 0.0,
            feed_height: 0.0,
        }
    }

    pub fn with_rates(mut self, feed_rate: u32, plunge_rate: u32, spindle_rpm: u32) -> Self {
        self.feed_rate = feed_rate;
        self.plunge_rate = plunge_rate;
        self.spindle_rpm = spindle_rpm;
        self
    }

    pub fn with_heights(mut self, cut_depth: f64, cut_height: f64, feed_height: f64) -> Self {
        self.cut_depth = cut_depth;
        self.cut_height = cut_height;
        self.feed_height = feed_height;
        self
    }

    pub fn with_offset(mut self, offset: OffsetSide) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_ramp(mut self, ramp: f64) -> Self {
        self.ramp = ramp;
        self
    }
}

/// Operation library - ordered collection of operation records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationLibrary {
    operations: Vec<OperationRecord>,
}

impl OperationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation, replacing any record with the same name
    pub fn add_operation(&mut self, operation: OperationRecord) {
        match self
            .operations
            .iter_mut()
            .find(|o| o.name == operation.name)
        {
            Some(existing) => *existing = operation,
            None => self.operations.push(operation),
        }
    }

    pub fn get_operation_by_name(&self, name: &str) -> Result<&OperationRecord, LookupError> {
        self.operations
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| LookupError::OperationNotFound {
                name: name.to_string(),
            })
    }

    /// Operation names in library order
    pub fn list_operations_by_name(&self) -> Vec<&str> {
        self.operations.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationRecord> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl FromIterator<OperationRecord> for OperationLibrary {
    fn from_iter<I: IntoIterator<Item = OperationRecord>>(iter: I) -> Self {
        let mut library = Self::new();
        for operation in iter {
            library.add_operation(operation);
        }
        library
    }
}
