//! Configuration for RouterKit
//!
//! Tuning constants for arc detection, part categorisation, toolpath policy,
//! G-code ingestion and output formatting. Every section carries its defaults
//! as `DEFAULT_*` constants and offers `with_*` builder setters.
//!
//! Configuration can be stored as JSON or TOML.

use crate::error::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest segment still considered part of a sampled arc
pub const DEFAULT_MAX_ARC_SEGMENT_LENGTH: f64 = 0.1;
/// Angular step used when discretizing arcs (radians)
pub const DEFAULT_MAX_ARC_SEGMENT_ANGLE: f64 = 0.05;
/// Largest turn between consecutive segments inside a sampled arc (radians)
pub const DEFAULT_MAX_ARC_TURN_ANGLE: f64 = 0.1;
/// Below this, determinants and bulge factors count as zero
pub const DEFAULT_DEGENERATE_EPSILON: f64 = 1e-7;

pub const DEFAULT_TINY_AREA: f64 = 150.0;
pub const DEFAULT_SMALL_AREA: f64 = 300.0;
pub const DEFAULT_SMALL_MIN_DIMENSION: f64 = 6.0;
pub const DEFAULT_MEDIUM_AREA: f64 = 700.0;
pub const DEFAULT_MEDIUM_MIN_DIMENSION: f64 = 7.25;

/// Thickness of the web left under onion-skinned parts
pub const DEFAULT_ONION_SKIN: f64 = 0.02;
/// Pocket stepover as a fraction of the tool diameter
pub const DEFAULT_POCKET_STEPOVER: f64 = 0.5;
/// Decimal places written for coordinates and rates
pub const DEFAULT_PRECISION: usize = 4;

/// Geometry engine tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Maximum segment length inside a detected arc
    pub max_arc_segment_length: f64,
    /// Step angle for arc discretization (radians)
    pub max_arc_segment_angle: f64,
    /// Maximum turning angle inside a detected arc (radians)
    pub max_arc_turn_angle: f64,
    /// Degeneracy threshold
    pub degenerate_epsilon: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            max_arc_segment_length: DEFAULT_MAX_ARC_SEGMENT_LENGTH,
            max_arc_segment_angle: DEFAULT_MAX_ARC_SEGMENT_ANGLE,
            max_arc_turn_angle: DEFAULT_MAX_ARC_TURN_ANGLE,
            degenerate_epsilon: DEFAULT_DEGENERATE_EPSILON,
        }
    }
}

impl GeometryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_arc_segment_length(mut self, length: f64) -> Self {
        self.max_arc_segment_length = length;
        self
    }

    pub fn with_max_arc_segment_angle(mut self, angle: f64) -> Self {
        self.max_arc_segment_angle = angle;
        self
    }

    pub fn with_max_arc_turn_angle(mut self, angle: f64) -> Self {
        self.max_arc_turn_angle = angle;
        self
    }

    pub fn with_degenerate_epsilon(mut self, epsilon: f64) -> Self {
        self.degenerate_epsilon = epsilon;
        self
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        let positive = [
            ("max_arc_segment_length", self.max_arc_segment_length),
            ("max_arc_segment_angle", self.max_arc_segment_angle),
            ("max_arc_turn_angle", self.max_arc_turn_angle),
            ("degenerate_epsilon", self.degenerate_epsilon),
        ];
        check_positive(&positive)
    }
}

/// Part size thresholds that decide the cutting policy for a part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryThresholds {
    /// Parts below this area are tiny
    pub tiny_area: f64,
    /// Parts below this area are small
    pub small_area: f64,
    /// Parts with either side below this are small
    pub small_min_dimension: f64,
    /// Parts below this area are medium
    pub medium_area: f64,
    /// Parts with either side below this are medium
    pub medium_min_dimension: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            tiny_area: DEFAULT_TINY_AREA,
            small_area: DEFAULT_SMALL_AREA,
            small_min_dimension: DEFAULT_SMALL_MIN_DIMENSION,
            medium_area: DEFAULT_MEDIUM_AREA,
            medium_min_dimension: DEFAULT_MEDIUM_MIN_DIMENSION,
        }
    }
}

impl CategoryThresholds {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_positive(&[
            ("tiny_area", self.tiny_area),
            ("small_area", self.small_area),
            ("small_min_dimension", self.small_min_dimension),
            ("medium_area", self.medium_area),
            ("medium_min_dimension", self.medium_min_dimension),
        ])?;
        if !(self.tiny_area <= self.small_area && self.small_area <= self.medium_area) {
            return Err(ConfigError::Invalid {
                reason: "category areas must be ascending (tiny <= small <= medium)".to_string(),
            });
        }
        Ok(())
    }
}

/// Toolpath generation policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolpathConfig {
    /// Web thickness left by onion-skinned cuts
    pub onion_skin: f64,
    /// Pocket stepover as a fraction of tool diameter
    pub pocket_stepover: f64,
    /// Process operation groups on the rayon thread pool
    pub parallel: bool,
    pub categories: CategoryThresholds,
}

impl Default for ToolpathConfig {
    fn default() -> Self {
        Self {
            onion_skin: DEFAULT_ONION_SKIN,
            pocket_stepover: DEFAULT_POCKET_STEPOVER,
            parallel: false,
            categories: CategoryThresholds::default(),
        }
    }
}

impl ToolpathConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: CategoryThresholds) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_onion_skin(mut self, thickness: f64) -> Self {
        self.onion_skin = thickness;
        self
    }

    pub fn with_pocket_stepover(mut self, ratio: f64) -> Self {
        self.pocket_stepover = ratio;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.categories.validate()?;
        if self.onion_skin < 0.0 {
            return Err(ConfigError::Invalid {
                reason: "onion_skin must be >= 0".to_string(),
            });
        }
        if !(self.pocket_stepover > 0.0 && self.pocket_stepover <= 1.0) {
            return Err(ConfigError::Invalid {
                reason: "pocket_stepover must be in (0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// How the tokenizer treats malformed token values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leniency {
    /// Drop the offending token and keep going
    #[default]
    Tolerant,
    /// Stop at the first malformed token
    Strict,
}

impl std::fmt::Display for Leniency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tolerant => write!(f, "tolerant"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// G-code ingestion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub leniency: Leniency,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            leniency: Leniency::Strict,
        }
    }

    pub fn with_leniency(mut self, leniency: Leniency) -> Self {
        self.leniency = leniency;
        self
    }
}

/// Emitted G-code formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Decimal places for coordinates and rates
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl OutputConfig {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Format a number with the configured precision, trimming trailing zeros
    pub fn format(&self, value: f64) -> String {
        let mut text = format!("{:.*}", self.precision, value);
        if text.contains('.') {
            let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
            text.truncate(trimmed);
        }
        if text == "-0" {
            text = "0".to_string();
        }
        text
    }
}

/// Complete configuration
///
/// Aggregates all sections and provides file I/O.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geometry: GeometryConfig,
    pub toolpath: ToolpathConfig,
    pub parser: ParserConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(mut self, geometry: GeometryConfig) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_toolpath(mut self, toolpath: ToolpathConfig) -> Self {
        self.toolpath = toolpath;
        self
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Load config from a `.json` or `.toml` file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => return Err(unsupported(path)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to a `.json` or `.toml` file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            _ => return Err(unsupported(path)),
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.toolpath.validate()?;
        if self.output.precision > 12 {
            return Err(ConfigError::Invalid {
                reason: "output precision must be <= 12".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn unsupported(path: &Path) -> Error {
    ConfigError::UnsupportedFormat {
        path: path.display().to_string(),
    }
    .into()
}

fn check_positive(values: &[(&str, f64)]) -> std::result::Result<(), ConfigError> {
    for (name, value) in values {
        if !(value.is_finite() && *value > 0.0) {
            return Err(ConfigError::Invalid {
                reason: format!("{} must be > 0", name),
            });
        }
    }
    Ok(())
}
