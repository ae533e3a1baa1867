//! Error handling for RouterKit
//!
//! Provides error types for every stage of the compiler:
//! - Geometry errors (degenerate arcs, bulges, offsets)
//! - Lookup errors (tools, operations, routers)
//! - Parse errors (G-code ingestion)
//! - Toolpath errors (operation dispatch, ramp computation)
//! - Configuration errors
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Degenerate geometry is recoverable: callers fall back to a straight segment
/// or a zero-radius marker and keep the error as a diagnostic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Three points do not define a usable circle
    #[error("Degenerate arc: {reason}")]
    DegenerateArc {
        /// Why the fit was rejected.
        reason: String,
    },

    /// Bulge factor too close to zero to describe an arc
    #[error("Degenerate bulge factor {bulge}")]
    DegenerateBulge {
        /// The offending bulge factor.
        bulge: f64,
    },

    /// Radius is zero, negative or not finite
    #[error("Invalid arc radius {radius}")]
    InvalidRadius {
        /// The offending radius.
        radius: f64,
    },

    /// Offsetting is only defined for closed paths
    #[error("Cannot offset an open path")]
    OpenPathOffset,

    /// The offset consumed the whole shape
    #[error("Offset by {delta} leaves no geometry")]
    OffsetCollapsed {
        /// The requested offset distance.
        delta: f64,
    },

    /// The path has too few points for the requested query
    #[error("Path has no edges")]
    EmptyPath,
}

/// Lookup error type
///
/// Raised when a named record is missing from one of the data libraries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No tool with the given id or name
    #[error("Tool not found: {name}")]
    ToolNotFound {
        /// The requested tool id or name.
        name: String,
    },

    /// No operation record with the given name
    #[error("Operation not found: {name}")]
    OperationNotFound {
        /// The requested operation name.
        name: String,
    },

    /// No router with the given id or name
    #[error("Router not found: {name}")]
    RouterNotFound {
        /// The requested router id or name.
        name: String,
    },

    /// The tool exists but is not loaded in any slot of the router
    #[error("Tool {tool} is not mounted on router {router}")]
    ToolNotMounted {
        /// The tool id.
        tool: String,
        /// The router name.
        router: String,
    },
}

/// G-code ingestion error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token value that is not a plain decimal number
    #[error("Invalid token '{letter}{value}' at line {line}")]
    InvalidToken {
        /// One-based line number.
        line: u32,
        /// The token letter.
        letter: char,
        /// The rejected value text.
        value: String,
    },
}

/// Toolpath generation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolpathError {
    /// Operation name or type with no registered strategy
    #[error("Unrecognized operation: {name}")]
    UnrecognizedOperation {
        /// The offending operation name.
        name: String,
    },

    /// Ramp angle outside (0, 90) degrees
    #[error("Invalid ramp angle {angle} degrees")]
    InvalidRamp {
        /// The ramp angle in degrees.
        angle: f64,
    },

    /// Missing library record
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Unusable geometry
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting failed validation
    #[error("Invalid configuration: {reason}")]
    Invalid {
        /// What was wrong.
        reason: String,
    },

    /// File extension is neither .json nor .toml
    #[error("Unsupported configuration format: {path}")]
    UnsupportedFormat {
        /// The offending path.
        path: String,
    },
}

/// Main error type for RouterKit
///
/// Unifies all error types into a single error enum for the public API.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Lookup error
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Parse error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Toolpath error
    #[error(transparent)]
    Toolpath(#[from] ToolpathError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The external nesting process failed
    #[error("External process '{command}' failed: {reason}")]
    ExternalProcess {
        /// The command that was run.
        command: String,
        /// Exit status or captured stderr.
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decode error
    #[error("TOML error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// TOML encode error
    #[error("TOML error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error, including one wrapped by the toolpath stage
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            Error::Geometry(_) | Error::Toolpath(ToolpathError::Geometry(_))
        )
    }

    /// Check if this is a lookup error, including one wrapped by the toolpath stage
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            Error::Lookup(_) | Error::Toolpath(ToolpathError::Lookup(_))
        )
    }

    /// Check if this is a parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

/// Result type for RouterKit operations
pub type Result<T> = std::result::Result<T, Error>;
