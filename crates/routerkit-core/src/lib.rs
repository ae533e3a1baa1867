//! # RouterKit Core
//!
//! Core types shared by the RouterKit crates.
//! Provides the error hierarchy, configuration, and the tool, operation and
//! router libraries consulted during toolpath generation.

pub mod config;
pub mod data;
pub mod error;

pub use config::{
    CategoryThresholds, Config, GeometryConfig, Leniency, OutputConfig, ParserConfig,
    ToolpathConfig,
};

pub use data::{
    DataLibrary, GangSlot, OffsetSide, OperationLibrary, OperationRecord, Router, RouterLibrary,
    Tool, ToolId, ToolLibrary,
};

pub use error::{
    ConfigError, Error, GeometryError, LookupError, ParseError, Result, ToolpathError,
};
