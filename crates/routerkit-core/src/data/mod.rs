//! Machining data libraries
//!
//! This module provides:
//! - Tool library (router bits)
//! - Operation library (named machining operations)
//! - Router library (spindle and gang drill slot assignments)
//!
//! The libraries are read-only once loaded and can be shared between worker
//! threads without locking.

pub mod operations;
pub mod routers;
pub mod tools;

pub use operations::{OffsetSide, OperationLibrary, OperationRecord};
pub use routers::{GangSlot, Router, RouterLibrary, GANG_SLOTS, SPINDLE_SLOTS};
pub use tools::{Tool, ToolId, ToolLibrary};

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// File name of the tool library inside a data directory
pub const TOOL_LIBRARY_FILE: &str = "toollib.json";
/// File name of the operation library inside a data directory
pub const OPERATION_LIBRARY_FILE: &str = "operations.json";
/// File name of the router library inside a data directory
pub const ROUTER_LIBRARY_FILE: &str = "routerlib.json";

/// All libraries needed to turn a nest into toolpaths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataLibrary {
    pub tools: ToolLibrary,
    pub operations: OperationLibrary,
    pub routers: RouterLibrary,
}

impl DataLibrary {
    pub fn new(tools: ToolLibrary, operations: OperationLibrary, routers: RouterLibrary) -> Self {
        Self {
            tools,
            operations,
            routers,
        }
    }

    /// Build the libraries from JSON array documents
    pub fn from_json_strs(tools: &str, operations: &str, routers: &str) -> Result<Self> {
        Ok(Self {
            tools: serde_json::from_str(tools)?,
            operations: serde_json::from_str(operations)?,
            routers: serde_json::from_str(routers)?,
        })
    }

    /// Load `toollib.json`, `operations.json` and `routerlib.json` from a directory
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let read = |name: &str| std::fs::read_to_string(dir.join(name));
        let data = Self::from_json_strs(
            &read(TOOL_LIBRARY_FILE)?,
            &read(OPERATION_LIBRARY_FILE)?,
            &read(ROUTER_LIBRARY_FILE)?,
        )?;
        debug!(
            tools = data.tools.len(),
            operations = data.operations.len(),
            routers = data.routers.len(),
            "loaded data libraries from {}",
            dir.display()
        );
        Ok(data)
    }
}
