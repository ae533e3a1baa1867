//! # RouterKit
//!
//! A G-code compiler for CNC routers.
//!
//! ## Architecture
//!
//! RouterKit is organized as a workspace with multiple crates:
//!
//! 1. **routerkit-core** - Errors, configuration, tool/operation/router libraries
//! 2. **routerkit-scode** - Instruction tree, dialect post-processors, G-code parser
//! 3. **routerkit-toolpath** - Path & arc geometry, nest model, toolpath strategies
//! 4. **routerkit** - The compile and ingest pipelines tying the crates together
//!
//! ## Directions
//!
//! - **Compile**: nest → toolpaths → instruction tree → dialect → program text
//! - **Ingest**: program text → modal-state parse → instruction tree

pub mod pipeline;

pub use routerkit_core;
pub use routerkit_scode;
pub use routerkit_toolpath;

pub use pipeline::{Pipeline, SheetProgram};

pub use routerkit_core::{Config, DataLibrary, Error, Result};
pub use routerkit_scode::{Dialect, OperationTree, Parser, Program};
pub use routerkit_toolpath::{Nest, ToolpathGenerator};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Cargo profile the library was built with
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

/// One-line version string for logs and program banners
pub fn version_info() -> String {
    format!("routerkit {} ({}, built {})", VERSION, BUILD_PROFILE, BUILD_DATE)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `info` when unset
pub fn init_logging() -> anyhow::Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// Initialize logging with one JSON object per event
pub fn init_json_logging() -> anyhow::Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .json()
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
