//! End-to-end compile and ingest pipelines
//!
//! Compiling runs a nest through toolpath generation, lowers every sheet into
//! an instruction tree for one router, post-processes it into a dialect and
//! serializes it. Ingesting parses existing program text back into the tree.

use anyhow::Context;
use routerkit_core::{Config, DataLibrary, Result};
use routerkit_scode::{Dialect, OperationTree, Parser, Program};
use routerkit_toolpath::{Emitter, GroupFailure, Nest, ToolpathGenerator};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The compiled program of one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetProgram {
    pub sheet_number: u32,
    /// Tree after dialect post-processing
    pub tree: OperationTree,
    pub script: String,
    /// Operation groups that produced no toolpaths
    pub failures: Vec<GroupFailure>,
}

impl SheetProgram {
    /// File name used by [`Pipeline::compile_to_dir`]
    pub fn file_name(&self, job_name: &str) -> String {
        let job = if job_name.trim().is_empty() { "job" } else { job_name.trim() };
        format!("{}_{}.nc", job, self.sheet_number)
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    data: DataLibrary,
    dialect: Dialect,
    router_id: String,
}

impl Pipeline {
    pub fn new(config: Config, data: DataLibrary, router_id: impl Into<String>) -> Self {
        Self {
            config,
            data,
            dialect: Dialect::default(),
            router_id: router_id.into(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Build a pipeline from a configuration file and a library directory
    pub fn from_files(
        config_path: &Path,
        data_dir: &Path,
        router_id: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let config = Config::load_from_file(config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", config_path.display()))?;
        let data = DataLibrary::load_from_dir(data_dir)
            .with_context(|| format!("failed to load libraries from {}", data_dir.display()))?;
        debug!(version = %crate::version_info(), "pipeline loaded from files");
        Ok(Self::new(config, data, router_id))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data(&self) -> &DataLibrary {
        &self.data
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Compile every sheet of a nest.
    ///
    /// A missing router or a tool that is not mounted on it fails the whole
    /// compile; failed operation groups are reported per sheet.
    pub fn compile(&self, nest: &Nest) -> Result<Vec<SheetProgram>> {
        let router = self.data.routers.get_router_by_id(&self.router_id)?;
        let emitter = Emitter::new(router, self.config.output, nest.jobname.clone());
        let generator = ToolpathGenerator::new(&self.data, &self.config);

        let mut programs = Vec::with_capacity(nest.sheets.len());
        for sheet in generator.generate(nest) {
            let tree = self.dialect.post_process(&emitter.emit(&sheet)?);
            for failure in &sheet.failures {
                warn!(
                    sheet = sheet.sheet_number,
                    operation = %failure.operation,
                    "operation left out of program: {}",
                    failure.error
                );
            }
            programs.push(SheetProgram {
                sheet_number: sheet.sheet_number,
                script: tree.script(),
                tree,
                failures: sheet.failures,
            });
        }
        info!(
            job = %nest.jobname,
            dialect = %self.dialect,
            sheets = programs.len(),
            "compiled nest"
        );
        Ok(programs)
    }

    pub fn compile_file(&self, nest_path: &Path) -> anyhow::Result<Vec<SheetProgram>> {
        let nest = Nest::load_from_file(nest_path)
            .with_context(|| format!("failed to read nest {}", nest_path.display()))?;
        self.compile(&nest)
            .with_context(|| format!("failed to compile nest {}", nest_path.display()))
    }

    /// Compile a nest file and write one program per sheet into `out_dir`
    pub fn compile_to_dir(&self, nest_path: &Path, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let nest = Nest::load_from_file(nest_path)
            .with_context(|| format!("failed to read nest {}", nest_path.display()))?;
        let programs = self
            .compile(&nest)
            .with_context(|| format!("failed to compile nest {}", nest_path.display()))?;

        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        programs
            .iter()
            .map(|program| {
                let path = out_dir.join(program.file_name(&nest.jobname));
                std::fs::write(&path, &program.script)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                Ok(path)
            })
            .collect()
    }

    /// Parse program text with the configured leniency
    pub fn parse(&self, text: &str) -> Result<Program> {
        let program = Parser::new(self.config.parser).parse(text)?;
        if program.dropped > 0 {
            warn!(dropped = program.dropped, "dropped invalid tokens while parsing");
        }
        Ok(program)
    }

    /// Parse program text into an instruction tree
    pub fn ingest(&self, text: &str) -> Result<OperationTree> {
        Ok(self.parse(text)?.to_operation_tree())
    }

    pub fn ingest_file(&self, path: &Path) -> anyhow::Result<OperationTree> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.ingest(&text)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Re-emit existing program text through the configured dialect
    pub fn translate(&self, text: &str) -> Result<String> {
        let tree = self.ingest(text)?;
        Ok(self.dialect.post_process(&tree).script())
    }
}
