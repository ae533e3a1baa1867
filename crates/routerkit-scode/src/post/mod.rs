//! Dialect post-processors
//!
//! A post-processor lowers the generic instruction tree into the codes of one
//! controller. Hooks run bottom-up: every token of an instruction, then the
//! instruction, then its command once all instructions are done, then the
//! operation. The pass never touches its input; it returns a new tree, so
//! running it twice over the same input gives the same result.

pub mod multicam;

pub use multicam::MulticamProcessor;

use crate::tree::{Command, Instruction, Operation, OperationTree, Token};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Post-processor selection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostProcessError {
    /// No dialect registered under this name
    #[error("Unknown dialect: {name}")]
    UnknownDialect {
        /// The requested dialect name.
        name: String,
    },
}

/// Rewrites a generic tree into a controller dialect
///
/// Every hook defaults to returning its input unchanged.
pub trait PostProcessor: Send + Sync {
    /// Get processor name
    fn name(&self) -> &str;

    /// Get processor description
    fn description(&self) -> &str {
        ""
    }

    fn post_process_token(&self, token: Token) -> Token {
        token
    }

    fn post_process_instruction(&self, instruction: Instruction) -> Instruction {
        instruction
    }

    fn post_process_command(&self, command: Command) -> Command {
        command
    }

    /// `source` is the operation as it was before any hook ran
    fn post_process_operation(&self, _source: &Operation, operation: Operation) -> Operation {
        operation
    }

    /// Run all hooks over a tree and return the rewritten copy
    fn post_process(&self, tree: &OperationTree) -> OperationTree {
        let processed: OperationTree = tree
            .operations
            .iter()
            .map(|source| {
                let commands = source
                    .commands
                    .iter()
                    .map(|command| {
                        let instructions = command
                            .instructions
                            .iter()
                            .map(|instruction| {
                                let tokens = instruction
                                    .tokens
                                    .iter()
                                    .cloned()
                                    .map(|t| self.post_process_token(t))
                                    .collect();
                                self.post_process_instruction(Instruction::new(tokens))
                            })
                            .collect();
                        self.post_process_command(Command::new(command.command_type, instructions))
                    })
                    .collect();
                self.post_process_operation(
                    source,
                    Operation::new(source.operation_type, commands),
                )
            })
            .collect();
        debug!(
            dialect = self.name(),
            operations = processed.len(),
            "post-processed instruction tree"
        );
        processed
    }
}

/// Leaves the tree as it is
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericProcessor;

impl PostProcessor for GenericProcessor {
    fn name(&self) -> &str {
        "generic"
    }

    fn description(&self) -> &str {
        "Generic instruction tree without dialect rewrites"
    }
}

/// Supported controller dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Generic,
    Multicam,
}

impl Dialect {
    pub fn all() -> &'static [Dialect] {
        &[Dialect::Generic, Dialect::Multicam]
    }

    /// The post-processor implementing this dialect
    pub fn processor(&self) -> &'static dyn PostProcessor {
        match self {
            Self::Generic => &GenericProcessor,
            Self::Multicam => &MulticamProcessor,
        }
    }

    pub fn post_process(&self, tree: &OperationTree) -> OperationTree {
        self.processor().post_process(tree)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.processor().name())
    }
}

impl FromStr for Dialect {
    type Err = PostProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::all()
            .iter()
            .copied()
            .find(|d| d.processor().name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PostProcessError::UnknownDialect {
                name: s.to_string(),
            })
    }
}
