//! Commands group the instructions of one logical step.

use super::instruction::Instruction;
use super::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural role of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommandType {
    #[default]
    Any,
    Start,
    Stop,
    SpindleSet,
    SpindleMotion,
    DrillSet,
    DrillMotion,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "CT_ANY"),
            Self::Start => write!(f, "CT_START"),
            Self::Stop => write!(f, "CT_STOP"),
            Self::SpindleSet => write!(f, "CT_SPINDLESET"),
            Self::SpindleMotion => write!(f, "CT_SPINDLEMOTION"),
            Self::DrillSet => write!(f, "CT_DRILLSET"),
            Self::DrillMotion => write!(f, "CT_DRILLMOTION"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub command_type: CommandType,
    pub instructions: Vec<Instruction>,
}

impl Command {
    pub fn new(command_type: CommandType, instructions: Vec<Instruction>) -> Self {
        Self {
            command_type,
            instructions,
        }
    }

    /// Append an instruction built from `tokens` and return it
    pub fn new_instruction(&mut self, tokens: Vec<Token>) -> &mut Instruction {
        self.instructions.push(Instruction::new(tokens));
        let last = self.instructions.len() - 1;
        &mut self.instructions[last]
    }

    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.instructions.iter().flat_map(|i| i.tokens.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for Command {
    /// One instruction per line followed by a blank line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        writeln!(f)
    }
}
