//! Operations group the commands of one machining step.

use super::command::{Command, CommandType};
use super::instruction::Instruction;
use super::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an operation does on the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationType {
    #[default]
    Any,
    Start,
    End,
    Drill,
    Spindle,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "OT_ANY"),
            Self::Start => write!(f, "OT_START"),
            Self::End => write!(f, "OT_END"),
            Self::Drill => write!(f, "OT_DRILL"),
            Self::Spindle => write!(f, "OT_SPINDLE"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_type: OperationType,
    pub commands: Vec<Command>,
}

impl Operation {
    pub fn new(operation_type: OperationType, commands: Vec<Command>) -> Self {
        Self {
            operation_type,
            commands,
        }
    }

    /// Append a command and return it for further building
    pub fn new_command(
        &mut self,
        command_type: CommandType,
        instructions: Vec<Instruction>,
    ) -> &mut Command {
        self.commands.push(Command::new(command_type, instructions));
        let last = self.commands.len() - 1;
        &mut self.commands[last]
    }

    pub fn add_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// All tokens in tree order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.commands.iter().flat_map(|c| c.tokens())
    }

    /// First token that carries a machining role, skipping comments and parameters
    pub fn first_code_token(&self) -> Option<&Token> {
        self.tokens().find(|t| t.identifier.is_code())
    }
}

impl fmt::Display for Operation {
    /// Commands followed by one extra blank line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            write!(f, "{}", command)?;
        }
        writeln!(f)
    }
}
