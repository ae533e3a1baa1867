//! Instruction tree
//!
//! The intermediate representation shared by toolpath generation, dialect
//! post-processing and text output:
//!
//! `OperationTree` → `Operation` → `Command` → `Instruction` → `Token`
//!
//! Each level owns the next in insertion order. The text form writes one
//! instruction per line with tokens separated by a single space, a blank line
//! after every command and another after every operation.

pub mod command;
pub mod instruction;
pub mod operation;
pub mod token;

pub use command::{Command, CommandType};
pub use instruction::Instruction;
pub use operation::{Operation, OperationType};
pub use token::{Token, TokenId};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of the instruction tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationTree {
    pub operations: Vec<Operation>,
}

impl OperationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Append an operation and return it for further building
    pub fn new_operation(
        &mut self,
        operation_type: OperationType,
        commands: Vec<Command>,
    ) -> &mut Operation {
        self.operations.push(Operation::new(operation_type, commands));
        let last = self.operations.len() - 1;
        &mut self.operations[last]
    }

    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Move all operations of `other` to the end of this tree
    pub fn append(&mut self, other: OperationTree) {
        self.operations.extend(other.operations);
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.operations.iter().flat_map(|o| o.tokens())
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.operations.iter().flat_map(|o| o.commands.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Serialize the tree to program text
    pub fn script(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OperationTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for operation in &self.operations {
            write!(f, "{}", operation)?;
        }
        Ok(())
    }
}

impl FromIterator<Operation> for OperationTree {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self::from_operations(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_line_tree() -> OperationTree {
        let mut tree = OperationTree::new();
        let op = tree.new_operation(OperationType::Spindle, Vec::new());
        let com = op.new_command(CommandType::SpindleMotion, Vec::new());
        com.new_instruction(vec![
            Token::bare(TokenId::Move),
            Token::new(TokenId::X, "1"),
            Token::new(TokenId::Y, "2"),
        ]);
        com.new_instruction(vec![Token::bare(TokenId::Cut), Token::new(TokenId::X, "3")]);
        tree
    }

    #[test]
    fn test_script_layout() {
        assert_eq!(two_line_tree().script(), "MOVE X1 Y2\nCUT X3\n\n\n");
    }

    #[test]
    fn test_empty_levels() {
        assert_eq!(OperationTree::new().script(), "");

        let mut tree = OperationTree::new();
        tree.new_operation(OperationType::Any, Vec::new());
        assert_eq!(tree.script(), "\n");

        tree.operations[0].new_command(CommandType::Any, Vec::new());
        assert_eq!(tree.script(), "\n\n");
    }

    #[test]
    fn test_builder_returns_owned_child() {
        let mut tree = OperationTree::new();
        tree.new_operation(OperationType::Drill, Vec::new())
            .new_command(CommandType::DrillMotion, Vec::new())
            .new_instruction(vec![Token::bare(TokenId::Drill)])
            .add_token(Token::new(TokenId::Z, "0"));

        assert_eq!(tree.operations[0].commands[0].instructions[0].len(), 2);
        assert_eq!(tree.tokens().count(), 2);
    }

    #[test]
    fn test_first_code_token_skips_comments() {
        let mut op = Operation::new(OperationType::Spindle, Vec::new());
        op.new_command(
            CommandType::SpindleSet,
            vec![
                Instruction::new(vec![Token::comment("set up")]),
                Instruction::new(vec![Token::new(TokenId::Tool, "1"), Token::bare(TokenId::Spindle)]),
            ],
        );
        assert_eq!(op.first_code_token().unwrap().identifier, TokenId::Spindle);

        let empty = Operation::new(OperationType::Any, Vec::new());
        assert!(empty.first_code_token().is_none());
    }

    #[test]
    fn test_json_form() {
        let json = serde_json::to_string(&two_line_tree()).unwrap();
        assert!(json.contains("\"MOVE\""));
        let back: OperationTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, two_line_tree());
    }
}
