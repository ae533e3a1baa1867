//! # RouterKit S-code
//!
//! The instruction tree shared by every stage of the compiler, the dialect
//! post-processors that lower it to controller codes, and a modal-state
//! G-code parser for reading existing programs back in.

pub mod parser;
pub mod post;
pub mod samples;
pub mod tree;

pub use parser::{ParsedCommand, ParsedInstruction, ParsedToken, Parser, Program, Tokenizer, TreeState};
pub use post::{Dialect, GenericProcessor, MulticamProcessor, PostProcessError, PostProcessor};
pub use tree::{
    Command, CommandType, Instruction, Operation, OperationTree, OperationType, Token, TokenId,
};
