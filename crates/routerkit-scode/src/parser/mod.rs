//! G-code ingestion
//!
//! Reads existing G-code into a modal-state-aware structure:
//! - [`Tokenizer`] turns text into tokens, each carrying its [`TreeState`]
//! - [`Parser`] groups tokens into one instruction per line and starts a new
//!   command whenever a line opens with a `G` or `M` word
//!
//! A parsed [`Program`] can be converted into an [`OperationTree`] for
//! post-processing or re-serialization.

pub mod state;
pub mod tokenizer;

pub use state::{TreeState, DEFAULT_PARAMETER_VALUE};
pub use tokenizer::{is_valid_value, ParsedToken, TokenKind, TokenStream, Tokenizer};

use crate::tree::{Command, CommandType, Instruction, Operation, OperationTree, OperationType};
use crate::tree::{Token, TokenId};
use routerkit_core::{ParseError, ParserConfig};
use tracing::debug;

/// The tokens of one source line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInstruction {
    pub line_number: u32,
    pub tokens: Vec<ParsedToken>,
}

impl ParsedInstruction {
    /// Starts with a letter word or a comment
    pub fn is_valid(&self) -> bool {
        self.tokens
            .first()
            .is_some_and(|t| matches!(t.kind, TokenKind::Letter(_) | TokenKind::Comment))
    }

    /// Modal state after the last token of the line
    pub fn state(&self) -> Option<&TreeState> {
        self.tokens.last().map(|t| &t.state)
    }

    fn to_instruction(&self) -> Instruction {
        self.tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Letter(letter) => Some(Token::new(
                    TokenId::parse(letter.encode_utf8(&mut [0; 4])),
                    t.value.clone(),
                )),
                TokenKind::Comment => Some(Token::comment(t.value.clone())),
                TokenKind::LineBreak => None,
            })
            .collect()
    }
}

/// Lines from one `G`/`M` boundary to the next
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    /// Line that opened the command
    pub line_number: u32,
    pub instructions: Vec<ParsedInstruction>,
}

impl ParsedCommand {
    fn new(line_number: u32) -> Self {
        Self {
            line_number,
            instructions: Vec::new(),
        }
    }

    /// Number of lines holding instructions
    pub fn line_count(&self) -> usize {
        self.instructions.len()
    }

    /// Modal state at the end of the command
    pub fn state(&self) -> Option<&TreeState> {
        self.instructions.last().and_then(|i| i.state())
    }

    pub fn tokens(&self) -> impl Iterator<Item = &ParsedToken> {
        self.instructions.iter().flat_map(|i| i.tokens.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// A whole parsed program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub commands: Vec<ParsedCommand>,
    /// Tokens dropped by the tolerant tokenizer
    pub dropped: usize,
}

impl Program {
    /// Modal state at the end of the program
    pub fn final_state(&self) -> TreeState {
        self.commands
            .last()
            .and_then(|c| c.state())
            .cloned()
            .unwrap_or_default()
    }

    pub fn instructions(&self) -> impl Iterator<Item = &ParsedInstruction> {
        self.commands.iter().flat_map(|c| c.instructions.iter())
    }

    /// Convert into the instruction tree as a single untyped operation
    pub fn to_operation_tree(&self) -> OperationTree {
        let commands = self
            .commands
            .iter()
            .map(|c| {
                Command::new(
                    CommandType::Any,
                    c.instructions.iter().map(|i| i.to_instruction()).collect(),
                )
            })
            .collect();
        OperationTree::from_operations(vec![Operation::new(OperationType::Any, commands)])
    }
}

/// Groups tokens into instructions and commands
#[derive(Debug, Clone, Default)]
pub struct Parser {
    tokenizer: Tokenizer,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config),
        }
    }

    /// Tokenize and parse program text
    pub fn parse(&self, text: &str) -> Result<Program, ParseError> {
        let stream = self.tokenizer.tokenize(text)?;
        Ok(Self::parse_tokens(stream))
    }

    /// Parse an already tokenized program
    pub fn parse_tokens(stream: TokenStream) -> Program {
        let mut commands = Vec::new();
        let mut current = ParsedCommand::new(1);
        let mut line = Vec::new();
        let mut start_of_line = true;

        for token in stream.tokens {
            if token.kind == TokenKind::LineBreak {
                let instruction = ParsedInstruction {
                    line_number: token.line,
                    tokens: std::mem::take(&mut line),
                };
                if instruction.is_valid() {
                    current.instructions.push(instruction);
                }
                start_of_line = true;
                continue;
            }

            if start_of_line {
                if token.is_modal() {
                    if !current.is_empty() {
                        commands.push(current);
                    }
                    current = ParsedCommand::new(token.line);
                    start_of_line = false;
                } else if token.letter() != Some('N') {
                    // Sequence numbers do not hide a following G/M word
                    start_of_line = false;
                }
            }
            line.push(token);
        }

        if !current.is_empty() {
            commands.push(current);
        }
        debug!(
            commands = commands.len(),
            dropped = stream.dropped,
            "parsed G-code program"
        );

        Program {
            commands,
            dropped: stream.dropped,
        }
    }
}
