//! Multicam router dialect.

use super::PostProcessor;
use crate::tree::{
    Command, CommandType, Instruction, Operation, OperationType, Token, TokenId,
};
use tracing::debug;

/// Post-processor for Multicam routers
///
/// - motion words become `G00`/`G01`/`G02`/`G03`
/// - the start command becomes the `M90`/`G90`/`G75` preamble
/// - the stop command becomes the `M12`/`M05`/`G98 P147 D1`/`M02` postamble
/// - spindle and drill set-up bind tool numbers to `G00` and speeds to `G97`
/// - spindle operations switch the spindle on with `M03`
/// - drill motions run as `G81` canned cycles closed by `G80`
#[derive(Debug, Clone, Copy, Default)]
pub struct MulticamProcessor;

/// What an operation does, judged by its first code token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Drill,
    Spindle,
    Other,
}

fn code(word: &str, value: &str) -> Token {
    Token::word(word, value)
}

fn line(tokens: Vec<Token>) -> Instruction {
    Instruction::new(tokens)
}

impl MulticamProcessor {
    fn preamble() -> Vec<Instruction> {
        vec![
            line(vec![code("M", "90"), Token::comment("// Multicam Start")]),
            line(vec![code("G", "90")]),
            line(vec![code("G", "75")]),
        ]
    }

    fn postamble() -> Vec<Instruction> {
        vec![
            line(vec![code("M", "12"), Token::comment("// Multicam End")]),
            line(vec![code("M", "05")]),
            line(vec![code("G", "98"), code("P", "147"), code("D", "1")]),
            line(vec![code("M", "02")]),
        ]
    }

    /// One instruction per tool, speed and feed parameter, in source order
    fn setup(banner: &str, command: &Command) -> Vec<Instruction> {
        let mut instructions = vec![line(vec![Token::comment(banner)])];
        for token in command.tokens() {
            match token.identifier {
                TokenId::Tool => instructions.push(line(vec![code("G", "00"), token.clone()])),
                TokenId::Speed => instructions.push(line(vec![code("G", "97"), token.clone()])),
                TokenId::Feed if command.command_type == CommandType::DrillSet => {
                    instructions.push(line(vec![token.clone()]))
                }
                _ => {}
            }
        }
        instructions
    }

    fn role(source: &Operation) -> Role {
        match source.first_code_token().map(|t| &t.identifier) {
            Some(TokenId::Drill) => Role::Drill,
            Some(TokenId::Spindle) => Role::Spindle,
            Some(_) => Role::Other,
            None => match source.operation_type {
                OperationType::Drill => Role::Drill,
                OperationType::Spindle => Role::Spindle,
                _ => Role::Other,
            },
        }
    }

    fn handle_drill(mut operation: Operation) -> Operation {
        let cancel = line(vec![code("G", "80")]);
        for command in operation
            .commands
            .iter_mut()
            .filter(|c| c.command_type == CommandType::DrillMotion)
        {
            for instruction in &mut command.instructions {
                for token in &mut instruction.tokens {
                    if token.identifier == TokenId::Drill {
                        token.identifier = TokenId::word("G");
                        token.value = "81".to_string();
                    }
                }
            }
            if command.instructions.last() != Some(&cancel) {
                command.add_instruction(cancel.clone());
            }
        }
        operation
    }

    fn handle_spindle(mut operation: Operation) -> Operation {
        let start = line(vec![code("M", "03")]);
        if let Some(command) = operation
            .commands
            .iter_mut()
            .find(|c| c.command_type == CommandType::SpindleSet)
        {
            if !command.instructions.contains(&start) {
                command.add_instruction(start);
            }
        }
        operation
    }
}

impl PostProcessor for MulticamProcessor {
    fn name(&self) -> &str {
        "multicam"
    }

    fn description(&self) -> &str {
        "Multicam router controllers"
    }

    fn post_process_token(&self, mut token: Token) -> Token {
        let word = match token.identifier {
            TokenId::Move => "G00",
            TokenId::Cut => "G01",
            TokenId::ArcCw => "G02",
            TokenId::ArcCcw => "G03",
            _ => return token,
        };
        token.identifier = TokenId::word(word);
        token
    }

    fn post_process_command(&self, mut command: Command) -> Command {
        command.instructions = match command.command_type {
            CommandType::Start => Self::preamble(),
            CommandType::Stop => Self::postamble(),
            CommandType::SpindleSet => Self::setup("// Setting Spindle Parameters", &command),
            CommandType::DrillSet => Self::setup("// Setting Drill Parameters", &command),
            _ => return command,
        };
        command
    }

    fn post_process_operation(&self, source: &Operation, operation: Operation) -> Operation {
        let role = Self::role(source);
        debug!(operation = %source.operation_type, ?role, "multicam operation");
        match role {
            Role::Drill => Self::handle_drill(operation),
            Role::Spindle => Self::handle_spindle(operation),
            Role::Other => operation,
        }
    }
}
