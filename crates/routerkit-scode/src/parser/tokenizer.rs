//! G-code tokenizer with modal state threading.
//!
//! Splits raw program text into letter tokens, `;` comments and line breaks.
//! Bracketed text (`(..)`, `[..]`, `{..}`, nestable) and quoted text are
//! discarded. Every token carries the [`TreeState`] in effect at that token:
//! parameter tokens (any letter except `G` and `M`) publish a new state, all
//! other tokens share the current one.

use super::state::TreeState;
use regex::Regex;
use routerkit_core::{Leniency, ParseError, ParserConfig};
use std::fmt;
use tracing::debug;

/// What a token holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Letter word, normalized to upper case
    Letter(char),
    /// `;` comment running to end of line
    Comment,
    LineBreak,
}

/// A token read from program text
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedToken {
    pub kind: TokenKind,
    pub value: String,
    /// One-based source line
    pub line: u32,
    /// Modal state as of this token
    pub state: TreeState,
}

impl ParsedToken {
    pub fn letter(&self) -> Option<char> {
        match self.kind {
            TokenKind::Letter(letter) => Some(letter),
            _ => None,
        }
    }

    /// `G` or `M` word
    pub fn is_modal(&self) -> bool {
        matches!(self.kind, TokenKind::Letter('G' | 'M'))
    }

    /// Letter word that sets a modal parameter
    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, TokenKind::Letter(_)) && !self.is_modal()
    }
}

impl fmt::Display for ParsedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Letter(letter) => write!(f, "{}{}", letter, self.value),
            TokenKind::Comment => write!(f, ";{}", self.value),
            TokenKind::LineBreak => writeln!(f),
        }
    }
}

/// Whether `value` is a plain decimal number
///
/// One optional sign, digits and at most one decimal point.
pub fn is_valid_value(value: &str) -> bool {
    static VALUE_REGEX: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let re = VALUE_REGEX
        .get_or_init(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").expect("invalid regex pattern"));
    re.is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    /// Text before the first letter of a line, e.g. `%`
    Idle,
    Letter(char),
    Comment,
}

/// Character-level state machine
struct Lexer {
    leniency: Leniency,
    tokens: Vec<ParsedToken>,
    state: TreeState,
    line: u32,
    capture: Capture,
    value: String,
    depth: u32,
    quoted: bool,
    dropped: usize,
}

impl Lexer {
    fn flush(&mut self) -> Result<(), ParseError> {
        let value = std::mem::take(&mut self.value);
        match std::mem::replace(&mut self.capture, Capture::Idle) {
            Capture::Idle => {
                if !value.trim().is_empty() {
                    debug!(line = self.line, text = %value.trim(), "ignoring text outside a word");
                }
            }
            Capture::Comment => {
                let token = ParsedToken {
                    kind: TokenKind::Comment,
                    value: value.trim().to_string(),
                    line: self.line,
                    state: self.state.clone(),
                };
                self.tokens.push(token);
            }
            Capture::Letter(letter) => {
                if value.is_empty() {
                    debug!(line = self.line, %letter, "ignoring word without a value");
                    return Ok(());
                }
                if !is_valid_value(&value) {
                    let err = ParseError::InvalidToken {
                        line: self.line,
                        letter,
                        value,
                    };
                    return match self.leniency {
                        Leniency::Strict => Err(err),
                        Leniency::Tolerant => {
                            debug!("dropping token: {}", err);
                            self.dropped += 1;
                            Ok(())
                        }
                    };
                }
                let kind = TokenKind::Letter(letter);
                if !matches!(letter, 'G' | 'M') {
                    self.state = self.state.extend([(letter, value.as_str())]);
                }
                self.tokens.push(ParsedToken {
                    kind,
                    value,
                    line: self.line,
                    state: self.state.clone(),
                });
            }
        }
        Ok(())
    }

    fn line_break(&mut self) -> Result<(), ParseError> {
        self.flush()?;
        self.tokens.push(ParsedToken {
            kind: TokenKind::LineBreak,
            value: String::new(),
            line: self.line,
            state: self.state.clone(),
        });
        self.line += 1;
        // Bracketed and quoted regions never span lines
        self.depth = 0;
        self.quoted = false;
        Ok(())
    }

    fn feed(&mut self, c: char) -> Result<(), ParseError> {
        if self.capture == Capture::Comment {
            self.value.push(c);
            return Ok(());
        }
        match c {
            '(' | '[' | '{' if !self.quoted => {
                self.depth += 1;
            }
            ')' | ']' | '}' if !self.quoted => {
                self.depth = self.depth.saturating_sub(1);
            }
            '"' if self.depth == 0 => {
                self.quoted = !self.quoted;
            }
            _ if self.depth > 0 || self.quoted => {}
            ';' => {
                self.flush()?;
                self.capture = Capture::Comment;
            }
            c if c.is_whitespace() => {}
            c if c.is_alphabetic() => {
                self.flush()?;
                self.capture = Capture::Letter(c.to_ascii_uppercase());
            }
            c => self.value.push(c),
        }
        Ok(())
    }
}

/// Tokenizer for raw G-code text
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: ParserConfig,
}

/// Tokens and the count of tokens dropped in tolerant mode
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    pub tokens: Vec<ParsedToken>,
    pub dropped: usize,
}

impl Tokenizer {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Tokenize a whole program
    ///
    /// A trailing line without a newline is closed as if it had one, so every
    /// line ends with a line-break token.
    pub fn tokenize(&self, text: &str) -> Result<TokenStream, ParseError> {
        let mut lexer = Lexer {
            leniency: self.config.leniency,
            tokens: Vec::new(),
            state: TreeState::new(),
            line: 1,
            capture: Capture::Idle,
            value: String::new(),
            depth: 0,
            quoted: false,
            dropped: 0,
        };

        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    lexer.line_break()?;
                }
                '\n' => lexer.line_break()?,
                c => lexer.feed(c)?,
            }
        }
        let trailing = lexer.capture != Capture::Idle || !lexer.value.trim().is_empty();
        if trailing {
            lexer.line_break()?;
        }

        Ok(TokenStream {
            tokens: lexer.tokens,
            dropped: lexer.dropped,
        })
    }
}
