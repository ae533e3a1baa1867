//! One line of output: an ordered run of tokens.

use super::token::{Token, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub tokens: Vec<Token>,
}

impl Instruction {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn add_token(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// First token, which usually names the instruction's role
    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    /// First token with the given identifier
    pub fn find(&self, identifier: &TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is(identifier))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl fmt::Display for Instruction {
    /// Tokens joined by a single space
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl FromIterator<Token> for Instruction {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
