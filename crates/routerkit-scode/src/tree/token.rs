//! Tokens, the leaves of the instruction tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a token
///
/// The generic variants describe machining intent; dialect post-processors
/// replace them with controller words held in [`TokenId::Word`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenId {
    JobStart,
    JobEnd,
    Spindle,
    Drill,
    Move,
    Cut,
    ArcCw,
    ArcCcw,
    Comment,
    LineBreak,
    Tab,
    X,
    Y,
    Z,
    /// Arc centre X offset
    I,
    /// Arc centre Y offset
    J,
    /// Arc centre Z offset
    K,
    Tool,
    Speed,
    Feed,
    /// Controller word such as `G`, `M97` or `P`
    Word(String),
}

impl TokenId {
    /// Parse an identifier, mapping unknown text to [`TokenId::Word`]
    pub fn parse(text: &str) -> Self {
        match text {
            "JOBSTART" => Self::JobStart,
            "JOBEND" => Self::JobEnd,
            "SPINDLE" => Self::Spindle,
            "DRILL" => Self::Drill,
            "MOVE" => Self::Move,
            "CUT" => Self::Cut,
            "ARC2DCW" => Self::ArcCw,
            "ARC2DCCW" => Self::ArcCcw,
            ";" => Self::Comment,
            "\n" => Self::LineBreak,
            "\t" => Self::Tab,
            "X" => Self::X,
            "Y" => Self::Y,
            "Z" => Self::Z,
            "I" => Self::I,
            "J" => Self::J,
            "K" => Self::K,
            "T" => Self::Tool,
            "S" => Self::Speed,
            "F" => Self::Feed,
            other => Self::Word(other.to_string()),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::parse(&text.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::JobStart => "JOBSTART",
            Self::JobEnd => "JOBEND",
            Self::Spindle => "SPINDLE",
            Self::Drill => "DRILL",
            Self::Move => "MOVE",
            Self::Cut => "CUT",
            Self::ArcCw => "ARC2DCW",
            Self::ArcCcw => "ARC2DCCW",
            Self::Comment => ";",
            Self::LineBreak => "\n",
            Self::Tab => "\t",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::I => "I",
            Self::J => "J",
            Self::K => "K",
            Self::Tool => "T",
            Self::Speed => "S",
            Self::Feed => "F",
            Self::Word(word) => word,
        }
    }

    /// Identifiers that give an instruction its machining role
    pub fn is_code(&self) -> bool {
        matches!(
            self,
            Self::JobStart
                | Self::JobEnd
                | Self::Spindle
                | Self::Drill
                | Self::Move
                | Self::Cut
                | Self::ArcCw
                | Self::ArcCcw
        )
    }

    pub fn is_parameter(&self) -> bool {
        matches!(
            self,
            Self::X
                | Self::Y
                | Self::Z
                | Self::I
                | Self::J
                | Self::K
                | Self::Tool
                | Self::Speed
                | Self::Feed
        )
    }

    /// Comments and layout tokens
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Comment | Self::LineBreak | Self::Tab)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TokenId {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<TokenId> for String {
    fn from(id: TokenId) -> Self {
        id.as_str().to_string()
    }
}

/// Smallest unit of the tree: an identifier and its value text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub identifier: TokenId,
    pub value: String,
}

impl Token {
    pub fn new(identifier: TokenId, value: impl Into<String>) -> Self {
        Self {
            identifier,
            value: value.into(),
        }
    }

    /// Token with no value, e.g. `MOVE` or `G00`
    pub fn bare(identifier: TokenId) -> Self {
        Self::new(identifier, "")
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(TokenId::Comment, text)
    }

    /// Controller word, e.g. `Token::word("G", "90")`
    pub fn word(word: &str, value: impl Into<String>) -> Self {
        Self::new(TokenId::parse(word), value)
    }

    pub fn is(&self, identifier: &TokenId) -> bool {
        &self.identifier == identifier
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.identifier, self.value)
    }
}
