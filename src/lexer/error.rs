use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unterminated string literal at position {position}")]
    UnterminatedString { position: usize },
    #[error("Unrecognized escape sequence '\\{escape}' at position {position}")]
    UnknownEscape { escape: char, position: usize },
    #[error("Unexpected end of line inside string literal at position {position}")]
    UnexpectedLineBreak { position: usize },
    #[error("Number literal '{literal}' does not fit a 32-bit integer at position {position}")]
    InvalidNumberLiteral { literal: String, position: usize },
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("Expected token {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
}

pub type LexResult<T> = Result<T, LexError>;
