//! Structured errors for counter source parsing.
//!
//! - [`ParseError::InvalidValue`]: a value could not be parsed as a number.
//! - [`ParseError::DuplicateKey`]: a key appeared twice in one sample.
//! - [`ParseError::Io`]: reading the source failed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("duplicate key '{key}' at line {line}")]
    DuplicateKey { key: String, line: usize },

    #[error("invalid value for '{key}' at line {line}: '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
    },

    #[error("error during I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParseError>;
