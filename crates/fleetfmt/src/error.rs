use crate::formatter::OptionParseError;
use crate::parser;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid syntax")]
    InvalidSyntax { errors: Vec<parser::Error> },
    /// A pass produced text that no longer parses.
    #[error("formatting produced invalid syntax: {}", .errors.first().map(|e| e.message.as_str()).unwrap_or_default())]
    Unstable { errors: Vec<parser::Error> },
    #[error("invalid conventions: {0}")]
    InvalidConventions(String),
    #[error(transparent)]
    InvalidOption(#[from] OptionParseError),
}
