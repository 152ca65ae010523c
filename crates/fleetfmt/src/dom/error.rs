use super::Keys;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid path expression `{expr}`: {reason}")]
    InvalidPath { expr: String, reason: &'static str },
    #[error("nothing found at `{0}`")]
    NotFound(Keys),
}
