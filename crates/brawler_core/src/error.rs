//! Errors raised while building domain objects from token trees

use brawler_token::TokenError;
use thiserror::Error;

/// A well-formed token tree that does not describe a valid domain object.
///
/// Any of these aborts the whole load; the previous in-memory level is never
/// partially overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("'{node}' is missing required field '{field}'")]
    MissingField { node: &'static str, field: &'static str },
    #[error("unknown type '{name}' in '{context}'")]
    UnknownType { name: String, context: &'static str },
    #[error("bad value in '{node}': {source}")]
    BadValue {
        node: &'static str,
        #[source]
        source: TokenError,
    },
    #[error("expected a '{expected}' token, found '{found}'")]
    WrongHead { expected: &'static str, found: String },
    #[error("back panel order references panel {index} but only {count} panels are registered")]
    BadPanelOrder { index: i64, count: usize },
}
