//! Error types shared across the interpreter pipeline.

use thiserror::Error;

use crate::span::Span;

/// The language's error taxonomy, carried by every pipeline stage.
///
/// `Span` is `Copy` and small; carrying it inline keeps diagnostics
/// single-span as required, without a separate location-tracking pass.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("parse error at {span:?}: {message}")]
    ParseError { message: String, span: Span },

    #[error("type error at {span:?}: expected {expected}, found {found}")]
    TypeError {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("undefined name `{name}` at {span:?}")]
    UndefinedName { name: String, span: Span },

    #[error("index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("expected a boolean value, found `{found}`")]
    NotBoolean { found: String },

    #[error("arity mismatch calling `{name}`: expected {expected} arguments, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

pub type InterpretResult<T> = std::result::Result<T, InterpretError>;
