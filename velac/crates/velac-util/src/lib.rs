//! Core utilities shared across the interpreter pipeline: string interning,
//! spans, and the diagnostic/error machinery.
//!
//! Every other crate in the workspace (`velac-lex`, `velac-par`, `velac-sem`,
//! `velac-eval`, `velac-drv`) depends on this one and only this one among the
//! workspace members, keeping the dependency graph a simple fan-out rather
//! than a lattice.

pub mod diagnostic;
pub mod environment;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use environment::Environment;
pub use error::{InterpretError, InterpretResult};
pub use span::{FileId, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
