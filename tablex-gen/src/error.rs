//! Generator error types.
//!
//! All generator errors are fatal: compilation produces either a complete
//! `LanguageData` or an error, never partial tables. Conflicts are detected
//! with numeric production ids internally and rewritten into nonterminal
//! names before they leave the crate; the raw ids are an implementation
//! detail and never appear in a [`GenError`].

use smartstring::alias::String;
use std::fmt;
use thiserror::Error;

/// The two fatal table conflicts. There are no precedence or associativity
/// declarations to resolve them with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::ShiftReduce => write!(f, "shift/reduce"),
            ConflictKind::ReduceReduce => write!(f, "reduce/reduce"),
        }
    }
}

/// Errors produced while compiling a grammar description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// A user-facing grammar error: malformed regex, unknown or duplicate
    /// symbol. `offset` is a byte offset into the offending regex when the
    /// error came from the regex parser.
    #[error("{message}")]
    Grammar {
        message: std::string::String,
        offset: Option<usize>,
    },

    /// A shift/reduce or reduce/reduce conflict, reported by the names of
    /// the colliding head nonterminals (de-duplicated, in declaration
    /// order).
    #[error("{kind} conflict involving {}", .nonterminals.join(", "))]
    Conflict {
        kind: ConflictKind,
        nonterminals: Vec<String>,
    },

    /// A violated internal invariant. This is a generator bug, not a user
    /// error.
    #[error("internal invariant violated: {0}")]
    Internal(&'static str),
}

impl GenError {
    pub(crate) fn grammar(message: impl Into<std::string::String>) -> Self {
        GenError::Grammar {
            message: message.into(),
            offset: None,
        }
    }

    pub(crate) fn grammar_at(message: impl Into<std::string::String>, offset: usize) -> Self {
        GenError::Grammar {
            message: message.into(),
            offset: Some(offset),
        }
    }
}
