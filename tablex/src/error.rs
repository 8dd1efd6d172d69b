//! Runtime error types.
//!
//! Every error is fatal: the lexer and parser release their token list and
//! stack on return and produce no partial result.

use thiserror::Error;

/// Errors reported while driving the compiled tables over an input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// No token matched at the given byte offset.
    #[error("invalid character at position {position}")]
    BadCharacter { position: usize },

    /// The action table rejected the token at the given index of the token
    /// list (`index == len` means the end-of-input marker was rejected).
    #[error("unexpected token at index {index}")]
    BadToken { index: usize },

    /// The tables requested a shift after the end-of-input marker was
    /// already consumed.
    #[error("unexpected end of input")]
    EofShift,

    /// The tables violated a structural invariant. This indicates corrupt
    /// or hand-edited tables, not a user error.
    #[error("parse tables violated an invariant: {0}")]
    Tables(&'static str),
}
