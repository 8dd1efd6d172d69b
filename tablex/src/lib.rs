//! Table-driven lexing and parsing runtime.
//!
//! `tablex` owns [`LanguageData`], the compiled form of a language produced
//! by the `tablex-gen` generator, and the two operations that consume it:
//!
//! * [`lex`] — longest-match tokenization against the DFA tables,
//! * [`parse`] — LALR(1) shift-reduce parsing against the action/goto
//!   tables, yielding a [`Tree`].
//!
//! The runtime holds no state between calls; the token list and the parse
//! stack are owned by the call and dropped on return, success or failure.

mod error;
mod language;
mod lexer;
mod parser;

pub use crate::error::RuntimeError;
pub use crate::language::{
    ItemData, LanguageData, NonterminalData, Symbol, TerminalData, START_NAME,
};
pub use crate::lexer::{lex, Token};
pub use crate::parser::{parse, Tree};
