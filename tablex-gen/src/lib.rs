//! Lexer and parser table generator for the `tablex` runtime.
//!
//! The input is a declarative [`GrammarDescription`]: named tokens (byte
//! regexes, declaration order significant) and named rules (lists of
//! alternatives over symbol names, the first rule being the start symbol).
//! [`compile`] runs the whole pipeline and returns the runtime's
//! [`LanguageData`](tablex::LanguageData):
//!
//! * regex → NFA (Thompson) → DFA (subset construction) → dense lexer
//!   tables ([`lexgen`]),
//! * grammar → LR(0) canonical collection → LALR(1) lookaheads →
//!   action/goto tables with conflict detection ([`lrgen`]).
//!
//! Compilation either succeeds completely or fails with a [`GenError`];
//! there is no partial output.
//!
//! ```rust
//! use tablex::{lex, parse};
//! use tablex_gen::{compile, GrammarDescription, TokenDef};
//!
//! let mut desc = GrammarDescription::new();
//! desc.token("num", TokenDef::new("[0-9]+"));
//! desc.token("plus", TokenDef::new("\\+"));
//! desc.rule("sum", &[&["num", "plus", "num"], &["num"]]);
//!
//! let lang = compile(&desc).unwrap();
//! let tokens = lex(&lang, b"1+2").unwrap();
//! let tree = parse(&lang, &tokens).unwrap();
//! assert_eq!(tree.leaf_tokens().len(), 3);
//! ```

pub mod error;
pub mod lexgen;
pub mod lrgen;
mod symtab;

pub use crate::error::{ConflictKind, GenError};

use indexmap::IndexMap;
use smartstring::alias::String;
use tablex::{ItemData, LanguageData, NonterminalData, TerminalData};

/// The only token option the generator itself honors: the lexer recognizes
/// matches of the token but emits nothing for them.
pub const SKIP_OPTION: &str = "skip";

/// One token declaration: a byte regex plus free-form options. Options other
/// than [`SKIP_OPTION`] pass through the generator untouched and unexamined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDef {
    pub regex: String,
    pub options: Vec<String>,
}

impl TokenDef {
    pub fn new(regex: &str) -> Self {
        Self {
            regex: regex.into(),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: &str) -> Self {
        self.options.push(option.into());
        self
    }
}

/// The structured grammar description consumed by [`compile`].
///
/// Both maps preserve insertion order, and that order is semantic: token
/// declaration order breaks lexer ties (earlier wins), and the first rule is
/// the start symbol.
#[derive(Debug, Clone, Default)]
pub struct GrammarDescription {
    pub tokens: IndexMap<String, TokenDef>,
    pub rules: IndexMap<String, Vec<Vec<String>>>,
}

impl GrammarDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a token. Re-declaring a name replaces the earlier entry.
    pub fn token(&mut self, name: &str, def: TokenDef) -> &mut Self {
        self.tokens.insert(name.into(), def);
        self
    }

    /// Declares a rule as a list of alternatives, each a list of symbol
    /// names.
    pub fn rule(&mut self, name: &str, alternatives: &[&[&str]]) -> &mut Self {
        let alternatives = alternatives
            .iter()
            .map(|alternative| alternative.iter().map(|&sym| String::from(sym)).collect())
            .collect();
        self.rules.insert(name.into(), alternatives);
        self
    }
}

/// Generator limits.
#[derive(Debug, Clone)]
pub struct Options {
    /// Ceiling on the lexer DFA state count; subset construction is
    /// worst-case exponential, so runaway grammars fail instead of
    /// exhausting memory.
    pub max_lexer_states: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_lexer_states: 1 << 16,
        }
    }
}

/// Compiles a description with default [`Options`].
pub fn compile(desc: &GrammarDescription) -> Result<LanguageData, GenError> {
    compile_with(desc, &Options::default())
}

/// Compiles a description into the consolidated [`LanguageData`]. The lexer
/// and parser halves are independent; both must succeed before anything is
/// emitted.
pub fn compile_with(
    desc: &GrammarDescription,
    options: &Options,
) -> Result<LanguageData, GenError> {
    let lexer = lexgen::build_lexer(&desc.tokens, options)?;
    let grammar = lrgen::grammar::Grammar::build(desc)?;
    let parser = lrgen::build_parser(&grammar)?;

    let terminals = grammar
        .terminals
        .iter()
        .enumerate()
        .map(|(index, name)| {
            (
                String::from(name),
                TerminalData {
                    id: index as u32 + 1,
                },
            )
        })
        .collect();
    let nonterminals = grammar
        .nonterminals
        .iter()
        .enumerate()
        .map(|(index, name)| {
            (
                String::from(name),
                NonterminalData {
                    id: index as u32,
                    is_start: index == 0,
                },
            )
        })
        .collect();
    let items = grammar
        .productions
        .iter()
        .map(|production| ItemData {
            head: production.head,
            body: production.body.clone(),
        })
        .collect();

    Ok(LanguageData {
        lex_skip_table: lexer.skip_table,
        lex_state_table: lexer.state_table,
        lex_final_table: lexer.final_table,
        parse_state_table: parser.state_table,
        parse_action_table: parser.action_table,
        terminals,
        nonterminals,
        items,
        max_terminal: grammar.max_terminal(),
    })
}
