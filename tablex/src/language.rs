//! The compiled language description: every table the runtime needs to
//! tokenize and parse input, bundled as one serializable value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smartstring::alias::String;

/// Name under which the synthetic augmented start nonterminal appears in
/// [`LanguageData::nonterminals`]. User rule names are plain identifiers, so
/// the `$` prefix cannot collide.
pub const START_NAME: &str = "$start";

/// A grammar symbol: the tag is stored alongside the id, so table column
/// lookup never dispatches on anything but the discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// Terminal id, `1..=max_terminal + 1` (the end marker is
    /// `max_terminal + 1` and never appears in user rule bodies).
    Terminal(u32),
    /// Nonterminal id, `0..` (0 is the augmented start).
    Nonterminal(u32),
}

/// Entry of the [`LanguageData::terminals`] map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalData {
    pub id: u32,
}

/// Entry of the [`LanguageData::nonterminals`] map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonterminalData {
    pub id: u32,
    pub is_start: bool,
}

/// One production in output form, indexed by reduction id: the action-table
/// value `k > 0` reduces by `items[k - 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    /// Head nonterminal id.
    pub head: u32,
    /// Body symbols, left to right. Empty bodies are legal.
    pub body: Vec<Symbol>,
}

/// The consolidated output of the generator and the sole input of the
/// runtime.
///
/// Table layout:
/// * `lex_state_table[state][byte]` — lexer DFA transition; state 0 is the
///   reject sink, state 1 the start state, entry 0 means reject.
/// * `lex_final_table[state]` — 0, or the terminal recognized upon entering
///   the state.
/// * `lex_skip_table[terminal]` — true if the lexer discards tokens of this
///   terminal after recognition (entry 0 unused).
/// * `parse_state_table[state][col]` — GOTO on any symbol; columns `0..=T`
///   are terminals (0 unused), columns `T+1..=T+N+1` are nonterminals. The
///   end marker `$` (terminal `T+1`) shares the column of nonterminal 0,
///   which is safe because the augmented start never occurs in a body.
/// * `parse_action_table[state][terminal]` — `-1` error, `0` shift, `k > 0`
///   reduce by production `k - 1`. Rows carry `T+2` entries so the `$`
///   column `T+1` is addressable.
///
/// Row 0 of both parser tables is the error state (all 0 / all -1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageData {
    pub lex_skip_table: Vec<bool>,
    pub lex_state_table: Vec<Vec<u32>>,
    pub lex_final_table: Vec<u32>,
    pub parse_state_table: Vec<Vec<u32>>,
    pub parse_action_table: Vec<Vec<i32>>,
    pub terminals: IndexMap<String, TerminalData>,
    pub nonterminals: IndexMap<String, NonterminalData>,
    pub items: Vec<ItemData>,
    pub max_terminal: u32,
}

impl LanguageData {
    /// Id of the end-of-input terminal supplied by the parser after the last
    /// real token.
    #[inline]
    pub fn eof_id(&self) -> u32 {
        self.max_terminal + 1
    }

    /// Column of a symbol in `parse_state_table`.
    #[inline]
    pub fn col(&self, sym: Symbol) -> usize {
        match sym {
            Symbol::Terminal(t) => t as usize,
            Symbol::Nonterminal(n) => (self.max_terminal + 1 + n) as usize,
        }
    }

    /// Looks up a declared token id by name.
    pub fn terminal_id(&self, name: &str) -> Option<u32> {
        self.terminals.get(name).map(|t| t.id)
    }

    /// Looks up a rule id by name.
    pub fn nonterminal_id(&self, name: &str) -> Option<u32> {
        self.nonterminals.get(name).map(|n| n.id)
    }

    /// Name of a terminal id, if it is a declared token.
    pub fn terminal_name(&self, id: u32) -> Option<&str> {
        self.terminals
            .iter()
            .find(|(_, t)| t.id == id)
            .map(|(name, _)| name.as_str())
    }

    /// Name of a nonterminal id.
    pub fn nonterminal_name(&self, id: u32) -> Option<&str> {
        self.nonterminals
            .iter()
            .find(|(_, n)| n.id == id)
            .map(|(name, _)| name.as_str())
    }
}
