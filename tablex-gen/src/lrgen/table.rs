//! Action/goto table assembly and conflict detection.
//!
//! States are numbered from 1 in the emitted tables; row 0 is the error
//! state (all GOTOs 0, all actions -1). Conflicts are detected here with
//! numeric production ids and rewritten into head-nonterminal names by
//! [`TableError::into_gen_error`] before they leave the generator.

use super::grammar::Grammar;
use super::lalr::{closure_with_lookaheads, FirstSets, Lookaheads};
use super::lr0::Automaton;
use crate::error::{ConflictKind, GenError};
use std::collections::{BTreeMap, BTreeSet};
use tablex::Symbol;

#[derive(Debug)]
pub struct ParserTables {
    /// `[rows][T+N+2]` GOTO on any symbol.
    pub state_table: Vec<Vec<u32>>,
    /// `[rows][T+2]` action per terminal (column `T+1` is `$`).
    pub action_table: Vec<Vec<i32>>,
}

/// Assembly failure, still carrying numeric production ids.
#[derive(Debug)]
pub enum TableError {
    Conflict {
        kind: ConflictKind,
        productions: Vec<usize>,
    },
    Internal(&'static str),
}

impl TableError {
    /// Rewrites production ids into the colliding head-nonterminal names,
    /// de-duplicated in declaration order. This is the boundary: the ids do
    /// not survive past it.
    pub fn into_gen_error(self, grammar: &Grammar) -> GenError {
        match self {
            TableError::Conflict { kind, productions } => {
                let heads: BTreeSet<u32> = productions
                    .iter()
                    .map(|&prod| grammar.productions[prod].head)
                    .collect();
                GenError::Conflict {
                    kind,
                    nonterminals: heads
                        .into_iter()
                        .map(|head| grammar.nonterminal_name(head).into())
                        .collect(),
                }
            }
            TableError::Internal(what) => GenError::Internal(what),
        }
    }
}

/// Flattens the automaton and lookaheads into the two parser tables.
pub fn assemble(
    grammar: &Grammar,
    automaton: &Automaton,
    firsts: &FirstSets,
    lookaheads: &Lookaheads,
) -> Result<ParserTables, TableError> {
    let rows = automaton.states.len() + 1;
    let n_cols = grammar.n_cols();
    let n_actions = grammar.eof() as usize + 1;
    let mut state_table = vec![vec![0u32; n_cols]; rows];
    let mut action_table = vec![vec![-1i32; n_actions]; rows];

    for (state_id, state) in automaton.states.iter().enumerate() {
        let row = state_id + 1;

        for (&sym, &target) in &state.transitions {
            state_table[row][grammar.col(sym)] = target as u32 + 1;
        }

        // Lookaheads of every item in the state, kernel and closure alike.
        let seeds: Vec<_> = state
            .kernel
            .iter()
            .zip(&lookaheads.kernel[state_id])
            .map(|(&item, set)| (item, set.clone()))
            .collect();
        let full = closure_with_lookaheads(grammar, firsts, &seeds);

        let mut reduces: BTreeMap<u32, BTreeSet<usize>> = BTreeMap::new();
        for (item, set) in &full {
            if item.is_complete(grammar) {
                for &terminal in set {
                    reduces.entry(terminal).or_default().insert(item.prod);
                }
            }
        }

        for terminal in 1..=grammar.eof() {
            let shifts = state
                .transitions
                .contains_key(&Symbol::Terminal(terminal));
            let empty = BTreeSet::new();
            let candidates = reduces.get(&terminal).unwrap_or(&empty);
            let cell = &mut action_table[row][terminal as usize];
            match (shifts, candidates.len()) {
                (false, 0) => {} // error, the default
                (true, 0) => *cell = 0,
                (false, 1) => {
                    let prod = *candidates.iter().next().expect("one candidate");
                    *cell = prod as i32 + 1;
                }
                (true, _) => {
                    let mut productions = candidates.clone();
                    for item in &state.items {
                        if item.next_symbol(grammar) == Some(Symbol::Terminal(terminal)) {
                            productions.insert(item.prod);
                        }
                    }
                    return Err(TableError::Conflict {
                        kind: ConflictKind::ShiftReduce,
                        productions: productions.into_iter().collect(),
                    });
                }
                (false, _) => {
                    return Err(TableError::Conflict {
                        kind: ConflictKind::ReduceReduce,
                        productions: candidates.iter().copied().collect(),
                    });
                }
            }
        }
    }

    log::debug!(
        "parser tables: {} states, {} columns",
        rows - 1,
        n_cols
    );
    Ok(ParserTables {
        state_table,
        action_table,
    })
}
