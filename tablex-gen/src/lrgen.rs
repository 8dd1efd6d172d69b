//! Parser table construction: grammar resolution, LR(0) canonical
//! collection, LALR(1) lookaheads, and action/goto assembly.

pub mod grammar;
pub mod lalr;
pub mod lr0;
pub mod table;

use crate::error::GenError;
use grammar::Grammar;
use table::ParserTables;

/// Runs the parser half of the pipeline over a resolved grammar. Conflicts
/// come back as `GrammarConflict` values naming the colliding nonterminals.
pub fn build_parser(grammar: &Grammar) -> Result<ParserTables, GenError> {
    let automaton = lr0::build(grammar);
    let firsts = lalr::FirstSets::compute(grammar);
    let lookaheads = lalr::compute(grammar, &automaton, &firsts)?;
    table::assemble(grammar, &automaton, &firsts, &lookaheads)
        .map_err(|err| err.into_gen_error(grammar))
}
