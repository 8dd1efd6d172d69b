//! NFA to DFA conversion by subset construction.
//!
//! Produces the dense lexer tables directly: `state_table[state][byte]` and
//! `final_table[state]`, with state 0 the reject sink (all transitions 0,
//! final 0) and state 1 the start state. Subsets are interned by set
//! identity; the final tag of a subset is its smallest nonzero member tag,
//! so earlier-declared tokens win overlapping matches.

use crate::error::GenError;
use crate::lexgen::nfa::Nfa;
use bit_set::BitSet;
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
pub struct DfaTables {
    pub state_table: Vec<Vec<u32>>,
    pub final_table: Vec<u32>,
}

/// Runs the subset construction. `max_states` bounds the total DFA state
/// count (including the reject sink); crossing it fails with
/// `GrammarError("lexer too large")` since the construction is worst-case
/// exponential in the NFA size.
pub fn build(nfa: &Nfa, max_states: usize) -> Result<DfaTables, GenError> {
    let mut state_table: Vec<Vec<u32>> = vec![vec![0; 256]];
    let mut final_table: Vec<u32> = vec![0];

    let mut start = BitSet::with_capacity(nfa.state_count());
    start.insert(nfa.start());
    nfa.eps_closure(&mut start);

    let mut ids: HashMap<BitSet, usize> = HashMap::new();
    let mut work: VecDeque<(usize, BitSet)> = VecDeque::new();

    ids.insert(start.clone(), 1);
    state_table.push(vec![0; 256]);
    final_table.push(nfa.tag_of(&start));
    work.push_back((1, start));

    while let Some((id, set)) = work.pop_front() {
        for byte in 0..=255u8 {
            let mut target = nfa.move_on(&set, byte);
            if target.is_empty() {
                continue;
            }
            nfa.eps_closure(&mut target);

            let target_id = match ids.get(&target) {
                Some(&existing) => existing,
                None => {
                    let new_id = state_table.len();
                    if new_id >= max_states {
                        return Err(GenError::grammar("lexer too large"));
                    }
                    ids.insert(target.clone(), new_id);
                    state_table.push(vec![0; 256]);
                    final_table.push(nfa.tag_of(&target));
                    work.push_back((new_id, target));
                    new_id
                }
            };
            state_table[id][byte as usize] = target_id as u32;
        }
        log::trace!("dfa: state {id} complete ({} states total)", state_table.len());
    }

    Ok(DfaTables {
        state_table,
        final_table,
    })
}
