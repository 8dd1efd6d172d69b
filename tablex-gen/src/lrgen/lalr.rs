//! LALR(1) lookahead computation over the LR(0) graph.
//!
//! FIRST sets and nullability are computed to a fixpoint first. Lookaheads
//! then start from `{$}` on the start item and grow in two ways: walking the
//! LR(1) closure of each kernel item with a reserved dummy lookahead
//! discovers, per Dragon-book 4.63, where lookaheads are generated
//! *spontaneously* (a concrete terminal appears) and where they *propagate*
//! (the dummy survives); a worklist then unions lookahead sets along the
//! propagation edges until nothing changes. Non-kernel items (in particular
//! ε-production reduces) receive their lookaheads by re-running the LR(1)
//! closure inside each state once the kernel sets are final.

use super::grammar::Grammar;
use super::lr0::{Automaton, Item};
use crate::error::GenError;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use tablex::Symbol;

/// The reserved terminal id 0, used as the propagation marker. `first_of`
/// can never produce it because no rule body contains terminal 0.
const DUMMY: u32 = 0;

/// FIRST sets and nullability, indexed by nonterminal id.
#[derive(Debug)]
pub struct FirstSets {
    first: Vec<BTreeSet<u32>>,
    nullable: Vec<bool>,
}

impl FirstSets {
    /// Least fixpoint over all productions, in the style of the classic
    /// changed-loop: a production contributes the FIRST of its body prefix
    /// to its head, and marks the head nullable when the whole body is.
    pub fn compute(grammar: &Grammar) -> Self {
        let n = grammar.n_nonterminals();
        let mut first: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); n];
        let mut nullable = vec![false; n];

        let mut changed = true;
        while changed {
            changed = false;
            for production in &grammar.productions {
                let head = production.head as usize;
                let mut all_nullable = true;
                for sym in &production.body {
                    match *sym {
                        Symbol::Terminal(t) => {
                            if first[head].insert(t) {
                                changed = true;
                            }
                            all_nullable = false;
                            break;
                        }
                        Symbol::Nonterminal(b) => {
                            let from = first[b as usize].clone();
                            for t in from {
                                if first[head].insert(t) {
                                    changed = true;
                                }
                            }
                            if !nullable[b as usize] {
                                all_nullable = false;
                                break;
                            }
                        }
                    }
                }
                if all_nullable && !nullable[head] {
                    nullable[head] = true;
                    changed = true;
                }
            }
        }

        Self { first, nullable }
    }

    pub fn nullable(&self, nonterminal: u32) -> bool {
        self.nullable[nonterminal as usize]
    }

    pub fn first(&self, nonterminal: u32) -> &BTreeSet<u32> {
        &self.first[nonterminal as usize]
    }

    /// FIRST of a symbol string: the terminals that can begin it, and
    /// whether the whole string derives ε.
    pub fn first_of(&self, symbols: &[Symbol]) -> (BTreeSet<u32>, bool) {
        let mut out = BTreeSet::new();
        for sym in symbols {
            match *sym {
                Symbol::Terminal(t) => {
                    out.insert(t);
                    return (out, false);
                }
                Symbol::Nonterminal(n) => {
                    out.extend(self.first[n as usize].iter().copied());
                    if !self.nullable[n as usize] {
                        return (out, false);
                    }
                }
            }
        }
        (out, true)
    }
}

/// LR(1) closure of the seed items within one state: every item introduced
/// for `A -> α • B β` with lookahead set L receives `FIRST(β)`, plus L when
/// β is nullable. Items are re-queued whenever their set grows, so cyclic
/// closures converge.
pub fn closure_with_lookaheads(
    grammar: &Grammar,
    firsts: &FirstSets,
    seeds: &[(Item, BTreeSet<u32>)],
) -> Vec<(Item, BTreeSet<u32>)> {
    let mut map: BTreeMap<Item, BTreeSet<u32>> = BTreeMap::new();
    let mut work: VecDeque<Item> = VecDeque::new();
    for (item, lookaheads) in seeds {
        map.entry(*item).or_default().extend(lookaheads.iter().copied());
        work.push_back(*item);
    }

    while let Some(item) = work.pop_front() {
        let Some(Symbol::Nonterminal(head)) = item.next_symbol(grammar) else {
            continue;
        };
        let lookaheads = map.get(&item).cloned().unwrap_or_default();
        let (mut follow, tail_nullable) = firsts.first_of(item.tail(grammar));
        if tail_nullable {
            follow.extend(lookaheads);
        }
        for &prod in grammar.productions_of(head) {
            let child = Item { prod, dot: 0 };
            let fresh = !map.contains_key(&child);
            let entry = map.entry(child).or_default();
            let before = entry.len();
            entry.extend(follow.iter().copied());
            if fresh || entry.len() != before {
                work.push_back(child);
            }
        }
    }

    map.into_iter().collect()
}

/// Final lookahead sets, parallel to each state's kernel item list.
#[derive(Debug)]
pub struct Lookaheads {
    pub kernel: Vec<Vec<BTreeSet<u32>>>,
}

/// Seeds, discovers, and propagates lookaheads across the automaton.
pub fn compute(
    grammar: &Grammar,
    automaton: &Automaton,
    firsts: &FirstSets,
) -> Result<Lookaheads, GenError> {
    let mut lookaheads: Vec<Vec<BTreeSet<u32>>> = automaton
        .states
        .iter()
        .map(|state| vec![BTreeSet::new(); state.kernel.len()])
        .collect();

    let start_index = automaton.states[0]
        .kernel_index(Item { prod: 0, dot: 0 })
        .ok_or(GenError::Internal("start item missing from start state"))?;
    lookaheads[0][start_index].insert(grammar.eof());

    // Discovery pass: one dummy-seeded closure walk per kernel item.
    let mut edges: HashMap<(usize, usize), BTreeSet<(usize, usize)>> = HashMap::new();
    for (state_id, state) in automaton.states.iter().enumerate() {
        for (kernel_index, &kernel_item) in state.kernel.iter().enumerate() {
            let probe = closure_with_lookaheads(
                grammar,
                firsts,
                &[(kernel_item, BTreeSet::from([DUMMY]))],
            );
            for (item, set) in &probe {
                let Some(sym) = item.next_symbol(grammar) else {
                    continue;
                };
                let target = *state
                    .transitions
                    .get(&sym)
                    .ok_or(GenError::Internal("missing GOTO for an item"))?;
                let successor = automaton.states[target]
                    .kernel_index(item.advanced())
                    .ok_or(GenError::Internal("missing GOTO successor for kernel item"))?;
                for &t in set {
                    if t == DUMMY {
                        edges
                            .entry((state_id, kernel_index))
                            .or_default()
                            .insert((target, successor));
                    } else {
                        lookaheads[target][successor].insert(t);
                    }
                }
            }
        }
    }
    log::debug!(
        "LALR discovery: {} propagation sources",
        edges.len()
    );

    // Propagation to a fixpoint; re-queue a target whenever its set grows.
    let mut work: VecDeque<(usize, usize)> = automaton
        .states
        .iter()
        .enumerate()
        .flat_map(|(state_id, state)| {
            (0..state.kernel.len()).map(move |kernel_index| (state_id, kernel_index))
        })
        .collect();
    while let Some(source) = work.pop_front() {
        let Some(targets) = edges.get(&source) else {
            continue;
        };
        let from = lookaheads[source.0][source.1].clone();
        for &(state_id, kernel_index) in targets {
            let target_set = &mut lookaheads[state_id][kernel_index];
            let before = target_set.len();
            target_set.extend(from.iter().copied());
            if target_set.len() != before {
                work.push_back((state_id, kernel_index));
            }
        }
    }

    Ok(Lookaheads { kernel: lookaheads })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lrgen::{grammar::Grammar, lr0};
    use crate::{GrammarDescription, TokenDef};

    fn build(desc: &GrammarDescription) -> Grammar {
        Grammar::build(desc).unwrap()
    }

    fn nullable_grammar() -> GrammarDescription {
        // s -> a x ; a -> y | ε
        let mut desc = GrammarDescription::new();
        desc.token("x", TokenDef::new("x"));
        desc.token("y", TokenDef::new("y"));
        desc.rule("s", &[&["a", "x"]]);
        desc.rule("a", &[&["y"], &[]]);
        desc
    }

    #[test]
    fn first_sets_track_nullability() {
        let g = build(&nullable_grammar());
        let firsts = FirstSets::compute(&g);
        let s = g.nonterminals.index_of("s").unwrap() as u32;
        let a = g.nonterminals.index_of("a").unwrap() as u32;
        // x = 1, y = 2
        assert!(!firsts.nullable(s));
        assert!(firsts.nullable(a));
        assert_eq!(firsts.first(a), &BTreeSet::from([2]));
        assert_eq!(firsts.first(s), &BTreeSet::from([1, 2]));
    }

    #[test]
    fn first_of_threads_through_nullable_prefixes() {
        let g = build(&nullable_grammar());
        let firsts = FirstSets::compute(&g);
        let a = g.nonterminals.index_of("a").unwrap() as u32;
        let (set, nullable) =
            firsts.first_of(&[Symbol::Nonterminal(a), Symbol::Terminal(1)]);
        assert_eq!(set, BTreeSet::from([1, 2]));
        assert!(!nullable);
        let (set, nullable) = firsts.first_of(&[Symbol::Nonterminal(a)]);
        assert_eq!(set, BTreeSet::from([2]));
        assert!(nullable);
        let (set, nullable) = firsts.first_of(&[]);
        assert!(set.is_empty());
        assert!(nullable);
    }

    #[test]
    fn reduce_lookaheads_reach_the_reducing_states() {
        // sum -> num plus num | num: both completed items must reduce
        // exactly on `$`.
        let mut desc = GrammarDescription::new();
        desc.token("num", TokenDef::new("[0-9]+"));
        desc.token("plus", TokenDef::new("\\+"));
        desc.rule("sum", &[&["num", "plus", "num"], &["num"]]);
        let g = build(&desc);
        let automaton = lr0::build(&g);
        let firsts = FirstSets::compute(&g);
        let lookaheads = compute(&g, &automaton, &firsts).unwrap();

        let eof = g.eof();
        for (state_id, state) in automaton.states.iter().enumerate() {
            for (kernel_index, item) in state.kernel.iter().enumerate() {
                if item.is_complete(&g) && item.prod != 0 {
                    assert_eq!(
                        lookaheads.kernel[state_id][kernel_index],
                        BTreeSet::from([eof]),
                        "state {state_id} item {item:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn closure_gives_epsilon_items_their_lookaheads() {
        // In the start state of `s -> a x ; a -> y | ε`, the non-kernel item
        // `a -> •` must reduce exactly on FIRST(x) = {x}.
        let g = build(&nullable_grammar());
        let automaton = lr0::build(&g);
        let firsts = FirstSets::compute(&g);
        let lookaheads = compute(&g, &automaton, &firsts).unwrap();

        let seeds: Vec<_> = automaton.states[0]
            .kernel
            .iter()
            .zip(&lookaheads.kernel[0])
            .map(|(&item, set)| (item, set.clone()))
            .collect();
        let full = closure_with_lookaheads(&g, &firsts, &seeds);
        let epsilon = full
            .iter()
            .find(|(item, _)| item.is_complete(&g) && g.productions[item.prod].body.is_empty())
            .expect("ε-item in the start state closure");
        assert_eq!(epsilon.1, BTreeSet::from([1]));
    }

    #[test]
    fn left_recursion_converges() {
        // list -> list item | item: the kernel item `list -> list • item`
        // keeps its own lookaheads through the propagation cycle.
        let mut desc = GrammarDescription::new();
        desc.token("item", TokenDef::new("[a-z]"));
        desc.rule("list", &[&["list", "item"], &["item"]]);
        let g = build(&desc);
        let automaton = lr0::build(&g);
        let firsts = FirstSets::compute(&g);
        let lookaheads = compute(&g, &automaton, &firsts).unwrap();

        let eof = g.eof();
        let item_t = 1u32;
        for (state_id, state) in automaton.states.iter().enumerate() {
            for (kernel_index, item) in state.kernel.iter().enumerate() {
                if item.is_complete(&g) && item.prod != 0 {
                    // A finished list element may be followed by another
                    // item or by the end of input.
                    assert_eq!(
                        lookaheads.kernel[state_id][kernel_index],
                        BTreeSet::from([item_t, eof]),
                        "state {state_id} item {item:?}"
                    );
                }
            }
        }
    }
}
