//! Thompson construction of a shared NFA for all tokens of a language.
//!
//! States live in an integer-indexed arena; transitions refer to targets by
//! index only. Every token's fragment is compiled in isolation and
//! ε-connected from the single global start state, with the fragment's
//! accepting state tagged by the token id. Tag 0 means "not accepting"; a
//! state's tag is set at most once, on a freshly allocated state.

use crate::lexgen::regex::{Ast, ByteClass};
use bit_set::BitSet;

#[derive(Debug, Clone)]
enum Edge {
    /// Consume one byte of the class and move to the target state.
    Bytes(ByteClass, usize),
    /// Move to the target state without consuming input.
    Eps(usize),
}

#[derive(Debug, Clone, Default)]
struct State {
    tag: u32,
    edges: Vec<Edge>,
}

#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: usize,
}

impl Nfa {
    pub fn new() -> Self {
        Self {
            states: vec![State::default()],
            start: 0,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    fn alloc(&mut self) -> usize {
        self.states.push(State::default());
        self.states.len() - 1
    }

    fn eps(&mut self, from: usize, to: usize) {
        self.states[from].edges.push(Edge::Eps(to));
    }

    fn bytes(&mut self, from: usize, class: ByteClass, to: usize) {
        self.states[from].edges.push(Edge::Bytes(class, to));
    }

    /// Compiles one token's regex into the shared automaton, tagging its
    /// accepting state with `token` (a nonzero token id).
    pub fn add_token(&mut self, ast: &Ast, token: u32) {
        debug_assert_ne!(token, 0);
        let entry = self.alloc();
        self.eps(self.start, entry);
        let accept = self.compile(ast, entry);
        self.states[accept].tag = token;
    }

    /// Builds the fragment for `ast` starting at `from` and returns its
    /// accepting state.
    fn compile(&mut self, ast: &Ast, from: usize) -> usize {
        match ast {
            Ast::Byte(byte) => {
                let to = self.alloc();
                self.bytes(from, ByteClass::singleton(*byte), to);
                to
            }
            Ast::Class(class) => {
                let to = self.alloc();
                self.bytes(from, class.clone(), to);
                to
            }
            Ast::Concat(parts) => {
                let mut at = from;
                for part in parts {
                    at = self.compile(part, at);
                }
                at
            }
            Ast::Alt(branches) => {
                let accept = self.alloc();
                for branch in branches {
                    let entry = self.alloc();
                    self.eps(from, entry);
                    let branch_accept = self.compile(branch, entry);
                    self.eps(branch_accept, accept);
                }
                accept
            }
            Ast::Star(inner) => {
                let entry = self.alloc();
                let accept = self.alloc();
                self.eps(from, entry);
                self.eps(from, accept);
                let inner_accept = self.compile(inner, entry);
                self.eps(inner_accept, entry);
                self.eps(inner_accept, accept);
                accept
            }
            Ast::Plus(inner) => {
                let entry = self.alloc();
                self.eps(from, entry);
                let inner_accept = self.compile(inner, entry);
                let accept = self.alloc();
                self.eps(inner_accept, entry);
                self.eps(inner_accept, accept);
                accept
            }
            Ast::Opt(inner) => {
                let accept = self.alloc();
                let inner_accept = self.compile(inner, from);
                self.eps(inner_accept, accept);
                self.eps(from, accept);
                accept
            }
        }
    }

    /// Extends `set` to its ε-closure.
    pub fn eps_closure(&self, set: &mut BitSet) {
        let mut work: Vec<usize> = set.iter().collect();
        while let Some(state) = work.pop() {
            for edge in &self.states[state].edges {
                if let Edge::Eps(to) = edge {
                    if set.insert(*to) {
                        work.push(*to);
                    }
                }
            }
        }
    }

    /// States reachable from `set` by consuming `byte` (without closure).
    pub fn move_on(&self, set: &BitSet, byte: u8) -> BitSet {
        let mut out = BitSet::with_capacity(self.states.len());
        for state in set.iter() {
            for edge in &self.states[state].edges {
                if let Edge::Bytes(class, to) = edge {
                    if class.contains(byte) {
                        out.insert(*to);
                    }
                }
            }
        }
        out
    }

    /// Final tag of a subset: the smallest nonzero member tag, so that the
    /// earliest-declared token wins overlapping matches. 0 if no member
    /// accepts.
    pub fn tag_of(&self, set: &BitSet) -> u32 {
        set.iter()
            .map(|state| self.states[state].tag)
            .filter(|&tag| tag != 0)
            .min()
            .unwrap_or(0)
    }
}
