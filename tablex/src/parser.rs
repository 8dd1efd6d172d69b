//! Table-driven shift-reduce parser.

use crate::error::RuntimeError;
use crate::language::{LanguageData, Symbol};
use crate::lexer::Token;

/// A parse tree: terminal leaves carry the token (and thereby its source
/// bounds), nonterminal nodes carry the rule id and the children in body
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Terminal(Token),
    Nonterminal { id: u32, children: Vec<Tree> },
}

impl Tree {
    /// The terminal tokens of the leaves, left to right.
    pub fn leaf_tokens(&self) -> Vec<Token> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<Token>) {
        match self {
            Tree::Terminal(token) => out.push(*token),
            Tree::Nonterminal { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

/// Parses a token list against the parser tables of `lang`.
///
/// The automaton keeps two stacks in lockstep (states one deeper than
/// trees): a shift pushes the current token and the GOTO target, a reduce by
/// production `p` pops `|body(p)|` entries from both, wraps the popped trees
/// in the head nonterminal, and pushes the GOTO on the head's column. The
/// end-of-input marker is supplied once after the last real token and then
/// persists as the current terminal, so the final reduce of the augmented
/// production fires on it. The parse accepts when the augmented start
/// reaches the top of the tree stack; the result is its first child, the
/// tree of the user's start rule.
pub fn parse(lang: &LanguageData, tokens: &[Token]) -> Result<Tree, RuntimeError> {
    let eof = lang.eof_id();
    let mut states: Vec<usize> = vec![1];
    let mut trees: Vec<Tree> = Vec::new();
    let mut index = 0usize;

    loop {
        if let Some(Tree::Nonterminal { id: 0, .. }) = trees.last() {
            debug_assert_eq!(trees.len(), 1);
            let Some(Tree::Nonterminal { mut children, .. }) = trees.pop() else {
                unreachable!("just matched the stack top");
            };
            if children.is_empty() {
                return Err(RuntimeError::Tables("augmented start has no children"));
            }
            return Ok(children.swap_remove(0));
        }

        let terminal = match tokens.get(index) {
            Some(token) => token.terminal,
            None => eof,
        };
        let state = *states.last().ok_or(RuntimeError::Tables("empty state stack"))?;
        let action = lang.parse_action_table[state][terminal as usize];
        log::trace!("parse: state {state} terminal {terminal} action {action}");

        if action < 0 {
            return Err(RuntimeError::BadToken {
                index: index.min(tokens.len()),
            });
        } else if action == 0 {
            if index > tokens.len() {
                return Err(RuntimeError::EofShift);
            }
            let token = match tokens.get(index) {
                Some(token) => *token,
                // Synthetic end marker; its leaf is dropped at accept.
                None => {
                    let at = tokens.last().map(|t| t.to).unwrap_or(0);
                    Token {
                        terminal: eof,
                        from: at,
                        to: at,
                    }
                }
            };
            let next = lang.parse_state_table[state][terminal as usize] as usize;
            if next == 0 {
                return Err(RuntimeError::Tables("shift into the error state"));
            }
            trees.push(Tree::Terminal(token));
            states.push(next);
            index += 1;
        } else {
            let item = lang
                .items
                .get((action - 1) as usize)
                .ok_or(RuntimeError::Tables("reduction id out of range"))?;
            let count = item.body.len();
            if trees.len() < count {
                return Err(RuntimeError::Tables("parse stack underflow"));
            }
            let children = trees.split_off(trees.len() - count);
            states.truncate(states.len() - count);
            let top = *states.last().ok_or(RuntimeError::Tables("empty state stack"))?;
            let goto = lang.parse_state_table[top][lang.col(Symbol::Nonterminal(item.head))] as usize;
            // The augmented start has no GOTO anywhere; the accept check at
            // the top of the loop fires before the state is consulted.
            if goto == 0 && item.head != 0 {
                return Err(RuntimeError::Tables("missing GOTO after reduction"));
            }
            trees.push(Tree::Nonterminal {
                id: item.head,
                children,
            });
            states.push(goto);
        }
    }
}
