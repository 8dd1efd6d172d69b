//! Grammar model: symbol interning, body resolution, and start
//! augmentation.

use crate::error::GenError;
use crate::symtab::SymTab;
use crate::GrammarDescription;
use tablex::{Symbol, START_NAME};

/// One alternative `head -> body` in resolved form. Production 0 is always
/// the augmented `$start -> S $`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub head: u32,
    pub body: Vec<Symbol>,
}

/// The resolved grammar: disjoint terminal and nonterminal namespaces that
/// share the column space of the parser tables.
///
/// Terminal ids are `1..=T` in token declaration order (0 is reserved, the
/// end marker is `T+1`). Nonterminal ids are 0 for the synthetic start and
/// `1..=N` in rule declaration order; the first-declared rule is the user
/// start.
#[derive(Debug)]
pub struct Grammar {
    pub terminals: SymTab,
    pub nonterminals: SymTab,
    pub productions: Vec<Production>,
    prods_by_head: Vec<Vec<usize>>,
}

impl Grammar {
    pub fn build(desc: &GrammarDescription) -> Result<Self, GenError> {
        let mut terminals = SymTab::new();
        for name in desc.tokens.keys() {
            if terminals.insert(name).is_none() {
                return Err(GenError::grammar(format!("duplicate token {name}")));
            }
        }

        if desc.rules.is_empty() {
            return Err(GenError::grammar("grammar has no rules"));
        }
        let mut nonterminals = SymTab::new();
        nonterminals.insert(START_NAME);
        for name in desc.rules.keys() {
            if terminals.contains(name) {
                return Err(GenError::grammar(format!(
                    "rule {name} is already declared as a token"
                )));
            }
            if nonterminals.insert(name).is_none() {
                return Err(GenError::grammar(format!("duplicate rule {name}")));
            }
        }

        let eof = terminals.len() as u32 + 1;
        let mut productions = vec![Production {
            head: 0,
            body: vec![Symbol::Nonterminal(1), Symbol::Terminal(eof)],
        }];
        for (rule_index, (rule, alternatives)) in desc.rules.iter().enumerate() {
            let head = rule_index as u32 + 1;
            for alternative in alternatives {
                let body = alternative
                    .iter()
                    .map(|name| {
                        if let Some(index) = terminals.index_of(name) {
                            Ok(Symbol::Terminal(index as u32 + 1))
                        } else if let Some(index) = nonterminals.index_of(name) {
                            Ok(Symbol::Nonterminal(index as u32))
                        } else {
                            Err(GenError::grammar(format!(
                                "unknown symbol {name} in rule {rule}"
                            )))
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                productions.push(Production { head, body });
            }
        }

        let mut prods_by_head = vec![Vec::new(); nonterminals.len()];
        for (index, production) in productions.iter().enumerate() {
            prods_by_head[production.head as usize].push(index);
        }

        Ok(Self {
            terminals,
            nonterminals,
            productions,
            prods_by_head,
        })
    }

    /// T, the highest declared token id.
    pub fn max_terminal(&self) -> u32 {
        self.terminals.len() as u32
    }

    /// Id of the end-of-input terminal.
    pub fn eof(&self) -> u32 {
        self.max_terminal() + 1
    }

    pub fn n_nonterminals(&self) -> usize {
        self.nonterminals.len()
    }

    /// Width of the parser state table: terminals (with the reserved 0
    /// column), the shared `$`/start column, and the user nonterminals.
    pub fn n_cols(&self) -> usize {
        self.max_terminal() as usize + 1 + self.n_nonterminals()
    }

    /// Column of a symbol in the parser state table.
    pub fn col(&self, sym: Symbol) -> usize {
        match sym {
            Symbol::Terminal(t) => t as usize,
            Symbol::Nonterminal(n) => self.max_terminal() as usize + 1 + n as usize,
        }
    }

    /// Production indices with the given head.
    pub fn productions_of(&self, head: u32) -> &[usize] {
        &self.prods_by_head[head as usize]
    }

    pub fn nonterminal_name(&self, id: u32) -> &str {
        self.nonterminals.name(id as usize).unwrap_or("?")
    }
}
