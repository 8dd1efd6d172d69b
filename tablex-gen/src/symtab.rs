//! Insertion-ordered symbol interning.
//!
//! Both symbol namespaces (tokens, rules) assign ids by declaration order,
//! and declaration order is semantic: it decides the lexer tie-break and the
//! start rule. `SymTab` keeps the name -> index mapping in one
//! [`IndexMap`] so iteration order and index order always agree.

use indexmap::IndexMap;
use smartstring::alias::String;

#[derive(Debug, Default, Clone)]
pub struct SymTab {
    tab: IndexMap<String, ()>,
}

impl SymTab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a name and returns its index, or `None` if the name is
    /// already present.
    pub fn insert(&mut self, name: &str) -> Option<usize> {
        if self.tab.contains_key(name) {
            return None;
        }
        let (index, _) = self.tab.insert_full(name.into(), ());
        Some(index)
    }

    /// Index of a name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.tab.get_index_of(name)
    }

    /// Name at an index, if valid.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.tab.get_index(index).map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tab.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }

    /// Names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tab.keys().map(|name| name.as_str())
    }
}
