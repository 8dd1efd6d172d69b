//! Lexer table construction: one regex per token, compiled into a shared
//! NFA, then determinized into the dense tables of `LanguageData`.

pub mod dfa;
pub mod nfa;
pub mod regex;

use crate::error::GenError;
use crate::{Options, TokenDef, SKIP_OPTION};
use indexmap::IndexMap;
use smartstring::alias::String;

#[derive(Debug)]
pub struct LexerTables {
    pub state_table: Vec<Vec<u32>>,
    pub final_table: Vec<u32>,
    pub skip_table: Vec<bool>,
}

/// Compiles every token's regex and assembles the lexer tables. Token ids
/// are assigned in declaration order starting at 1; the skip table marks the
/// terminals whose tokens the lexer discards after recognition.
pub fn build_lexer(
    tokens: &IndexMap<String, TokenDef>,
    options: &Options,
) -> Result<LexerTables, GenError> {
    let mut automaton = nfa::Nfa::new();
    let mut skip_table = vec![false; tokens.len() + 1];

    for (i, (name, def)) in tokens.iter().enumerate() {
        let id = (i + 1) as u32;
        let ast = regex::parse(def.regex.as_bytes()).map_err(|err| match err {
            GenError::Grammar { message, offset } => GenError::Grammar {
                message: format!("token {name}: {message}"),
                offset,
            },
            other => other,
        })?;
        automaton.add_token(&ast, id);
        skip_table[id as usize] = def.options.iter().any(|opt| opt == SKIP_OPTION);
    }
    log::debug!(
        "lexer NFA: {} tokens, {} states",
        tokens.len(),
        automaton.state_count()
    );

    let tables = dfa::build(&automaton, options.max_lexer_states)?;
    log::debug!("lexer DFA: {} states", tables.state_table.len());

    Ok(LexerTables {
        state_table: tables.state_table,
        final_table: tables.final_table,
        skip_table,
    })
}
