//! Table-driven longest-match lexer.

use crate::error::RuntimeError;
use crate::language::LanguageData;

/// A recognized token: the terminal id and the half-open byte range
/// `[from, to)` it covers in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub terminal: u32,
    pub from: usize,
    pub to: usize,
}

impl Token {
    /// The bytes this token covers in `source`.
    #[inline]
    pub fn text<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.from..self.to]
    }
}

/// Tokenizes `source` against the lexer tables of `lang`.
///
/// From each scan position the DFA runs from state 1, remembering the last
/// final state visited; when no transition remains, the remembered match is
/// emitted and scanning resumes just past it. Finality is only observed
/// after consuming a byte, so no token ever matches the empty string and the
/// scan position always advances. Tokens of skip terminals are recognized
/// (and participate in longest-match) but not emitted.
pub fn lex(lang: &LanguageData, source: &[u8]) -> Result<Vec<Token>, RuntimeError> {
    let mut tokens = Vec::new();
    let mut index = 0;

    while index < source.len() {
        let mut state = 1usize;
        let mut last_final: Option<(u32, usize)> = None;

        let mut i = index;
        while i < source.len() {
            let next = lang.lex_state_table[state][source[i] as usize] as usize;
            if next == 0 {
                break;
            }
            state = next;
            let tag = lang.lex_final_table[state];
            if tag != 0 {
                last_final = Some((tag, i));
            }
            i += 1;
        }

        let Some((terminal, end)) = last_final else {
            return Err(RuntimeError::BadCharacter { position: index });
        };

        let token = Token {
            terminal,
            from: index,
            to: end + 1,
        };
        log::trace!(
            "lex: {:?} {:?}",
            lang.terminal_name(terminal).unwrap_or("?"),
            token
        );
        if !lang.lex_skip_table[terminal as usize] {
            tokens.push(token);
        }
        index = end + 1;
    }

    Ok(tokens)
}
