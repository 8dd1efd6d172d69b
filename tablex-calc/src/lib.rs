//! A small integer calculator built on the `tablex` toolchain.
//!
//! The arithmetic language (four operators, parentheses, skipped
//! whitespace) is compiled once at first use with `tablex-gen`; evaluation
//! walks the parse trees produced by the `tablex` runtime.

use once_cell::sync::Lazy;
use tablex::{lex, parse, LanguageData, RuntimeError, Tree};
use tablex_gen::{compile, GrammarDescription, TokenDef, SKIP_OPTION};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("unable to parse number: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("division by zero")]
    DivideByZero,
}

/// The compiled calculator language plus the symbol ids evaluation
/// dispatches on.
pub struct CalcLanguage {
    pub data: LanguageData,
    expr: u32,
    term: u32,
    factor: u32,
    plus: u32,
    minus: u32,
    times: u32,
    slash: u32,
}

fn description() -> GrammarDescription {
    let mut desc = GrammarDescription::new();
    desc.token("ws", TokenDef::new("[ \\t]+").with_option(SKIP_OPTION));
    desc.token("num", TokenDef::new("[0-9]+"));
    desc.token("plus", TokenDef::new("\\+"));
    desc.token("minus", TokenDef::new("-"));
    desc.token("times", TokenDef::new("\\*"));
    desc.token("slash", TokenDef::new("/"));
    desc.token("lparen", TokenDef::new("\\("));
    desc.token("rparen", TokenDef::new("\\)"));
    desc.rule(
        "expr",
        &[
            &["expr", "plus", "term"],
            &["expr", "minus", "term"],
            &["term"],
        ],
    );
    desc.rule(
        "term",
        &[
            &["term", "times", "factor"],
            &["term", "slash", "factor"],
            &["factor"],
        ],
    );
    desc.rule("factor", &[&["num"], &["lparen", "expr", "rparen"]]);
    desc
}

static LANGUAGE: Lazy<CalcLanguage> = Lazy::new(|| {
    let data = compile(&description()).expect("calculator grammar is well-formed");
    let id = |name: &str| data.nonterminal_id(name).expect("declared rule");
    let term_id = |name: &str| data.terminal_id(name).expect("declared token");
    CalcLanguage {
        expr: id("expr"),
        term: id("term"),
        factor: id("factor"),
        plus: term_id("plus"),
        minus: term_id("minus"),
        times: term_id("times"),
        slash: term_id("slash"),
        data,
    }
});

pub fn language() -> &'static CalcLanguage {
    &LANGUAGE
}

/// Lexes, parses, and evaluates one expression.
pub fn eval_str(source: &str) -> Result<i64, CalcError> {
    let lang = language();
    let tokens = lex(&lang.data, source.as_bytes())?;
    let tree = parse(&lang.data, &tokens)?;
    eval(lang, &tree, source.as_bytes())
}

fn eval(lang: &CalcLanguage, tree: &Tree, source: &[u8]) -> Result<i64, CalcError> {
    match tree {
        Tree::Terminal(token) => {
            let text = std::str::from_utf8(token.text(source)).expect("digits are ascii");
            Ok(text.parse()?)
        }
        Tree::Nonterminal { id, children } => match children.as_slice() {
            [only] => eval(lang, only, source),
            [left, Tree::Terminal(op), right] if *id == lang.expr || *id == lang.term => {
                let lhs = eval(lang, left, source)?;
                let rhs = eval(lang, right, source)?;
                if op.terminal == lang.plus {
                    Ok(lhs + rhs)
                } else if op.terminal == lang.minus {
                    Ok(lhs - rhs)
                } else if op.terminal == lang.times {
                    Ok(lhs * rhs)
                } else if op.terminal == lang.slash && rhs == 0 {
                    Err(CalcError::DivideByZero)
                } else {
                    Ok(lhs / rhs)
                }
            }
            // factor -> lparen expr rparen
            [_, inner, _] if *id == lang.factor => eval(lang, inner, source),
            _ => unreachable!("tree shape follows the grammar"),
        },
    }
}
