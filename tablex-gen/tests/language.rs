//! End-to-end tests: compile a description, then drive the runtime lexer
//! and parser against the emitted tables.

use tablex::{lex, parse, LanguageData, RuntimeError, Token, Tree};
use tablex_gen::{compile, ConflictKind, GenError, GrammarDescription, TokenDef, SKIP_OPTION};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn arithmetic() -> GrammarDescription {
    let mut desc = GrammarDescription::new();
    desc.token("num", TokenDef::new("[0-9]+"));
    desc.token("plus", TokenDef::new("\\+"));
    desc.rule("sum", &[&["num", "plus", "num"], &["num"]]);
    desc
}

fn run(lang: &LanguageData, source: &[u8]) -> Tree {
    let tokens = lex(lang, source).unwrap();
    parse(lang, &tokens).unwrap()
}

fn leaf_texts(tree: &Tree, source: &[u8]) -> Vec<String> {
    tree.leaf_tokens()
        .iter()
        .map(|token| String::from_utf8(token.text(source).to_vec()).unwrap())
        .collect()
}

#[test]
fn trivial_arithmetic() {
    init_logger();
    let lang = compile(&arithmetic()).unwrap();
    let num = lang.terminal_id("num").unwrap();
    let plus = lang.terminal_id("plus").unwrap();
    let sum = lang.nonterminal_id("sum").unwrap();

    let source = b"1+2";
    let tree = run(&lang, source);
    let Tree::Nonterminal { id, children } = &tree else {
        panic!("expected a sum node, got {tree:?}");
    };
    assert_eq!(*id, sum);
    assert_eq!(children.len(), 3);
    let ids: Vec<u32> = tree.leaf_tokens().iter().map(|t| t.terminal).collect();
    assert_eq!(ids, vec![num, plus, num]);
    assert_eq!(leaf_texts(&tree, source), vec!["1", "+", "2"]);

    let tree = run(&lang, b"3");
    let Tree::Nonterminal { id, children } = &tree else {
        panic!("expected a sum node, got {tree:?}");
    };
    assert_eq!(*id, sum);
    assert_eq!(children.len(), 1);
    assert_eq!(leaf_texts(&tree, b"3"), vec!["3"]);
}

#[test]
fn skipped_whitespace_does_not_change_the_tree() {
    init_logger();
    let mut desc = arithmetic();
    desc.token("ws", TokenDef::new("[ \\t]+").with_option(SKIP_OPTION));
    let lang = compile(&desc).unwrap();

    let spaced = lex(&lang, b"1 + 2").unwrap();
    let dense = lex(&lang, b"1+2").unwrap();
    assert_eq!(
        spaced.iter().map(|t| t.terminal).collect::<Vec<_>>(),
        dense.iter().map(|t| t.terminal).collect::<Vec<_>>(),
    );

    let spaced_tree = parse(&lang, &spaced).unwrap();
    assert_eq!(leaf_texts(&spaced_tree, b"1 + 2"), vec!["1", "+", "2"]);
}

#[test]
fn ambiguous_grammar_reports_the_nonterminal() {
    init_logger();
    let mut desc = GrammarDescription::new();
    desc.token("num", TokenDef::new("[0-9]+"));
    desc.token("plus", TokenDef::new("\\+"));
    desc.rule("e", &[&["e", "plus", "e"], &["num"]]);
    let err = compile(&desc).unwrap_err();
    let GenError::Conflict { kind, nonterminals } = err else {
        panic!("expected a conflict, got {err:?}");
    };
    assert_eq!(kind, ConflictKind::ShiftReduce);
    assert_eq!(nonterminals, vec!["e"]);
}

#[test]
fn longest_match_and_declaration_order_tie_break() {
    init_logger();
    let mut desc = GrammarDescription::new();
    desc.token("if", TokenDef::new("if"));
    desc.token("ident", TokenDef::new("[a-z]+"));
    desc.rule("word", &[&["if"], &["ident"]]);
    let lang = compile(&desc).unwrap();
    let kw = lang.terminal_id("if").unwrap();
    let ident = lang.terminal_id("ident").unwrap();

    let toks = lex(&lang, b"if").unwrap();
    assert_eq!(toks.iter().map(|t| t.terminal).collect::<Vec<_>>(), [kw]);
    let toks = lex(&lang, b"iff").unwrap();
    assert_eq!(toks.iter().map(|t| t.terminal).collect::<Vec<_>>(), [ident]);
    let toks = lex(&lang, b"i").unwrap();
    assert_eq!(toks.iter().map(|t| t.terminal).collect::<Vec<_>>(), [ident]);
}

#[test]
fn left_recursion_builds_a_left_leaning_list() {
    init_logger();
    let mut desc = GrammarDescription::new();
    desc.token("item", TokenDef::new("[a-z]"));
    desc.rule("list", &[&["list", "item"], &["item"]]);
    let lang = compile(&desc).unwrap();
    let list = lang.nonterminal_id("list").unwrap();

    let source = b"abc";
    let tree = run(&lang, source);
    // list(list(list(a), b), c): every left child is the nested list.
    let Tree::Nonterminal { id, children } = &tree else {
        panic!("expected a list node");
    };
    assert_eq!(*id, list);
    assert_eq!(children.len(), 2);
    assert!(matches!(&children[0], Tree::Nonterminal { id, .. } if *id == list));
    assert_eq!(leaf_texts(&tree, source), vec!["a", "b", "c"]);
}

#[test]
fn unknown_symbol_is_a_grammar_error() {
    init_logger();
    let mut desc = arithmetic();
    desc.rule("extra", &[&["undeclared"]]);
    let err = compile(&desc).unwrap_err();
    let GenError::Grammar { message, .. } = err else {
        panic!("expected a grammar error, got {err:?}");
    };
    assert!(message.contains("undeclared"), "message: {message}");
}

#[test]
fn malformed_regex_is_fatal() {
    init_logger();
    let mut desc = GrammarDescription::new();
    desc.token("broken", TokenDef::new("[a-"));
    desc.rule("s", &[&["broken"]]);
    let err = compile(&desc).unwrap_err();
    let GenError::Grammar { message, offset } = err else {
        panic!("expected a grammar error, got {err:?}");
    };
    assert!(message.contains("invalid regex"), "message: {message}");
    assert!(offset.is_some());
}

#[test]
fn empty_alternative_parses_as_epsilon() {
    init_logger();
    // s -> opt x ; opt -> y | ε: the ε-reduce must fire on FIRST(x).
    let mut desc = GrammarDescription::new();
    desc.token("x", TokenDef::new("x"));
    desc.token("y", TokenDef::new("y"));
    desc.rule("s", &[&["opt", "x"]]);
    desc.rule("opt", &[&["y"], &[]]);
    let lang = compile(&desc).unwrap();

    assert_eq!(leaf_texts(&run(&lang, b"x"), b"x"), vec!["x"]);
    assert_eq!(leaf_texts(&run(&lang, b"yx"), b"yx"), vec!["y", "x"]);
}

#[test]
fn lexer_rejects_unmatched_bytes() {
    init_logger();
    let lang = compile(&arithmetic()).unwrap();
    let err = lex(&lang, b"1+%2").unwrap_err();
    assert_eq!(err, RuntimeError::BadCharacter { position: 2 });
}

#[test]
fn parser_rejects_unexpected_tokens() {
    init_logger();
    let lang = compile(&arithmetic()).unwrap();
    let tokens = lex(&lang, b"1+2+3").unwrap();
    let err = parse(&lang, &tokens).unwrap_err();
    assert_eq!(err, RuntimeError::BadToken { index: 3 });
}

#[test]
fn leaves_equal_the_token_stream() {
    init_logger();
    let lang = compile(&arithmetic()).unwrap();
    for source in [&b"1+2"[..], b"42", b"7+99"] {
        let tokens = lex(&lang, source).unwrap();
        let tree = parse(&lang, &tokens).unwrap();
        assert_eq!(tree.leaf_tokens(), tokens, "source {source:?}");
    }
}

#[test]
fn table_invariants_hold() {
    init_logger();
    let mut desc = arithmetic();
    desc.token("ws", TokenDef::new("[ ]+").with_option(SKIP_OPTION));
    let lang = compile(&desc).unwrap();
    let t = lang.max_terminal as usize;
    let n = lang.nonterminals.len();

    // Action codomain: -1, 0, or a reduction id.
    let max_reduce = lang.items.len() as i32;
    for row in &lang.parse_action_table {
        assert_eq!(row.len(), t + 2);
        for &action in row {
            assert!((-1..=max_reduce).contains(&action));
        }
    }

    // A shift on a terminal always has a GOTO target.
    for (row, actions) in lang.parse_action_table.iter().enumerate() {
        for terminal in 1..=t + 1 {
            if actions[terminal] == 0 {
                assert_ne!(lang.parse_state_table[row][terminal], 0);
            }
        }
    }

    // State-table width covers terminals, `$`, and nonterminals.
    for row in &lang.parse_state_table {
        assert_eq!(row.len(), t + 1 + n);
    }

    // The lexer reject sink loops to itself and accepts nothing.
    assert!(lang.lex_state_table[0].iter().all(|&s| s == 0));
    assert_eq!(lang.lex_final_table[0], 0);

    // Every declared terminal keeps at least one final state.
    for data in lang.terminals.values() {
        assert!(
            lang.lex_final_table.iter().any(|&tag| tag == data.id),
            "terminal {} lost its final state",
            data.id
        );
    }

    // Contiguous id ranges: terminals from 1, nonterminals from 0.
    let mut terminal_ids: Vec<u32> = lang.terminals.values().map(|d| d.id).collect();
    terminal_ids.sort_unstable();
    assert_eq!(terminal_ids, (1..=t as u32).collect::<Vec<_>>());
    let mut nonterminal_ids: Vec<u32> = lang.nonterminals.values().map(|d| d.id).collect();
    nonterminal_ids.sort_unstable();
    assert_eq!(nonterminal_ids, (0..n as u32).collect::<Vec<_>>());

    // Exactly one start nonterminal, with id 0.
    let starts: Vec<_> = lang.nonterminals.values().filter(|d| d.is_start).collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].id, 0);
}

#[test]
fn language_data_survives_serialization() {
    init_logger();
    let lang = compile(&arithmetic()).unwrap();
    let text = serde_json::to_string(&lang).unwrap();
    let back: LanguageData = serde_json::from_str(&text).unwrap();
    assert_eq!(lang, back);

    // Field names are a stable contract.
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    for field in [
        "lex_skip_table",
        "lex_state_table",
        "lex_final_table",
        "parse_state_table",
        "parse_action_table",
        "terminals",
        "nonterminals",
        "items",
        "max_terminal",
    ] {
        assert!(value.get(field).is_some(), "missing field {field}");
    }
}

#[test]
fn token_bounds_are_half_open() {
    init_logger();
    let lang = compile(&arithmetic()).unwrap();
    let tokens = lex(&lang, b"12+345").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token {
                terminal: 1,
                from: 0,
                to: 2
            },
            Token {
                terminal: 2,
                from: 2,
                to: 3
            },
            Token {
                terminal: 1,
                from: 3,
                to: 6
            },
        ]
    );
}
