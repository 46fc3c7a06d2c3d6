// crates/parser/tests/lexer_semis.rs
use go125_parser::lexer::{Lexer, Tok};

/// Offsets of the semicolons inserted by the lexer (zero-width `Semi`).
fn injected_semis(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter_map(|(s, t, e)| (matches!(t, Tok::Semi) && s == e).then_some(s))
        .collect()
}

#[test]
fn newline_after_operand_inserts_semi() {
    assert_eq!(injected_semis("x\ny"), vec![1, 3]);
    assert_eq!(injected_semis("x\r\ny"), vec![1, 4]);
    assert_eq!(injected_semis("x\n\n\ny"), vec![1, 5]);
}

#[test]
fn keywords_and_closers_insert_semi() {
    assert_eq!(injected_semis("return\n"), vec![6]);
    assert_eq!(injected_semis("break\ncontinue\n"), vec![5, 14]);
    assert_eq!(injected_semis("i++\n"), vec![3]);
    assert_eq!(injected_semis("f()\n"), vec![3]);
    assert_eq!(injected_semis("a[0]\n"), vec![4]);
    assert_eq!(injected_semis("{}\n"), vec![2]);
}

#[test]
fn operators_and_openers_do_not_insert_semi() {
    assert_eq!(injected_semis("a +\nb"), vec![5]);
    assert_eq!(injected_semis("f(\n)"), vec![4]);
    assert_eq!(injected_semis("if\n"), Vec::<usize>::new());
}

#[test]
fn comments_and_semis() {
    // A line comment keeps the pending semicolon for the newline after it.
    assert_eq!(injected_semis("x // c\ny"), vec![6, 8]);
    // A multi-line block comment acts as a newline.
    assert_eq!(injected_semis("x /* a\nb */ y"), vec![6, 13]);
    // A single-line one does not.
    assert_eq!(injected_semis("x /* a */\ny"), vec![9, 11]);
}

#[test]
fn explicit_semis_keep_their_width() {
    let toks: Vec<_> = Lexer::new("a; b").collect();
    assert_eq!(toks[1], (1, Tok::Semi, 2));
    assert_eq!(toks.last(), Some(&(4, Tok::Semi, 4)));
}
