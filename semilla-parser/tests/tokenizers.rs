//! Token sequences per format, fed whole and one byte at a time
//!
//! Each case lists the titles of the merged tokens, newlines included, so the expectations
//! read like the `tokens` command output.

use pretty_assertions::assert_eq;
use rstest::rstest;
use semilla_parser::lexing::{tokenize_lang, Lang};

fn titles(lang: Lang, input: &str, chunk: usize) -> Vec<&'static str> {
    tokenize_lang(lang, input.as_bytes(), chunk)
        .into_iter()
        .map(|lexeme| lexeme.kind)
        .collect()
}

#[rstest]
#[case::cpp_declaration(
    Lang::Cpp,
    "int x = 5; // c\n",
    &["keyword", "space", "identifier", "space", "operator", "space", "decimalLiteral",
      "punctuator", "space", "comment", "newline"]
)]
#[case::cpp_literals(
    Lang::Cpp,
    "0x1F 017 1.5f true",
    &["hexadecimalLiteral", "space", "octalLiteral", "space", "floatingLiteral", "space",
      "booleanLiteral"]
)]
#[case::xml_empty_element(Lang::Xml, "<br/>", &["elementStart", "name", "emptyElementEnd"])]
#[case::mail_header(
    Lang::Rfc2822,
    "Subject: Hi\n\nbody\n",
    &["fieldName", "colon", "fieldBody", "newline", "newline", "messageBody", "newline"]
)]
#[case::href_sentence(
    Lang::Href,
    "see ./foo/bar.txt now",
    &["text", "space", "filename", "space", "text"]
)]
#[case::markdown_lines(
    Lang::Markdown,
    "# Title\n- item\ntext",
    &["header", "newline", "listItem", "newline", "para"]
)]
#[case::sh_comment(Lang::Sh, "ls # list", &["code", "comment"])]
#[case::xml_escape(Lang::XmlEscape, "a&b", &["data", "ampEscape", "data"])]
fn merged_titles(#[case] lang: Lang, #[case] input: &str, #[case] expected: &[&str]) {
    assert_eq!(titles(lang, input, input.len().max(1)), expected);
    assert_eq!(titles(lang, input, 1), expected);
}

#[rstest]
#[case(Lang::Cpp, "a /* x\ny */ b")]
#[case(Lang::Xml, "<!-- x\r\ny -->")]
#[case(Lang::Sh, "echo 'a\nb'")]
fn spanning_tokens_are_split_at_newlines(#[case] lang: Lang, #[case] input: &str) {
    let lexemes = tokenize_lang(lang, input.as_bytes(), 3);
    let newline = lexemes
        .iter()
        .position(|lexeme| lexeme.kind == "newline")
        .expect("one newline");
    assert!(lexemes[newline - 1].fragment);
    assert!(!lexemes[newline + 1].fragment);
    assert_eq!(lexemes[newline - 1].kind, lexemes[newline + 1].kind);
}

#[test]
fn href_example_spans_exactly_the_path() {
    let lexemes = tokenize_lang(Lang::Href, b"see ./foo/bar.txt now", 4);
    let texts: Vec<(&str, &str)> = lexemes
        .iter()
        .map(|lexeme| (lexeme.kind, lexeme.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        vec![
            ("text", "see"),
            ("space", " "),
            ("filename", "./foo/bar.txt"),
            ("space", " "),
            ("text", "now"),
        ]
    );
}
