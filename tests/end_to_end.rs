//! The six end-to-end scenarios: load a document, then query it.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

use flatjson::{count, load, query_number, query_string, query_type, Token, TokenKind, Typed};

fn load_doc(src: &[u8]) -> Vec<Token> {
    let n = count(src).unwrap();
    let mut tokens = vec![Token::default(); n];
    let written = load(src, &mut tokens).unwrap();
    assert_eq!(written, n);
    tokens
}

#[test]
fn flat_object_of_two_numbers() {
    let buf = br#"{"x":1,"y":2}"#;
    let tokens = load_doc(buf);
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[0].kind(), TokenKind::Object);
    assert_eq!(tokens[0].children, 2);
    assert_eq!(tokens[0].sub, 4);
    assert_eq!(query_number(buf, &tokens, Some(b"y")), Typed::Found(2.0));
}

#[test]
fn array_of_numbers_by_index() {
    let buf = br#"{"a":[10,20,30]}"#;
    let tokens = load_doc(buf);
    assert_eq!(query_number(buf, &tokens, Some(b"a[1]")), Typed::Found(20.0));
}

#[test]
fn deeply_nested_path_through_object_and_array() {
    let buf = br#"{"m":{"e":[{"p":{"x":3.5}}]}}"#;
    let tokens = load_doc(buf);
    assert_eq!(query_number(buf, &tokens, Some(b"m.e[0].p.x")), Typed::Found(3.5));
}

#[test]
fn string_copy_with_nul_terminator() {
    let buf = br#"{"s":"hi"}"#;
    let tokens = load_doc(buf);
    let mut dest = [0u8; 8];
    let result = query_string(buf, &tokens, Some(b"s"), &mut dest);
    assert_eq!(result, Typed::Found(2));
    assert_eq!(&dest[..3], b"hi\0");
}

#[test]
fn booleans_and_null_types() {
    let buf = br#"{"b":true,"n":null}"#;
    let tokens = load_doc(buf);
    assert_eq!(query_type(buf, &tokens, Some(b"b")), Some(TokenKind::True));
    assert_eq!(query_type(buf, &tokens, Some(b"n")), Some(TokenKind::Null));
}

#[test]
fn truncated_document_fails_to_load() {
    let buf = br#"{"a":1"#;
    assert!(count(buf).is_err());
}
