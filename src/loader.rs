//! Flat-array loader (C4): drives the scanner recursively to populate a
//! caller-supplied token array in prefix (depth-first) order.
//!
//! `sub` is not trusted from the scanner's own bookkeeping beyond the
//! container's direct children (that bookkeeping only ever tracks direct
//! pairs/elements, see `scanner::Scanner::scan_container`); instead each
//! container's `sub` is set to however many tokens its own recursive
//! descent actually wrote. That is exact by construction at every nesting
//! depth and keeps invariant 2 (`array[i+1..i+sub]` are exactly `i`'s
//! descendants) from depending on manually threading a running count
//! through the byte-at-a-time scan.

use crate::config::MAX_NESTING_DEPTH;
use crate::error::Error;
use crate::scanner::{RawItem, Scanner};
use crate::tag::{Token, TokenKind};

/// Counts how many tokens [`load`] would write for `buf`, without writing
/// any of them. Useful for sizing a destination array up front.
pub fn count(buf: &[u8]) -> Result<usize, Error> {
    if buf.is_empty() {
        return Err(Error::Invalid);
    }
    let mut scanner = Scanner::begin(buf);
    let item = scanner.read()?.ok_or(Error::Invalid)?;
    count_value(&item, buf, 1)
}

fn count_value(item: &RawItem, buf: &[u8], depth: u32) -> Result<usize, Error> {
    let mut total = 1usize;
    if item.kind.is_container() {
        if depth + 1 > MAX_NESTING_DEPTH {
            return Err(Error::TooDeep);
        }
        let interior = interior_slice(buf, item)?;
        total += count_children(item.kind, interior, depth + 1)?;
    }
    Ok(total)
}

fn count_children(kind: TokenKind, interior: &[u8], depth: u32) -> Result<usize, Error> {
    let mut scanner = Scanner::begin(interior);
    let mut total = 0usize;
    match kind {
        TokenKind::Object => {
            while let Some((name, value)) = scanner.parse()? {
                total += count_value(&name, interior, depth)?;
                total += count_value(&value, interior, depth)?;
            }
        }
        TokenKind::Array => {
            while let Some(value) = scanner.read()? {
                total += count_value(&value, interior, depth)?;
            }
        }
        _ => {}
    }
    Ok(total)
}

/// Loads `buf` into `tokens`, returning the number of tokens written.
///
/// Fails with [`Error::OutOfToken`] (reporting how much was written before
/// running out) if `tokens` is too small, with [`Error::Parsing`] if the
/// scanner hits malformed input, and with [`Error::TooDeep`] if the
/// document nests past [`MAX_NESTING_DEPTH`].
pub fn load(buf: &[u8], tokens: &mut [Token]) -> Result<usize, Error> {
    if buf.is_empty() || tokens.is_empty() {
        return Err(Error::Invalid);
    }
    tracing::debug!(bytes = buf.len(), capacity = tokens.len(), "loading document");
    let mut scanner = Scanner::begin(buf);
    let item = scanner.read()?.ok_or(Error::Invalid)?;
    let mut written = 0usize;
    write_value(&item, 0, buf, 1, tokens, &mut written)?;
    tracing::debug!(written, "loaded document");
    Ok(written)
}

fn write_value(
    item: &RawItem,
    base: usize,
    buf: &[u8],
    depth: u32,
    tokens: &mut [Token],
    written: &mut usize,
) -> Result<(), Error> {
    if *written >= tokens.len() {
        tracing::warn!(written, capacity = tokens.len(), "token array exhausted");
        return Err(Error::OutOfToken { written: *written });
    }
    let idx = *written;
    let mut token = Token::new(item.kind, (item.start as usize + base) as u32, item.len);
    token.children = item.children;
    tokens[idx] = token;
    *written += 1;

    if item.kind.is_container() {
        if depth + 1 > MAX_NESTING_DEPTH {
            return Err(Error::TooDeep);
        }
        let interior = interior_slice(buf, item)?;
        let interior_base = base + item.start as usize + 1;
        let before = *written;
        write_children(item.kind, interior, interior_base, depth + 1, tokens, written)?;
        tokens[idx].sub = (*written - before) as u32;
    }
    Ok(())
}

fn write_children(
    kind: TokenKind,
    interior: &[u8],
    base: usize,
    depth: u32,
    tokens: &mut [Token],
    written: &mut usize,
) -> Result<(), Error> {
    let mut scanner = Scanner::begin(interior);
    match kind {
        TokenKind::Object => {
            while let Some((name, value)) = scanner.parse()? {
                write_value(&name, base, interior, depth, tokens, written)?;
                write_value(&value, base, interior, depth, tokens, written)?;
            }
        }
        TokenKind::Array => {
            while let Some(value) = scanner.read()? {
                write_value(&value, base, interior, depth, tokens, written)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// The bytes strictly between a container token's brackets.
fn interior_slice<'a>(buf: &'a [u8], item: &RawItem) -> Result<&'a [u8], Error> {
    let start = item.start as usize;
    let end = start + item.len as usize;
    if item.len < 2 || end > buf.len() {
        return Err(Error::Parsing { at: start });
    }
    Ok(&buf[start + 1..end - 1])
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn counts_and_loads_agree() {
        let buf = br#"{"x":1,"y":2}"#;
        let n = count(buf).unwrap();
        let mut tokens = vec![Token::default(); n];
        let written = load(buf, &mut tokens).unwrap();
        assert_eq!(n, written);
        assert_eq!(n, 5);
    }

    #[test]
    fn object_children_and_sub() {
        let buf = br#"{"x":1,"y":2}"#;
        let mut tokens = vec![Token::default(); 5];
        load(buf, &mut tokens).unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::Object);
        assert_eq!(tokens[0].children, 2);
        assert_eq!(tokens[0].sub, 4);
    }

    #[test]
    fn nested_sub_counts_grandchildren() {
        let buf = br#"{"a":[10,20,30]}"#;
        let n = count(buf).unwrap();
        assert_eq!(n, 6);
        let mut tokens = vec![Token::default(); n];
        load(buf, &mut tokens).unwrap();
        // object: "a"(1) + array(1) + three numbers(3) = 5 descendants.
        assert_eq!(tokens[0].sub, 5);
        assert_eq!(tokens[2].kind(), TokenKind::Array);
        assert_eq!(tokens[2].children, 3);
        assert_eq!(tokens[2].sub, 3);
    }

    #[test]
    fn out_of_token_reports_written_count() {
        let buf = br#"{"x":1,"y":2}"#;
        let mut tokens = vec![Token::default(); 3];
        let err = load(buf, &mut tokens).unwrap_err();
        assert_eq!(err, Error::OutOfToken { written: 3 });
    }

    #[test]
    fn truncated_object_is_parsing_error() {
        let buf = br#"{"a":1"#;
        assert!(matches!(count(buf), Err(Error::Parsing { .. })));
    }

    #[test]
    fn empty_buffer_is_invalid() {
        assert_eq!(count(b""), Err(Error::Invalid));
    }

    #[test]
    fn deeply_nested_document_rejected_past_depth_limit() {
        let depth = MAX_NESTING_DEPTH as usize + 1;
        let mut buf = Vec::new();
        for _ in 0..depth {
            buf.push(b'[');
        }
        buf.push(b'1');
        for _ in 0..depth {
            buf.push(b']');
        }
        assert_eq!(count(&buf), Err(Error::TooDeep));
    }
}
