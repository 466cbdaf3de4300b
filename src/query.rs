//! Path-walker (C5): parses a dotted path with bracket indices and walks a
//! loaded token array using each token's child/descendant counts, never
//! re-tokenizing the source buffer.

use crate::config::{PathDelimiter, DEFAULT_DELIMITER};
use crate::error::Error;
use crate::number;
use crate::tag::{Token, TokenKind};

/// One parsed piece of a path: a name, or a bracketed numeric index.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Name(&'a [u8]),
    Index(usize),
}

/// Splits a path into [`Segment`]s. A name ends at the delimiter, at `[`,
/// or at end-of-string; a bracket may directly follow a name with no
/// delimiter, and further brackets may chain directly after a `]`.
struct PathLexer<'a> {
    path: &'a [u8],
    pos: usize,
    delimiter: u8,
}

impl<'a> PathLexer<'a> {
    fn new(path: &'a [u8], delimiter: u8) -> Self {
        PathLexer { path, pos: 0, delimiter }
    }

    fn next_segment(&mut self) -> Result<Option<Segment<'a>>, Error> {
        if self.pos < self.path.len() && self.path[self.pos] == self.delimiter {
            self.pos += 1;
        }
        if self.pos >= self.path.len() {
            return Ok(None);
        }
        if self.path[self.pos] == b'[' {
            self.pos += 1;
            let start = self.pos;
            while self.pos < self.path.len() && self.path[self.pos] != b']' {
                self.pos += 1;
            }
            if self.pos >= self.path.len() {
                return Err(Error::Invalid);
            }
            let digits = &self.path[start..self.pos];
            self.pos += 1;
            let n = parse_usize(digits).ok_or(Error::Invalid)?;
            return Ok(Some(Segment::Index(n)));
        }
        let start = self.pos;
        while self.pos < self.path.len() && self.path[self.pos] != self.delimiter && self.path[self.pos] != b'[' {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(Error::Invalid);
        }
        Ok(Some(Segment::Name(&self.path[start..self.pos])))
    }
}

fn parse_usize(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: usize = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        n = n.checked_mul(10)?.checked_add((b - b'0') as usize)?;
    }
    Some(n)
}

/// Bytewise prefix comparison, limited by the shorter operand. A query for
/// `"foo"` therefore matches a key `"foobar"` — kept as shipped behavior.
fn lcmp(key: &[u8], query: &[u8]) -> bool {
    let n = key.len().min(query.len());
    key[..n] == query[..n]
}

/// Locates the token addressed by `path`, or the root token if `path` is
/// `None`/empty. `buf` must be the same buffer [`crate::load`] was called
/// with, so name comparisons can read token bytes.
pub fn query<'t>(buf: &[u8], tokens: &'t [Token], path: Option<&[u8]>) -> Option<&'t Token> {
    query_with_delimiter(buf, tokens, path, DEFAULT_DELIMITER)
}

/// Like [`query`], with an explicit path delimiter instead of
/// [`DEFAULT_DELIMITER`].
pub fn query_with_delimiter<'t>(
    buf: &[u8],
    tokens: &'t [Token],
    path: Option<&[u8]>,
    delimiter: PathDelimiter,
) -> Option<&'t Token> {
    if tokens.is_empty() {
        return None;
    }
    let path = match path {
        None => return tokens.first(),
        Some(p) if p.is_empty() => return tokens.first(),
        Some(p) => p,
    };
    let mut lexer = PathLexer::new(path, delimiter);
    match walk(buf, tokens, 0, &mut lexer) {
        Ok(Some(idx)) => tokens.get(idx),
        _ => None,
    }
}

fn walk(buf: &[u8], tokens: &[Token], mut idx: usize, lexer: &mut PathLexer<'_>) -> Result<Option<usize>, Error> {
    loop {
        let segment = match lexer.next_segment()? {
            Some(s) => s,
            None => return Ok(Some(idx)),
        };
        let current = tokens.get(idx).ok_or(Error::Invalid)?;
        match segment {
            Segment::Name(name) => {
                if current.kind() != TokenKind::Object {
                    return Ok(None);
                }
                idx = match find_member(buf, tokens, idx, current.children, name) {
                    Some(value_idx) => value_idx,
                    None => return Ok(None),
                };
            }
            Segment::Index(n) => {
                if current.kind() != TokenKind::Array {
                    return Ok(None);
                }
                if n as u32 >= current.children {
                    return Ok(None);
                }
                idx = nth_element(tokens, idx, n);
            }
        }
    }
}

/// Scans an object's direct `(name, value)` pairs for one matching `name`,
/// returning the matching value's index. Non-matches are skipped by the
/// value's own descendant count, so mismatched subtrees are never visited.
fn find_member(buf: &[u8], tokens: &[Token], obj_idx: usize, size: u32, name: &[u8]) -> Option<usize> {
    let mut i = obj_idx + 1;
    for _ in 0..size {
        let name_tok = tokens.get(i)?;
        let value_idx = i + 1;
        let value_tok = tokens.get(value_idx)?;
        if lcmp(name_tok.bytes(buf), name) {
            return Some(value_idx);
        }
        let skip = if value_tok.kind().is_container() { value_tok.sub + 2 } else { 2 };
        i += skip as usize;
    }
    None
}

/// Walks past `n` array elements (skipping each by its own descendant
/// count when it's a container) and returns the index of the `n`th one.
fn nth_element(tokens: &[Token], arr_idx: usize, n: usize) -> usize {
    let mut i = arr_idx + 1;
    for _ in 0..n {
        let el = &tokens[i];
        let skip = if el.kind().is_container() { el.sub + 1 } else { 1 };
        i += skip as usize;
    }
    i
}

/// Outcome of a typed query: the converted value, the token's actual kind
/// when it doesn't match what was asked for, or nothing at the given path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Typed<T> {
    Found(T),
    WrongType(TokenKind),
    NotFound,
}

/// Locates `path` and converts it as a number. A non-Number token (or a
/// Number token whose lexeme fails to convert) reports its actual kind.
pub fn query_number(buf: &[u8], tokens: &[Token], path: Option<&[u8]>) -> Typed<f64> {
    match query(buf, tokens, path) {
        None => Typed::NotFound,
        Some(tok) if tok.kind() != TokenKind::Number => Typed::WrongType(tok.kind()),
        Some(tok) => match number::convert(tok.bytes(buf)) {
            Some(v) => Typed::Found(v),
            None => Typed::WrongType(TokenKind::Number),
        },
    }
}

/// Locates `path` and copies its string bytes into `dest`, NUL-terminating
/// within `dest`'s capacity. Returns the number of bytes stored (excluding
/// the terminator), or the token's actual kind if it isn't a String.
pub fn query_string(buf: &[u8], tokens: &[Token], path: Option<&[u8]>, dest: &mut [u8]) -> Typed<usize> {
    match query(buf, tokens, path) {
        None => Typed::NotFound,
        Some(tok) if tok.kind() != TokenKind::String => Typed::WrongType(tok.kind()),
        Some(tok) => {
            if dest.is_empty() {
                return Typed::Found(0);
            }
            let bytes = tok.bytes(buf);
            let n = bytes.len().min(dest.len() - 1);
            dest[..n].copy_from_slice(&bytes[..n]);
            dest[n] = 0;
            Typed::Found(n)
        }
    }
}

/// Locates `path` and reports its token kind, or `None` if the path
/// doesn't resolve.
pub fn query_type(buf: &[u8], tokens: &[Token], path: Option<&[u8]>) -> Option<TokenKind> {
    query(buf, tokens, path).map(|t| t.kind())
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
    use crate::loader::load;

    fn loaded(src: &'static [u8]) -> (&'static [u8], Vec<Token>) {
        let n = crate::loader::count(src).unwrap();
        let mut tokens = vec![Token::default(); n];
        load(src, &mut tokens).unwrap();
        (src, tokens)
    }

    #[test]
    fn root_query_with_no_path() {
        let (buf, tokens) = loaded(br#"{"x":1,"y":2}"#);
        let t = query(buf, &tokens, None).unwrap();
        assert_eq!(t.kind(), TokenKind::Object);
    }

    #[test]
    fn flat_object_lookup() {
        let (buf, tokens) = loaded(br#"{"x":1,"y":2}"#);
        assert_eq!(query_number(buf, &tokens, Some(b"y")), Typed::Found(2.0));
    }

    #[test]
    fn array_index_lookup() {
        let (buf, tokens) = loaded(br#"{"a":[10,20,30]}"#);
        assert_eq!(query_number(buf, &tokens, Some(b"a[1]")), Typed::Found(20.0));
    }

    #[test]
    fn deeply_nested_path() {
        let (buf, tokens) = loaded(br#"{"m":{"e":[{"p":{"x":3.5}}]}}"#);
        assert_eq!(query_number(buf, &tokens, Some(b"m.e[0].p.x")), Typed::Found(3.5));
    }

    #[test]
    fn string_query_copies_and_terminates() {
        let (buf, tokens) = loaded(br#"{"s":"hi"}"#);
        let mut dest = [0xAAu8; 8];
        let result = query_string(buf, &tokens, Some(b"s"), &mut dest);
        assert_eq!(result, Typed::Found(2));
        assert_eq!(&dest[..3], b"hi\0");
    }

    #[test]
    fn type_query_reports_booleans_and_null() {
        let (buf, tokens) = loaded(br#"{"b":true,"n":null}"#);
        assert_eq!(query_type(buf, &tokens, Some(b"b")), Some(TokenKind::True));
        assert_eq!(query_type(buf, &tokens, Some(b"n")), Some(TokenKind::Null));
    }

    #[test]
    fn missing_name_is_not_found() {
        let (buf, tokens) = loaded(br#"{"x":1}"#);
        assert_eq!(query_number(buf, &tokens, Some(b"z")), Typed::NotFound);
    }

    #[test]
    fn wrong_type_reports_actual_kind() {
        let (buf, tokens) = loaded(br#"{"x":"hi"}"#);
        assert_eq!(query_number(buf, &tokens, Some(b"x")), Typed::WrongType(TokenKind::String));
    }

    #[test]
    fn prefix_match_is_intentional() {
        let (buf, tokens) = loaded(br#"{"foobar":1}"#);
        assert_eq!(query_number(buf, &tokens, Some(b"foo")), Typed::Found(1.0));
    }

    #[test]
    fn skip_past_non_matching_container_member() {
        let (buf, tokens) = loaded(br#"{"skip":{"deep":[1,2,3]},"want":42}"#);
        assert_eq!(query_number(buf, &tokens, Some(b"want")), Typed::Found(42.0));
    }
}
