//! The token scanner (C3): advances a [`Cursor`] through the input buffer,
//! yielding one token per [`Scanner::read`] call.
//!
//! Each call is self-contained: it scans forward from wherever the cursor
//! currently sits to the end of exactly one value — a scalar, or an entire
//! bracketed container including everything nested inside it — then stops.
//! Enumerating a container's *own* direct children is [`crate::loader`]'s
//! job: it recurses into the container's interior with a fresh `Scanner`
//! and calls `read`/`parse` repeatedly until exhaustion.

use crate::cursor::Cursor;
use crate::error::Error;
use crate::tables::{Action, Mode};
use crate::tag::TokenKind;

/// A token as produced directly by a single `read`/`parse` call, before the
/// loader assigns it a final `sub` (descendant count requires recursing
/// into a container's interior, which only [`crate::load`] does). `children`
/// is already final: it only ever counts this token's own direct
/// pairs/elements, which a single `read` call can always determine without
/// recursing.
#[derive(Clone, Copy, Debug)]
pub struct RawItem {
    pub kind: TokenKind,
    pub start: u32,
    pub len: u32,
    pub children: u32,
}

/// Low-level token-at-a-time scanner. [`crate::count`]/[`crate::load`]
/// drive this to populate a flat token array; most callers want those
/// instead of `Scanner` directly.
pub struct Scanner<'a> {
    cur: Cursor<'a>,
}

impl<'a> Scanner<'a> {
    pub fn begin(buf: &'a [u8]) -> Self {
        Scanner { cur: Cursor::new(buf) }
    }

    fn fail(&self) -> Error {
        Error::Parsing { at: self.cur.pos() }
    }

    /// Emits the next token at this scanner's level, or `None` once the
    /// remaining bytes are exhausted (only whitespace/separators left).
    pub fn read(&mut self) -> Result<Option<RawItem>, Error> {
        loop {
            if self.cur.is_eof() {
                return Ok(None);
            }
            match Mode::Struct.action(self.cur.current()) {
                Action::Loop => self.cur.advance(),
                Action::Up => return self.scan_container().map(Some),
                Action::QuoteUp => {
                    self.cur.advance();
                    let (start, len) = self.scan_string_body()?;
                    return Ok(Some(RawItem {
                        kind: TokenKind::String,
                        start: start as u32,
                        len: len as u32,
                        children: 0,
                    }));
                }
                Action::BareStart => {
                    let (start, len, kind) = self.scan_bare_body();
                    return Ok(Some(RawItem {
                        kind,
                        start: start as u32,
                        len: len as u32,
                        children: 0,
                    }));
                }
                Action::Separator => self.cur.advance(),
                Action::Down | Action::Failed => return Err(self.fail()),
                _ => return Err(self.fail()),
            }
        }
    }

    /// Two successive reads, returning a name/value pair. The `:`/`=`
    /// between them is consumed here explicitly, since it sits between two
    /// otherwise self-contained `read` calls rather than inside either one.
    pub fn parse(&mut self) -> Result<Option<(RawItem, RawItem)>, Error> {
        let name = match self.read()? {
            Some(item) => item,
            None => return Ok(None),
        };
        loop {
            if self.cur.is_eof() {
                return Err(self.fail());
            }
            match Mode::Struct.action(self.cur.current()) {
                Action::Loop | Action::Separator => self.cur.advance(),
                _ => break,
            }
        }
        let value = self.read()?.ok_or_else(|| self.fail())?;
        Ok(Some((name, value)))
    }

    /// Scans a full container span: the opening bracket, every nested byte,
    /// and the matching closing bracket. `children` counts only this
    /// container's direct pairs/elements; nested containers' own contents
    /// are walked over (to keep bracket balance correct and skip past
    /// embedded strings) but not separately classified — that happens when
    /// the loader recurses into this token's interior.
    fn scan_container(&mut self) -> Result<RawItem, Error> {
        let raw_start = self.cur.pos();
        let kind = TokenKind::classify(self.cur.current());
        self.cur.advance();
        let mut depth: u32 = 2;
        let mut children: u32 = 0;

        loop {
            if self.cur.is_eof() {
                return Err(self.fail());
            }
            match Mode::Struct.action(self.cur.current()) {
                Action::Loop => self.cur.advance(),
                Action::Separator => {
                    if depth == 2 {
                        children = children.saturating_sub(1);
                    }
                    self.cur.advance();
                }
                Action::Up => {
                    if depth == 2 {
                        children += 1;
                    }
                    depth += 1;
                    self.cur.advance();
                }
                Action::Down => {
                    depth -= 1;
                    self.cur.advance();
                    if depth == 1 {
                        let len = self.cur.pos() - raw_start;
                        return Ok(RawItem {
                            kind,
                            start: raw_start as u32,
                            len: len as u32,
                            children,
                        });
                    }
                }
                Action::QuoteUp => {
                    let counts = depth == 2;
                    self.cur.advance();
                    self.scan_string_body()?;
                    if counts {
                        children += 1;
                    }
                }
                Action::BareStart => {
                    let counts = depth == 2;
                    self.scan_bare_body();
                    if counts {
                        children += 1;
                    }
                }
                Action::Failed => return Err(self.fail()),
                _ => return Err(self.fail()),
            }
        }
    }

    /// Consumes a quoted string's content and closing quote, assuming the
    /// cursor sits just past the opening quote. Returns the dequoted
    /// `(start, len)` range.
    fn scan_string_body(&mut self) -> Result<(usize, usize), Error> {
        let content_start = self.cur.pos();
        loop {
            if self.cur.is_eof() {
                return Err(self.fail());
            }
            if let Some(run) = self.plain_ascii_run() {
                self.cur.advance_by(run);
                continue;
            }
            match Mode::String.action(self.cur.current()) {
                Action::Loop => self.cur.advance(),
                Action::Esc => {
                    self.cur.advance();
                    if self.cur.is_eof() {
                        return Err(self.fail());
                    }
                    match Mode::Esc.action(self.cur.current()) {
                        Action::Unesc => self.cur.advance(),
                        _ => return Err(self.fail()),
                    }
                }
                Action::QuoteDown => {
                    let content_len = self.cur.pos() - content_start;
                    self.cur.advance();
                    return Ok((content_start, content_len));
                }
                Action::Utf8Lead2 => {
                    self.cur.advance();
                    self.consume_utf8_continuations(1)?;
                }
                Action::Utf8Lead3 => {
                    self.cur.advance();
                    self.consume_utf8_continuations(2)?;
                }
                Action::Utf8Lead4 => {
                    self.cur.advance();
                    self.consume_utf8_continuations(3)?;
                }
                Action::Failed => return Err(self.fail()),
                _ => return Err(self.fail()),
            }
        }
    }

    /// Length of a run of plain printable-ASCII bytes starting at the
    /// cursor, found with a single SIMD-accelerated scan for the next quote
    /// or backslash. `None` means the run is empty or reaches a byte
    /// `STRING_TABLE` would treat specially (a control byte or a UTF-8
    /// lead), in which case the caller falls back to the table dispatch.
    fn plain_ascii_run(&self) -> Option<usize> {
        let remaining = &self.cur.buffer()[self.cur.pos()..];
        let stop = memchr::memchr2(b'"', b'\\', remaining)?;
        if stop == 0 {
            return None;
        }
        remaining[..stop].iter().all(|&b| (0x20..=0x7E).contains(&b)).then_some(stop)
    }

    fn consume_utf8_continuations(&mut self, mut remaining: u8) -> Result<(), Error> {
        while remaining > 0 {
            if self.cur.is_eof() {
                return Err(self.fail());
            }
            match Mode::Utf8Cont.action(self.cur.current()) {
                Action::Utf8Next => {
                    self.cur.advance();
                    remaining -= 1;
                }
                _ => return Err(self.fail()),
            }
        }
        Ok(())
    }

    /// Consumes a bare literal (number, `true`, `false`, `null`), assuming
    /// the cursor sits at its first byte. Running off the end of the buffer
    /// is treated as an implicit terminator rather than an error, so a bare
    /// scalar at the very end of a document still scans cleanly.
    fn scan_bare_body(&mut self) -> (usize, usize, TokenKind) {
        let start = self.cur.pos();
        let kind = TokenKind::classify(self.cur.current());
        self.cur.advance();
        loop {
            if self.cur.is_eof() {
                break;
            }
            match Mode::Bare.action(self.cur.current()) {
                Action::Loop => self.cur.advance(),
                _ => break,
            }
        }
        let len = self.cur.pos() - start;
        (start, len, kind)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;

    #[test]
    fn reads_top_level_number() {
        let mut s = Scanner::begin(b"42");
        let item = s.read().unwrap().unwrap();
        assert_eq!(item.kind, TokenKind::Number);
        assert_eq!((item.start, item.len), (0, 2));
        assert!(s.read().unwrap().is_none());
    }

    #[test]
    fn reads_top_level_string_dequoted() {
        let mut s = Scanner::begin(b"\"hi\"");
        let item = s.read().unwrap().unwrap();
        assert_eq!(item.kind, TokenKind::String);
        assert_eq!((item.start, item.len), (1, 2));
    }

    #[test]
    fn long_plain_run_takes_the_memchr_fast_path() {
        let mut s = Scanner::begin(b"\"a plain run with no escapes or unicode\"");
        let item = s.read().unwrap().unwrap();
        assert_eq!(item.kind, TokenKind::String);
        assert_eq!(item.len, 38);
    }

    #[test]
    fn escape_and_unicode_bytes_fall_back_to_table_dispatch() {
        let mut s = Scanner::begin("\"caf\u{e9}\\tend\"".as_bytes());
        let item = s.read().unwrap().unwrap();
        assert_eq!(item.kind, TokenKind::String);
        assert_eq!(item.len, 10);
    }

    #[test]
    fn reads_object_span_with_children() {
        let mut s = Scanner::begin(b"{\"x\":1,\"y\":2}");
        let item = s.read().unwrap().unwrap();
        assert_eq!(item.kind, TokenKind::Object);
        assert_eq!(item.children, 2);
        assert_eq!((item.start, item.len), (0, 13));
    }

    #[test]
    fn reads_array_span_with_nested_container() {
        let mut s = Scanner::begin(b"{\"a\":[10,20,30]}");
        let item = s.read().unwrap().unwrap();
        assert_eq!(item.kind, TokenKind::Object);
        assert_eq!(item.children, 1);
    }

    #[test]
    fn unterminated_container_is_parse_error() {
        let mut s = Scanner::begin(b"{\"a\":1");
        assert!(matches!(s.read(), Err(Error::Parsing { .. })));
    }

    #[test]
    fn parse_returns_name_value_pair() {
        let mut s = Scanner::begin(b"\"a\":1");
        let (name, value) = s.parse().unwrap().unwrap();
        assert_eq!(name.kind, TokenKind::String);
        assert_eq!(value.kind, TokenKind::Number);
    }

    #[test]
    fn object_with_separator_loads_through_parse() {
        // reads_object_span_with_children only exercises scan_container's
        // own separator handling; this exercises the parse() re-scan that
        // loader::count_children/write_children actually call.
        let src = br#"{"a":1}"#;
        let n = crate::loader::count(src).unwrap();
        let mut tokens = vec![crate::tag::Token::default(); n];
        crate::loader::load(src, &mut tokens).unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::Object);
        assert_eq!(tokens[0].children, 1);
        assert_eq!(tokens[1].kind(), TokenKind::String);
        assert_eq!(tokens[2].kind(), TokenKind::Number);
    }

    #[test]
    fn comma_or_whitespace_both_separate_items() {
        let mut s = Scanner::begin(b"1 2,3");
        assert_eq!(s.read().unwrap().unwrap().kind, TokenKind::Number);
        assert_eq!(s.read().unwrap().unwrap().kind, TokenKind::Number);
        assert_eq!(s.read().unwrap().unwrap().kind, TokenKind::Number);
        assert!(s.read().unwrap().is_none());
    }
}
