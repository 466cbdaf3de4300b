//! The token type stored in the flat array produced by [`crate::load`].

/// The JSON value kind a [`Token`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// Placeholder used for uninitialized array slots; never returned from a successful load.
    None = 0,
    Object = 1,
    Array = 2,
    Number = 3,
    String = 4,
    True = 5,
    False = 6,
    Null = 7,
}

impl TokenKind {
    /// Classifies a yielded token by the first byte of its lexeme, per the
    /// structural/bare-literal dispatch rule.
    pub(crate) fn classify(first_byte: u8) -> TokenKind {
        match first_byte {
            b'{' => TokenKind::Object,
            b'[' => TokenKind::Array,
            b'"' => TokenKind::String,
            b't' => TokenKind::True,
            b'f' => TokenKind::False,
            b'n' => TokenKind::Null,
            _ => TokenKind::Number,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, TokenKind::Object | TokenKind::Array)
    }
}

/// One entry in the flat token array: a value's kind, its byte range inside
/// the caller's buffer, and its child/descendant counts.
///
/// `str` is stored as `(start, len)` offsets rather than a borrowed slice so
/// that a whole array of tokens can live in caller-supplied storage (a
/// `Vec<Token>`, a fixed-size array, a memory-mapped region) independent of
/// any particular buffer lifetime; callers recover the bytes via
/// [`Token::bytes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Token {
    pub kind: TokenKindSlot,
    pub start: u32,
    pub len: u32,
    /// Pairs for Object, elements for Array, zero for scalars.
    pub children: u32,
    /// Total descendant token count, zero for scalars.
    pub sub: u32,
}

/// `TokenKind` wrapped so `Token` can derive `Default` (there is no
/// "default" JSON value, only the `None` placeholder kind).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenKindSlot(pub TokenKind);

impl Default for TokenKindSlot {
    fn default() -> Self {
        TokenKindSlot(TokenKind::None)
    }
}

impl Token {
    pub(crate) fn new(kind: TokenKind, start: u32, len: u32) -> Self {
        Token {
            kind: TokenKindSlot(kind),
            start,
            len,
            children: 0,
            sub: 0,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind.0
    }

    /// The token's bytes within `buf`, the same buffer originally passed to
    /// [`crate::load`]. For strings the surrounding quotes are already
    /// stripped; for objects/arrays the braces/brackets are included.
    pub fn bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        let start = self.start as usize;
        let end = start + self.len as usize;
        &buf[start..end]
    }
}

const _: () = assert!(std::mem::size_of::<Token>() <= 24);

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_first_byte() {
        assert_eq!(TokenKind::classify(b'{'), TokenKind::Object);
        assert_eq!(TokenKind::classify(b'['), TokenKind::Array);
        assert_eq!(TokenKind::classify(b'"'), TokenKind::String);
        assert_eq!(TokenKind::classify(b't'), TokenKind::True);
        assert_eq!(TokenKind::classify(b'f'), TokenKind::False);
        assert_eq!(TokenKind::classify(b'n'), TokenKind::Null);
        assert_eq!(TokenKind::classify(b'4'), TokenKind::Number);
        assert_eq!(TokenKind::classify(b'-'), TokenKind::Number);
    }

    #[test]
    fn bytes_recovers_lexeme() {
        let buf = b"{\"a\":1}";
        let t = Token::new(TokenKind::Number, 5, 1);
        assert_eq!(t.bytes(buf), b"1");
    }
}
