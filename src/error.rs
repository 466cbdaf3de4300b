use thiserror::Error;

/// Failure modes surfaced by the tokenizer, loader and query layers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A required argument was empty or otherwise malformed (e.g. a zero-length buffer).
    #[error("invalid argument")]
    Invalid,
    /// The destination token array was exhausted before the document finished loading.
    ///
    /// `written` is the number of tokens that were successfully placed before capacity ran out.
    #[error("token array exhausted after writing {written} token(s)")]
    OutOfToken {
        /// Number of tokens written into the destination array before capacity ran out.
        written: usize,
    },
    /// The DFA reached a `Failed` transition while scanning the byte at `at`.
    #[error("parse error at byte offset {at}")]
    Parsing {
        /// Offset into the input buffer at which scanning failed.
        at: usize,
    },
    /// A container was nested deeper than [`crate::config::MAX_NESTING_DEPTH`].
    #[error("document nested past the configured depth limit")]
    TooDeep,
}
