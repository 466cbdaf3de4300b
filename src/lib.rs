//! A zero-allocation JSON tokenizer and path-query engine.
//!
//! The tokenizer lexes a document held in a caller-owned byte slice into a
//! flat, caller-supplied array of [`Token`]s — each one a reference
//! (offset, length) into the original bytes, never a copy. A path-walker
//! then locates an addressed value by name or array index without
//! re-tokenizing, using only the child/descendant counts stored on each
//! token to skip over subtrees it doesn't need.
//!
//! ```
//! let doc = br#"{"a":[10,20,30]}"#;
//! let n = flatjson::count(doc).unwrap();
//! let mut tokens = vec![flatjson::Token::default(); n];
//! flatjson::load(doc, &mut tokens).unwrap();
//! assert_eq!(flatjson::query_number(doc, &tokens, Some(b"a[1]")), flatjson::Typed::Found(20.0));
//! ```

mod config;
mod cursor;
mod error;
mod loader;
mod number;
mod query;
mod scanner;
mod tables;
mod tag;

pub use config::{PathDelimiter, DEFAULT_DELIMITER, MAX_NESTING_DEPTH};
pub use error::Error;
pub use loader::{count, load};
pub use number::convert;
pub use query::{query, query_number, query_string, query_type, query_with_delimiter, Typed};
pub use scanner::{RawItem, Scanner};
pub use tag::{Token, TokenKind};
