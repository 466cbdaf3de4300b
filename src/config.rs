//! Compile-time tunables: the path delimiter and the bound on container
//! nesting depth accepted by the loader.

/// A path segment delimiter byte (`.` in `a.b.c`).
pub type PathDelimiter = u8;

/// Default path segment delimiter (`.` in `a.b.c`).
pub const DEFAULT_DELIMITER: PathDelimiter = b'.';

/// Maximum container nesting depth accepted by [`crate::load`].
///
/// Bounds the loader's recursion so an adversarial, deeply-nested document
/// cannot exhaust the native call stack. Documents nested deeper than this
/// fail with [`crate::Error::TooDeep`] instead of overflowing.
pub const MAX_NESTING_DEPTH: u32 = 1024;
