//! Error types for dictionary construction.
//!
//! The suggestion pipeline itself never fails (see `pipeline::find_suggest`):
//! every runtime condition degrades to a partial or empty result. Errors are
//! only possible while building a `Language` from raw trie/table data handed
//! in by an external loader.
use std::fmt;

/// Failure while constructing a [`crate::Language`] from raw trie/table data.
#[derive(Debug)]
pub enum SpellError {
    /// A trie's `idxs` array is shorter than its `byts` array requires.
    TrieTooShort { what: &'static str },
    /// A REP/SAL rule had an empty `from` side, which can never match.
    EmptyRepRule,
    /// `compound_min_len` or `compound_max` were set to an inconsistent pair.
    InvalidCompoundBounds { min_len: u8, max: u8 },
}

impl fmt::Display for SpellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellError::TrieTooShort { what } => {
                write!(f, "{what}: idxs array shorter than byts requires")
            }
            SpellError::EmptyRepRule => write!(f, "REP rule has an empty `from` pattern"),
            SpellError::InvalidCompoundBounds { min_len, max } => write!(
                f,
                "compound_min_len ({min_len}) is greater than compound_max ({max})"
            ),
        }
    }
}

impl std::error::Error for SpellError {}
