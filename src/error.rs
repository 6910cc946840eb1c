//! Error types for puzzle construction and parsing.

use thiserror::Error;

/// Errors raised while constructing a `State` or a `Problem`.
///
/// These are contract violations in the caller's input. They are reported at
/// construction time and never repaired silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// The group size must be at least 1.
    #[error("group size must be at least 1")]
    InvalidGroupSize,

    /// `group_size * group_size + 1` does not fit in a `usize`.
    #[error("group size {0} is too large")]
    GroupSizeTooLarge(usize),

    /// Hop labels and tokens must describe the same ring.
    #[error("hop label count {labels} does not match token count {tokens}")]
    LengthMismatch { labels: usize, tokens: usize },

    /// The ring must hold exactly `group_size * group_size + 1` positions.
    #[error("ring has {len} positions, expected {expected} for group size {group_size}")]
    WrongRingSize {
        len: usize,
        group_size: usize,
        expected: usize,
    },

    /// Exactly one position must hold the empty token 0.
    #[error("expected exactly one empty slot, found {0}")]
    EmptySlotCount(usize),

    /// Non-empty tokens must lie in `1..=group_size`.
    #[error("token {value} at position {index} is outside 1..={group_size}")]
    TokenOutOfRange {
        index: usize,
        value: u8,
        group_size: usize,
    },
}

/// Errors raised while reading a puzzle description from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A field could not be read as a number.
    #[error("invalid number '{token}' in {section}")]
    InvalidToken { section: &'static str, token: String },

    /// The input ended before every section was read.
    #[error("missing {0} line")]
    MissingSection(&'static str),

    /// The input parsed but does not describe a valid puzzle.
    #[error(transparent)]
    Problem(#[from] ProblemError),
}
