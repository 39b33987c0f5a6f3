//! Error types for tola-listdiff.
//!
//! The diff algorithms themselves are total and never fail. These errors are
//! produced by the script checks in [`crate::verify`], which confirm that an
//! edit script accounts for every old and new position exactly once.

use thiserror::Error;

/// Which side of a diff a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Position in the old sequence
    Old,
    /// Position in the new sequence
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

/// Errors reported when an edit script violates its conservation invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    /// A change references a position past the end of its sequence
    #[error("{side} position {position} out of bounds (len {len})")]
    OutOfBounds {
        /// Sequence the position belongs to
        side: Side,
        /// Offending position
        position: usize,
        /// Length of that sequence
        len: usize,
    },

    /// An old position is consumed by more than one change
    #[error("old position {0} is accounted for more than once")]
    DuplicateOld(usize),

    /// A new position is produced by more than one change
    #[error("new position {0} is accounted for more than once")]
    DuplicateNew(usize),

    /// Positions left in place on each side cannot be paired up
    #[error("unbalanced script: {old_untouched} untouched old vs {new_untouched} untouched new")]
    Unbalanced {
        /// Old positions neither deleted nor moved
        old_untouched: usize,
        /// New positions neither inserted nor moved
        new_untouched: usize,
    },

    /// An item-level change points into a section that was not matched
    #[error("item change targets unmatched {side} section {section}")]
    UnexpectedItemChange {
        /// Side of the section index
        side: Side,
        /// Section index
        section: usize,
    },

    /// An item-level error inside a matched section pair
    #[error("section {section}: {source}")]
    InSection {
        /// New index of the section pair
        section: usize,
        /// Underlying item-level error
        #[source]
        source: Box<DiffError>,
    },
}

/// Result type alias for script checks.
pub type DiffResult<T> = Result<T, DiffError>;

impl DiffError {
    /// Wrap an item-level error with the section it occurred in.
    pub fn in_section(section: usize, err: DiffError) -> Self {
        Self::InSection {
            section,
            source: Box::new(err),
        }
    }
}
