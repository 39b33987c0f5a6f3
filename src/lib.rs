//! tola-listdiff - Sectioned list diff with moves and updates
//!
//! ## Core Concepts
//!
//! **Two levels**: a snapshot is a list of sections, each holding an ordered
//! list of items. Diffing two snapshots yields section-level and item-level
//! changes, with item positions scoped to their own section.
//!
//! **Identity vs equality**: an identity predicate decides whether two values
//! are the same entity; an equality predicate decides whether a matched
//! entity's content changed. Equality may answer [`Equality::Unknown`], which
//! flags the owning section for a whole-section refresh.
//!
//! ## Modules
//! - `algo`: sequence diff, move pairing, section alignment, nested composition
//! - `change`: change elements at all three levels
//! - `section`: snapshot types (`Sectioned`, `Section`)
//! - `summary`: bucketing into application order
//! - `verify`: conservation checks
//! - `error`: check errors
//!
//! ## Usage
//!
//! ```
//! use tola_listdiff::{nested_extended_diff, NestedChange, Section};
//!
//! let old = vec![Section::new(1, vec!["a", "b"]), Section::new(2, vec!["c"])];
//! let new = vec![Section::new(1, vec!["a"]), Section::new(2, vec!["c", "d"])];
//!
//! let result = nested_extended_diff(
//!     &old,
//!     &new,
//!     |a, b| a.model == b.model,
//!     |a, b| a == b,
//!     |a, b| a == b,
//! );
//!
//! // Deletions before insertions
//! let ordered = result.summarize().into_ordered();
//! assert!(matches!(ordered[0], NestedChange::DeleteElement(_)));
//! assert!(matches!(ordered[1], NestedChange::InsertElement(_)));
//! ```

#[macro_use]
mod macros;

// =============================================================================
// Modules
// =============================================================================

/// Algorithms: heckel, moves, myers, nested
pub mod algo;

/// Change element types
pub mod change;

/// Tri-state content equality
pub mod equality;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

/// Snapshot types
pub mod section;

/// Change bucketing
pub mod summary;

/// Conservation checks
pub mod verify;

// =============================================================================
// Re-exports
// =============================================================================

// Algorithms
pub use algo::{
    align, diff, diff_by, diff_with, extend, extended_diff, extended_diff_by, nested_diff, nested_extended_diff,
    nested_extended_diff_with_config, Alignment, Diff, DiffConfig, DiffStats, ExtendedDiff, NestedDiff,
};

// Change elements
pub use change::{Change, ExtendedChange, IndexPath, NestedChange};

// Snapshots
pub use section::{Section, Sectioned};

// Equality
pub use equality::Equality;

// Summary
pub use summary::{summarize, Summary};

// Error types
pub use error::{DiffError, DiffResult, Side};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Diff: Send, Sync, Clone);
    static_assertions::assert_impl_all!(ExtendedDiff: Send, Sync, Clone);
    static_assertions::assert_impl_all!(NestedDiff: Send, Sync, Clone);
    static_assertions::assert_impl_all!(NestedChange: Copy, Send, Sync);

    #[test]
    fn test_no_op_diff_is_empty() {
        let items = ['x', 'y', 'x', 'z'];
        assert!(diff(&items, &items).is_empty());
        assert!(extended_diff(&items, &items, |a, b| a == b, |a, b| a == b).is_empty());
    }

    #[test]
    fn test_insert_only_and_delete_only() {
        let new = [1, 2, 3];
        assert_eq!(
            diff(&[], &new).changes,
            vec![Change::Insert(0), Change::Insert(1), Change::Insert(2)]
        );
        assert_eq!(diff(&new, &[]).changes, vec![Change::Delete(0), Change::Delete(1), Change::Delete(2)]);
    }
}
