//! Two-level diff of sectioned collections
//!
//! Composes the section alignment with per-section item diffs.
//!
//! # Architecture
//!
//! ```text
//! align(sections)           -> outer script + matched section pairs
//!   pair_up(outer)          -> InsertSection / DeleteSection / MoveSection / UpdateSection
//!   moved pairs             -> item pass, identity only (no UpdateElement)
//!   matched pairs           -> item pass with moves and updates
//! ```
//!
//! The output is the concatenation of those three lists, in that order. It is
//! not sorted by position; use [`Summary`](crate::Summary) to bucket it
//! into application order.
//!
//! # Section updates
//!
//! There is no section-level equality. `UpdateSection` is reported only for
//! identity-equal sections the alignment left unmatched in the same gap,
//! which happens after the edit-distance bound cut the search short. Such a
//! section gets no item pass: the consumer reloads it whole.

use std::hash::Hash;

use tracing::debug;

use crate::change::NestedChange;
use crate::equality::Equality;
use crate::section::Sectioned;
use crate::summary::Summary;

use super::heckel;
use super::moves::{pair_up, ExtendedDiff, Pairing};
use super::myers::{self, MAX_EDIT_DISTANCE};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for nested diff limits.
///
/// Use this to tune diff behavior for specific collection shapes:
/// - Increase limits for long section lists
/// - Decrease limits for faster fallback on heavy reshuffles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Edit distance explored by the section alignment before it gives up.
    /// Default: 512
    pub max_edit_distance: usize,
    /// Base scripts longer than this skip move/update pairing.
    /// Default: unlimited
    pub move_search_limit: usize,
    /// Report relocations as moves instead of delete + insert.
    /// Default: true
    pub detect_moves: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: MAX_EDIT_DISTANCE,
            move_search_limit: usize::MAX,
            detect_moves: true,
        }
    }
}

impl DiffConfig {
    /// Create config with custom limits.
    pub fn new(max_edit_distance: usize, move_search_limit: usize) -> Self {
        Self {
            max_edit_distance,
            move_search_limit,
            detect_moves: true,
        }
    }

    /// Disable move detection.
    pub fn without_moves(mut self) -> Self {
        self.detect_moves = false;
        self
    }

    /// Create config for large collections (higher limits).
    pub fn large() -> Self {
        Self {
            max_edit_distance: 4096,
            ..Self::default()
        }
    }

    /// Create config for small collections (lower limits, faster fallback).
    pub fn small() -> Self {
        Self {
            max_edit_distance: 64,
            move_search_limit: 1024,
            detect_moves: true,
        }
    }
}

// =============================================================================
// Public Types
// =============================================================================

/// Statistics from a nested diff
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Section pairs whose items were diffed in place
    pub sections_matched: usize,
    /// `InsertSection` changes
    pub sections_inserted: usize,
    /// `DeleteSection` changes
    pub sections_deleted: usize,
    /// `MoveSection` changes
    pub sections_moved: usize,
    /// `UpdateSection` changes
    pub sections_updated: usize,
    /// `InsertElement` changes
    pub items_inserted: usize,
    /// `DeleteElement` changes
    pub items_deleted: usize,
    /// `MoveElement` changes, inside matched or moved sections
    pub items_moved: usize,
    /// `UpdateElement` changes, including inconclusive comparisons
    pub items_updated: usize,
    /// Section alignment hit the edit-distance bound
    pub alignment_exhausted: bool,
}

impl DiffStats {
    /// Total number of reported changes
    pub fn change_count(&self) -> usize {
        self.sections_inserted
            + self.sections_deleted
            + self.sections_moved
            + self.sections_updated
            + self.items_inserted
            + self.items_deleted
            + self.items_moved
            + self.items_updated
    }

    fn record(&mut self, change: &NestedChange) {
        let counter = match change {
            NestedChange::InsertSection(_) => &mut self.sections_inserted,
            NestedChange::DeleteSection(_) => &mut self.sections_deleted,
            NestedChange::MoveSection { .. } => &mut self.sections_moved,
            NestedChange::UpdateSection { .. } => &mut self.sections_updated,
            NestedChange::InsertElement(_) => &mut self.items_inserted,
            NestedChange::DeleteElement(_) => &mut self.items_deleted,
            NestedChange::MoveElement { .. } => &mut self.items_moved,
            NestedChange::UpdateElement { .. } => &mut self.items_updated,
        };
        *counter += 1;
    }
}

/// Result of a nested diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct NestedDiff {
    /// Section changes, then moved-section item changes, then matched-section
    /// item changes
    pub changes: Vec<NestedChange>,
    /// Section pairs kept in place by the alignment, as `(old, new)`
    pub matched_sections: Vec<(usize, usize)>,
    /// New indices of sections whose item equality came back `Unknown`,
    /// ascending
    pub undiffable: Vec<usize>,
    pub stats: DiffStats,
}

impl NestedDiff {
    /// Check if there are no changes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if any section needs a whole-section refresh
    #[inline]
    pub fn has_undiffable(&self) -> bool {
        !self.undiffable.is_empty()
    }

    /// Bucket the changes and mark the undiffable sections.
    pub fn summarize(&self) -> Summary {
        let mut summary = Summary::from_changes(&self.changes);
        for &section in &self.undiffable {
            summary.mark_undiffable(section);
        }
        summary
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Two-level diff with moves and updates at both levels.
///
/// Sections are aligned by `is_same_section`. Items of matched sections are
/// diffed by value, with `is_same_item` pairing changes into moves and
/// `is_equal_item` folding same-entity changes into updates.
///
/// # Example
///
/// ```
/// use tola_listdiff::{nested_extended_diff, IndexPath, NestedChange, Section};
///
/// let old = vec![Section::new("A", vec!["a1"]), Section::new("B", vec!["b1", "b2"])];
/// let new = vec![Section::new("B", vec!["b1", "b2"]), Section::new("A", vec!["a1", "a2"])];
///
/// let result = nested_extended_diff(
///     &old,
///     &new,
///     |a, b| a.model == b.model,
///     |a, b| a == b,
///     |a, b| a == b,
/// );
/// assert_eq!(
///     result.changes,
///     vec![
///         NestedChange::MoveSection { from: 1, to: 0 },
///         NestedChange::InsertElement(IndexPath::new(1, 1)),
///     ]
/// );
/// ```
pub fn nested_extended_diff<S, FS, FI, FE, Q>(
    old: &[S],
    new: &[S],
    is_same_section: FS,
    is_same_item: FI,
    is_equal_item: FE,
) -> NestedDiff
where
    S: Sectioned,
    S::Item: Hash + Eq,
    FS: Fn(&S, &S) -> bool,
    FI: Fn(&S::Item, &S::Item) -> bool,
    FE: Fn(&S::Item, &S::Item) -> Q,
    Q: Into<Equality>,
{
    nested_extended_diff_with_config(
        old,
        new,
        is_same_section,
        is_same_item,
        is_equal_item,
        DiffConfig::default(),
    )
}

/// Two-level diff without move detection.
///
/// Relocated sections become a delete plus an insert, and item passes fold
/// updates but never report moves.
pub fn nested_diff<S, FS, FI, FE, Q>(
    old: &[S],
    new: &[S],
    is_same_section: FS,
    is_same_item: FI,
    is_equal_item: FE,
) -> NestedDiff
where
    S: Sectioned,
    S::Item: Hash + Eq,
    FS: Fn(&S, &S) -> bool,
    FI: Fn(&S::Item, &S::Item) -> bool,
    FE: Fn(&S::Item, &S::Item) -> Q,
    Q: Into<Equality>,
{
    nested_extended_diff_with_config(
        old,
        new,
        is_same_section,
        is_same_item,
        is_equal_item,
        DiffConfig::default().without_moves(),
    )
}

/// Two-level diff with custom configuration.
pub fn nested_extended_diff_with_config<S, FS, FI, FE, Q>(
    old: &[S],
    new: &[S],
    is_same_section: FS,
    is_same_item: FI,
    is_equal_item: FE,
    config: DiffConfig,
) -> NestedDiff
where
    S: Sectioned,
    S::Item: Hash + Eq,
    FS: Fn(&S, &S) -> bool,
    FI: Fn(&S::Item, &S::Item) -> bool,
    FE: Fn(&S::Item, &S::Item) -> Q,
    Q: Into<Equality>,
{
    let item_equality = |a: &S::Item, b: &S::Item| -> Equality { is_equal_item(a, b).into() };
    let always_changed = |_: &S, _: &S| Equality::Changed;

    // 1. Outer alignment
    let alignment = myers::align(old, new, &is_same_section, config.max_edit_distance);

    // 2. Section-level changes
    let section_pairing: Pairing<'_, S> = Pairing {
        is_same: &is_same_section,
        is_equal: Some(&always_changed),
        moves: config.detect_moves,
        compare_matched: false,
        search_limit: config.move_search_limit,
    };
    let outer = pair_up(&alignment.diff, old, new, &section_pairing);

    let mut changes: Vec<NestedChange> = outer.changes.iter().map(|c| c.as_section()).collect();
    let mut undiffable = Vec::new();

    // 3. Moved sections: identity only
    let moved_pairing = Pairing::<S::Item>::moves_only(&is_same_item).with_search_limit(config.move_search_limit);
    for (from, to) in outer.moves() {
        let items = diff_items(old[from].items(), new[to].items(), &moved_pairing);
        changes.extend(items.changes.into_iter().map(|c| c.in_section(from, to)));
    }

    // 4. Matched sections: moves and updates
    let matched_pairing = Pairing::<S::Item>::folding(&is_same_item, &item_equality, config.detect_moves)
        .with_search_limit(config.move_search_limit);
    for &(o, n) in &alignment.diff.matched {
        let items = diff_items(old[o].items(), new[n].items(), &matched_pairing);
        if items.has_unknown() {
            undiffable.push(n);
        }
        changes.extend(items.changes.into_iter().map(|c| c.in_section(o, n)));
    }

    let mut stats = DiffStats {
        sections_matched: alignment.diff.matched.len(),
        alignment_exhausted: alignment.exhausted,
        ..DiffStats::default()
    };
    for change in &changes {
        stats.record(change);
    }

    let result = NestedDiff {
        changes,
        matched_sections: alignment.diff.matched,
        undiffable,
        stats,
    };

    debug!(
        old_sections = old.len(),
        new_sections = new.len(),
        changes = result.changes.len(),
        undiffable = result.undiffable.len(),
        "nested diff complete"
    );
    debug_assert!(result.verify(old, new).is_ok(), "nested diff is not conservative");

    result
}

/// Item pass for one section pair
fn diff_items<T: Hash + Eq>(old: &[T], new: &[T], pairing: &Pairing<'_, T>) -> ExtendedDiff {
    let base = heckel::diff(old, new);
    pair_up(&base, old, new, pairing)
}

/// Lift a single-level result into the scope of one section pair.
pub fn scoped(diff: &ExtendedDiff, old_section: usize, new_section: usize) -> Vec<NestedChange> {
    diff.changes.iter().map(|c| c.in_section(old_section, new_section)).collect()
}

// =============================================================================
// Tests
// =============================================================================
