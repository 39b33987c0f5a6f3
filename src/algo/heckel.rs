//! Symbol-table sequence diff (Heckel-style counting)
//!
//! Classifies every position of two sequences in linear time by counting how
//! often each distinct value occurs on either side.
//!
//! # Passes
//!
//! 1. **New pass**: every new position gets a slot pointing at its value's
//!    symbol-table entry; the entry's new counter is bumped.
//! 2. **Old pass**: same for old positions, also recording the position in the
//!    entry's old-position list.
//! 3. **Matching pass**: scan new slots in order. An unresolved slot consumes
//!    the next unconsumed old position of its entry and both are resolved when
//!    the value is unique on both sides, or occurs on both sides and the old
//!    slot still points at the same entry. Repeated values therefore match
//!    positionally, first old occurrence to first new occurrence.
//! 4. **Classification**: unresolved new slots are inserts, unresolved old
//!    slots are deletes.
//!
//! Resolved pairs that kept their relative order stay matched. Pairs that
//! changed order are reported as a delete plus an insert so that the move
//! layer ([`super::moves`]) can upgrade them into moves.
//!
//! # Complexity
//!
//! - Passes 1-3: O(n + m), one symbol-table entry per distinct value
//! - Order check: O(k log k) for k resolved pairs
//!
//! There is no adjacency propagation between neighbouring matches: only
//! positional matching of balanced duplicates is performed.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::script::Diff;

// =============================================================================
// Symbol table
// =============================================================================

/// Occurrence counter saturating at "two or more".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Counter {
    #[default]
    Zero,
    One,
    Many,
}

impl Counter {
    #[inline]
    fn increment(&mut self) {
        *self = match self {
            Self::Zero => Self::One,
            Self::One | Self::Many => Self::Many,
        };
    }
}

/// Per-value record. Slots refer to entries by arena index.
#[derive(Debug, Default)]
struct Entry {
    old_count: Counter,
    new_count: Counter,
    /// Old positions holding this value, ascending
    old_positions: SmallVec<[usize; 2]>,
    /// Next unconsumed index into `old_positions`
    next_old: usize,
}

impl Entry {
    #[inline]
    fn pop_old(&mut self) -> Option<usize> {
        let position = self.old_positions.get(self.next_old).copied()?;
        self.next_old += 1;
        Some(position)
    }
}

/// State of one position after the matching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Still points at its symbol-table entry (opaque entry index)
    Unresolved(usize),
    /// Matched with this position in the other sequence
    Resolved(usize),
}

impl Slot {
    /// Matching position in the other sequence, if resolved
    #[inline]
    pub fn resolved(self) -> Option<usize> {
        match self {
            Self::Resolved(at) => Some(at),
            Self::Unresolved(_) => None,
        }
    }
}

/// Slots of both sequences after the matching pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Resolution {
    /// One slot per old position
    pub old: Vec<Slot>,
    /// One slot per new position
    pub new: Vec<Slot>,
}

impl Resolution {
    /// Resolved pairs as `(old, new)`, in new order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.new
            .iter()
            .enumerate()
            .filter_map(|(n, slot)| slot.resolved().map(|o| (o, n)))
    }

    /// Check if every position on both sides was matched
    pub fn is_fully_resolved(&self) -> bool {
        self.old.iter().chain(&self.new).all(|s| s.resolved().is_some())
    }

    /// Resolved pairs that keep their relative order.
    ///
    /// Picks one longest run of pairs whose old positions increase along the
    /// new order. On ties the run ending at the latest new position wins.
    pub fn ordered_pairs(&self) -> Vec<(usize, usize)> {
        longest_increasing(&self.pairs().collect::<Vec<_>>())
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Run the symbol-table passes, keying entries by `key(item)`.
pub fn resolve_by<'a, T, K, F>(old: &'a [T], new: &'a [T], mut key: F) -> Resolution
where
    K: Hash + Eq,
    F: FnMut(&'a T) -> K,
{
    let mut table: FxHashMap<K, usize> =
        FxHashMap::with_capacity_and_hasher(new.len(), Default::default());
    let mut entries: Vec<Entry> = Vec::with_capacity(new.len());

    // Pass 1: new
    let mut new_slots = Vec::with_capacity(new.len());
    for item in new {
        let e = *table.entry(key(item)).or_insert_with(|| {
            entries.push(Entry::default());
            entries.len() - 1
        });
        entries[e].new_count.increment();
        new_slots.push(Slot::Unresolved(e));
    }

    // Pass 2: old
    let mut old_slots = Vec::with_capacity(old.len());
    for (position, item) in old.iter().enumerate() {
        let e = *table.entry(key(item)).or_insert_with(|| {
            entries.push(Entry::default());
            entries.len() - 1
        });
        let entry = &mut entries[e];
        entry.old_count.increment();
        entry.old_positions.push(position);
        old_slots.push(Slot::Unresolved(e));
    }

    // Pass 3: matching
    for n in 0..new_slots.len() {
        let Slot::Unresolved(e) = new_slots[n] else {
            continue;
        };
        let entry = &mut entries[e];
        let Some(o) = entry.pop_old() else {
            continue;
        };

        let unique = entry.old_count == Counter::One && entry.new_count == Counter::One;
        let balanced = entry.old_count != Counter::Zero
            && entry.new_count != Counter::Zero
            && old_slots[o] == Slot::Unresolved(e);

        if unique || balanced {
            new_slots[n] = Slot::Resolved(o);
            old_slots[o] = Slot::Resolved(n);
        }
    }

    Resolution { old: old_slots, new: new_slots }
}

/// Run the symbol-table passes, keying entries by item value.
pub fn resolve<T: Hash + Eq>(old: &[T], new: &[T]) -> Resolution {
    resolve_by(old, new, |item| item)
}

/// Diff two sequences, keying the symbol table by `key(item)`.
///
/// Two items are "the same value" when their keys are equal. Keying by a
/// primary key makes content edits invisible at this level; use
/// [`extended_diff_by`](super::extended_diff_by) to surface them as updates.
pub fn diff_by<'a, T, K, F>(old: &'a [T], new: &'a [T], key: F) -> Diff
where
    K: Hash + Eq,
    F: FnMut(&'a T) -> K,
{
    // Quick paths
    if old.is_empty() || new.is_empty() {
        return Diff::replace_all(old.len(), new.len());
    }

    let resolution = resolve_by(old, new, key);
    Diff::from_matches(old.len(), new.len(), resolution.ordered_pairs())
}

/// Diff two sequences by item value.
///
/// Produces inserts and deletes only. Items whose relative order changed show
/// up as a delete plus an insert.
///
/// # Example
///
/// ```
/// use tola_listdiff::{diff, Change};
///
/// let d = diff(&['a', 'b', 'c'], &['a', 'c', 'd']);
/// assert_eq!(d.changes, vec![Change::Delete(1), Change::Insert(2)]);
/// ```
pub fn diff<T: Hash + Eq>(old: &[T], new: &[T]) -> Diff {
    diff_by(old, new, |item| item)
}

// =============================================================================
// Order check
// =============================================================================

/// Longest run of `pairs` (given in new order) with increasing old positions.
pub(super) fn longest_increasing(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    // tails[len] = index of the pair ending the best run of length len + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; pairs.len()];

    for (idx, &(o, _)) in pairs.iter().enumerate() {
        let pos = tails.partition_point(|&t| pairs[t].0 < o);
        if pos > 0 {
            prev[idx] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(idx);
        } else {
            tails[pos] = idx;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(idx) = cursor {
        run.push(pairs[idx]);
        cursor = prev[idx];
    }
    run.reverse();
    run
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::Change;

    #[test]
    fn test_empty_sequences() {
        let result = diff::<u32>(&[], &[]);
        assert!(result.is_empty());
        assert!(result.matched.is_empty());
    }

    #[test]
    fn test_insert_all() {
        let result = diff(&[], &[1, 2, 3]);
        assert_eq!(result.changes, vec![Change::Insert(0), Change::Insert(1), Change::Insert(2)]);
    }

    #[test]
    fn test_delete_all() {
        let result = diff(&[1, 2, 3], &[]);
        assert_eq!(result.changes, vec![Change::Delete(0), Change::Delete(1), Change::Delete(2)]);
    }

    #[test]
    fn test_no_changes() {
        let result = diff(&[1, 2, 3], &[1, 2, 3]);
        assert!(result.is_empty());
        assert_eq!(result.matched, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_single_insert() {
        let result = diff(&[1, 3], &[1, 2, 3]);
        assert_eq!(result.changes, vec![Change::Insert(1)]);
    }

    #[test]
    fn test_single_delete() {
        let result = diff(&[1, 2, 3], &[1, 3]);
        assert_eq!(result.changes, vec![Change::Delete(1)]);
    }

    #[test]
    fn test_reordered_pair_surfaces_as_delete_insert() {
        // [A, B, C] -> [C, A, B]: C changed order, A and B stay
        let result = diff(&['A', 'B', 'C'], &['C', 'A', 'B']);
        assert_eq!(result.changes, vec![Change::Insert(0), Change::Delete(2)]);
        assert_eq!(result.matched, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_balanced_duplicates_fully_resolved() {
        let resolution = resolve(&['X', 'X', 'Y'], &['X', 'Y', 'X']);
        assert!(resolution.is_fully_resolved());
        // First old X pairs with first new X, second with second
        assert_eq!(resolution.new[0], Slot::Resolved(0));
        assert_eq!(resolution.new[1], Slot::Resolved(2));
        assert_eq!(resolution.new[2], Slot::Resolved(1));
    }

    #[test]
    fn test_unbalanced_duplicates_match_only_the_balance() {
        let resolution = resolve(&['X', 'X', 'X'], &['X']);
        assert_eq!(resolution.new, vec![Slot::Resolved(0)]);
        assert_eq!(resolution.old[0], Slot::Resolved(0));
        assert!(resolution.old[1].resolved().is_none());
        assert!(resolution.old[2].resolved().is_none());

        let result = diff(&['X', 'X', 'X'], &['X']);
        assert_eq!(result.changes, vec![Change::Delete(1), Change::Delete(2)]);
    }

    #[test]
    fn test_duplicates_extra_on_new_side() {
        let result = diff(&['X'], &['X', 'X']);
        assert_eq!(result.changes, vec![Change::Insert(1)]);
    }

    #[test]
    fn test_mixed_operations() {
        let result = diff(&[1, 2, 3, 4], &[1, 5, 3]);
        assert_eq!(result.matched, vec![(0, 0), (2, 2)]);
        assert_eq!(
            result.changes,
            vec![Change::Delete(1), Change::Insert(1), Change::Delete(3)]
        );
    }

    #[test]
    fn test_diff_by_key_ignores_content() {
        let old = [(1, "one"), (2, "two")];
        let new = [(1, "uno"), (2, "two")];
        let result = diff_by(&old, &new, |&(id, _)| id);
        assert!(result.is_empty());
    }

    #[test]
    fn test_longest_increasing() {
        assert_eq!(longest_increasing(&[(2, 0), (0, 1), (1, 2)]), vec![(0, 1), (1, 2)]);
        assert!(longest_increasing(&[]).is_empty());
        assert_eq!(longest_increasing(&[(2, 0), (1, 1), (0, 2)]).len(), 1);
    }

    #[test]
    fn test_counter_saturates() {
        let mut c = Counter::default();
        c.increment();
        assert_eq!(c, Counter::One);
        c.increment();
        c.increment();
        assert_eq!(c, Counter::Many);
    }
}
