//! Move detection and update folding on top of an insert/delete script
//!
//! Walks the base script in order. For every element not yet consumed it
//! searches forward for the first unconsumed element of the opposite kind
//! (delete/insert or insert/delete) whose items satisfy the identity
//! predicate, then replaces both halves with one change placed at the
//! earlier element's slot:
//!
//! - `Move { from, to }`: `from` is always the old position and `to` the new
//!   one, whichever half was met first.
//! - `Update { from, to }`: when equality folding is enabled and both halves
//!   sit in the same gap of the edit path (between the same two matched
//!   pairs), the pair is compared with the equality predicate instead.
//!   `Equal` drops both halves, anything else becomes an update. Pairs of
//!   one gap that cross each other cannot all stay in place: one longest
//!   non-crossing run folds, the rest are moves.
//!
//! Matched pairs of a value-keyed script hold equal values and are never
//! compared. Keyed by something else ([`extended_diff_by`]), they are.
//!
//! # Complexity
//!
//! O(d²) for d base changes. Only changed positions take part, so d is
//! usually small next to the collection size.

use std::hash::Hash;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::change::{Change, ExtendedChange};
use crate::equality::Equality;

use super::heckel;
use super::script::Diff;

// =============================================================================
// Public Types
// =============================================================================

/// Single-level script with moves and updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ExtendedDiff {
    /// Changes in edit-path order
    pub changes: Vec<ExtendedChange>,
    /// For each change, the index of the base-script element it originates
    /// from: the delete half for moves and folded pairs, the element itself
    /// otherwise. Updates of matched pairs take the index of the base element
    /// that follows them.
    pub source_index: Vec<usize>,
    /// Indices into `changes`, stably sorted by `source_index`. Replaying in
    /// this order puts every move at its origin among the other operations.
    pub reordered_index: Vec<usize>,
    /// New positions whose equality came back `Unknown`, ascending
    pub unknown: Vec<usize>,
}

impl ExtendedDiff {
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

    /// Changes in `reordered_index` order
    pub fn reordered(&self) -> impl Iterator<Item = &ExtendedChange> + '_ {
        self.reordered_index.iter().map(|&i| &self.changes[i])
    }

    /// Detected moves as `(from, to)`
    pub fn moves(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.changes.iter().filter_map(|c| match *c {
            ExtendedChange::Move { from, to } => Some((from, to)),
            _ => None,
        })
    }

    /// Check if any equality comparison was inconclusive
    #[inline]
    pub fn has_unknown(&self) -> bool {
        !self.unknown.is_empty()
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Upgrade delete/insert pairs of `diff` into moves.
///
/// `is_same` decides whether the old item at the delete and the new item at
/// the insert are the same entity. Unpaired elements pass through unchanged.
/// No equality is consulted, so no updates are produced.
pub fn extend<T, S>(diff: &Diff, old: &[T], new: &[T], is_same: S) -> ExtendedDiff
where
    S: Fn(&T, &T) -> bool,
{
    pair_up(diff, old, new, &Pairing::<T>::moves_only(&is_same))
}

/// Diff by value, folding same-entity changes into updates.
///
/// Like [`diff`](super::diff), but identity-matched pairs that did not move
/// are compared with `is_equal` and reported as updates when they differ.
/// Relocated items stay a delete plus an insert.
pub fn diff_with<T, S, E, Q>(old: &[T], new: &[T], is_same: S, is_equal: E) -> ExtendedDiff
where
    T: Hash + Eq,
    S: Fn(&T, &T) -> bool,
    E: Fn(&T, &T) -> Q,
    Q: Into<Equality>,
{
    let equality = |a: &T, b: &T| -> Equality { is_equal(a, b).into() };
    let base = heckel::diff(old, new);
    pair_up(&base, old, new, &Pairing::<T>::folding(&is_same, &equality, false))
}

/// Diff by value with moves and updates.
///
/// # Example
///
/// ```
/// use tola_listdiff::{extended_diff, ExtendedChange};
///
/// let d = extended_diff(&['A', 'B', 'C'], &['C', 'A', 'B'], |a, b| a == b, |a, b| a == b);
/// assert_eq!(d.changes, vec![ExtendedChange::Move { from: 2, to: 0 }]);
/// ```
pub fn extended_diff<T, S, E, Q>(old: &[T], new: &[T], is_same: S, is_equal: E) -> ExtendedDiff
where
    T: Hash + Eq,
    S: Fn(&T, &T) -> bool,
    E: Fn(&T, &T) -> Q,
    Q: Into<Equality>,
{
    let equality = |a: &T, b: &T| -> Equality { is_equal(a, b).into() };
    let base = heckel::diff(old, new);
    pair_up(&base, old, new, &Pairing::<T>::folding(&is_same, &equality, true))
}

/// Diff with moves and updates, keying the symbol table by `key(item)`.
///
/// Items with equal keys match in the base pass; their content is then
/// compared with `is_equal`.
pub fn extended_diff_by<'a, T, K, F, S, E, Q>(
    old: &'a [T],
    new: &'a [T],
    key: F,
    is_same: S,
    is_equal: E,
) -> ExtendedDiff
where
    K: Hash + Eq,
    F: FnMut(&'a T) -> K,
    S: Fn(&T, &T) -> bool,
    E: Fn(&T, &T) -> Q,
    Q: Into<Equality>,
{
    let equality = |a: &T, b: &T| -> Equality { is_equal(a, b).into() };
    let base = heckel::diff_by(old, new, key);
    pair_up(&base, old, new, &Pairing::<T>::folding(&is_same, &equality, true).comparing_matched())
}

// =============================================================================
// Pairing
// =============================================================================

/// Pairing options shared by the single-level and nested entry points.
pub(crate) struct Pairing<'p, T> {
    pub(crate) is_same: &'p dyn Fn(&T, &T) -> bool,
    /// Fold same-gap pairs (and matched pairs, see below) into updates
    pub(crate) is_equal: Option<&'p dyn Fn(&T, &T) -> Equality>,
    /// Pair across gaps into moves
    pub(crate) moves: bool,
    /// Also compare the base script's matched pairs
    pub(crate) compare_matched: bool,
    /// Skip the search when the base script is longer than this
    pub(crate) search_limit: usize,
}

impl<'p, T> Pairing<'p, T> {
    pub(crate) fn moves_only(is_same: &'p dyn Fn(&T, &T) -> bool) -> Self {
        Self {
            is_same,
            is_equal: None,
            moves: true,
            compare_matched: false,
            search_limit: usize::MAX,
        }
    }

    pub(crate) fn folding(
        is_same: &'p dyn Fn(&T, &T) -> bool,
        is_equal: &'p dyn Fn(&T, &T) -> Equality,
        moves: bool,
    ) -> Self {
        Self {
            is_same,
            is_equal: Some(is_equal),
            moves,
            compare_matched: false,
            search_limit: usize::MAX,
        }
    }

    /// Compare matched pairs too; only meaningful when the base script was
    /// not keyed by the full value.
    pub(crate) fn comparing_matched(mut self) -> Self {
        self.compare_matched = true;
        self
    }

    pub(crate) fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    fn searches(&self) -> bool {
        self.moves || self.is_equal.is_some()
    }
}

/// Gap index of a position: how many matched pairs precede it.
struct Gaps {
    deletes: Vec<usize>,
    inserts: Vec<usize>,
}

impl Gaps {
    fn new(diff: &Diff) -> Self {
        let mut deletes: Vec<usize> = diff.deletes().collect();
        let mut inserts: Vec<usize> = diff.inserts().collect();
        deletes.sort_unstable();
        inserts.sort_unstable();
        Self { deletes, inserts }
    }

    #[inline]
    fn of_old(&self, position: usize) -> usize {
        position.saturating_sub(self.deletes.partition_point(|&d| d < position))
    }

    #[inline]
    fn of_new(&self, position: usize) -> usize {
        position.saturating_sub(self.inserts.partition_point(|&i| i < position))
    }
}

/// Candidate partner for a base element.
struct Partner {
    index: usize,
    old: usize,
    new: usize,
    aligned: bool,
}

/// Identity pair found by the forward search.
struct Found {
    /// Base index met first
    first: usize,
    /// Base index of the partner
    second: usize,
    old: usize,
    new: usize,
    aligned: bool,
}

pub(crate) fn pair_up<T>(diff: &Diff, old: &[T], new: &[T], pairing: &Pairing<'_, T>) -> ExtendedDiff {
    let base = &diff.changes;
    let d = base.len();
    let gaps = Gaps::new(diff);

    let search = pairing.searches() && d <= pairing.search_limit;
    if pairing.searches() && !search {
        debug!(changes = d, limit = pairing.search_limit, "pair search skipped");
    }

    let mut found = Vec::new();
    if search {
        let mut consumed = vec![false; d];
        for i in 0..d {
            if consumed[i] {
                continue;
            }
            consumed[i] = true;
            if let Some(partner) = find_partner(i, base, &consumed, &gaps, old, new, pairing) {
                consumed[partner.index] = true;
                found.push(Found {
                    first: i,
                    second: partner.index,
                    old: partner.old,
                    new: partner.new,
                    aligned: partner.aligned,
                });
            }
        }
    }
    let folded = foldable(&found, &gaps, pairing.is_equal.is_some());

    // (change, source index); unpaired elements stay as they are
    let mut placed: Vec<Option<(ExtendedChange, usize)>> =
        base.iter().enumerate().map(|(i, &c)| Some((c.into(), i))).collect();
    let mut unknown = Vec::new();

    for (pair, &fold) in found.iter().zip(&folded) {
        let (from, to) = (pair.old, pair.new);
        let source = if base[pair.first].is_delete() { pair.first } else { pair.second };

        let change = match pairing.is_equal {
            Some(is_equal) if fold => match is_equal(&old[from], &new[to]) {
                Equality::Equal => None,
                Equality::Changed => Some(ExtendedChange::Update { from, to }),
                Equality::Unknown => {
                    unknown.push(to);
                    Some(ExtendedChange::Update { from, to })
                }
            },
            _ if pairing.moves => Some(ExtendedChange::Move { from, to }),
            // Crossing pair with moves disabled: both halves stay
            _ => continue,
        };
        placed[pair.second] = None;
        placed[pair.first] = change.map(|c| (c, source));
    }

    let matched_updates = if pairing.compare_matched {
        compare_matched(diff, old, new, pairing, &mut unknown)
    } else {
        Vec::new()
    };

    // Merge matched-pair updates back in edit-path order
    let mut changes = Vec::with_capacity(d + matched_updates.len());
    let mut source_index = Vec::with_capacity(d + matched_updates.len());
    let mut pending = matched_updates.into_iter().peekable();

    for (i, slot) in placed.into_iter().enumerate() {
        while let Some(&(o, n, change)) = pending.peek() {
            let precedes = match base[i] {
                Change::Delete(p) => o < p,
                Change::Insert(q) => n < q,
            };
            if !precedes {
                break;
            }
            changes.push(change);
            source_index.push(i);
            pending.next();
        }
        if let Some((change, source)) = slot {
            changes.push(change);
            source_index.push(source);
        }
    }
    for (_, _, change) in pending {
        changes.push(change);
        source_index.push(d);
    }

    unknown.sort_unstable();
    let reordered_index = reorder(&source_index);

    ExtendedDiff {
        changes,
        source_index,
        reordered_index,
        unknown,
    }
}

/// Pairs that may fold in place: per gap, one longest run that does not
/// cross itself. Every other pair of the gap is a reorder.
fn foldable(found: &[Found], gaps: &Gaps, fold: bool) -> Vec<bool> {
    let mut folded = vec![false; found.len()];
    if !fold {
        return folded;
    }

    // (gap, new, pair index), grouped by gap and in new order
    let mut aligned: Vec<(usize, usize, usize)> = found
        .iter()
        .enumerate()
        .filter(|(_, pair)| pair.aligned)
        .map(|(k, pair)| (gaps.of_old(pair.old), pair.new, k))
        .collect();
    aligned.sort_unstable();

    for run in aligned.chunk_by(|a, b| a.0 == b.0) {
        let pairs: Vec<(usize, usize)> = run.iter().map(|&(_, n, k)| (found[k].old, n)).collect();
        let kept: FxHashSet<usize> = heckel::longest_increasing(&pairs).into_iter().map(|(o, _)| o).collect();
        for &(_, _, k) in run {
            folded[k] = kept.contains(&found[k].old);
        }
    }
    folded
}

fn find_partner<T>(
    i: usize,
    base: &[Change],
    consumed: &[bool],
    gaps: &Gaps,
    old: &[T],
    new: &[T],
    pairing: &Pairing<'_, T>,
) -> Option<Partner> {
    (i + 1..base.len()).find_map(|j| {
        if consumed[j] {
            return None;
        }
        let (o, n) = match (base[i], base[j]) {
            (Change::Delete(o), Change::Insert(n)) | (Change::Insert(n), Change::Delete(o)) => (o, n),
            _ => return None,
        };
        let aligned = gaps.of_old(o) == gaps.of_new(n);
        if !pairing.moves && !aligned {
            return None;
        }
        let (a, b) = (old.get(o)?, new.get(n)?);
        (pairing.is_same)(a, b).then_some(Partner { index: j, old: o, new: n, aligned })
    })
}

/// Compare matched pairs; returns `(old, new, update)` for the changed ones.
fn compare_matched<T>(
    diff: &Diff,
    old: &[T],
    new: &[T],
    pairing: &Pairing<'_, T>,
    unknown: &mut Vec<usize>,
) -> Vec<(usize, usize, ExtendedChange)> {
    let Some(is_equal) = pairing.is_equal else {
        return Vec::new();
    };

    let mut updates = Vec::new();
    for &(o, n) in &diff.matched {
        let (Some(a), Some(b)) = (old.get(o), new.get(n)) else {
            continue;
        };
        match is_equal(a, b) {
            Equality::Equal => continue,
            Equality::Changed => {}
            Equality::Unknown => unknown.push(n),
        }
        updates.push((o, n, ExtendedChange::Update { from: o, to: n }));
    }
    updates
}

/// Change indices stably sorted by their source index.
fn reorder(source_index: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..source_index.len()).collect();
    order.sort_by_key(|&k| source_index[k]);
    order
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn same<T: PartialEq>(a: &T, b: &T) -> bool {
        a == b
    }

    #[test]
    fn test_pure_move() {
        let result = extended_diff(&['A', 'B', 'C'], &['C', 'A', 'B'], same, same);
        assert_eq!(result.changes, vec![ExtendedChange::Move { from: 2, to: 0 }]);
        assert!(!result.has_unknown());
    }

    #[test]
    fn test_move_direction_is_old_to_new() {
        // Insert(0) is met before Delete(2) but `from` is still the old position
        let base = heckel::diff(&['A', 'B', 'C'], &['C', 'A', 'B']);
        assert_eq!(base.changes, vec![Change::Insert(0), Change::Delete(2)]);

        let result = extend(&base, &['A', 'B', 'C'], &['C', 'A', 'B'], same);
        assert_eq!(result.moves().collect::<Vec<_>>(), vec![(2, 0)]);
    }

    #[test]
    fn test_balanced_duplicates_produce_no_insert_or_delete() {
        let result = extended_diff(&['X', 'X', 'Y'], &['X', 'Y', 'X'], same, same);
        assert!(result.changes.iter().all(|c| c.is_move()), "{:?}", result.changes);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_unmatched_elements_pass_through() {
        let base = heckel::diff(&[1, 2], &[3, 4]);
        let result = extend(&base, &[1, 2], &[3, 4], same);
        assert_eq!(
            result.changes,
            vec![
                ExtendedChange::Delete(0),
                ExtendedChange::Delete(1),
                ExtendedChange::Insert(0),
                ExtendedChange::Insert(1),
            ]
        );
    }

    #[test]
    fn test_each_half_pairs_once() {
        // Two deletes of "a" compete for one insert of "a"
        let old = ["a", "a", "b"];
        let new = ["b", "a"];
        let base = Diff::replace_all(old.len(), new.len());
        let result = extend(&base, &old, &new, same);

        assert_eq!(result.moves().count(), 2);
        assert_eq!(result.changes.iter().filter(|c| c.is_delete()).count(), 1);
        assert!(result.moves().any(|(from, to)| from == 0 && to == 1));
        assert!(result.moves().any(|(from, to)| from == 2 && to == 0));
    }

    #[test]
    fn test_same_gap_pair_becomes_update() {
        let old = [(1, "a"), (2, "b")];
        let new = [(1, "a"), (2, "B")];
        let by_id = |a: &(i32, &str), b: &(i32, &str)| a.0 == b.0;

        let result = extended_diff(&old, &new, by_id, same);
        assert_eq!(result.changes, vec![ExtendedChange::Update { from: 1, to: 1 }]);

        let result = diff_with(&old, &new, by_id, same);
        assert_eq!(result.changes, vec![ExtendedChange::Update { from: 1, to: 1 }]);
    }

    #[test]
    fn test_unknown_equality_is_recorded() {
        let old = [(1, "a"), (2, "b")];
        let new = [(1, "a"), (2, "B")];
        let result = extended_diff(&old, &new, |a, b| a.0 == b.0, |_, _| None::<bool>);

        assert_eq!(result.changes, vec![ExtendedChange::Update { from: 1, to: 1 }]);
        assert_eq!(result.unknown, vec![1]);
    }

    #[test]
    fn test_unchanged_items_skip_unknown_equality() {
        let items = [(1, "a"), (2, "b")];
        let result = extended_diff(&items, &items, |a, b| a.0 == b.0, |_, _| None::<bool>);
        assert!(result.is_empty());
        assert!(!result.has_unknown());
    }

    #[test]
    fn test_swapped_and_edited_pair_keeps_a_move() {
        let old = [(1, "a"), (2, "b")];
        let new = [(2, "B"), (1, "A")];
        let by_id = |a: &(i32, &str), b: &(i32, &str)| a.0 == b.0;

        let result = extended_diff(&old, &new, by_id, same);
        assert_eq!(
            result.changes,
            vec![ExtendedChange::Update { from: 0, to: 1 }, ExtendedChange::Move { from: 1, to: 0 }]
        );
        assert_eq!(result.source_index, vec![0, 1]);
    }

    #[test]
    fn test_crossing_pair_without_moves_stays_unpaired() {
        let old = [(1, "a"), (2, "b")];
        let new = [(2, "B"), (1, "A")];
        let result = diff_with(&old, &new, |a, b| a.0 == b.0, same);
        assert_eq!(
            result.changes,
            vec![
                ExtendedChange::Update { from: 0, to: 1 },
                ExtendedChange::Delete(1),
                ExtendedChange::Insert(0),
            ]
        );
        assert_eq!(result.source_index, vec![0, 1, 2]);
    }

    #[test]
    fn test_foldable_keeps_one_increasing_run_per_gap() {
        let base = Diff::replace_all(3, 3);
        let gaps = Gaps::new(&base);
        let pair = |old, new| Found { first: old, second: 3 + new, old, new, aligned: true };
        // 0 -> 2, 1 -> 0, 2 -> 1: only 1 -> 0, 2 -> 1 can stay in place
        let found = [pair(0, 2), pair(1, 0), pair(2, 1)];
        assert_eq!(foldable(&found, &gaps, true), vec![false, true, true]);
        assert_eq!(foldable(&found, &gaps, false), vec![false; 3]);
    }

    #[test]
    fn test_diff_with_never_moves() {
        let result = diff_with(&['A', 'B', 'C'], &['C', 'A', 'B'], same, same);
        assert_eq!(result.changes, vec![ExtendedChange::Insert(0), ExtendedChange::Delete(2)]);
    }

    #[test]
    fn test_matched_pairs_compared_when_keyed() {
        let old = [(1, "a"), (2, "b")];
        let new = [(1, "z"), (2, "b")];
        let result = extended_diff_by(&old, &new, |item| item.0, |a, b| a.0 == b.0, same);
        assert_eq!(result.changes, vec![ExtendedChange::Update { from: 0, to: 0 }]);
        assert_eq!(result.source_index, vec![0]);
    }

    #[test]
    fn test_reordered_index_follows_origin() {
        // old [a, y, b] -> new [b, a, z]
        let old = ['a', 'y', 'b'];
        let new = ['b', 'a', 'z'];
        let base = heckel::diff(&old, &new);
        assert_eq!(
            base.changes,
            vec![Change::Insert(0), Change::Delete(1), Change::Delete(2), Change::Insert(2)]
        );

        let result = extend(&base, &old, &new, same);
        assert_eq!(
            result.changes,
            vec![
                ExtendedChange::Move { from: 2, to: 0 },
                ExtendedChange::Delete(1),
                ExtendedChange::Insert(2),
            ]
        );
        assert_eq!(result.source_index, vec![2, 1, 3]);
        assert_eq!(result.reordered_index, vec![1, 0, 2]);
        assert_eq!(
            result.reordered().copied().collect::<Vec<_>>(),
            vec![
                ExtendedChange::Delete(1),
                ExtendedChange::Move { from: 2, to: 0 },
                ExtendedChange::Insert(2),
            ]
        );
    }

    #[test]
    fn test_search_limit_skips_pairing() {
        let old = ['A', 'B', 'C'];
        let new = ['C', 'A', 'B'];
        let base = heckel::diff(&old, &new);
        let is_same = |a: &char, b: &char| a == b;
        let result = pair_up(&base, &old, &new, &Pairing::<char>::moves_only(&is_same).with_search_limit(1));
        assert_eq!(result.changes, vec![ExtendedChange::Insert(0), ExtendedChange::Delete(2)]);
    }
}
