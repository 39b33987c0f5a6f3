//! Insert/delete edit script shared by the sequence engine and the alignment.

use crate::change::Change;

/// Insert/delete edit script plus the pairs it leaves in place.
///
/// `changes` is in edit-path order: walking old and new front to back, each
/// gap between two matched pairs lists its deletes before its inserts.
/// `matched` holds `(old, new)` pairs, strictly increasing on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Diff {
    /// Inserts and deletes in edit-path order
    pub changes: Vec<Change>,
    /// Pairs kept in place, as `(old, new)`
    pub matched: Vec<(usize, usize)>,
}

impl Diff {
    /// Build a script from the pairs that stay in place.
    ///
    /// Every old position not in `matched` becomes a delete, every new position
    /// not in `matched` an insert.
    pub fn from_matches(old_len: usize, new_len: usize, matched: Vec<(usize, usize)>) -> Self {
        debug_assert!(
            matched.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1),
            "matched pairs must be strictly increasing"
        );

        let mut changes = Vec::with_capacity((old_len + new_len).saturating_sub(2 * matched.len()));
        let (mut i, mut j) = (0, 0);

        for &(o, n) in &matched {
            changes.extend((i..o).map(Change::Delete));
            changes.extend((j..n).map(Change::Insert));
            i = o + 1;
            j = n + 1;
        }
        changes.extend((i..old_len).map(Change::Delete));
        changes.extend((j..new_len).map(Change::Insert));

        Self { changes, matched }
    }

    /// Script that deletes everything old and inserts everything new
    pub fn replace_all(old_len: usize, new_len: usize) -> Self {
        Self::from_matches(old_len, new_len, Vec::new())
    }

    /// Check if the script has no changes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Inserted new positions, ascending
    pub fn inserts(&self) -> impl Iterator<Item = usize> + '_ {
        self.changes.iter().filter_map(|c| match *c {
            Change::Insert(at) => Some(at),
            Change::Delete(_) => None,
        })
    }

    /// Deleted old positions, ascending
    pub fn deletes(&self) -> impl Iterator<Item = usize> + '_ {
        self.changes.iter().filter_map(|c| match *c {
            Change::Delete(at) => Some(at),
            Change::Insert(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all() {
        let diff = Diff::replace_all(2, 1);
        assert_eq!(diff.changes, vec![Change::Delete(0), Change::Delete(1), Change::Insert(0)]);
        assert!(diff.matched.is_empty());
    }

    #[test]
    fn test_from_matches_path_order() {
        // old: a b c d    new: x a c y
        let diff = Diff::from_matches(4, 4, vec![(0, 1), (2, 2)]);
        assert_eq!(
            diff.changes,
            vec![
                Change::Insert(0),
                Change::Delete(1),
                Change::Delete(3),
                Change::Insert(3),
            ]
        );
        assert_eq!(diff.deletes().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(diff.inserts().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_all_matched_is_empty() {
        let diff = Diff::from_matches(3, 3, vec![(0, 0), (1, 1), (2, 2)]);
        assert!(diff.is_empty());
        assert_eq!(diff.len(), 0);
    }
}
