//! Conservation checks for edit scripts.
//!
//! A script is conservative when every old position is consumed at most once
//! (by a delete, a move origin or an update), every new position is produced
//! at most once (by an insert, a move target or an update), and the positions
//! left over on both sides are equal in number, so they can pair up in place.
//!
//! Nested scripts are checked per level: sections first, then the items of
//! every matched or moved section pair.

use rustc_hash::FxHashMap;

use crate::algo::{Diff, ExtendedDiff, NestedDiff};
use crate::change::{ExtendedChange, NestedChange};
use crate::error::{DiffError, DiffResult, Side};
use crate::section::Sectioned;

/// Check a single-level script against the sequence lengths.
pub fn check_changes<I>(changes: I, old_len: usize, new_len: usize) -> DiffResult<()>
where
    I: IntoIterator<Item = ExtendedChange>,
{
    let mut old_seen = vec![false; old_len];
    let mut new_seen = vec![false; new_len];
    let (mut removed, mut added) = (0usize, 0usize);

    for change in changes {
        if let Some(position) = change.old_position() {
            claim(&mut old_seen, Side::Old, position)?;
        }
        if let Some(position) = change.new_position() {
            claim(&mut new_seen, Side::New, position)?;
        }
        match change {
            ExtendedChange::Delete(_) => removed += 1,
            ExtendedChange::Insert(_) => added += 1,
            ExtendedChange::Move { .. } => {
                removed += 1;
                added += 1;
            }
            ExtendedChange::Update { .. } => {}
        }
    }

    // Claims are distinct and in bounds, so neither side underflows
    let old_untouched = old_len - removed;
    let new_untouched = new_len - added;
    if old_untouched != new_untouched {
        return Err(DiffError::Unbalanced {
            old_untouched,
            new_untouched,
        });
    }
    Ok(())
}

fn claim(seen: &mut [bool], side: Side, position: usize) -> DiffResult<()> {
    let len = seen.len();
    let Some(slot) = seen.get_mut(position) else {
        return Err(DiffError::OutOfBounds { side, position, len });
    };
    if *slot {
        return Err(match side {
            Side::Old => DiffError::DuplicateOld(position),
            Side::New => DiffError::DuplicateNew(position),
        });
    }
    *slot = true;
    Ok(())
}

impl Diff {
    /// Check that changes and matched pairs account for every position once.
    pub fn verify(&self, old_len: usize, new_len: usize) -> DiffResult<()> {
        let changes = self.changes.iter().map(|&c| ExtendedChange::from(c));
        let matched = self
            .matched
            .iter()
            .map(|&(from, to)| ExtendedChange::Update { from, to });
        check_changes(changes.chain(matched), old_len, new_len)
    }
}

impl ExtendedDiff {
    /// Check that the changes are conservative for the given lengths.
    pub fn verify(&self, old_len: usize, new_len: usize) -> DiffResult<()> {
        check_changes(self.changes.iter().copied(), old_len, new_len)
    }
}

impl NestedDiff {
    /// Check both levels against the snapshots the diff was computed from.
    pub fn verify<S: Sectioned>(&self, old: &[S], new: &[S]) -> DiffResult<()> {
        // Section level: matched pairs stay in place
        let sections = self.changes.iter().filter_map(|c| match *c {
            NestedChange::DeleteSection(at) => Some(ExtendedChange::Delete(at)),
            NestedChange::InsertSection(at) => Some(ExtendedChange::Insert(at)),
            NestedChange::MoveSection { from, to } => Some(ExtendedChange::Move { from, to }),
            NestedChange::UpdateSection { from, to } => Some(ExtendedChange::Update { from, to }),
            _ => None,
        });
        let matched = self
            .matched_sections
            .iter()
            .map(|&(from, to)| ExtendedChange::Update { from, to });
        check_changes(sections.chain(matched), old.len(), new.len())?;

        // Item level: only matched and moved pairs own item changes
        let pairs: Vec<(usize, usize)> = self
            .matched_sections
            .iter()
            .copied()
            .chain(self.changes.iter().filter_map(|c| match *c {
                NestedChange::MoveSection { from, to } => Some((from, to)),
                _ => None,
            }))
            .collect();

        let by_old: FxHashMap<usize, usize> = pairs.iter().enumerate().map(|(i, &(o, _))| (o, i)).collect();
        let by_new: FxHashMap<usize, usize> = pairs.iter().enumerate().map(|(i, &(_, n))| (n, i)).collect();
        let pair_of = |side: Side, section: usize| {
            let index = match side {
                Side::Old => by_old.get(&section),
                Side::New => by_new.get(&section),
            };
            index.copied().ok_or(DiffError::UnexpectedItemChange { side, section })
        };

        let mut buckets: Vec<Vec<ExtendedChange>> = vec![Vec::new(); pairs.len()];
        for change in &self.changes {
            let (pair, item_change) = match *change {
                NestedChange::DeleteElement(at) => (pair_of(Side::Old, at.section)?, ExtendedChange::Delete(at.item)),
                NestedChange::InsertElement(at) => (pair_of(Side::New, at.section)?, ExtendedChange::Insert(at.item)),
                NestedChange::MoveElement { from, to } | NestedChange::UpdateElement { from, to } => {
                    let pair = pair_of(Side::Old, from.section)?;
                    if pairs[pair].1 != to.section {
                        return Err(DiffError::UnexpectedItemChange {
                            side: Side::New,
                            section: to.section,
                        });
                    }
                    let item_change = if change.is_move_element() {
                        ExtendedChange::Move { from: from.item, to: to.item }
                    } else {
                        ExtendedChange::Update { from: from.item, to: to.item }
                    };
                    (pair, item_change)
                }
                _ => continue,
            };
            buckets[pair].push(item_change);
        }

        for (&(o, n), changes) in pairs.iter().zip(buckets) {
            check_changes(changes, old[o].items().len(), new[n].items().len())
                .map_err(|err| DiffError::in_section(n, err))?;
        }
        Ok(())
    }
}
