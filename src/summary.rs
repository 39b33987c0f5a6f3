//! Bucketing of nested change lists.
//!
//! A consumer applying changes to a live list must follow a fixed order:
//! deletions before insertions, insertions before moves, moves before
//! reloads. The diff output is not in that order, so it is partitioned here
//! first.
//!
//! Two buckets are never filled from the change list itself:
//! `undiffable_sections` and `header_footer_updates`. They describe sections
//! that need a coarse refresh and are populated through the `mark_*` methods.

use crate::algo::NestedDiff;
use crate::change::{IndexPath, NestedChange};

/// Nested changes partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Summary {
    /// Old indices of deleted sections
    pub deleted_sections: Vec<usize>,
    /// New indices of inserted sections
    pub inserted_sections: Vec<usize>,
    /// Sections reloaded as a whole, as `(old, new)`
    pub updated_sections: Vec<(usize, usize)>,
    /// Relocated sections, as `(old, new)`
    pub moved_sections: Vec<(usize, usize)>,
    /// Deleted items (old paths)
    pub deleted_elements: Vec<IndexPath>,
    /// Inserted items (new paths)
    pub inserted_elements: Vec<IndexPath>,
    /// Items with changed content, as `(old, new)` paths
    pub updated_elements: Vec<(IndexPath, IndexPath)>,
    /// Relocated items, as `(old, new)` paths
    pub moved_elements: Vec<(IndexPath, IndexPath)>,
    /// New indices of sections whose items could not be compared
    pub undiffable_sections: Vec<usize>,
    /// New indices of sections whose header or footer changed
    pub header_footer_updates: Vec<usize>,
}

/// Partition a change list into buckets.
pub fn summarize(changes: &[NestedChange]) -> Summary {
    Summary::from_changes(changes)
}

impl Summary {
    /// Partition a change list into buckets, preserving order within each.
    pub fn from_changes(changes: &[NestedChange]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            summary.push(*change);
        }
        summary
    }

    fn push(&mut self, change: NestedChange) {
        match change {
            NestedChange::DeleteSection(at) => self.deleted_sections.push(at),
            NestedChange::InsertSection(at) => self.inserted_sections.push(at),
            NestedChange::UpdateSection { from, to } => self.updated_sections.push((from, to)),
            NestedChange::MoveSection { from, to } => self.moved_sections.push((from, to)),
            NestedChange::DeleteElement(at) => self.deleted_elements.push(at),
            NestedChange::InsertElement(at) => self.inserted_elements.push(at),
            NestedChange::UpdateElement { from, to } => self.updated_elements.push((from, to)),
            NestedChange::MoveElement { from, to } => self.moved_elements.push((from, to)),
        }
    }

    /// Check if no bucket holds anything
    pub fn is_empty(&self) -> bool {
        self.change_count() == 0 && self.undiffable_sections.is_empty() && self.header_footer_updates.is_empty()
    }

    /// Number of bucketed changes, markers excluded
    pub fn change_count(&self) -> usize {
        self.deleted_sections.len()
            + self.inserted_sections.len()
            + self.updated_sections.len()
            + self.moved_sections.len()
            + self.deleted_elements.len()
            + self.inserted_elements.len()
            + self.updated_elements.len()
            + self.moved_elements.len()
    }

    /// Check if a new section index is already refreshed as a whole
    fn is_replaced(&self, section: usize) -> bool {
        self.inserted_sections.contains(&section) || self.updated_sections.iter().any(|&(_, to)| to == section)
    }

    /// Mark a new section whose items could not be compared.
    ///
    /// Returns `false` when the section is already inserted, updated or marked.
    pub fn mark_undiffable(&mut self, section: usize) -> bool {
        if self.is_replaced(section) || self.undiffable_sections.contains(&section) {
            return false;
        }
        self.undiffable_sections.push(section);
        true
    }

    /// Mark a new section whose header or footer changed.
    ///
    /// Returns `false` when the section is already inserted, updated or marked.
    pub fn mark_header_footer(&mut self, section: usize) -> bool {
        if self.is_replaced(section) || self.header_footer_updates.contains(&section) {
            return false;
        }
        self.header_footer_updates.push(section);
        true
    }

    /// Mark every matched or moved section pair for which `changed(old, new)`
    /// holds.
    pub fn mark_header_footer_changes<S, F>(&mut self, diff: &NestedDiff, old: &[S], new: &[S], changed: F)
    where
        F: Fn(&S, &S) -> bool,
    {
        let moved = diff.changes.iter().filter_map(|c| match *c {
            NestedChange::MoveSection { from, to } => Some((from, to)),
            _ => None,
        });
        for (o, n) in diff.matched_sections.iter().copied().chain(moved) {
            if let (Some(a), Some(b)) = (old.get(o), new.get(n))
                && changed(a, b)
            {
                self.mark_header_footer(n);
            }
        }
    }

    /// Changes in application order.
    ///
    /// Item deletes, section deletes, section inserts, item inserts, section
    /// moves, item moves, section updates, item updates.
    pub fn into_ordered(self) -> Vec<NestedChange> {
        let mut ordered = Vec::with_capacity(self.change_count());
        ordered.extend(self.deleted_elements.into_iter().map(NestedChange::DeleteElement));
        ordered.extend(self.deleted_sections.into_iter().map(NestedChange::DeleteSection));
        ordered.extend(self.inserted_sections.into_iter().map(NestedChange::InsertSection));
        ordered.extend(self.inserted_elements.into_iter().map(NestedChange::InsertElement));
        ordered.extend(
            self.moved_sections
                .into_iter()
                .map(|(from, to)| NestedChange::MoveSection { from, to }),
        );
        ordered.extend(
            self.moved_elements
                .into_iter()
                .map(|(from, to)| NestedChange::MoveElement { from, to }),
        );
        ordered.extend(
            self.updated_sections
                .into_iter()
                .map(|(from, to)| NestedChange::UpdateSection { from, to }),
        );
        ordered.extend(
            self.updated_elements
                .into_iter()
                .map(|(from, to)| NestedChange::UpdateElement { from, to }),
        );
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Section;

    fn path(section: usize, item: usize) -> IndexPath {
        IndexPath::new(section, item)
    }

    #[test]
    fn test_partition() {
        let changes = [
            NestedChange::MoveSection { from: 1, to: 0 },
            NestedChange::InsertElement(path(1, 1)),
            NestedChange::DeleteElement(path(0, 0)),
            NestedChange::InsertElement(path(1, 0)),
        ];
        let summary = summarize(&changes);

        assert_eq!(summary.moved_sections, vec![(1, 0)]);
        assert_eq!(summary.inserted_elements, vec![path(1, 1), path(1, 0)]);
        assert_eq!(summary.deleted_elements, vec![path(0, 0)]);
        assert_eq!(summary.change_count(), 4);
    }

    #[test]
    fn test_empty() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_application_order() {
        let changes = [
            NestedChange::UpdateElement { from: path(0, 0), to: path(0, 0) },
            NestedChange::MoveElement { from: path(0, 1), to: path(0, 2) },
            NestedChange::InsertSection(2),
            NestedChange::DeleteElement(path(0, 3)),
            NestedChange::DeleteSection(1),
        ];
        let ordered = summarize(&changes).into_ordered();
        let kinds: Vec<&str> = ordered.iter().map(|c| c.kind()).collect();

        assert_eq!(
            kinds,
            vec!["delete_element", "delete_section", "insert_section", "move_element", "update_element"]
        );
    }

    #[test]
    fn test_markers_skip_replaced_sections() {
        let mut summary = summarize(&[
            NestedChange::InsertSection(0),
            NestedChange::UpdateSection { from: 3, to: 2 },
        ]);

        assert!(!summary.mark_undiffable(0));
        assert!(!summary.mark_undiffable(2));
        assert!(summary.mark_undiffable(1));
        assert!(!summary.mark_undiffable(1));
        assert_eq!(summary.undiffable_sections, vec![1]);

        assert!(!summary.mark_header_footer(0));
        assert!(summary.mark_header_footer(1));
        assert_eq!(summary.header_footer_updates, vec![1]);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_mark_header_footer_changes() {
        let old = vec![Section::new(("a", "head"), vec![1]), Section::new(("b", "head"), vec![2])];
        let new = vec![Section::new(("a", "head"), vec![1]), Section::new(("b", "HEAD"), vec![2])];
        let diff = NestedDiff {
            matched_sections: vec![(0, 0), (1, 1)],
            ..NestedDiff::default()
        };

        let mut summary = diff.summarize();
        summary.mark_header_footer_changes(&diff, &old, &new, |a, b| a.model.1 != b.model.1);
        assert_eq!(summary.header_footer_updates, vec![1]);
    }

    #[test]
    fn test_mark_header_footer_changes_on_moved_section() {
        let old = vec![Section::new(("a", "head"), vec![1]), Section::new(("b", "head"), vec![2])];
        let new = vec![Section::new(("b", "HEAD"), vec![2]), Section::new(("a", "head"), vec![1])];
        let diff = NestedDiff {
            changes: vec![NestedChange::MoveSection { from: 1, to: 0 }],
            matched_sections: vec![(0, 1)],
            ..NestedDiff::default()
        };

        let mut summary = diff.summarize();
        summary.mark_header_footer_changes(&diff, &old, &new, |a, b| a.model.1 != b.model.1);
        assert_eq!(summary.header_footer_updates, vec![0]);
    }
}
