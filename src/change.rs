//! Change elements produced by the diff algorithms.
//!
//! Three levels, each a superset of the previous one:
//!
//! | Type | Produced by | Variants |
//! |------|-------------|----------|
//! | [`Change`] | [`diff`](crate::algo::diff) | insert, delete |
//! | [`ExtendedChange`] | [`extended_diff`](crate::algo::extended_diff) | + update, move |
//! | [`NestedChange`] | [`nested_extended_diff`](crate::algo::nested_extended_diff) | section and item scope |
//!
//! Positions are always relative to the sequence they index: deletes and move
//! origins to the old sequence, inserts and move targets to the new one.
//! Item positions in a [`NestedChange`] are relative to their own section,
//! never to a flattened global index.

use std::fmt;

// =============================================================================
// Change: single level, insert/delete only
// =============================================================================

/// Insert or delete at a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// Insert the new item at this new position
    Insert(usize),
    /// Delete the old item at this old position
    Delete(usize),
}

impl Change {
    impl_kind_predicates!(Insert, Delete);
    impl_kind_name!(Insert, Delete);

    /// Position this change refers to (old for deletes, new for inserts)
    #[inline]
    pub fn position(&self) -> usize {
        match *self {
            Self::Insert(at) | Self::Delete(at) => at,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(at) => write!(f, "+{at}"),
            Self::Delete(at) => write!(f, "-{at}"),
        }
    }
}

// =============================================================================
// ExtendedChange: single level with moves and updates
// =============================================================================

/// Single-level change including moves and updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedChange {
    /// Insert the new item at this new position
    Insert(usize),
    /// Delete the old item at this old position
    Delete(usize),
    /// Same entity, changed content: reload `from` (old) as `to` (new)
    Update { from: usize, to: usize },
    /// Same entity, relocated from `from` (old) to `to` (new)
    Move { from: usize, to: usize },
}

impl ExtendedChange {
    impl_kind_predicates!(Insert, Delete, Update, Move);
    impl_kind_name!(Insert, Delete, Update, Move);

    /// Old position consumed by this change, if any
    #[inline]
    pub fn old_position(&self) -> Option<usize> {
        match *self {
            Self::Insert(_) => None,
            Self::Delete(at) => Some(at),
            Self::Update { from, .. } | Self::Move { from, .. } => Some(from),
        }
    }

    /// New position produced by this change, if any
    #[inline]
    pub fn new_position(&self) -> Option<usize> {
        match *self {
            Self::Delete(_) => None,
            Self::Insert(at) => Some(at),
            Self::Update { to, .. } | Self::Move { to, .. } => Some(to),
        }
    }

    /// Position the change resolves to: the new position, or the old one for deletes
    #[inline]
    pub fn target_position(&self) -> usize {
        match *self {
            Self::Delete(at) | Self::Insert(at) => at,
            Self::Update { to, .. } | Self::Move { to, .. } => to,
        }
    }

    /// Lift into section scope.
    ///
    /// Old positions are tagged with `old_section`, new ones with `new_section`.
    pub fn in_section(self, old_section: usize, new_section: usize) -> NestedChange {
        let old = |item| IndexPath::new(old_section, item);
        let new = |item| IndexPath::new(new_section, item);
        match self {
            Self::Insert(at) => NestedChange::InsertElement(new(at)),
            Self::Delete(at) => NestedChange::DeleteElement(old(at)),
            Self::Update { from, to } => NestedChange::UpdateElement { from: old(from), to: new(to) },
            Self::Move { from, to } => NestedChange::MoveElement { from: old(from), to: new(to) },
        }
    }

    /// Lift into section scope as a section-level change.
    pub fn as_section(self) -> NestedChange {
        match self {
            Self::Insert(at) => NestedChange::InsertSection(at),
            Self::Delete(at) => NestedChange::DeleteSection(at),
            Self::Update { from, to } => NestedChange::UpdateSection { from, to },
            Self::Move { from, to } => NestedChange::MoveSection { from, to },
        }
    }
}

impl From<Change> for ExtendedChange {
    fn from(change: Change) -> Self {
        match change {
            Change::Insert(at) => Self::Insert(at),
            Change::Delete(at) => Self::Delete(at),
        }
    }
}

impl fmt::Display for ExtendedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(at) => write!(f, "+{at}"),
            Self::Delete(at) => write!(f, "-{at}"),
            Self::Update { from, to } => write!(f, "~{from}->{to}"),
            Self::Move { from, to } => write!(f, "{from}->{to}"),
        }
    }
}

// =============================================================================
// IndexPath
// =============================================================================

/// Item position scoped to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IndexPath {
    /// Section index (old or new, depending on the change)
    pub section: usize,
    /// Item index within that section
    pub item: usize,
}

impl IndexPath {
    /// Create a new index path
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

// =============================================================================
// NestedChange: two levels
// =============================================================================

/// Change in a two-level (sectioned) collection.
///
/// Section deletes and item deletes use old indices. Section inserts and item
/// inserts use new indices. Moves and updates carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedChange {
    /// Old section removed
    DeleteSection(usize),
    /// New section added
    InsertSection(usize),
    /// Section relocated
    MoveSection { from: usize, to: usize },
    /// Section matched but must be reloaded as a whole
    UpdateSection { from: usize, to: usize },
    /// Item removed from an old section
    DeleteElement(IndexPath),
    /// Item added to a new section
    InsertElement(IndexPath),
    /// Item relocated, possibly across sections
    MoveElement { from: IndexPath, to: IndexPath },
    /// Item content changed
    UpdateElement { from: IndexPath, to: IndexPath },
}

impl NestedChange {
    impl_kind_predicates!(
        DeleteSection,
        InsertSection,
        MoveSection,
        UpdateSection,
        DeleteElement,
        InsertElement,
        MoveElement,
        UpdateElement,
    );
    impl_kind_name!(
        DeleteSection,
        InsertSection,
        MoveSection,
        UpdateSection,
        DeleteElement,
        InsertElement,
        MoveElement,
        UpdateElement,
    );

    /// Check if this change applies to a whole section
    #[inline]
    pub fn is_section_level(&self) -> bool {
        matches!(
            self,
            Self::DeleteSection(_)
                | Self::InsertSection(_)
                | Self::MoveSection { .. }
                | Self::UpdateSection { .. }
        )
    }

    /// Check if this change applies to a single item
    #[inline]
    pub fn is_item_level(&self) -> bool {
        !self.is_section_level()
    }
}

impl fmt::Display for NestedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteSection(at) => write!(f, "-s{at}"),
            Self::InsertSection(at) => write!(f, "+s{at}"),
            Self::MoveSection { from, to } => write!(f, "s{from}->s{to}"),
            Self::UpdateSection { from, to } => write!(f, "~s{from}->s{to}"),
            Self::DeleteElement(at) => write!(f, "-{at}"),
            Self::InsertElement(at) => write!(f, "+{at}"),
            Self::MoveElement { from, to } => write!(f, "{from}->{to}"),
            Self::UpdateElement { from, to } => write!(f, "~{from}->{to}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(Change::Insert(0).is_insert());
        assert!(!Change::Insert(0).is_delete());
        assert!(ExtendedChange::Move { from: 1, to: 0 }.is_move());
        assert!(NestedChange::MoveSection { from: 1, to: 0 }.is_move_section());
        assert!(NestedChange::InsertElement(IndexPath::new(0, 1)).is_insert_element());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ExtendedChange::Update { from: 0, to: 0 }.kind(), "update");
        assert_eq!(NestedChange::DeleteSection(3).kind(), "delete_section");
        assert_eq!(NestedChange::InsertElement(IndexPath::default()).kind(), "insert_element");
    }

    #[test]
    fn test_positions() {
        let mv = ExtendedChange::Move { from: 2, to: 0 };
        assert_eq!(mv.old_position(), Some(2));
        assert_eq!(mv.new_position(), Some(0));
        assert_eq!(mv.target_position(), 0);

        assert_eq!(ExtendedChange::Delete(4).new_position(), None);
        assert_eq!(ExtendedChange::Delete(4).target_position(), 4);
        assert_eq!(ExtendedChange::Insert(1).old_position(), None);
    }

    #[test]
    fn test_in_section_tags_sides() {
        let nested = ExtendedChange::Move { from: 1, to: 3 }.in_section(0, 2);
        assert_eq!(
            nested,
            NestedChange::MoveElement { from: IndexPath::new(0, 1), to: IndexPath::new(2, 3) }
        );
        assert_eq!(ExtendedChange::Delete(1).in_section(5, 6), NestedChange::DeleteElement(IndexPath::new(5, 1)));
        assert_eq!(ExtendedChange::Insert(1).in_section(5, 6), NestedChange::InsertElement(IndexPath::new(6, 1)));
    }

    #[test]
    fn test_as_section() {
        assert_eq!(ExtendedChange::Insert(2).as_section(), NestedChange::InsertSection(2));
        assert_eq!(
            ExtendedChange::Move { from: 1, to: 0 }.as_section(),
            NestedChange::MoveSection { from: 1, to: 0 }
        );
        assert!(NestedChange::InsertSection(2).is_section_level());
        assert!(NestedChange::DeleteElement(IndexPath::new(0, 0)).is_item_level());
    }

    #[test]
    fn test_display() {
        assert_eq!(ExtendedChange::Move { from: 2, to: 0 }.to_string(), "2->0");
        assert_eq!(
            NestedChange::UpdateElement { from: IndexPath::new(0, 1), to: IndexPath::new(1, 1) }.to_string(),
            "~[0, 1]->[1, 1]"
        );
    }
}
