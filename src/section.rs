//! Two-level collection snapshots.
//!
//! A snapshot is a slice of sections, each holding an ordered list of items.
//! The diff never inspects section or item content directly; it only reads
//! the item list through [`Sectioned`] and hands values to caller predicates.

/// A section: something with an ordered item list.
///
/// Implement this for your own section type to diff it directly, or use the
/// provided [`Section`] wrapper.
pub trait Sectioned {
    /// Item type stored in the section
    type Item;

    /// Items of this section, in display order
    fn items(&self) -> &[Self::Item];
}

/// A section model paired with its items.
///
/// `model` carries whatever identifies the section (a key, a header title,
/// a full view model). Identity is decided by the caller's `is_same_section`.
///
/// # Example
///
/// ```
/// use tola_listdiff::Section;
///
/// let section = Section::new("fruits", vec!["apple", "pear"]);
/// assert_eq!(section.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Section<M, T> {
    /// Section model (identity, header, footer, ...)
    pub model: M,
    /// Items in display order
    pub items: Vec<T>,
}

impl<M, T> Section<M, T> {
    /// Create a section from a model and its items
    pub fn new(model: M, items: Vec<T>) -> Self {
        Self { model, items }
    }

    /// Create a section without items
    pub fn empty(model: M) -> Self {
        Self { model, items: Vec::new() }
    }

    /// Number of items
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the section has no items
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<M, T> Sectioned for Section<M, T> {
    type Item = T;

    #[inline]
    fn items(&self) -> &[T] {
        &self.items
    }
}

impl<M, T> Sectioned for (M, Vec<T>) {
    type Item = T;

    #[inline]
    fn items(&self) -> &[T] {
        &self.1
    }
}

impl<S: Sectioned> Sectioned for &S {
    type Item = S::Item;

    #[inline]
    fn items(&self) -> &[S::Item] {
        (**self).items()
    }
}
