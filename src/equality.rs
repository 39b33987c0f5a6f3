//! Tri-state content equality.
//!
//! Identity predicates answer "is this the same entity?" with a plain `bool`.
//! Equality predicates are only consulted for identity-matched pairs and may
//! answer [`Equality::Unknown`] when the content cannot be compared. Unknown
//! results are surfaced to the caller as undiffable sections.

/// Result of comparing the content of two identity-matched items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Equality {
    /// Content is unchanged
    #[default]
    Equal,
    /// Content changed
    Changed,
    /// Content cannot be compared
    Unknown,
}

impl Equality {
    /// Check if the content is known to be unchanged
    #[inline]
    pub fn is_equal(self) -> bool {
        matches!(self, Self::Equal)
    }

    /// Check if the comparison could not be made
    #[inline]
    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<bool> for Equality {
    #[inline]
    fn from(equal: bool) -> Self {
        if equal { Self::Equal } else { Self::Changed }
    }
}

impl From<Option<bool>> for Equality {
    #[inline]
    fn from(equal: Option<bool>) -> Self {
        match equal {
            Some(equal) => equal.into(),
            None => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(Equality::from(true), Equality::Equal);
        assert_eq!(Equality::from(false), Equality::Changed);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Equality::from(Some(true)), Equality::Equal);
        assert_eq!(Equality::from(Some(false)), Equality::Changed);
        assert!(Equality::from(None::<bool>).is_unknown());
    }
}
