//! Accessor generation macros for change enums.
//!
//! All macros use `paste` internally for identifier concatenation.

/// Generate `is_xxx` predicates for the variants of a change enum
///
/// Variant names are converted to snake case: `InsertSection` -> `is_insert_section`.
/// Works for unit, tuple and struct variants alike.
///
/// # Example
/// ```ignore
/// impl NestedChange {
///     impl_kind_predicates!(DeleteSection, InsertSection);
/// }
/// ```
macro_rules! impl_kind_predicates {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a `" $variant "` change"]
                #[inline]
                pub fn [<is_ $variant:snake>](&self) -> bool {
                    matches!(self, Self::$variant { .. })
                }
            )*
        }
    };
}

/// Generate a `kind()` method returning a static, lowercase name per variant
///
/// Used by `Display` impls and log fields.
macro_rules! impl_kind_name {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            /// Short lowercase name of this change kind
            pub fn kind(&self) -> &'static str {
                match self {
                    $(Self::$variant { .. } => stringify!([<$variant:snake>]),)*
                }
            }
        }
    };
}
