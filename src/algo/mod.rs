//! Diff algorithms for flat and sectioned lists.
//!
//! - `heckel`: symbol-table sequence diff (inserts and deletes)
//! - `moves`: move pairing and update folding on top of a base script
//! - `myers`: predicate-based alignment for section sequences
//! - `nested`: two-level composition of the above

mod heckel;
mod moves;
mod myers;
mod nested;
mod script;

pub use heckel::{diff, diff_by, resolve, resolve_by, Resolution, Slot};
pub use moves::{diff_with, extend, extended_diff, extended_diff_by, ExtendedDiff};
pub use myers::{align, Alignment, MAX_EDIT_DISTANCE};
pub use nested::{
    nested_diff, nested_extended_diff, nested_extended_diff_with_config, scoped, DiffConfig, DiffStats,
    NestedDiff,
};
pub use script::Diff;
