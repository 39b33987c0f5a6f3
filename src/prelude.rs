//! Prelude module for common imports.
//!
//! ```
//! use tola_listdiff::prelude::*;
//! ```

// Algorithms
pub use crate::algo::{
    diff, diff_by, diff_with, extend, extended_diff, extended_diff_by, nested_diff, nested_extended_diff,
    nested_extended_diff_with_config, Diff, DiffConfig, DiffStats, ExtendedDiff, NestedDiff,
};

// Change elements
pub use crate::change::{Change, ExtendedChange, IndexPath, NestedChange};

// Snapshots
pub use crate::section::{Section, Sectioned};

// Equality
pub use crate::equality::Equality;

// Summary
pub use crate::summary::{summarize, Summary};

// Error
pub use crate::error::{DiffError, DiffResult};
