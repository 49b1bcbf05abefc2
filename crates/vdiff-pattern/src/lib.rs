//! VDiff Edit Patterns
//!
//! Classifies each edited artifact of a variation diff into one of nine
//! elementary edit patterns.
//!
//! # Core Concepts
//!
//! - [`EditPattern`]: The closed catalogue, grouped by [`DiffType`](vdiff_tree::DiffType)
//! - [`classify`]: Total, deterministic classification of a single artifact
//! - [`classify_all`]: Classification of every artifact in a diff
//! - [`PatternCounts`]: Pattern histogram of one diff
//!
//! # Example
//!
//! ```rust
//! use vdiff_formula::{Formula, SatOracle};
//! use vdiff_pattern::{classify, EditPattern};
//! use vdiff_tree::{DiffType, LineNumber, VariationDiff};
//!
//! let mut diff = VariationDiff::new();
//! let root = diff.root();
//! let feature = diff.create_if(DiffType::Added, Formula::var("A"));
//! let line = diff.create_artifact(DiffType::Added, LineNumber::INVALID, LineNumber::INVALID, ["f();"]);
//! diff.add_below(feature, None, Some(root))?;
//! diff.add_below(line, None, Some(feature))?;
//!
//! assert_eq!(classify(&diff, line, &SatOracle::new())?, EditPattern::AddWithMapping);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]

mod classify;
mod error;
mod pattern;

pub use classify::{classify, classify_all, matches, PatternCounts};
pub use error::ClassifyError;
pub use pattern::{EditPattern, UnknownPattern};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
