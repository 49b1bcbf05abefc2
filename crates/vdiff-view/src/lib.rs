//! VDiff Views
//!
//! Extracts the part of a variation diff a user cares about and enumerates
//! all views a diff can have.
//!
//! # Core Concepts
//!
//! - [`Relevance`]: Predicate deciding which nodes a view keeps
//! - [`Trace`], [`Configure`], [`Search`], [`ArtifactName`]: Built-in queries
//! - [`naive_view`] / [`optimized_view`]: Two algorithms computing the same view
//! - [`unique_views`]: One view per distinct partial configuration
//!
//! # Example
//!
//! ```rust
//! use vdiff_formula::{Formula, SatOracle};
//! use vdiff_tree::{DiffType, LineNumber, VariationDiff};
//! use vdiff_view::{optimized_view, Configure};
//!
//! let mut diff = VariationDiff::new();
//! let root = diff.root();
//! let feature = diff.create_if(DiffType::Unchanged, Formula::var("A"));
//! let line = diff.create_artifact(DiffType::Added, LineNumber::INVALID, LineNumber::INVALID, ["f();"]);
//! diff.add_below(feature, Some(root), Some(root))?;
//! diff.add_below(line, None, Some(feature))?;
//!
//! let hidden = optimized_view(&diff, &Configure::new(Formula::var("A").negate()), &SatOracle::new())?;
//! assert_eq!(hidden.node_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]

mod error;
mod queries;
mod relevance;
mod unique;
mod view;

pub use error::ViewError;
pub use queries::{ArtifactName, Configure, Search, Trace};
pub use relevance::{Relevance, ViewNodes};
pub use unique::{unique_partial_configs, unique_views, EnumerationLimits, MAX_CNF_CLAUSES};
pub use view::{naive_view, optimized_view, view_tree};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
