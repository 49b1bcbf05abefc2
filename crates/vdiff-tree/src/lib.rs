//! VDiff Tree Model
//!
//! Variation diffs: a single tree describing how a preprocessor-annotated
//! file changes across one edit.
//!
//! # Core Concepts
//!
//! - [`VariationDiff`]: Arena owning every node, with dual-time parent links
//! - [`DiffNode`]: Annotation (`#if`, `#elif`, `#else`) or artifact with its edit
//! - [`Time`], [`DiffType`]: When a node exists
//! - Feature mappings and presence conditions, computed per [`Time`]
//!
//! # Example
//!
//! ```rust
//! use vdiff_formula::Formula;
//! use vdiff_tree::{DiffType, LineNumber, Time, VariationDiff};
//!
//! let mut diff = VariationDiff::new();
//! let root = diff.root();
//! let feature = diff.create_if(DiffType::Unchanged, Formula::var("A"));
//! let line = diff.create_artifact(DiffType::Added, LineNumber::INVALID, LineNumber::INVALID, ["f();"]);
//!
//! diff.add_below(feature, Some(root), Some(root))?;
//! diff.add_below(line, None, Some(feature))?;
//!
//! assert_eq!(diff.presence_condition(line, Time::After)?, Formula::var("A"));
//! # Ok::<(), vdiff_tree::TreeError>(())
//! ```

#![warn(unreachable_pub)]

// Core modules
mod condition;
mod consistency;
mod error;
mod lines;
mod node;
mod render;
mod time;
mod transform;
mod tree;

// Re-exports
pub use consistency::ConsistencyViolation;
pub use error::{AttachmentRejection, TreeError};
pub use lines::{range_at_time, range_in_diff, LineNumber};
pub use node::{DiffNode, NodeId};
pub use time::{DiffType, NodeType, Time};
pub use tree::{Ancestors, VariationDiff};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
