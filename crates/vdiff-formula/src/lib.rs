//! VDiff Formula System
//!
//! Propositional feature formulas and the satisfiability oracle they are
//! checked with.
//!
//! # Core Concepts
//!
//! - [`Formula`]: Immutable boolean expression over named feature variables
//! - [`Cnf`]: Canonical regular CNF used for cheap syntactic comparison
//! - [`FormulaOracle`]: Satisfiability, tautology, implication and equivalence queries
//! - [`SatOracle`]: Oracle backed by the `varisat` solver
//! - [`CachingOracle`]: Memoizing decorator for any oracle
//!
//! # Example
//!
//! ```rust
//! use vdiff_formula::{Formula, FormulaOracle, SatOracle};
//!
//! let a = Formula::var("A");
//! let b = Formula::var("B");
//! let oracle = SatOracle::new();
//!
//! assert!(oracle.implies(&Formula::and([a.clone(), b]), &a).unwrap());
//! assert!(!oracle.is_satisfiable(&Formula::and([a.clone(), a.negate()])).unwrap());
//! ```

#![warn(unreachable_pub)]

mod cache;
mod cnf;
mod formula;
mod oracle;
mod sat;

pub use cache::{CacheStats, CachingOracle};
pub use cnf::{Clause, Cnf, Literal};
pub use formula::Formula;
pub use oracle::{FormulaOracle, OracleError};
pub use sat::SatOracle;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
