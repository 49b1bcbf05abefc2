//! VDiff Core - analysis of variation diffs
//!
//! Ties the workspace together:
//! - Loads and validates analysis configuration
//! - Aggregates the errors of all analysis stages
//! - Sets up tracing output
//! - Runs classification and view enumeration per diff
//!
//! # Example
//!
//! ```rust
//! use vdiff_core::{AnalysisConfig, DiffAnalyzer};
//! use vdiff_formula::Formula;
//! use vdiff_tree::{DiffType, LineNumber, VariationDiff};
//!
//! let mut diff = VariationDiff::new();
//! let root = diff.root();
//! let feature = diff.create_if(DiffType::Added, Formula::var("A"));
//! let line = diff.create_artifact(DiffType::Added, LineNumber::INVALID, LineNumber::INVALID, ["f();"]);
//! diff.add_below(feature, None, Some(root))?;
//! diff.add_below(line, None, Some(feature))?;
//!
//! let analyzer = DiffAnalyzer::new(AnalysisConfig::new().with_max_iterations(1000))?;
//! let report = analyzer.analyze(&diff)?;
//! assert_eq!(report.patterns.total(), 1);
//! assert_eq!(report.configurations.map(|c| c.len()), Some(2));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]

pub mod analyzer;
pub mod config;
pub mod error;
pub mod telemetry;

pub use analyzer::{DiffAnalyzer, DiffReport};
pub use config::{AnalysisConfig, EnumerationConfig, LogFormat, OracleConfig, TelemetryConfig};
pub use error::{AnalysisError, AnalysisResult};
pub use telemetry::init_tracing;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for analysing variation diffs
    pub use crate::{AnalysisConfig, AnalysisError, DiffAnalyzer, DiffReport};
    pub use vdiff_formula::{Formula, FormulaOracle, SatOracle};
    pub use vdiff_pattern::EditPattern;
    pub use vdiff_tree::{DiffType, NodeId, NodeType, Time, VariationDiff};
    pub use vdiff_view::{ArtifactName, Configure, Relevance, Search, Trace};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
