//! Per-diff analysis driver
//!
//! [`DiffAnalyzer`] bundles a configuration with an oracle and runs the
//! classification and view algorithms over single diffs.

use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use vdiff_formula::{CacheStats, CachingOracle, Formula, FormulaOracle, SatOracle};
use vdiff_pattern::{classify, classify_all, EditPattern, PatternCounts};
use vdiff_tree::{NodeId, VariationDiff};
use vdiff_view::{optimized_view, unique_partial_configs, unique_views, Relevance};

/// Summary of one analysed diff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Reachable nodes of the analysed diff, root included
    pub nodes: usize,
    /// Edit patterns of its artifacts
    pub patterns: PatternCounts,
    /// Distinct partial configurations, `None` if enumeration hit a limit
    pub configurations: Option<Vec<Formula>>,
}

/// Analysis facade
pub struct DiffAnalyzer {
    config: AnalysisConfig,
    oracle: Arc<dyn FormulaOracle>,
    cache: Option<Arc<CachingOracle<SatOracle>>>,
}

impl DiffAnalyzer {
    /// Create an analyzer backed by the SAT solver
    ///
    /// Answers are cached unless `config.oracle.cache_capacity` is zero.
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        let capacity = config.oracle.cache_capacity;
        let cache = (capacity > 0).then(|| Arc::new(CachingOracle::new(SatOracle::new(), capacity)));
        let oracle: Arc<dyn FormulaOracle> = match &cache {
            Some(cache) => cache.clone(),
            None => Arc::new(SatOracle::new()),
        };
        Ok(Self { config, oracle, cache })
    }

    /// Create an analyzer asking `oracle`
    pub fn with_oracle(config: AnalysisConfig, oracle: Arc<dyn FormulaOracle>) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            oracle,
            cache: None,
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Oracle used for all queries
    #[inline]
    #[must_use]
    pub fn oracle(&self) -> &dyn FormulaOracle {
        self.oracle.as_ref()
    }

    /// Hit/miss counters of the built-in cache, if there is one
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Edit pattern of every artifact, in pre-order
    ///
    /// Parallel classification returns the same order as the sequential one.
    pub fn classify(&self, tree: &VariationDiff) -> AnalysisResult<Vec<(NodeId, EditPattern)>> {
        let oracle = self.oracle();
        if !self.config.parallel_classification {
            return Ok(classify_all(tree, oracle)?);
        }

        let artifacts = tree.artifact_nodes();
        tracing::debug!(artifacts = artifacts.len(), "classifying in parallel");
        let classified = artifacts
            .par_iter()
            .map(|&node| classify(tree, node, oracle).map(|pattern| (node, pattern)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(classified)
    }

    /// Pattern histogram of a diff
    pub fn pattern_counts(&self, tree: &VariationDiff) -> AnalysisResult<PatternCounts> {
        Ok(self.classify(tree)?.iter().collect())
    }

    /// View of a diff for one query
    pub fn view<R>(&self, tree: &VariationDiff, relevance: &R) -> AnalysisResult<VariationDiff>
    where
        R: Relevance + ?Sized,
    {
        Ok(optimized_view(tree, relevance, self.oracle())?)
    }

    /// Every distinct view of a diff within the configured enumeration bounds
    pub fn unique_views(&self, tree: &VariationDiff) -> AnalysisResult<Vec<(Formula, VariationDiff)>> {
        Ok(unique_views(tree, self.oracle(), &self.config.enumeration.limits())?)
    }

    /// Classify a diff and enumerate its partial configurations
    ///
    /// Hitting an enumeration limit is logged and leaves
    /// [`DiffReport::configurations`] empty; any other error aborts.
    pub fn analyze(&self, tree: &VariationDiff) -> AnalysisResult<DiffReport> {
        let tree = if self.config.cut_non_edited_subtrees {
            let mut cut = tree.clone();
            cut.cut_non_edited_subtrees();
            Cow::Owned(cut)
        } else {
            Cow::Borrowed(tree)
        };

        let patterns = self.pattern_counts(&tree)?;
        let limits = self.config.enumeration.limits();
        let configurations = match unique_partial_configs(&tree, self.oracle(), &limits) {
            Ok(configs) => Some(configs),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(error = %err, "skipping view enumeration");
                None
            }
            Err(err) => return Err(err.into()),
        };

        let report = DiffReport {
            nodes: tree.node_count(),
            patterns,
            configurations,
        };
        tracing::info!(
            nodes = report.nodes,
            artifacts = report.patterns.total(),
            configurations = report.configurations.as_ref().map(Vec::len),
            "analysed diff"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for DiffAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffAnalyzer")
            .field("config", &self.config)
            .field("cache_stats", &self.cache_stats())
            .finish_non_exhaustive()
    }
}
