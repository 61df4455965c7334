//! PageRank over web link graphs
//!
//! This module provides the damped power iteration, its perplexity-based
//! stopping rule, and the ranking result handed to reporting code.

pub mod convergence;
pub mod observer;
pub mod standard;

use crate::error::Result;
use crate::graph::WebGraph;
use serde::Serialize;

pub use convergence::{perplexity, PerplexityMonitor, Verdict};
pub use observer::{IterationReport, NoopObserver, RankObserver, RecordingObserver};
pub use standard::StandardPageRank;

/// Count pages whose final rank is strictly below their initial rank
pub fn degraded_page_count(initial: &[f64], final_scores: &[f64]) -> usize {
    initial
        .iter()
        .zip(final_scores)
        .filter(|(init, fin)| fin < init)
        .count()
}

/// Result of a PageRank computation
///
/// Borrows the graph it was computed on so scores can be looked up by page.
#[derive(Debug, Clone)]
pub struct Ranking<'g> {
    graph: &'g WebGraph,
    /// Final scores, indexed by node id
    scores: Vec<f64>,
    /// Uniform starting scores, indexed by node id
    initial_scores: Vec<f64>,
    /// Perplexity per iteration, entry 0 is the uniform start
    perplexity: Vec<f64>,
    iterations: usize,
    converged: bool,
}

impl<'g> Ranking<'g> {
    pub(crate) fn new(
        graph: &'g WebGraph,
        scores: Vec<f64>,
        initial_scores: Vec<f64>,
        perplexity: Vec<f64>,
        iterations: usize,
        converged: bool,
    ) -> Self {
        Self {
            graph,
            scores,
            initial_scores,
            perplexity,
            iterations,
            converged,
        }
    }

    /// The graph these scores belong to
    pub fn graph(&self) -> &'g WebGraph {
        self.graph
    }

    /// Final rank of a page
    pub fn rank(&self, page: &str) -> Result<f64> {
        let id = self.graph.page_id(page)?;
        Ok(self.scores[id as usize])
    }

    /// Iterate over `(page, rank)` pairs in page id order
    pub fn iter(&self) -> impl Iterator<Item = (&'g str, f64)> + '_ {
        self.graph.all_pages().zip(self.scores.iter().copied())
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn initial_scores(&self) -> &[f64] {
        &self.initial_scores
    }

    /// Perplexity of every rank vector seen during the run
    pub fn perplexity_trace(&self) -> &[f64] {
        &self.perplexity
    }

    /// Number of iterations performed
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the stopping rule fired before the iteration cap
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Pages whose final rank is lower than their uniform starting rank
    pub fn degraded_page_count(&self) -> usize {
        degraded_page_count(&self.initial_scores, &self.scores)
    }

    /// Get top N pages by score; ties keep page id order
    pub fn top_n(&self, n: usize) -> Vec<(&'g str, f64)> {
        let mut indexed: Vec<_> = self.iter().enumerate().collect();
        indexed.sort_by(|a, b| b.1 .1.total_cmp(&a.1 .1).then(a.0.cmp(&b.0)));
        indexed.truncate(n);
        indexed.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Aggregate statistics for reporting
    pub fn summary(&self) -> RankSummary {
        RankSummary {
            pages: self.graph.page_count(),
            edges: self.graph.edge_count(),
            sources: self.graph.source_page_count(),
            sinks: self.graph.sink_page_count(),
            iterations: self.iterations,
            converged: self.converged,
            degraded_pages: self.degraded_page_count(),
            final_perplexity: self.perplexity.last().copied().unwrap_or(0.0),
        }
    }
}

/// Run statistics, serializable for machine-readable output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSummary {
    pub pages: usize,
    pub edges: usize,
    pub sources: usize,
    pub sinks: usize,
    pub iterations: usize,
    pub converged: bool,
    pub degraded_pages: usize,
    pub final_perplexity: f64,
}
