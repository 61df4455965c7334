//! Standard PageRank algorithm
//!
//! Implements the classic PageRank with power iteration and proper
//! handling of sink pages. Each iteration is a pure function of the
//! previous rank vector, so large graphs are updated with a rayon
//! parallel map over pages.

use super::convergence::PerplexityMonitor;
use super::observer::{IterationClock, IterationReport, NoopObserver, RankObserver};
use super::Ranking;
use crate::config::PageRankConfig;
use crate::error::{LinkRankError, Result};
use crate::graph::WebGraph;
use rayon::prelude::*;

/// Standard PageRank implementation
#[derive(Debug, Clone, Default)]
pub struct StandardPageRank {
    config: PageRankConfig,
}

impl StandardPageRank {
    /// Create a new StandardPageRank with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PageRankConfig) -> Self {
        Self { config }
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.config.damping = damping;
        self
    }

    /// Set the perplexity change threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.perplexity_threshold = threshold;
        self
    }

    /// Set the number of consecutive stable iterations
    pub fn with_consecutive_rounds(mut self, rounds: usize) -> Self {
        self.config.consecutive_rounds = rounds;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the page count from which iterations run in parallel
    pub fn with_parallel_threshold(mut self, pages: usize) -> Self {
        self.config.parallel_threshold = pages;
        self
    }

    pub fn config(&self) -> &PageRankConfig {
        &self.config
    }

    /// Run PageRank on a graph
    ///
    /// Returns the result even if the iteration cap was hit, with
    /// `converged() == false`.
    pub fn run<'g>(&self, graph: &'g WebGraph) -> Result<Ranking<'g>> {
        self.run_with_observer(graph, &mut NoopObserver)
    }

    /// Run PageRank, notifying `observer` at every iteration
    pub fn run_with_observer<'g>(
        &self,
        graph: &'g WebGraph,
        observer: &mut impl RankObserver,
    ) -> Result<Ranking<'g>> {
        self.config.validate()?;

        let n = graph.page_count();
        if n == 0 {
            return Err(LinkRankError::EmptyGraph);
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pagerank", pages = n, edges = graph.edge_count()).entered();

        // Initialize scores uniformly
        let initial_scores = vec![1.0 / n as f64; n];
        let mut scores = initial_scores.clone();

        let mut monitor =
            PerplexityMonitor::new(self.config.perplexity_threshold, self.config.consecutive_rounds);
        monitor.observe(&scores);
        observer.on_start(n, monitor.trace()[0]);

        // Sinks and reciprocal out-degrees never change during a run
        let sinks: Vec<u32> = graph.sink_ids().collect();
        let inv_out_degree: Vec<f64> = (0..n as u32)
            .map(|id| match graph.out_degree_of(id) {
                0 => 0.0,
                d => 1.0 / d as f64,
            })
            .collect();
        let parallel = n >= self.config.parallel_threshold;

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            iterations += 1;
            let clock = IterationClock::start();

            let sink_mass: f64 = sinks.iter().map(|&s| scores[s as usize]).sum();
            scores = self.step(graph, scores, sink_mass, &inv_out_degree, parallel);

            let verdict = monitor.observe(&scores);
            let report = IterationReport {
                iteration: iterations,
                perplexity: monitor.trace().last().copied().unwrap_or_default(),
                delta: monitor.last_delta().unwrap_or_default(),
                mass: scores.iter().sum(),
                sink_mass,
                elapsed: clock.elapsed(),
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(
                iteration = report.iteration,
                perplexity = report.perplexity,
                delta = report.delta,
                mass = report.mass,
                "pagerank iteration"
            );

            observer.on_iteration(&report);

            if verdict.is_converged() {
                converged = true;
                break;
            }
        }

        #[cfg(feature = "tracing")]
        {
            if converged {
                tracing::info!(iterations, "pagerank converged");
            } else {
                tracing::warn!(
                    iterations,
                    "pagerank stopped at iteration cap without converging"
                );
            }
        }

        observer.on_finish(iterations, converged);

        Ok(Ranking::new(
            graph,
            scores,
            initial_scores,
            monitor.into_trace(),
            iterations,
            converged,
        ))
    }

    /// Compute the next rank vector from the previous one
    ///
    /// Consumes the previous vector; every entry of the new vector reads
    /// only from it.
    fn step(
        &self,
        graph: &WebGraph,
        scores: Vec<f64>,
        sink_mass: f64,
        inv_out_degree: &[f64],
        parallel: bool,
    ) -> Vec<f64> {
        let n = scores.len() as f64;
        let damping = self.config.damping;
        let base = (1.0 - damping) / n + damping * sink_mass / n;

        let rank_of = |page: usize| {
            let pulled: f64 = graph
                .in_neighbors(page as u32)
                .iter()
                .map(|&q| scores[q as usize] * inv_out_degree[q as usize])
                .sum();
            base + damping * pulled
        };

        if parallel {
            (0..scores.len()).into_par_iter().map(rank_of).collect()
        } else {
            (0..scores.len()).map(rank_of).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeListFormat;
    use crate::pagerank::observer::RecordingObserver;

    fn graph(records: &[&str]) -> WebGraph {
        WebGraph::from_records(records, EdgeListFormat::OutLinks).unwrap()
    }

    fn build_chain_graph() -> WebGraph {
        // A -> B -> C, C is a sink
        graph(&["A B", "B C", "C"])
    }

    fn build_star_graph() -> WebGraph {
        // Spokes all link to the hub
        graph(&["s1 hub", "s2 hub", "s3 hub", "hub s1"])
    }

    #[test]
    fn test_first_iteration_by_hand() {
        let graph = build_chain_graph();
        let ranking = StandardPageRank::new()
            .with_max_iterations(1)
            .run(&graph)
            .unwrap();

        assert_eq!(ranking.iterations(), 1);
        assert!((ranking.rank("A").unwrap() - 0.144444).abs() < 1e-6);
        assert!((ranking.rank("B").unwrap() - 0.427778).abs() < 1e-6);
        assert!((ranking.rank("C").unwrap() - 0.427778).abs() < 1e-6);

        let sum: f64 = ranking.scores().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mass_conserved_every_iteration() {
        let graph = graph(&["A B C D", "B C", "C A", "D", "E A E", "F"]);
        let mut observer = RecordingObserver::default();
        StandardPageRank::new()
            .run_with_observer(&graph, &mut observer)
            .unwrap();

        assert!(!observer.reports.is_empty());
        for report in &observer.reports {
            assert!((report.mass - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_edgeless_graph_is_uniform_fixed_point() {
        let graph = graph(&["A", "B", "C"]);
        let mut observer = RecordingObserver::default();
        let ranking = StandardPageRank::new()
            .run_with_observer(&graph, &mut observer)
            .unwrap();

        assert!(ranking.converged());
        for &score in ranking.scores() {
            assert!((score - 1.0 / 3.0).abs() < 1e-12);
        }
        for report in &observer.reports {
            assert!(report.delta < 1e-9);
        }
        // Uniform start plus one entry per iteration
        assert_eq!(ranking.perplexity_trace().len(), ranking.iterations() + 1);
        assert!((ranking.perplexity_trace()[0] - 3.0).abs() < 1e-9);
        assert_eq!(ranking.degraded_page_count(), 0);
    }

    #[test]
    fn test_self_loop_single_page() {
        let graph = graph(&["A A"]);
        let ranking = StandardPageRank::new().run(&graph).unwrap();

        assert!(ranking.converged());
        assert!((ranking.rank("A").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_graph_is_error() {
        let graph = WebGraph::default();
        let result = StandardPageRank::new().run(&graph);

        assert!(matches!(result, Err(LinkRankError::EmptyGraph)));
    }

    #[test]
    fn test_star_graph_hub_highest() {
        let graph = build_star_graph();
        let ranking = StandardPageRank::new().run(&graph).unwrap();

        let hub = ranking.rank("hub").unwrap();
        for spoke in ["s1", "s2", "s3"] {
            assert!(hub > ranking.rank(spoke).unwrap());
        }
        assert_eq!(ranking.top_n(1)[0].0, "hub");
    }

    #[test]
    fn test_max_iterations_returns_partial() {
        let graph = build_chain_graph();
        let ranking = StandardPageRank::new()
            .with_max_iterations(2)
            .with_consecutive_rounds(10)
            .run(&graph)
            .unwrap();

        assert_eq!(ranking.iterations(), 2);
        assert!(!ranking.converged());
        assert_eq!(ranking.scores().len(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let records: Vec<String> = (0..200)
            .map(|i| format!("p{} p{} p{}", i, (i * 7 + 3) % 200, (i * 13 + 1) % 250))
            .collect();
        let graph = WebGraph::from_records(&records, EdgeListFormat::OutLinks).unwrap();

        let sequential = StandardPageRank::new()
            .with_parallel_threshold(usize::MAX)
            .run(&graph)
            .unwrap();
        let parallel = StandardPageRank::new()
            .with_parallel_threshold(1)
            .run(&graph)
            .unwrap();

        assert_eq!(sequential.iterations(), parallel.iterations());
        for (s, p) in sequential.scores().iter().zip(parallel.scores()) {
            assert!((s - p).abs() < 1e-12);
        }
    }

    #[test]
    fn test_damping_factor() {
        let graph = build_star_graph();

        // Lower damping = more teleportation = more uniform scores
        let low = StandardPageRank::new().with_damping(0.5).run(&graph).unwrap();
        let high = StandardPageRank::new().with_damping(0.95).run(&graph).unwrap();

        let advantage_low = low.rank("hub").unwrap() - low.rank("s2").unwrap();
        let advantage_high = high.rank("hub").unwrap() - high.rank("s2").unwrap();
        assert!(advantage_high > advantage_low);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let graph = build_chain_graph();

        assert!(matches!(
            StandardPageRank::new().with_damping(1.5).run(&graph),
            Err(LinkRankError::Config(_))
        ));
        assert!(StandardPageRank::new().with_max_iterations(0).run(&graph).is_err());
        assert!(StandardPageRank::new().with_threshold(0.0).run(&graph).is_err());
    }
}
