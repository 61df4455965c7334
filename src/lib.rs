//! # linkrank
//!
//! PageRank over directed web link graphs, stopped by a perplexity-based
//! convergence rule instead of a fixed iteration count.
//!
//! ```
//! use linkrank::graph::{EdgeListFormat, WebGraph};
//! use linkrank::pagerank::StandardPageRank;
//!
//! let graph = WebGraph::from_records(["A B", "B C", "C"], EdgeListFormat::OutLinks)?;
//! let ranking = StandardPageRank::new().run(&graph)?;
//!
//! assert!(ranking.rank("C")? > ranking.rank("A")?);
//! # Ok::<(), linkrank::LinkRankError>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod pagerank;
pub mod report;

pub use config::PageRankConfig;
pub use error::{LinkRankError, Result};
pub use graph::{EdgeListFormat, GraphBuilder, WebGraph};
pub use pagerank::{RankSummary, Ranking, StandardPageRank};
