//! Plain-text rank reports
//!
//! Line-oriented writers for the rank vector, the perplexity trace and the
//! top-page listings. Scores are printed with Rust's shortest round-trip
//! float formatting.

use crate::error::Result;
use crate::graph::WebGraph;
use crate::pagerank::{RankSummary, Ranking};
use std::io::Write;

/// Write `"<page> <rank>"` for every page, in page id order
pub fn write_ranks<W: Write>(ranking: &Ranking<'_>, mut out: W) -> Result<()> {
    for (page, rank) in ranking.iter() {
        writeln!(out, "{page} {rank}")?;
    }
    out.flush()?;
    Ok(())
}

/// Write the top `n` pages by decreasing rank as `"<page> <rank>"`
pub fn write_top_ranks<W: Write>(ranking: &Ranking<'_>, n: usize, mut out: W) -> Result<()> {
    for (page, rank) in ranking.top_n(n) {
        writeln!(out, "{page} {rank}")?;
    }
    out.flush()?;
    Ok(())
}

/// Write the top `n` pages by decreasing rank as
/// `"<page> <in-degree> <out-degree>"`
pub fn write_top_with_links<W: Write>(ranking: &Ranking<'_>, n: usize, mut out: W) -> Result<()> {
    let graph = ranking.graph();
    for (page, _) in ranking.top_n(n) {
        writeln!(
            out,
            "{page} {} {}",
            graph.in_degree(page)?,
            graph.out_degree(page)?
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write the top `n` pages by decreasing in-link count as
/// `"<page> <in-degree>"`
pub fn write_top_in_links<W: Write>(graph: &WebGraph, n: usize, mut out: W) -> Result<()> {
    for (page, in_degree) in graph.top_by_in_degree(n) {
        writeln!(out, "{page} {in_degree}")?;
    }
    out.flush()?;
    Ok(())
}

/// Write the top `n` pages by decreasing in-link count as
/// `"<page> <in-degree> <out-degree>"`
pub fn write_top_in_links_with_links<W: Write>(
    graph: &WebGraph,
    n: usize,
    mut out: W,
) -> Result<()> {
    for (page, in_degree) in graph.top_by_in_degree(n) {
        writeln!(out, "{page} {in_degree} {}", graph.out_degree(page)?)?;
    }
    out.flush()?;
    Ok(())
}

/// Write one perplexity value per line
pub fn write_perplexity<W: Write>(trace: &[f64], mut out: W) -> Result<()> {
    for value in trace {
        writeln!(out, "{value}")?;
    }
    out.flush()?;
    Ok(())
}

/// Write the run totals, either as text lines or as a JSON object
pub fn write_summary<W: Write>(summary: &RankSummary, json: bool, mut out: W) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut out, summary)?;
        writeln!(out)?;
    } else {
        writeln!(out, "Total Pages: {}", summary.pages)?;
        writeln!(out, "Total Sources: {}", summary.sources)?;
        writeln!(out, "Total Sinks: {}", summary.sinks)?;
        writeln!(out, "Total Decreased PageRank: {}", summary.degraded_pages)?;
        writeln!(
            out,
            "Iterations: {} ({})",
            summary.iterations,
            if summary.converged {
                "converged"
            } else {
                "did not converge"
            }
        )?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeListFormat;
    use crate::pagerank::StandardPageRank;

    fn chain() -> WebGraph {
        WebGraph::from_records(["A B", "B C", "C"], EdgeListFormat::OutLinks).unwrap()
    }

    #[test]
    fn test_write_ranks_one_line_per_page() {
        let graph = chain();
        let ranking = StandardPageRank::new().run(&graph).unwrap();

        let mut buf = Vec::new();
        write_ranks(&ranking, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let (page, rank) = line.split_once(' ').unwrap();
            let rank: f64 = rank.parse().unwrap();
            assert_eq!(rank, ranking.rank(page).unwrap());
        }
    }

    #[test]
    fn test_write_top_in_links() {
        let graph = WebGraph::from_records(["A C", "B C", "C A"], EdgeListFormat::OutLinks).unwrap();

        let mut buf = Vec::new();
        write_top_in_links(&graph, 1, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "C 2\n");
    }

    #[test]
    fn test_write_top_in_links_with_links() {
        let graph = WebGraph::from_records(["A C", "B C", "C A"], EdgeListFormat::OutLinks).unwrap();

        let mut buf = Vec::new();
        write_top_in_links_with_links(&graph, 2, &mut buf).unwrap();
        // C has two in-links, then A (one in-link) ahead of B (none)
        assert_eq!(String::from_utf8(buf).unwrap(), "C 2 1\nA 1 1\n");
    }

    #[test]
    fn test_write_top_ranks_in_decreasing_order() {
        let graph = chain();
        let ranking = StandardPageRank::new().run(&graph).unwrap();

        let mut buf = Vec::new();
        write_top_ranks(&ranking, 2, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let rows: Vec<(&str, f64)> = text
            .lines()
            .map(|line| {
                let (page, rank) = line.split_once(' ').unwrap();
                (page, rank.parse().unwrap())
            })
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "C");
        assert_eq!(rows[1].0, "B");
        assert!(rows[0].1 >= rows[1].1);
        assert_eq!(rows[0].1, ranking.rank("C").unwrap());
    }

    #[test]
    fn test_write_top_with_links() {
        let graph = chain();
        let ranking = StandardPageRank::new().run(&graph).unwrap();

        let mut buf = Vec::new();
        write_top_with_links(&ranking, 1, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "C 1 0\n");
    }

    #[test]
    fn test_write_perplexity() {
        let mut buf = Vec::new();
        write_perplexity(&[3.0, 2.5], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "3\n2.5\n");
    }

    #[test]
    fn test_write_summary_text_and_json() {
        let graph = chain();
        let ranking = StandardPageRank::new().run(&graph).unwrap();
        let summary = ranking.summary();

        let mut text = Vec::new();
        write_summary(&summary, false, &mut text).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.starts_with("Total Pages: 3\n"));
        assert!(text.contains("Total Sinks: 1"));

        let mut json = Vec::new();
        write_summary(&summary, true, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["pages"], 3);
        assert_eq!(value["converged"], true);
        assert_eq!(value["edges"], 2);
        assert!(value.get("links").is_none());
    }
}
