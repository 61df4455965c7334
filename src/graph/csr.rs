//! Compressed Sparse Row (CSR) link graph
//!
//! PageRank pulls mass along in-links, so the in-link rows are what the
//! power iteration walks. Out-link rows are kept alongside for degree
//! lookups and reporting.

use super::builder::{EdgeListFormat, GraphBuilder};
use crate::error::{LinkRankError, Result};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Adjacency for one direction in CSR layout
#[derive(Debug, Clone)]
struct Csr {
    /// Row pointers: node i's links are at indices row_ptr[i]..row_ptr[i+1]
    row_ptr: Vec<usize>,
    /// Column indices (linked nodes)
    col_idx: Vec<u32>,
}

impl Csr {
    fn empty() -> Self {
        Self {
            row_ptr: vec![0],
            col_idx: Vec::new(),
        }
    }

    fn row(&self, node: u32) -> &[u32] {
        let start = self.row_ptr[node as usize];
        let end = self.row_ptr[node as usize + 1];
        &self.col_idx[start..end]
    }

    fn degree(&self, node: u32) -> usize {
        self.row_ptr[node as usize + 1] - self.row_ptr[node as usize]
    }
}

/// An immutable directed web graph
///
/// Pages are interned to dense `u32` ids in first-seen order. Once built the
/// graph is read-only and can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct WebGraph {
    /// Page token for each node id
    pages: Vec<String>,
    /// Maps page token -> node id
    page_to_id: FxHashMap<String, u32>,
    out_links: Csr,
    in_links: Csr,
}

impl WebGraph {
    /// Convert a GraphBuilder into CSR format
    pub fn from_builder(builder: &GraphBuilder) -> Self {
        let num_nodes = builder.node_count();
        let mut pages = Vec::with_capacity(num_nodes);
        let mut out_links = Csr {
            row_ptr: Vec::with_capacity(num_nodes + 1),
            col_idx: Vec::with_capacity(builder.edge_count()),
        };
        let mut in_links = Csr {
            row_ptr: Vec::with_capacity(num_nodes + 1),
            col_idx: Vec::with_capacity(builder.edge_count()),
        };

        out_links.row_ptr.push(0);
        in_links.row_ptr.push(0);

        for (_, node) in builder.nodes() {
            pages.push(node.page.clone());

            // Sort rows for deterministic iteration
            let mut outs: Vec<u32> = node.out_links.iter().copied().collect();
            outs.sort_unstable();
            out_links.col_idx.extend(outs);
            out_links.row_ptr.push(out_links.col_idx.len());

            let mut ins: Vec<u32> = node.in_links.iter().copied().collect();
            ins.sort_unstable();
            in_links.col_idx.extend(ins);
            in_links.row_ptr.push(in_links.col_idx.len());
        }

        let page_to_id = pages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i as u32))
            .collect();

        Self {
            pages,
            page_to_id,
            out_links,
            in_links,
        }
    }

    /// Build a graph from in-memory edge-list records
    pub fn from_records<I, S>(records: I, format: EdgeListFormat) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let builder = GraphBuilder::from_records(records, format)?;
        Ok(Self::from_builder(&builder))
    }

    /// Build a graph by streaming an edge list from a reader
    pub fn from_reader<R: BufRead>(reader: R, format: EdgeListFormat) -> Result<Self> {
        let builder = GraphBuilder::from_reader(reader, format)?;
        Ok(Self::from_builder(&builder))
    }

    /// Build a graph from an edge-list file
    pub fn from_path(path: impl AsRef<Path>, format: EdgeListFormat) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LinkRankError::io(e, path))?;
        let builder = GraphBuilder::from_reader(BufReader::new(file), format).map_err(|e| match e {
            LinkRankError::Io { source, .. } => LinkRankError::io(source, path),
            other => other,
        })?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            path = %path.display(),
            pages = builder.node_count(),
            edges = builder.edge_count(),
            "loaded link graph"
        );

        Ok(Self::from_builder(&builder))
    }

    /// Number of distinct pages, N
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of distinct directed links
    pub fn edge_count(&self) -> usize {
        self.out_links.col_idx.len()
    }

    /// All page tokens, in id order
    pub fn all_pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.pages.iter().map(String::as_str)
    }

    /// Pages with no out-links
    pub fn sink_pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.sink_ids().map(move |id| self.pages[id as usize].as_str())
    }

    /// Node ids of pages with no out-links
    pub fn sink_ids(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.pages.len() as u32).filter(move |&n| self.out_links.degree(n) == 0)
    }

    /// Number of pages with no in-links
    pub fn source_page_count(&self) -> usize {
        (0..self.pages.len() as u32)
            .filter(|&n| self.in_links.degree(n) == 0)
            .count()
    }

    /// Number of pages with no out-links
    pub fn sink_page_count(&self) -> usize {
        self.sink_ids().count()
    }

    /// Look up the node id of a page
    pub fn page_id(&self, page: &str) -> Result<u32> {
        self.page_to_id
            .get(page)
            .copied()
            .ok_or_else(|| LinkRankError::UnknownPage(page.to_string()))
    }

    /// Look up the page token of a node id
    pub fn page_name(&self, id: u32) -> Result<&str> {
        self.pages
            .get(id as usize)
            .map(String::as_str)
            .ok_or_else(|| LinkRankError::UnknownPage(format!("#{id}")))
    }

    pub fn out_degree(&self, page: &str) -> Result<usize> {
        Ok(self.out_links.degree(self.page_id(page)?))
    }

    pub fn in_degree(&self, page: &str) -> Result<usize> {
        Ok(self.in_links.degree(self.page_id(page)?))
    }

    /// Pages that `page` links to
    pub fn out_links_of(&self, page: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let id = self.page_id(page)?;
        Ok(self.names(self.out_links.row(id)))
    }

    /// Pages linking to `page`
    pub fn in_links_of(&self, page: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let id = self.page_id(page)?;
        Ok(self.names(self.in_links.row(id)))
    }

    /// In-link row of a node, by id
    ///
    /// Panics if `node` is out of range; ids come from this graph.
    pub fn in_neighbors(&self, node: u32) -> &[u32] {
        self.in_links.row(node)
    }

    /// Out-degree of a node, by id
    pub fn out_degree_of(&self, node: u32) -> usize {
        self.out_links.degree(node)
    }

    /// In-degree of a node, by id
    pub fn in_degree_of(&self, node: u32) -> usize {
        self.in_links.degree(node)
    }

    /// Top `n` pages by decreasing in-link count; ties keep first-seen order
    pub fn top_by_in_degree(&self, n: usize) -> Vec<(&str, usize)> {
        let mut indexed: Vec<_> = (0..self.pages.len() as u32)
            .map(|id| (id, self.in_links.degree(id)))
            .collect();
        indexed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        indexed.truncate(n);
        indexed
            .into_iter()
            .map(|(id, degree)| (self.pages[id as usize].as_str(), degree))
            .collect()
    }

    fn names<'a>(&'a self, ids: &'a [u32]) -> impl Iterator<Item = &'a str> + 'a {
        ids.iter().map(move |&id| self.pages[id as usize].as_str())
    }
}

impl Default for WebGraph {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            page_to_id: FxHashMap::default(),
            out_links: Csr::empty(),
            in_links: Csr::empty(),
        }
    }
}
