//! Link graph builder with page interning
//!
//! This module provides a mutable graph builder that uses FxHashMap
//! to intern page tokens into dense ids and FxHashSet adjacency for
//! O(1) duplicate-link collapsing during construction.

use crate::error::{LinkRankError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use std::io::BufRead;

/// Layout of one edge-list record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeListFormat {
    /// `source target target ...`: the first page links to the rest
    #[default]
    OutLinks,
    /// `page linker linker ...`: the rest link to the first page
    InLinks,
}

impl std::str::FromStr for EdgeListFormat {
    type Err = LinkRankError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "out-links" | "out_links" | "outlinks" | "out" => Ok(EdgeListFormat::OutLinks),
            "in-links" | "in_links" | "inlinks" | "in" => Ok(EdgeListFormat::InLinks),
            other => Err(LinkRankError::Config(format!(
                "unknown edge list format '{other}' (expected out-links or in-links)"
            ))),
        }
    }
}

/// A page in the graph builder
#[derive(Debug, Clone)]
pub struct BuilderNode {
    /// The page token
    pub page: String,
    /// Pages this page links to
    pub out_links: FxHashSet<u32>,
    /// Pages linking to this page
    pub in_links: FxHashSet<u32>,
}

impl BuilderNode {
    /// Create a new node with empty adjacency
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            out_links: FxHashSet::default(),
            in_links: FxHashSet::default(),
        }
    }
}

/// A mutable link graph builder optimized for streaming construction
///
/// Registering a page always creates both its in-link and out-link sets,
/// so every page is present in both directions regardless of whether it
/// was first seen as a source or a target.
#[derive(Debug)]
pub struct GraphBuilder {
    /// Maps page token -> node ID
    page_to_id: FxHashMap<String, u32>,
    /// Node storage, in first-seen order
    nodes: Vec<BuilderNode>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self {
            page_to_id: FxHashMap::default(),
            nodes: Vec::new(),
        }
    }

    /// Create a graph builder with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            page_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
        }
    }

    /// Get or register the node for the given page, returning its ID
    pub fn get_or_create_node(&mut self, page: &str) -> u32 {
        if let Some(&id) = self.page_to_id.get(page) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.page_to_id.insert(page.to_string(), id);
        self.nodes.push(BuilderNode::new(page));
        id
    }

    /// Add a directed link `from -> to`
    ///
    /// Repeated links collapse. Self-loops are kept. Both ids must have been
    /// registered; otherwise nothing is changed.
    pub fn add_link(&mut self, from: u32, to: u32) -> Result<()> {
        for id in [from, to] {
            if id as usize >= self.nodes.len() {
                return Err(LinkRankError::UnknownPage(format!("#{id}")));
            }
        }

        self.nodes[from as usize].out_links.insert(to);
        self.nodes[to as usize].in_links.insert(from);
        Ok(())
    }

    /// Apply one whitespace-delimited record
    ///
    /// `line` is the 1-based line number used for error reporting.
    pub fn add_record(&mut self, record: &str, format: EdgeListFormat, line: usize) -> Result<()> {
        let mut tokens = record.split_whitespace();
        let head = tokens.next().ok_or_else(|| LinkRankError::Parse {
            line,
            reason: "record has no page token".to_string(),
        })?;

        let head_id = self.get_or_create_node(head);
        for token in tokens {
            let other_id = self.get_or_create_node(token);
            match format {
                EdgeListFormat::OutLinks => self.add_link(head_id, other_id)?,
                EdgeListFormat::InLinks => self.add_link(other_id, head_id)?,
            }
        }

        Ok(())
    }

    /// Build a graph by streaming records from a reader, one per line
    pub fn from_reader<R: BufRead>(reader: R, format: EdgeListFormat) -> Result<Self> {
        let mut builder = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            builder.add_record(&line, format, idx + 1)?;
        }
        Ok(builder)
    }

    /// Build a graph from in-memory records
    pub fn from_records<I, S>(records: I, format: EdgeListFormat) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::new();
        for (idx, record) in records.into_iter().enumerate() {
            builder.add_record(record.as_ref(), format, idx + 1)?;
        }
        Ok(builder)
    }

    /// Get the number of pages in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of distinct directed links
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.out_links.len()).sum()
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&BuilderNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node ID by page token
    pub fn get_node_id(&self, page: &str) -> Option<u32> {
        self.page_to_id.get(page).copied()
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &BuilderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
