//! Link graph construction and representation
//!
//! This module provides streaming graph building from edge lists and
//! the immutable CSR store the ranking engine reads from.

pub mod builder;
pub mod csr;

pub use builder::{EdgeListFormat, GraphBuilder};
pub use csr::WebGraph;
