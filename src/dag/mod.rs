// src/dag/mod.rs

//! Project dependency graph.
//!
//! - [`graph`] holds the projects and their `after` edges and computes a
//!   deterministic build order.

pub mod graph;

pub use graph::ProjectGraph;
