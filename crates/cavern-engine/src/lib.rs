#![forbid(unsafe_code)]
//! cavern-engine library.
//!
//! Read-only algorithms over a [`cavern_core::Graph`]. Every entry point is a
//! free function taking `&Graph` and returning an owned result; nothing here
//! mutates the graph or keeps a reference to it past the call.
//!
//! # Conventions
//!
//! - **Errors**: lookups return [`cavern_core::GraphError`]; "no result"
//!   outcomes (disconnected graph, unreachable site) are values, not errors.
//! - **Obstruction**: obstructed links are invisible to every algorithm.
//! - **Determinism**: sites are visited in ascending ID order and links in
//!   list order, so equal inputs give equal outputs.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod mst;
pub mod scc;
pub mod shortest_path;
pub mod stats;
pub mod traversal;
pub mod union_find;
pub mod view;

pub use mst::{
    MinimumSpanningTree, MstEdge, MstFromSource, MstOutcome, TreeRoute, components, is_connected,
    kruskal, prim,
};
pub use scc::{WeakPoints, is_strongly_connected, strongly_connected_components, weak_points};
pub use shortest_path::{Route, ShortestPaths, dijkstra, shortest_route};
pub use stats::GraphStats;
pub use traversal::{Reachability, Traversal, TraversalKind, Visit, bfs, dfs, is_fully_reachable, reachable_from};
pub use union_find::UnionFind;
