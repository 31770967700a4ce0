//! Single-source shortest routes (Dijkstra).
//!
//! Binary-heap Dijkstra with lazy deletion over the non-obstructed adjacency
//! ([`crate::view::Adjacency`]). Distances are non-negative by construction;
//! the store rejects anything else.
//!
//! An unreachable destination is not a failure of the run: [`dijkstra`]
//! always returns a [`ShortestPaths`] table, and only
//! [`ShortestPaths::path_to`] reports [`GraphError::NoRoute`] for the one
//! destination asked about.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use cavern_core::{Graph, GraphError};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::view::Adjacency;

/// A concrete route between two sites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Site IDs from source to destination, both included.
    pub path: Vec<String>,
    pub distance: f64,
}

impl Route {
    /// Number of links walked.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Shortest distances and predecessors from one source.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: String,
    ids: Vec<String>,
    dist: Vec<f64>,
    prev: Vec<Option<usize>>,
}

impl ShortestPaths {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Shortest distance to `id`; `None` if unreachable or unknown.
    #[must_use]
    pub fn distance_to(&self, id: &str) -> Option<f64> {
        self.index_of(id)
            .map(|idx| self.dist[idx])
            .filter(|d| d.is_finite())
    }

    /// Every site with its distance, ascending by ID; unreachable sites carry
    /// `f64::INFINITY`.
    pub fn distances(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ids
            .iter()
            .zip(&self.dist)
            .map(|(id, d)| (id.as_str(), *d))
    }

    /// The site before `id` on its shortest route; `None` for the source,
    /// unreachable sites and unknown IDs.
    #[must_use]
    pub fn predecessor(&self, id: &str) -> Option<&str> {
        let idx = self.index_of(id)?;
        self.prev[idx].map(|p| self.ids[p].as_str())
    }

    /// Reachable sites (source included), ascending by ID.
    pub fn reachable(&self) -> impl Iterator<Item = &str> {
        self.distances()
            .filter(|(_, d)| d.is_finite())
            .map(|(id, _)| id)
    }

    /// Reconstruct the shortest route to `destination`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::UnknownSite`] if `destination` is not a site.
    /// - [`GraphError::NoRoute`] if it cannot be reached from the source.
    pub fn path_to(&self, destination: &str) -> Result<Route, GraphError> {
        let target = self
            .index_of(destination)
            .ok_or_else(|| GraphError::UnknownSite(destination.to_string()))?;
        let distance = self.dist[target];
        if !distance.is_finite() {
            return Err(GraphError::no_route(&self.source, destination));
        }

        let mut path = vec![self.ids[target].clone()];
        let mut cursor = target;
        while let Some(prev) = self.prev[cursor] {
            path.push(self.ids[prev].clone());
            cursor = prev;
        }
        path.reverse();

        Ok(Route { path, distance })
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.ids
            .binary_search_by(|probe| probe.as_str().cmp(id))
            .ok()
    }
}

/// Run Dijkstra from `source`.
///
/// # Errors
///
/// Returns [`GraphError::UnknownSite`] if `source` is not a site.
#[instrument(skip(graph), fields(sites = graph.site_count()))]
pub fn dijkstra(graph: &Graph, source: &str) -> Result<ShortestPaths, GraphError> {
    let view = Adjacency::build(graph);
    let start = view.require(source)?;

    let mut dist = vec![f64::INFINITY; view.len()];
    let mut prev: Vec<Option<usize>> = vec![None; view.len()];
    let mut settled = vec![false; view.len()];
    let mut heap = BinaryHeap::new();

    dist[start] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;

        for step in view.steps(node) {
            let next = cost + step.distance;
            if next < dist[step.to] {
                dist[step.to] = next;
                prev[step.to] = Some(node);
                heap.push(State {
                    cost: next,
                    node: step.to,
                });
            }
        }
    }

    debug!(
        reachable = settled.iter().filter(|&&s| s).count(),
        "dijkstra done"
    );

    Ok(ShortestPaths {
        source: source.to_string(),
        ids: view.ids().iter().map(|id| (*id).to_string()).collect(),
        dist,
        prev,
    })
}

/// Shortest route between two sites in one call.
///
/// # Errors
///
/// - [`GraphError::UnknownSite`] if either site is missing.
/// - [`GraphError::NoRoute`] if `to` cannot be reached from `from`.
pub fn shortest_route(graph: &Graph, from: &str, to: &str) -> Result<Route, GraphError> {
    dijkstra(graph, from)?.path_to(to)
}

/// Heap entry: `BinaryHeap` pops the smallest cost first.
#[derive(Debug, Clone, Copy)]
struct State {
    cost: f64,
    node: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}
