//! Per-call views of a [`Graph`] that the algorithms run over.
//!
//! # Overview
//!
//! Algorithms never walk the link list directly. Each call builds one of
//! these views, which bake in the rules every engine shares:
//!
//! - obstructed links are left out;
//! - sites get dense indices in ascending ID order;
//! - neighbor lists follow link-list order.
//!
//! ```text
//! Graph ──► Adjacency        (Prim, Dijkstra, DFS/BFS)
//!       ──► undirected_skeleton  (Kruskal, connectivity, weak points)
//!       ──► Projection       (petgraph, statistics)
//! ```
//!
//! ## Undirected Skeleton
//!
//! The skeleton treats every active link as an unordered connection. In an
//! undirected graph a mirror pair collapses to its earlier record, so each
//! logical connection appears exactly once; otherwise every link stands on
//! its own. Self-loops are dropped.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use cavern_core::{Graph, GraphError};
use petgraph::graph::{DiGraph, NodeIndex};

// ---------------------------------------------------------------------------
// Adjacency
// ---------------------------------------------------------------------------

/// One outgoing step in an [`Adjacency`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Dense index of the target site.
    pub to: usize,
    pub distance: f64,
}

/// Index-based adjacency over the non-obstructed links.
///
/// Neighbors of a site are its outgoing links, plus its incoming links when
/// the graph is undirected, exactly the set [`Graph::neighbors`] reports.
/// Parallel candidates to the same target collapse into one [`Step`] at the
/// position of the first, carrying the shortest distance.
#[derive(Debug, Clone)]
pub struct Adjacency<'g> {
    ids: Vec<&'g str>,
    index: HashMap<&'g str, usize>,
    steps: Vec<Vec<Step>>,
}

impl<'g> Adjacency<'g> {
    #[must_use]
    pub fn build(graph: &'g Graph) -> Self {
        let ids: Vec<&str> = graph.site_ids().collect();
        let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut steps: Vec<Vec<Step>> = vec![Vec::new(); ids.len()];

        let mut push = |from: usize, to: usize, distance: f64| {
            let list = &mut steps[from];
            if let Some(existing) = list.iter_mut().find(|step| step.to == to) {
                existing.distance = existing.distance.min(distance);
            } else {
                list.push(Step { to, distance });
            }
        };

        for link in graph.active_links() {
            let (Some(&from), Some(&to)) = (index.get(link.from.as_str()), index.get(link.to.as_str()))
            else {
                continue;
            };
            push(from, to, link.distance);
            if !graph.is_directed() {
                push(to, from, link.distance);
            }
        }

        Self { ids, index, steps }
    }

    /// Number of sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Site ID for a dense index.
    #[must_use]
    pub fn id(&self, idx: usize) -> &'g str {
        self.ids[idx]
    }

    /// Every site ID, in index (ascending ID) order.
    #[must_use]
    pub fn ids(&self) -> &[&'g str] {
        &self.ids
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Dense index of `id`, or [`GraphError::UnknownSite`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSite`] if `id` is not a site.
    pub fn require(&self, id: &str) -> Result<usize, GraphError> {
        self.index_of(id)
            .ok_or_else(|| GraphError::UnknownSite(id.to_string()))
    }

    #[must_use]
    pub fn steps(&self, idx: usize) -> &[Step] {
        &self.steps[idx]
    }
}

// ---------------------------------------------------------------------------
// Undirected skeleton
// ---------------------------------------------------------------------------

/// An unordered connection in the undirected skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonEdge<'g> {
    pub from: &'g str,
    pub to: &'g str,
    pub distance: f64,
}

/// Active links as unordered connections, in link-list order.
///
/// See the module docs for how mirror pairs and self-loops are handled.
#[must_use]
pub fn undirected_skeleton(graph: &Graph) -> Vec<SkeletonEdge<'_>> {
    let mut emitted: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();

    for link in graph.active_links() {
        if link.from == link.to {
            continue;
        }
        let mirrored = !graph.is_directed() && !link.directed;
        if mirrored && emitted.contains(&(link.to.as_str(), link.from.as_str())) {
            continue;
        }
        emitted.insert((link.from.as_str(), link.to.as_str()));
        edges.push(SkeletonEdge {
            from: &link.from,
            to: &link.to,
            distance: link.distance,
        });
    }
    edges
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// A `petgraph` copy of the active network.
///
/// Every site becomes a node (ascending ID order) and every non-obstructed
/// link an edge weighted by its distance. Mirror pairs stay two edges.
#[derive(Debug, Clone)]
pub struct Projection {
    pub graph: DiGraph<String, f64>,
    pub node_map: HashMap<String, NodeIndex>,
}

impl Projection {
    #[must_use]
    pub fn build(source: &Graph) -> Self {
        let mut graph = DiGraph::with_capacity(source.site_count(), source.link_count());
        let mut node_map = HashMap::with_capacity(source.site_count());

        for id in source.site_ids() {
            node_map.insert(id.to_string(), graph.add_node(id.to_string()));
        }
        for link in source.active_links() {
            if let (Some(&from), Some(&to)) = (node_map.get(&link.from), node_map.get(&link.to)) {
                graph.add_edge(from, to, link.distance);
            }
        }

        Self { graph, node_map }
    }

    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }
}
