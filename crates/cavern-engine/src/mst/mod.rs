//! Minimum spanning trees.
//!
//! # Overview
//!
//! Two constructions share the [`MinimumSpanningTree`] result type:
//!
//! - [`kruskal`]: the global minimum spanning forest over the undirected
//!   skeleton (see [`crate::view::undirected_skeleton`]). Directed graphs are
//!   treated as undirected for this purpose.
//! - [`prim`]: the tree grown from one source over the links that source can
//!   actually follow, together with the reachable/unreachable split and the
//!   tree route to every reached site.
//!
//! Neither treats a disconnected or trivial graph as an error: the
//! [`MstOutcome`] says what kind of tree came back.
//!
//! [`is_connected`] and [`components`] answer the connectivity questions that
//! Kruskal's union-find pass answers along the way.

pub mod kruskal;
pub mod prim;

pub use kruskal::{components, is_connected, kruskal};
pub use prim::{MstFromSource, TreeRoute, prim};

use serde::Serialize;

/// One tree edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MstEdge {
    pub from: String,
    pub to: String,
    pub distance: f64,
}

impl MstEdge {
    /// `true` if the edge joins `a` and `b`, in either direction.
    #[must_use]
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// What kind of tree a construction produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MstOutcome {
    /// One tree covering every site.
    Spanning,
    /// The graph is disconnected; one tree per component.
    Forest { components: usize },
    /// A tree from a source that could not reach every site.
    Partial { unreached: usize },
    /// Nothing to span: fewer than two sites, or no usable links.
    EmptyOrTrivial { reason: String },
}

/// Edges and weight of a minimum spanning tree or forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimumSpanningTree {
    /// Tree edges in the order they were accepted.
    pub edges: Vec<MstEdge>,
    pub total_weight: f64,
    /// Sites the tree (or forest) covers.
    pub node_count: usize,
    pub outcome: MstOutcome,
}

impl MinimumSpanningTree {
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub const fn is_spanning(&self) -> bool {
        matches!(self.outcome, MstOutcome::Spanning)
    }

    /// `true` if some tree edge joins `a` and `b`.
    #[must_use]
    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.edges.iter().any(|edge| edge.joins(a, b))
    }

    pub(crate) fn trivial(node_count: usize, reason: &str) -> Self {
        Self {
            edges: Vec::new(),
            total_weight: 0.0,
            node_count,
            outcome: MstOutcome::EmptyOrTrivial {
                reason: reason.to_string(),
            },
        }
    }
}

pub(crate) const FEWER_THAN_TWO_SITES: &str = "fewer than two sites";
pub(crate) const NO_USABLE_LINKS: &str = "no usable links";
