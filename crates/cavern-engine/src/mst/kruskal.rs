//! Kruskal's algorithm and skeleton connectivity.

use cavern_core::Graph;
use tracing::{debug, instrument};

use crate::mst::{FEWER_THAN_TWO_SITES, MinimumSpanningTree, MstEdge, MstOutcome, NO_USABLE_LINKS};
use crate::union_find::UnionFind;
use crate::view::{SkeletonEdge, undirected_skeleton};

/// Minimum spanning forest over the undirected skeleton.
///
/// Candidates are the non-obstructed links, stable-sorted by distance, so
/// equal-distance links are tried in link-list order. The pass stops early
/// once `sites - 1` edges have been accepted.
#[must_use]
#[instrument(skip(graph), fields(sites = graph.site_count(), links = graph.link_count()))]
pub fn kruskal(graph: &Graph) -> MinimumSpanningTree {
    let node_count = graph.site_count();
    if node_count < 2 {
        return MinimumSpanningTree::trivial(node_count, FEWER_THAN_TWO_SITES);
    }

    let mut candidates: Vec<SkeletonEdge<'_>> = undirected_skeleton(graph);
    if candidates.is_empty() {
        return MinimumSpanningTree::trivial(node_count, NO_USABLE_LINKS);
    }
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut sets = UnionFind::from_keys(graph.site_ids());
    let mut edges = Vec::with_capacity(node_count - 1);
    let mut total_weight = 0.0;

    for candidate in candidates {
        if sets.union(&candidate.from, &candidate.to) {
            total_weight += candidate.distance;
            edges.push(MstEdge {
                from: candidate.from.to_string(),
                to: candidate.to.to_string(),
                distance: candidate.distance,
            });
            if edges.len() == node_count - 1 {
                break;
            }
        }
    }

    let outcome = if edges.len() == node_count - 1 {
        MstOutcome::Spanning
    } else {
        MstOutcome::Forest {
            components: sets.component_count(),
        }
    };
    debug!(edges = edges.len(), total_weight, ?outcome, "kruskal done");

    MinimumSpanningTree {
        edges,
        total_weight,
        node_count,
        outcome,
    }
}

/// `true` if every site is joined to every other over non-obstructed links,
/// ignoring direction. Graphs with zero or one site are connected.
#[must_use]
pub fn is_connected(graph: &Graph) -> bool {
    graph.site_count() <= 1 || skeleton_sets(graph).component_count() == 1
}

/// Connected components of the undirected skeleton.
///
/// Members of each component are in ascending ID order; components are
/// ordered by their smallest member.
#[must_use]
pub fn components(graph: &Graph) -> Vec<Vec<String>> {
    skeleton_sets(graph)
        .groups()
        .into_iter()
        .map(|group| group.into_iter().map(str::to_string).collect())
        .collect()
}

fn skeleton_sets(graph: &Graph) -> UnionFind<&str> {
    let mut sets = UnionFind::from_keys(graph.site_ids());
    for edge in undirected_skeleton(graph) {
        sets.union(&edge.from, &edge.to);
    }
    sets
}
