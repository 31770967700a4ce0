//! Prim's algorithm from a chosen source.
//!
//! Lazy deletion: candidate edges go on a min-heap as their near end is
//! reached, and stale candidates (far end already in the tree) are skipped
//! when popped. Equal distances pop in push order.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use cavern_core::{Graph, GraphError};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::mst::{FEWER_THAN_TWO_SITES, MinimumSpanningTree, MstEdge, MstOutcome};
use crate::view::Adjacency;

/// The tree grown from one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MstFromSource {
    pub source: String,
    /// Tree over the reached sites.
    pub tree: MinimumSpanningTree,
    /// Reached sites in the order they joined the tree, source first.
    pub reachable: Vec<String>,
    /// Sites the source cannot reach, ascending.
    pub unreachable: Vec<String>,
    /// `true` if every site was reached.
    pub complete: bool,
}

/// The unique tree path from the source to one destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRoute {
    pub destination: String,
    /// Site IDs from the source to the destination, both included.
    pub path: Vec<String>,
    /// Sum of tree-edge distances along `path`.
    pub distance: f64,
}

impl MstFromSource {
    /// The tree route to every reached site other than the source, in
    /// [`MstFromSource::reachable`] order.
    #[must_use]
    pub fn routes_from_source(&self) -> Vec<TreeRoute> {
        let walk = TreeWalk::new(&self.source, &self.tree.edges);
        self.reachable
            .iter()
            .skip(1)
            .filter_map(|dest| walk.route_to(dest))
            .collect()
    }

    /// The tree route to `destination`, or `None` if it was not reached.
    #[must_use]
    pub fn route_to(&self, destination: &str) -> Option<TreeRoute> {
        TreeWalk::new(&self.source, &self.tree.edges).route_to(destination)
    }
}

/// Grow a minimum spanning tree from `source`.
///
/// Candidates from a site are its non-obstructed outgoing links, plus its
/// incoming links in an undirected graph. The tree covers only the sites the
/// source can reach; the rest are listed in
/// [`MstFromSource::unreachable`].
///
/// # Errors
///
/// Returns [`GraphError::UnknownSite`] if `source` is not a site.
#[instrument(skip(graph), fields(sites = graph.site_count()))]
pub fn prim(graph: &Graph, source: &str) -> Result<MstFromSource, GraphError> {
    let view = Adjacency::build(graph);
    let start = view.require(source)?;
    let total = view.len();

    let mut visited = vec![false; total];
    let mut heap = BinaryHeap::new();
    let mut seq = 0_u64;
    let mut reached = vec![start];
    let mut edges = Vec::new();
    let mut total_weight = 0.0;

    visited[start] = true;
    push_candidates(&view, start, &visited, &mut heap, &mut seq);

    while reached.len() < total {
        let Some(candidate) = heap.pop() else {
            break;
        };
        if visited[candidate.to] {
            continue;
        }
        visited[candidate.to] = true;
        reached.push(candidate.to);
        total_weight += candidate.distance;
        edges.push(MstEdge {
            from: view.id(candidate.from).to_string(),
            to: view.id(candidate.to).to_string(),
            distance: candidate.distance,
        });
        push_candidates(&view, candidate.to, &visited, &mut heap, &mut seq);
    }

    let complete = reached.len() == total;
    let unreachable: Vec<String> = (0..total)
        .filter(|&idx| !visited[idx])
        .map(|idx| view.id(idx).to_string())
        .collect();

    let tree = if total < 2 {
        MinimumSpanningTree::trivial(reached.len(), FEWER_THAN_TWO_SITES)
    } else if edges.is_empty() {
        MinimumSpanningTree::trivial(reached.len(), "source has no usable links")
    } else {
        let outcome = if complete {
            MstOutcome::Spanning
        } else {
            MstOutcome::Partial {
                unreached: unreachable.len(),
            }
        };
        MinimumSpanningTree {
            edges,
            total_weight,
            node_count: reached.len(),
            outcome,
        }
    };

    debug!(
        reached = reached.len(),
        unreachable = unreachable.len(),
        total_weight = tree.total_weight,
        "prim done"
    );

    Ok(MstFromSource {
        source: source.to_string(),
        tree,
        reachable: reached.iter().map(|&idx| view.id(idx).to_string()).collect(),
        unreachable,
        complete,
    })
}

fn push_candidates(
    view: &Adjacency<'_>,
    from: usize,
    visited: &[bool],
    heap: &mut BinaryHeap<Candidate>,
    seq: &mut u64,
) {
    for step in view.steps(from) {
        if !visited[step.to] {
            heap.push(Candidate {
                distance: step.distance,
                seq: *seq,
                from,
                to: step.to,
            });
            *seq += 1;
        }
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the shortest, then oldest.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    seq: u64,
    from: usize,
    to: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

// ---------------------------------------------------------------------------
// Tree routes
// ---------------------------------------------------------------------------

/// Parent pointers from an iterative DFS over the tree, rooted at the source.
struct TreeWalk<'t> {
    source: &'t str,
    parent: HashMap<&'t str, (&'t str, f64)>,
}

impl<'t> TreeWalk<'t> {
    fn new(source: &'t str, edges: &'t [MstEdge]) -> Self {
        let mut adjacency: HashMap<&str, Vec<(&str, f64)>> = HashMap::new();
        for edge in edges {
            adjacency
                .entry(edge.from.as_str())
                .or_default()
                .push((edge.to.as_str(), edge.distance));
            adjacency
                .entry(edge.to.as_str())
                .or_default()
                .push((edge.from.as_str(), edge.distance));
        }

        let mut parent: HashMap<&str, (&str, f64)> = HashMap::new();
        let mut stack = vec![source];
        while let Some(current) = stack.pop() {
            for &(next, distance) in adjacency.get(current).map_or(&[][..], Vec::as_slice) {
                if next != source && !parent.contains_key(next) {
                    parent.insert(next, (current, distance));
                    stack.push(next);
                }
            }
        }

        Self { source, parent }
    }

    fn route_to(&self, destination: &str) -> Option<TreeRoute> {
        if destination == self.source {
            return Some(TreeRoute {
                destination: destination.to_string(),
                path: vec![destination.to_string()],
                distance: 0.0,
            });
        }

        let mut path = vec![destination.to_string()];
        let mut distance = 0.0;
        let mut cursor = destination;
        while cursor != self.source {
            let &(prev, step) = self.parent.get(cursor)?;
            distance += step;
            path.push(prev.to_string());
            cursor = prev;
        }
        path.reverse();

        Some(TreeRoute {
            destination: destination.to_string(),
            path,
            distance,
        })
    }
}
