//! Obstruction-aware depth-first and breadth-first traversal.
//!
//! Both walks follow the same neighbor lists as [`Graph::neighbors`]:
//! non-obstructed outgoing links, plus incoming links in an undirected graph,
//! in link-list order. Each [`Visit`] records where the walk came from and
//! the distance accumulated along the tree the walk actually took, which is
//! not necessarily the shortest route.

use std::collections::{BTreeSet, VecDeque};

use cavern_core::{Graph, GraphError};
use serde::Serialize;
use tracing::instrument;

use crate::view::Adjacency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalKind {
    Dfs,
    Bfs,
}

/// One site reached by a traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visit {
    pub site: String,
    /// 0-based position in visit order.
    pub order: usize,
    /// Hops from the start along the traversal tree.
    pub depth: usize,
    /// The site this one was reached from; `None` for the start.
    pub parent: Option<String>,
    /// Distance from the start along the traversal tree.
    pub distance: f64,
}

/// The sites reached from one start, in visit order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Traversal {
    pub kind: TraversalKind,
    pub start: String,
    pub visits: Vec<Visit>,
}

impl Traversal {
    /// Site IDs in visit order.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.visits.iter().map(|visit| visit.site.as_str()).collect()
    }

    #[must_use]
    pub fn visit(&self, site: &str) -> Option<&Visit> {
        self.visits.iter().find(|visit| visit.site == site)
    }

    #[must_use]
    pub fn contains(&self, site: &str) -> bool {
        self.visit(site).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

/// Whether one start reaches every site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reachability {
    pub start: String,
    pub fully_reachable: bool,
    /// Reached sites, ascending, start included.
    pub reachable: Vec<String>,
    /// Sites not reached, ascending.
    pub unreachable: Vec<String>,
}

/// Depth-first pre-order traversal from `start`.
///
/// Iterative; the visit order is the one a recursive walk would produce.
///
/// # Errors
///
/// Returns [`GraphError::UnknownSite`] if `start` is not a site.
#[instrument(skip(graph))]
pub fn dfs(graph: &Graph, start: &str) -> Result<Traversal, GraphError> {
    let view = Adjacency::build(graph);
    let root = view.require(start)?;

    let mut seen = vec![false; view.len()];
    let mut visits = Vec::new();
    // (site, next neighbor position, depth, distance)
    let mut stack: Vec<(usize, usize, usize, f64)> = Vec::new();

    seen[root] = true;
    visits.push(make_visit(&view, root, 0, 0, None, 0.0));
    stack.push((root, 0, 0, 0.0));

    while let Some(frame) = stack.last_mut() {
        let (node, depth, distance) = (frame.0, frame.2, frame.3);
        let Some(step) = view.steps(node).get(frame.1) else {
            stack.pop();
            continue;
        };
        frame.1 += 1;
        if seen[step.to] {
            continue;
        }

        seen[step.to] = true;
        let reached = distance + step.distance;
        visits.push(make_visit(
            &view,
            step.to,
            visits.len(),
            depth + 1,
            Some(node),
            reached,
        ));
        stack.push((step.to, 0, depth + 1, reached));
    }

    Ok(Traversal {
        kind: TraversalKind::Dfs,
        start: start.to_string(),
        visits,
    })
}

/// Breadth-first traversal from `start`.
///
/// # Errors
///
/// Returns [`GraphError::UnknownSite`] if `start` is not a site.
#[instrument(skip(graph))]
pub fn bfs(graph: &Graph, start: &str) -> Result<Traversal, GraphError> {
    let view = Adjacency::build(graph);
    let root = view.require(start)?;

    let mut seen = vec![false; view.len()];
    let mut visits = Vec::new();
    let mut queue: VecDeque<(usize, usize, f64)> = VecDeque::new();

    seen[root] = true;
    visits.push(make_visit(&view, root, 0, 0, None, 0.0));
    queue.push_back((root, 0, 0.0));

    while let Some((node, depth, distance)) = queue.pop_front() {
        for step in view.steps(node) {
            if seen[step.to] {
                continue;
            }
            seen[step.to] = true;
            let reached = distance + step.distance;
            visits.push(make_visit(
                &view,
                step.to,
                visits.len(),
                depth + 1,
                Some(node),
                reached,
            ));
            queue.push_back((step.to, depth + 1, reached));
        }
    }

    Ok(Traversal {
        kind: TraversalKind::Bfs,
        start: start.to_string(),
        visits,
    })
}

/// Every site reachable from `start`, start included.
///
/// # Errors
///
/// Returns [`GraphError::UnknownSite`] if `start` is not a site.
pub fn reachable_from(graph: &Graph, start: &str) -> Result<BTreeSet<String>, GraphError> {
    Ok(dfs(graph, start)?
        .visits
        .into_iter()
        .map(|visit| visit.site)
        .collect())
}

/// Split the sites into those `start` reaches and those it does not.
///
/// # Errors
///
/// Returns [`GraphError::UnknownSite`] if `start` is not a site.
pub fn is_fully_reachable(graph: &Graph, start: &str) -> Result<Reachability, GraphError> {
    let reached = reachable_from(graph, start)?;
    let unreachable: Vec<String> = graph
        .site_ids()
        .filter(|id| !reached.contains(*id))
        .map(str::to_string)
        .collect();

    Ok(Reachability {
        start: start.to_string(),
        fully_reachable: unreachable.is_empty(),
        reachable: reached.into_iter().collect(),
        unreachable,
    })
}

fn make_visit(
    view: &Adjacency<'_>,
    site: usize,
    order: usize,
    depth: usize,
    parent: Option<usize>,
    distance: f64,
) -> Visit {
    Visit {
        site: view.id(site).to_string(),
        order,
        depth,
        parent: parent.map(|p| view.id(p).to_string()),
        distance,
    }
}
