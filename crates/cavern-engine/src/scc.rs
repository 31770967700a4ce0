//! Strongly connected components and structural weak points.
//!
//! # Strong Components
//!
//! [`strongly_connected_components`] is Tarjan's algorithm run over the
//! non-obstructed links exactly as stored: `from → to` only. Undirected
//! connections need no special case because their mirror record is already
//! in the list. Roots are tried in ascending site ID order and each site's
//! links in list order; the explicit call stack reproduces the recursive
//! visitation order, so components come out in the same order a recursive
//! Tarjan would pop them.
//!
//! # Weak Points
//!
//! [`weak_points`] runs the low-link search on the undirected skeleton
//! instead. A bridge is a connection whose loss splits its endpoints apart;
//! an articulation site is one whose removal splits its component.

use cavern_core::Graph;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::view::{Adjacency, undirected_skeleton};

/// Tarjan SCC over non-obstructed outgoing links.
///
/// Components are in pop order; members within a component are in pop order
/// too. Every site appears in exactly one component.
#[must_use]
#[instrument(skip(graph), fields(sites = graph.site_count()))]
pub fn strongly_connected_components(graph: &Graph) -> Vec<Vec<String>> {
    let ids: Vec<&str> = graph.site_ids().collect();
    let out = outgoing(graph, &ids);
    let n = ids.len();

    let mut next_index = 0_usize;
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0_usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut components: Vec<Vec<String>> = Vec::new();

    for root in 0..n {
        if index[root].is_some() {
            continue;
        }

        // (site, position of the next outgoing link to try)
        let mut calls: Vec<(usize, usize)> = vec![(root, 0)];
        index[root] = Some(next_index);
        low[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(frame) = calls.last_mut() {
            let v = frame.0;
            if let Some(&w) = out[v].get(frame.1) {
                frame.1 += 1;
                match index[w] {
                    None => {
                        index[w] = Some(next_index);
                        low[w] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        calls.push((w, 0));
                    }
                    Some(w_index) if on_stack[w] => low[v] = low[v].min(w_index),
                    Some(_) => {}
                }
                continue;
            }

            calls.pop();
            if Some(low[v]) == index[v] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component.push(ids[member].to_string());
                    if member == v {
                        break;
                    }
                }
                components.push(component);
            }
            if let Some(&(parent, _)) = calls.last() {
                low[parent] = low[parent].min(low[v]);
            }
        }
    }

    debug!(components = components.len(), "tarjan done");
    components
}

/// `true` if the graph is non-empty and every site reaches every other over
/// non-obstructed links.
#[must_use]
pub fn is_strongly_connected(graph: &Graph) -> bool {
    !graph.is_empty() && strongly_connected_components(graph).len() == 1
}

fn outgoing(graph: &Graph, ids: &[&str]) -> Vec<Vec<usize>> {
    let view_index = |id: &str| ids.binary_search_by(|probe| (*probe).cmp(id)).ok();
    let mut out = vec![Vec::new(); ids.len()];
    for link in graph.active_links() {
        if let (Some(from), Some(to)) =
            (view_index(link.from.as_str()), view_index(link.to.as_str()))
        {
            out[from].push(to);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Weak points
// ---------------------------------------------------------------------------

/// Bridges and articulation sites of the undirected skeleton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeakPoints {
    /// Connections whose obstruction disconnects their endpoints, as
    /// `(from, to)` of the link record, in link-list order.
    pub bridges: Vec<(String, String)>,
    /// Sites whose removal splits their component, ascending.
    pub articulation_sites: Vec<String>,
}

impl WeakPoints {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty() && self.articulation_sites.is_empty()
    }
}

struct Frame {
    node: usize,
    via: Option<usize>,
    next: usize,
}

/// Find bridges and articulation sites.
///
/// Parallel connections between the same pair (for example two independent
/// directed links `a → b` and `b → a`) are never bridges.
#[must_use]
#[instrument(skip(graph), fields(sites = graph.site_count()))]
pub fn weak_points(graph: &Graph) -> WeakPoints {
    let view = Adjacency::build(graph);
    let n = view.len();
    let skeleton = undirected_skeleton(graph);

    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (edge_id, edge) in skeleton.iter().enumerate() {
        if let (Some(a), Some(b)) = (view.index_of(edge.from), view.index_of(edge.to)) {
            adjacency[a].push((b, edge_id));
            adjacency[b].push((a, edge_id));
        }
    }

    let mut timer = 0_usize;
    let mut disc: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0_usize; n];
    let mut is_bridge = vec![false; skeleton.len()];
    let mut is_cut = vec![false; n];

    for root in 0..n {
        if disc[root].is_some() {
            continue;
        }
        disc[root] = Some(timer);
        low[root] = timer;
        timer += 1;

        let mut root_children = 0_usize;
        let mut stack = vec![Frame {
            node: root,
            via: None,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let v = frame.node;
            if let Some(&(w, edge_id)) = adjacency[v].get(frame.next) {
                frame.next += 1;
                if frame.via == Some(edge_id) {
                    continue;
                }
                match disc[w] {
                    None => {
                        disc[w] = Some(timer);
                        low[w] = timer;
                        timer += 1;
                        if v == root {
                            root_children += 1;
                        }
                        stack.push(Frame {
                            node: w,
                            via: Some(edge_id),
                            next: 0,
                        });
                    }
                    Some(w_disc) => low[v] = low[v].min(w_disc),
                }
                continue;
            }

            let Some(Frame { via, .. }) = stack.pop() else {
                break;
            };
            let Some(parent) = stack.last().map(|f| f.node) else {
                continue;
            };
            low[parent] = low[parent].min(low[v]);
            let parent_disc = disc[parent].unwrap_or(0);
            if low[v] > parent_disc
                && let Some(edge_id) = via
            {
                is_bridge[edge_id] = true;
            }
            if parent != root && low[v] >= parent_disc {
                is_cut[parent] = true;
            }
        }

        if root_children >= 2 {
            is_cut[root] = true;
        }
    }

    let points = WeakPoints {
        bridges: skeleton
            .iter()
            .zip(&is_bridge)
            .filter(|(_, bridge)| **bridge)
            .map(|(edge, _)| (edge.from.to_string(), edge.to.to_string()))
            .collect(),
        articulation_sites: (0..n)
            .filter(|&idx| is_cut[idx])
            .map(|idx| view.id(idx).to_string())
            .collect(),
    };
    debug!(
        bridges = points.bridges.len(),
        articulation_sites = points.articulation_sites.len(),
        "weak points done"
    );
    points
}
