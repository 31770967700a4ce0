//! Summary statistics for a cave network.
//!
//! # Statistics Provided
//!
//! - **site_count** / **link_count**: stored sites and links (obstructed
//!   links included in `link_count`).
//! - **active_link_count** / **obstructed_link_count**: the split of
//!   `link_count` by obstruction.
//! - **density**: active links over the maximum possible directed links,
//!   `active / (sites * (sites - 1))`. Zero for 0 or 1 site. Mirror pairs
//!   count as two links, so a complete undirected graph has density 1.0.
//! - **weak_component_count**: connected components ignoring direction.
//! - **scc_count**: strongly connected components.
//! - **isolated_site_count**: sites with no active link in or out.
//! - **max_in_degree** / **max_out_degree**: over active links.
//! - **fingerprint**: BLAKE3 of the site IDs and the sorted link set, for
//!   change detection.

use cavern_core::Graph;
use petgraph::{
    Direction, algo::connected_components, graph::NodeIndex, visit::IntoNodeIdentifiers,
};
use serde::Serialize;
use tracing::instrument;

use crate::scc::strongly_connected_components;
use crate::view::Projection;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub directed: bool,
    pub site_count: usize,
    pub link_count: usize,
    pub active_link_count: usize,
    pub obstructed_link_count: usize,
    pub density: f64,
    pub weak_component_count: usize,
    pub scc_count: usize,
    pub isolated_site_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    /// `blake3:<hex>` digest; see [`fingerprint`].
    pub fingerprint: String,
}

impl GraphStats {
    #[must_use]
    #[instrument(skip(graph))]
    pub fn compute(graph: &Graph) -> Self {
        let projection = Projection::build(graph);
        let net = &projection.graph;

        let active_link_count = net.edge_count();
        let site_count = graph.site_count();

        let degree = |idx: NodeIndex, direction: Direction| net.neighbors_directed(idx, direction).count();

        let isolated_site_count = net
            .node_identifiers()
            .filter(|&idx| {
                degree(idx, Direction::Incoming) == 0 && degree(idx, Direction::Outgoing) == 0
            })
            .count();

        let max_in_degree = net
            .node_identifiers()
            .map(|idx| degree(idx, Direction::Incoming))
            .max()
            .unwrap_or(0);

        let max_out_degree = net
            .node_identifiers()
            .map(|idx| degree(idx, Direction::Outgoing))
            .max()
            .unwrap_or(0);

        Self {
            directed: graph.is_directed(),
            site_count,
            link_count: graph.link_count(),
            active_link_count,
            obstructed_link_count: graph.link_count() - active_link_count,
            density: compute_density(site_count, active_link_count),
            weak_component_count: connected_components(net),
            scc_count: strongly_connected_components(graph).len(),
            isolated_site_count,
            max_in_degree,
            max_out_degree,
            fingerprint: fingerprint(graph),
        }
    }

    /// `true` if no link is usable.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.active_link_count == 0
    }

    /// `true` if the network is in one piece, ignoring direction.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.weak_component_count <= 1
    }
}

/// BLAKE3 digest of the graph type, site IDs and link set, independent of
/// link-list order.
///
/// Distance and obstruction are part of each record, so toggling an
/// obstruction changes the fingerprint.
#[must_use]
pub fn fingerprint(graph: &Graph) -> String {
    let mut records: Vec<String> = graph
        .links()
        .iter()
        .map(|link| {
            format!(
                "{}\x00{}\x00{}\x00{}\x00{}",
                link.from, link.to, link.distance, link.directed, link.obstructed
            )
        })
        .collect();
    records.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    hasher.update(if graph.is_directed() { b"d" } else { b"u" });
    for id in graph.site_ids() {
        hasher.update(id.as_bytes());
        hasher.update(b"\x00");
    }
    for record in &records {
        hasher.update(record.as_bytes());
        hasher.update(b"\x01");
    }
    format!("blake3:{}", hasher.finalize())
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(site_count: usize, link_count: usize) -> f64 {
    if site_count < 2 {
        return 0.0_f64;
    }
    let max_links = (site_count * (site_count - 1)) as f64;
    link_count as f64 / max_links
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(directed: bool, ids: &[&str], links: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new(directed);
        for id in ids {
            graph.add_site(*id, *id, 0.0, 0.0).expect("site");
        }
        for (from, to) in links {
            graph.add_link(from, to, 1.0, directed).expect("link");
        }
        graph
    }

    #[test]
    fn empty_graph() {
        let stats = GraphStats::compute(&Graph::undirected());
        assert_eq!(stats.site_count, 0);
        assert_eq!(stats.scc_count, 0);
        assert!(stats.density.abs() < f64::EPSILON);
        assert!(stats.is_flat());
        assert!(stats.fingerprint.starts_with("blake3:"));
    }

    #[test]
    fn directed_chain() {
        let stats = GraphStats::compute(&graph(true, &["a", "b", "c"], &[("a", "b"), ("b", "c")]));
        assert_eq!(stats.active_link_count, 2);
        assert_eq!(stats.scc_count, 3);
        assert_eq!(stats.weak_component_count, 1);
        assert_eq!(stats.max_in_degree, 1);
        assert_eq!(stats.max_out_degree, 1);
        assert!((stats.density - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn undirected_pairs_count_twice() {
        let stats = GraphStats::compute(&graph(
            false,
            &["a", "b", "c"],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        ));
        assert_eq!(stats.link_count, 6);
        assert!((stats.density - 1.0).abs() < f64::EPSILON);
        assert_eq!(stats.scc_count, 1);
    }

    #[test]
    fn isolated_and_obstructed() {
        let mut g = graph(false, &["a", "b", "c", "d"], &[("a", "b"), ("c", "d")]);
        g.set_obstructed("c", "d", true).expect("obstruct");
        let stats = GraphStats::compute(&g);
        assert_eq!(stats.obstructed_link_count, 2);
        assert_eq!(stats.isolated_site_count, 2);
        assert_eq!(stats.weak_component_count, 3);
        assert!(!stats.is_connected());
    }

    #[test]
    fn fingerprint_tracks_obstruction_not_order() {
        let mut first = graph(true, &["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let second = graph(true, &["a", "b", "c"], &[("b", "c"), ("a", "b")]);
        assert_eq!(fingerprint(&first), fingerprint(&second));

        first.set_obstructed("a", "b", true).expect("obstruct");
        assert_ne!(fingerprint(&first), fingerprint(&second));
    }
}
