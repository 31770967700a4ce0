//! Property tests for the graph store's structural invariants.
//!
//! Random mutation sequences are applied to a small graph; after every step
//! the undirected mirror invariant and the validate-before-write contract are
//! checked.

use cavern_core::format::text;
use cavern_core::{Graph, GraphError};
use proptest::prelude::*;

const SITES: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Debug, Clone)]
enum Op {
    AddLink(usize, usize, u8, bool),
    RemoveLink(usize, usize),
    Obstruct(usize, usize, bool),
    SetDistance(usize, usize, u8),
    Reverse(usize, usize),
    Retype(bool),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let site = 0..SITES.len();
    prop_oneof![
        4 => (site.clone(), site.clone(), 0u8..20, any::<bool>())
            .prop_map(|(a, b, d, directed)| Op::AddLink(a, b, d, directed)),
        1 => (site.clone(), site.clone()).prop_map(|(a, b)| Op::RemoveLink(a, b)),
        2 => (site.clone(), site.clone(), any::<bool>()).prop_map(|(a, b, v)| Op::Obstruct(a, b, v)),
        1 => (site.clone(), site.clone(), 0u8..20).prop_map(|(a, b, d)| Op::SetDistance(a, b, d)),
        1 => (site.clone(), site).prop_map(|(a, b)| Op::Reverse(a, b)),
        1 => any::<bool>().prop_map(Op::Retype),
    ]
}

fn base_graph(directed: bool) -> Graph {
    let mut graph = Graph::new(directed);
    for id in SITES {
        graph.add_site(id, id.to_uppercase(), 0.0, 0.0).expect("unique");
    }
    graph
}

fn apply(graph: &mut Graph, op: &Op) -> Result<(), GraphError> {
    match *op {
        Op::AddLink(a, b, d, directed) => {
            graph.add_link(SITES[a], SITES[b], f64::from(d), directed)
        }
        Op::RemoveLink(a, b) => graph.remove_link(SITES[a], SITES[b]).map(|_| ()),
        Op::Obstruct(a, b, v) => graph.set_obstructed(SITES[a], SITES[b], v),
        Op::SetDistance(a, b, d) => graph.set_distance(SITES[a], SITES[b], f64::from(d)),
        Op::Reverse(a, b) => graph.reverse_link(SITES[a], SITES[b]),
        Op::Retype(directed) => {
            graph.retype(directed);
            Ok(())
        }
    }
}

fn has_duplicate_pairs(graph: &Graph) -> bool {
    let mut seen = std::collections::HashSet::new();
    graph
        .links()
        .iter()
        .any(|link| !seen.insert((link.from.clone(), link.to.clone())))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn undirected_graphs_stay_symmetric(
        directed in any::<bool>(),
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let mut graph = base_graph(directed);
        for op in &ops {
            let _ = apply(&mut graph, op);
            prop_assert!(graph.asymmetric_links().is_empty(), "after {op:?}");
            prop_assert!(!has_duplicate_pairs(&graph), "after {op:?}");
        }
    }

    #[test]
    fn failed_mutations_leave_graph_unchanged(
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let mut graph = base_graph(false);
        for op in &ops {
            let before = graph.clone();
            if apply(&mut graph, op).is_err() {
                prop_assert_eq!(&graph, &before);
            }
        }
    }

    #[test]
    fn obstruction_is_idempotent(
        ops in prop::collection::vec(arb_op(), 0..30),
        pick in any::<prop::sample::Index>(),
        value in any::<bool>(),
    ) {
        let mut graph = base_graph(false);
        for op in &ops {
            let _ = apply(&mut graph, op);
        }
        prop_assume!(graph.link_count() > 0);

        let link = &graph.links()[pick.index(graph.link_count())];
        let (from, to) = (link.from.clone(), link.to.clone());

        graph.set_obstructed(&from, &to, value).expect("exists");
        let once = graph.clone();
        graph.set_obstructed(&from, &to, value).expect("exists");
        prop_assert_eq!(graph, once);
    }

    #[test]
    fn retype_to_current_type_is_noop(
        directed in any::<bool>(),
        ops in prop::collection::vec(arb_op(), 0..30),
    ) {
        let mut graph = base_graph(directed);
        for op in &ops {
            let _ = apply(&mut graph, op);
        }
        let before = graph.clone();
        let report = graph.retype(before.is_directed());
        prop_assert!(report.is_noop());
        prop_assert_eq!(graph, before);
    }

    #[test]
    fn text_snapshot_round_trips(
        directed in any::<bool>(),
        ops in prop::collection::vec(arb_op(), 0..30),
    ) {
        let mut graph = base_graph(directed);
        for op in &ops {
            let _ = apply(&mut graph, op);
        }
        let reparsed = text::parse(&text::to_text(&graph).expect("render")).expect("reparse");

        prop_assert_eq!(reparsed.site_count(), graph.site_count());
        prop_assert_eq!(reparsed.link_count(), graph.link_count());
        for link in graph.links() {
            prop_assert_eq!(reparsed.link(&link.from, &link.to), Some(link));
        }
    }
}
