//! Known-topology regression tests for the engine.
//!
//! Each test builds a small hand-crafted network whose answers were worked
//! out by hand, and checks every engine against them.

use cavern_core::format::text;
use cavern_core::{Graph, GraphError};
use cavern_engine::{
    GraphStats, MstOutcome, bfs, components, dfs, dijkstra, is_connected, is_fully_reachable,
    is_strongly_connected, kruskal, prim, shortest_route, strongly_connected_components,
    weak_points,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const FOUR_CAVES: &str = "\
[grafo]
directed=false

[cuevas]
A,Entrada,0,0
B,Galeria,1,0
C,Sima,1,1
D,Lago,2,1

[aristas]
A,B,5
A,C,3
B,C,2
B,D,4
C,D,6
";

fn four_caves() -> Graph {
    text::parse(FOUR_CAVES).expect("fixture parses")
}

fn ring() -> Graph {
    let mut graph = Graph::undirected();
    for id in ["A", "B", "C", "D"] {
        graph.add_site(id, id, 0.0, 0.0).expect("site");
    }
    for (from, to) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")] {
        graph.add_link(from, to, 10.0, false).expect("link");
    }
    graph
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ---------------------------------------------------------------------------
// Four caves
// ---------------------------------------------------------------------------

#[test]
fn kruskal_picks_the_three_cheapest_safe_links() {
    let tree = kruskal(&four_caves());

    assert_eq!(tree.outcome, MstOutcome::Spanning);
    assert_eq!(tree.edge_count(), 3);
    assert!(approx(tree.total_weight, 9.0));
    assert!(tree.contains_edge("B", "C"));
    assert!(tree.contains_edge("A", "C"));
    assert!(tree.contains_edge("B", "D"));

    let weights: Vec<f64> = tree.edges.iter().map(|e| e.distance).collect();
    assert_eq!(weights, [2.0, 3.0, 4.0]);
}

#[test]
fn prim_from_every_source_matches_kruskal() {
    let graph = four_caves();
    let expected = kruskal(&graph).total_weight;

    for source in ["A", "B", "C", "D"] {
        let result = prim(&graph, source).expect("known source");
        assert!(result.complete, "from {source}");
        assert_eq!(result.reachable.len(), 4);
        assert!(approx(result.tree.total_weight, expected), "from {source}");
    }
}

#[test]
fn prim_routes_cover_every_destination() {
    let result = prim(&four_caves(), "A").expect("known source");
    let routes = result.routes_from_source();

    let destinations: Vec<&str> = routes.iter().map(|r| r.destination.as_str()).collect();
    assert_eq!(destinations, ["C", "B", "D"]);
    for route in &routes {
        assert_eq!(route.path.first().map(String::as_str), Some("A"));
        assert_eq!(route.path.last(), Some(&route.destination));
    }
}

#[test]
fn shortest_routes_between_caves() {
    let graph = four_caves();
    let paths = dijkstra(&graph, "A").expect("known source");

    assert_eq!(paths.distance_to("B"), Some(5.0));
    assert_eq!(paths.distance_to("C"), Some(3.0));
    assert_eq!(paths.distance_to("D"), Some(9.0));

    let route = shortest_route(&graph, "D", "A").expect("route");
    assert!(approx(route.distance, 9.0));
    assert_eq!(route.path.first().map(String::as_str), Some("D"));
    assert_eq!(route.path.last().map(String::as_str), Some("A"));
}

#[test]
fn undirected_caves_are_one_strong_component() {
    let graph = four_caves();
    assert!(is_strongly_connected(&graph));
    assert!(weak_points(&graph).is_empty());
    assert!(is_fully_reachable(&graph, "D").expect("known").fully_reachable);
}

#[test]
fn results_serialize_with_tagged_outcome() {
    let value = serde_json::to_value(kruskal(&four_caves())).expect("serialize");
    assert_eq!(value["outcome"]["kind"], "spanning");
    assert_eq!(value["edges"][0]["from"], "B");
    assert_eq!(value["total_weight"], 9.0);

    let mut graph = ring();
    graph.set_obstructed_many([("A", "B"), ("A", "D")], true);
    let value = serde_json::to_value(kruskal(&graph)).expect("serialize");
    assert_eq!(value["outcome"], serde_json::json!({"kind": "forest", "components": 2}));
}

#[test]
fn stats_for_four_caves() {
    let stats = GraphStats::compute(&four_caves());
    assert_eq!(stats.site_count, 4);
    assert_eq!(stats.link_count, 10);
    assert_eq!(stats.weak_component_count, 1);
    assert_eq!(stats.scc_count, 1);
    assert_eq!(stats.max_out_degree, 3);
}

// ---------------------------------------------------------------------------
// Ring obstruction
// ---------------------------------------------------------------------------

#[test]
fn ring_survives_one_obstruction() {
    let mut graph = ring();
    graph.set_obstructed("A", "B", true).expect("obstruct");

    assert!(is_connected(&graph));
    let route = shortest_route(&graph, "A", "B").expect("long way round");
    assert_eq!(route.path, ["A", "D", "C", "B"]);
    assert!(approx(route.distance, 30.0));
}

#[test]
fn ring_splits_after_second_obstruction() {
    let mut graph = ring();
    let errors = graph.set_obstructed_many([("A", "B"), ("A", "D")], true);
    assert!(errors.is_empty());

    assert!(!is_connected(&graph));
    assert_eq!(components(&graph).len(), 2);
    assert_eq!(
        shortest_route(&graph, "A", "C").unwrap_err(),
        GraphError::no_route("A", "C")
    );

    let from_a = prim(&graph, "A").expect("known source");
    assert!(!from_a.complete);
    assert_eq!(from_a.unreachable, ["B", "C", "D"]);

    let tree = kruskal(&graph);
    assert_eq!(tree.outcome, MstOutcome::Forest { components: 2 });

    let reach = is_fully_reachable(&graph, "B").expect("known");
    assert_eq!(reach.unreachable, ["A"]);
}

#[test]
fn clearing_either_obstruction_restores_the_ring() {
    for clear in [("B", "A"), ("D", "A")] {
        let mut graph = ring();
        graph.set_obstructed_many([("A", "B"), ("A", "D")], true);
        graph.set_obstructed(clear.0, clear.1, false).expect("clear");

        assert!(is_connected(&graph), "after clearing {clear:?}");
        assert!(prim(&graph, "A").expect("known").complete);
        assert!(shortest_route(&graph, "A", "C").is_ok());
    }
}

// ---------------------------------------------------------------------------
// Directed networks
// ---------------------------------------------------------------------------

#[test]
fn one_way_tunnels() {
    let mut graph = Graph::directed();
    for id in ["a", "b", "c", "d", "e"] {
        graph.add_site(id, id, 0.0, 0.0).expect("site");
    }
    for (from, to) in [("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "e"), ("e", "d")] {
        graph.add_link(from, to, 1.0, true).expect("link");
    }

    let components = strongly_connected_components(&graph);
    assert_eq!(components.len(), 2);
    assert!(!is_strongly_connected(&graph));

    assert_eq!(dfs(&graph, "a").expect("known").order(), ["a", "b", "c", "d", "e"]);
    assert_eq!(bfs(&graph, "d").expect("known").order(), ["d", "e"]);
    assert!(shortest_route(&graph, "d", "a").is_err());

    // Reversing c -> d cuts the cycle off from the d/e pair.
    graph.reverse_link("c", "d").expect("reverse");
    assert!(!is_fully_reachable(&graph, "a").expect("known").fully_reachable);
    assert_eq!(shortest_route(&graph, "d", "a").expect("now open").path, ["d", "c", "a"]);
}

#[test]
fn converting_to_undirected_opens_every_tunnel() {
    let mut graph = Graph::directed();
    for id in ["a", "b", "c"] {
        graph.add_site(id, id, 0.0, 0.0).expect("site");
    }
    graph.add_link("a", "b", 1.0, true).expect("link");
    graph.add_link("c", "b", 1.0, true).expect("link");
    assert!(!is_strongly_connected(&graph));

    let report = graph.retype(false);
    assert_eq!(report.added, 2);
    assert!(is_strongly_connected(&graph));
    assert!(graph.asymmetric_links().is_empty());
}
