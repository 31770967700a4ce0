//! Engine benchmarks over synthetic cave networks.
//!
//! Networks are random: a spanning chain (so every tier
//! is connected) plus random extra links, a fraction of them obstructed.
//!
//! Run with:
//! ```sh
//! cargo bench -p cavern-engine --bench engine
//! ```

use cavern_core::Graph;
use cavern_engine::{
    GraphStats, bfs, dfs, dijkstra, kruskal, prim, strongly_connected_components, weak_points,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Tier {
    name: &'static str,
    sites: usize,
    extra_links: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "small",
        sites: 100,
        extra_links: 200,
    },
    Tier {
        name: "medium",
        sites: 1_000,
        extra_links: 3_000,
    },
    Tier {
        name: "large",
        sites: 5_000,
        extra_links: 15_000,
    },
];

fn generate(tier: &Tier, directed: bool, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new(directed);
    let ids: Vec<String> = (0..tier.sites).map(|i| format!("c{i:05}")).collect();

    for id in &ids {
        graph
            .add_site(id, id, rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))
            .expect("unique id");
    }
    for pair in ids.windows(2) {
        let distance = rng.gen_range(1.0..50.0);
        graph
            .add_link(&pair[0], &pair[1], distance, directed)
            .expect("chain link");
    }
    for _ in 0..tier.extra_links {
        let from = &ids[rng.gen_range(0..ids.len())];
        let to = &ids[rng.gen_range(0..ids.len())];
        if graph
            .add_link(from, to, rng.gen_range(1.0..50.0), directed)
            .is_ok()
            && rng.gen_bool(0.1)
        {
            let _ = graph.set_obstructed(from, to, true);
        }
    }
    graph
}

fn bench_spanning_trees(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine.mst");

    for tier in &TIERS {
        let graph = generate(tier, false, 0xCA7E_u64 + tier.sites as u64);
        group.throughput(Throughput::Elements(graph.link_count() as u64));

        group.bench_with_input(BenchmarkId::new("kruskal", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(kruskal(graph).total_weight));
        });
        group.bench_with_input(BenchmarkId::new("prim", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(prim(graph, "c00000").map(|r| r.tree.total_weight)));
        });
    }

    group.finish();
}

fn bench_routes_and_walks(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine.routes");

    for tier in &TIERS {
        let graph = generate(tier, true, 0x5EED_u64 + tier.sites as u64);
        group.throughput(Throughput::Elements(graph.link_count() as u64));

        group.bench_with_input(BenchmarkId::new("dijkstra", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(dijkstra(graph, "c00000").map(|p| p.reachable().count())));
        });
        group.bench_with_input(BenchmarkId::new("dfs", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(dfs(graph, "c00000").map(|t| t.len())));
        });
        group.bench_with_input(BenchmarkId::new("bfs", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(bfs(graph, "c00000").map(|t| t.len())));
        });
    }

    group.finish();
}

fn bench_structure(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine.structure");

    for tier in &TIERS {
        let graph = generate(tier, true, 0xB0B_u64 + tier.sites as u64);
        group.throughput(Throughput::Elements(graph.link_count() as u64));

        group.bench_with_input(BenchmarkId::new("tarjan", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(strongly_connected_components(graph).len()));
        });
        group.bench_with_input(BenchmarkId::new("weak_points", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(weak_points(graph).bridges.len()));
        });
        group.bench_with_input(BenchmarkId::new("stats", tier.name), &graph, |b, graph| {
            b.iter(|| black_box(GraphStats::compute(graph).scc_count));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_spanning_trees,
    bench_routes_and_walks,
    bench_structure
);
criterion_main!(benches);
