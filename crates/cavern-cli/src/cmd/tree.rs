//! `cav mst` (Kruskal) and `cav prim`.

use std::io::{self, Write};

use cavern_engine::{MinimumSpanningTree, MstFromSource, MstOutcome, TreeRoute, kruskal, prim};
use clap::Args;
use serde::Serialize;

use super::Session;
use crate::output::{fmt_distance, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug, Default)]
pub struct MstArgs {}

pub fn run_mst(_args: &MstArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let tree = kruskal(&graph);

    render_mode(
        session.output,
        &tree,
        |t, w| {
            write_edges_text(t, w)?;
            writeln!(w, "total\t{}\t{}", fmt_distance(t.total_weight), outcome_label(&t.outcome))
        },
        |t, w| {
            pretty_section(w, "Minimum spanning tree (Kruskal)")?;
            write_tree_pretty(t, w)
        },
    )
}

#[derive(Args, Debug)]
pub struct PrimArgs {
    /// Site to grow the tree from.
    pub source: String,
}

#[derive(Debug, Serialize)]
struct PrimReport {
    #[serde(flatten)]
    result: MstFromSource,
    routes: Vec<TreeRoute>,
}

pub fn run_prim(args: &PrimArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let result = prim(&graph, &args.source)?;
    let report = PrimReport {
        routes: result.routes_from_source(),
        result,
    };

    render_mode(
        session.output,
        &report,
        |r, w| {
            write_edges_text(&r.result.tree, w)?;
            for route in &r.routes {
                writeln!(
                    w,
                    "route\t{}\t{}\t{}",
                    route.destination,
                    fmt_distance(route.distance),
                    route.path.join(">")
                )?;
            }
            if !r.result.unreachable.is_empty() {
                writeln!(w, "unreachable\t{}", r.result.unreachable.join(","))?;
            }
            writeln!(
                w,
                "total\t{}\t{}",
                fmt_distance(r.result.tree.total_weight),
                outcome_label(&r.result.tree.outcome)
            )
        },
        |r, w| {
            pretty_section(w, &format!("Minimum spanning tree from {} (Prim)", r.result.source))?;
            write_tree_pretty(&r.result.tree, w)?;
            pretty_kv(w, "Reached", r.result.reachable.join(", "))?;
            if !r.result.unreachable.is_empty() {
                pretty_kv(w, "Unreachable", r.result.unreachable.join(", "))?;
            }
            if !r.routes.is_empty() {
                writeln!(w)?;
                pretty_section(w, "Tree routes")?;
                for route in &r.routes {
                    writeln!(
                        w,
                        "  {:<12} {:>8}  {}",
                        route.destination,
                        fmt_distance(route.distance),
                        route.path.join(" -> ")
                    )?;
                }
            }
            Ok(())
        },
    )
}

fn outcome_label(outcome: &MstOutcome) -> String {
    match outcome {
        MstOutcome::Spanning => "spanning".to_string(),
        MstOutcome::Forest { components } => format!("forest({components})"),
        MstOutcome::Partial { unreached } => format!("partial({unreached} unreached)"),
        MstOutcome::EmptyOrTrivial { reason } => format!("trivial({reason})"),
    }
}

fn write_edges_text(tree: &MinimumSpanningTree, w: &mut dyn Write) -> io::Result<()> {
    for edge in &tree.edges {
        writeln!(w, "{}\t{}\t{}", edge.from, edge.to, fmt_distance(edge.distance))?;
    }
    Ok(())
}

fn write_tree_pretty(tree: &MinimumSpanningTree, w: &mut dyn Write) -> io::Result<()> {
    for edge in &tree.edges {
        writeln!(
            w,
            "  {:<12} {:<12} {:>8}",
            edge.from,
            edge.to,
            fmt_distance(edge.distance)
        )?;
    }
    if !tree.edges.is_empty() {
        writeln!(w)?;
    }
    pretty_kv(w, "Outcome", outcome_label(&tree.outcome))?;
    pretty_kv(w, "Edges", tree.edge_count().to_string())?;
    pretty_kv(w, "Sites covered", tree.node_count.to_string())?;
    pretty_kv(w, "Total weight", fmt_distance(tree.total_weight))
}
