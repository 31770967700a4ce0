//! `cav dfs`, `cav bfs` and `cav reach`.

use std::io::Write;

use cavern_engine::{Traversal, TraversalKind, bfs, dfs, is_fully_reachable};
use clap::Args;

use super::Session;
use crate::output::{fmt_distance, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct WalkArgs {
    /// Site the traversal starts from.
    pub start: String,
}

pub fn run_walk(kind: TraversalKind, args: &WalkArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let walk = match kind {
        TraversalKind::Dfs => dfs(&graph, &args.start)?,
        TraversalKind::Bfs => bfs(&graph, &args.start)?,
    };

    render_mode(
        session.output,
        &walk,
        |t, w| {
            for visit in &t.visits {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}",
                    visit.site,
                    visit.depth,
                    visit.parent.as_deref().unwrap_or("-"),
                    fmt_distance(visit.distance)
                )?;
            }
            Ok(())
        },
        |t: &Traversal, w| {
            let title = match t.kind {
                TraversalKind::Dfs => "Depth-first",
                TraversalKind::Bfs => "Breadth-first",
            };
            pretty_section(w, &format!("{title} walk from {}", t.start))?;
            for visit in &t.visits {
                writeln!(
                    w,
                    "  {:>3}. {}{:<12} via {:<12} {:>8}",
                    visit.order + 1,
                    "  ".repeat(visit.depth),
                    visit.site,
                    visit.parent.as_deref().unwrap_or("-"),
                    fmt_distance(visit.distance)
                )?;
            }
            pretty_kv(w, "Visited", t.len().to_string())
        },
    )
}

#[derive(Args, Debug)]
pub struct ReachArgs {
    pub start: String,
}

/// Report whether `start` reaches every site.
///
/// Unreachable sites are a finding, not a failure: the command succeeds
/// either way and the answer is in the output.
pub fn run_reach(args: &ReachArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let report = is_fully_reachable(&graph, &args.start)?;

    render_mode(
        session.output,
        &report,
        |r, w| {
            writeln!(
                w,
                "{}\treachable={}\tunreachable={}",
                if r.fully_reachable { "full" } else { "partial" },
                r.reachable.len(),
                r.unreachable.join(",")
            )
        },
        |r, w| {
            pretty_section(w, &format!("Reachability from {}", r.start))?;
            pretty_kv(
                w,
                "Fully reachable",
                if r.fully_reachable { "yes" } else { "no" },
            )?;
            pretty_kv(w, "Reached", r.reachable.join(", "))?;
            if !r.unreachable.is_empty() {
                pretty_kv(w, "Unreachable", r.unreachable.join(", "))?;
            }
            Ok(())
        },
    )
}
