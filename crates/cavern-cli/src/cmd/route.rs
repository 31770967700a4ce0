//! `cav path` and `cav routes`.

use std::io::Write;

use cavern_engine::{Route, dijkstra, shortest_route};
use clap::Args;
use serde::Serialize;

use super::Session;
use crate::output::{fmt_distance, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct PathArgs {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
struct PathReport {
    from: String,
    to: String,
    hops: usize,
    #[serde(flatten)]
    route: Route,
}

/// Shortest route between two sites; unreachable destinations fail with
/// `NoRoute`.
pub fn run_path(args: &PathArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let route = shortest_route(&graph, &args.from, &args.to)?;
    let report = PathReport {
        from: args.from.clone(),
        to: args.to.clone(),
        hops: route.hops(),
        route,
    };

    render_mode(
        session.output,
        &report,
        |r, w| {
            writeln!(
                w,
                "{}\t{}",
                fmt_distance(r.route.distance),
                r.route.path.join(">")
            )
        },
        |r, w| {
            pretty_section(w, &format!("Route {} -> {}", r.from, r.to))?;
            pretty_kv(w, "Path", r.route.path.join(" -> "))?;
            pretty_kv(w, "Hops", r.hops.to_string())?;
            pretty_kv(w, "Distance", fmt_distance(r.route.distance))
        },
    )
}

#[derive(Args, Debug)]
pub struct RoutesArgs {
    /// Site every route starts from.
    pub source: String,
}

#[derive(Debug, Serialize)]
struct RoutesReport {
    source: String,
    routes: Vec<Destination>,
    unreachable: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Destination {
    destination: String,
    #[serde(flatten)]
    route: Route,
}

/// Shortest route from one source to every other site.
pub fn run_routes(args: &RoutesArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let paths = dijkstra(&graph, &args.source)?;

    let mut routes = Vec::new();
    let mut unreachable = Vec::new();
    for id in graph.site_ids().filter(|id| *id != args.source) {
        match paths.path_to(id) {
            Ok(route) => routes.push(Destination {
                destination: id.to_string(),
                route,
            }),
            Err(_) => unreachable.push(id.to_string()),
        }
    }
    let report = RoutesReport {
        source: args.source.clone(),
        routes,
        unreachable,
    };

    render_mode(
        session.output,
        &report,
        |r, w| {
            for d in &r.routes {
                writeln!(
                    w,
                    "{}\t{}\t{}",
                    d.destination,
                    fmt_distance(d.route.distance),
                    d.route.path.join(">")
                )?;
            }
            for id in &r.unreachable {
                writeln!(w, "{id}\t-\t-")?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, &format!("Shortest routes from {}", r.source))?;
            for d in &r.routes {
                writeln!(
                    w,
                    "  {:<12} {:>8}  {}",
                    d.destination,
                    fmt_distance(d.route.distance),
                    d.route.path.join(" -> ")
                )?;
            }
            if !r.unreachable.is_empty() {
                writeln!(w)?;
                pretty_kv(w, "Unreachable", r.unreachable.join(", "))?;
            }
            Ok(())
        },
    )
}
