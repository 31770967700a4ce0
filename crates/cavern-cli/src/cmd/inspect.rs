//! `cav stats`, `cav check` and `cav neighbors`.

use std::io::Write;

use cavern_core::Graph;
use cavern_engine::{GraphStats, is_connected};
use clap::Args;
use serde::Serialize;

use super::Session;
use crate::output::{fmt_distance, pretty_kv, pretty_section, render_mode};

// ---------------------------------------------------------------------------
// stats
// ---------------------------------------------------------------------------

#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

pub fn run_stats(_args: &StatsArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let stats = GraphStats::compute(&graph);

    render_mode(
        session.output,
        &stats,
        |s, w| {
            writeln!(
                w,
                "{} sites={} links={} active={} obstructed={} components={} scc={} isolated={} density={:.4}",
                if s.directed { "directed" } else { "undirected" },
                s.site_count,
                s.link_count,
                s.active_link_count,
                s.obstructed_link_count,
                s.weak_component_count,
                s.scc_count,
                s.isolated_site_count,
                s.density,
            )?;
            writeln!(w, "{}", s.fingerprint)
        },
        |s, w| {
            pretty_section(w, "Cave network")?;
            pretty_kv(w, "Type", if s.directed { "directed" } else { "undirected" })?;
            pretty_kv(w, "Sites", s.site_count.to_string())?;
            pretty_kv(
                w,
                "Links",
                format!(
                    "{} ({} active, {} obstructed)",
                    s.link_count, s.active_link_count, s.obstructed_link_count
                ),
            )?;
            pretty_kv(w, "Density", format!("{:.4}", s.density))?;
            pretty_kv(w, "Components", s.weak_component_count.to_string())?;
            pretty_kv(w, "Strong comps", s.scc_count.to_string())?;
            pretty_kv(w, "Isolated", s.isolated_site_count.to_string())?;
            pretty_kv(
                w,
                "Max degree",
                format!("in {} / out {}", s.max_in_degree, s.max_out_degree),
            )?;
            pretty_kv(w, "Fingerprint", &s.fingerprint)
        },
    )
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[derive(Args, Debug, Default)]
pub struct CheckArgs {}

/// Structural health of a loaded snapshot.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub ok: bool,
    pub directed: bool,
    pub sites: usize,
    pub links: usize,
    pub connected: bool,
    /// Undirected links missing an in-sync mirror record.
    pub asymmetric_links: Vec<(String, String)>,
    pub self_loops: Vec<String>,
    pub isolated_sites: Vec<String>,
}

impl CheckReport {
    fn build(graph: &Graph) -> Self {
        let asymmetric_links: Vec<(String, String)> = graph
            .asymmetric_links()
            .into_iter()
            .map(|link| (link.from.clone(), link.to.clone()))
            .collect();
        let self_loops = graph
            .links()
            .iter()
            .filter(|link| link.from == link.to)
            .map(|link| link.from.clone())
            .collect();
        let isolated_sites = graph
            .site_ids()
            .filter(|id| graph.out_degree(id) == 0 && graph.in_degree(id) == 0)
            .map(str::to_string)
            .collect();

        Self {
            ok: asymmetric_links.is_empty(),
            directed: graph.is_directed(),
            sites: graph.site_count(),
            links: graph.link_count(),
            connected: is_connected(graph),
            asymmetric_links,
            self_loops,
            isolated_sites,
        }
    }
}

/// Load the snapshot through the store API and report anomalies.
///
/// Fails when mirror symmetry is broken; disconnection, self-loops and
/// isolated sites are reported but legal.
pub fn run_check(_args: &CheckArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let report = CheckReport::build(&graph);

    render_mode(
        session.output,
        &report,
        |r, w| {
            writeln!(
                w,
                "{} sites={} links={} connected={} asymmetric={} self_loops={} isolated={}",
                if r.ok { "ok" } else { "broken" },
                r.sites,
                r.links,
                r.connected,
                r.asymmetric_links.len(),
                r.self_loops.len(),
                r.isolated_sites.len(),
            )
        },
        |r, w| {
            pretty_section(w, "Snapshot check")?;
            pretty_kv(w, "Status", if r.ok { "ok" } else { "BROKEN" })?;
            pretty_kv(w, "Sites", r.sites.to_string())?;
            pretty_kv(w, "Links", r.links.to_string())?;
            pretty_kv(w, "Connected", if r.connected { "yes" } else { "no" })?;
            for (from, to) in &r.asymmetric_links {
                pretty_kv(w, "Asymmetric", format!("{from} -> {to}"))?;
            }
            if !r.self_loops.is_empty() {
                pretty_kv(w, "Self-loops", r.self_loops.join(", "))?;
            }
            if !r.isolated_sites.is_empty() {
                pretty_kv(w, "Isolated", r.isolated_sites.join(", "))?;
            }
            Ok(())
        },
    )?;

    anyhow::ensure!(
        report.ok,
        "{} undirected link(s) without a mirror",
        report.asymmetric_links.len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// neighbors
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct NeighborsArgs {
    /// Site to inspect.
    pub site: String,
}

#[derive(Debug, Serialize)]
pub struct NeighborEntry {
    pub site: String,
    pub name: String,
    /// Cheapest usable link to this neighbor.
    pub distance: f64,
}

#[derive(Debug, Serialize)]
pub struct NeighborReport {
    pub site: String,
    pub in_degree: usize,
    pub out_degree: usize,
    pub neighbors: Vec<NeighborEntry>,
}

pub fn run_neighbors(args: &NeighborsArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let ids = graph.neighbors(&args.site)?;

    let neighbors = ids
        .into_iter()
        .map(|id| NeighborEntry {
            site: id.to_string(),
            name: graph.site(id).map(|s| s.name.clone()).unwrap_or_default(),
            distance: step_distance(&graph, &args.site, id),
        })
        .collect();
    let report = NeighborReport {
        site: args.site.clone(),
        in_degree: graph.in_degree(&args.site),
        out_degree: graph.out_degree(&args.site),
        neighbors,
    };

    render_mode(
        session.output,
        &report,
        |r, w| {
            for n in &r.neighbors {
                writeln!(w, "{}\t{}", n.site, fmt_distance(n.distance))?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, &format!("Neighbors of {}", r.site))?;
            pretty_kv(w, "Degree", format!("in {} / out {}", r.in_degree, r.out_degree))?;
            if r.neighbors.is_empty() {
                writeln!(w, "(no usable links)")?;
            }
            for n in &r.neighbors {
                writeln!(w, "  {:<12} {:<20} {}", n.site, n.name, fmt_distance(n.distance))?;
            }
            Ok(())
        },
    )
}

fn step_distance(graph: &Graph, from: &str, to: &str) -> f64 {
    graph
        .active_links()
        .filter(|link| {
            link.connects(from, to) || (!graph.is_directed() && link.connects(to, from))
        })
        .map(|link| link.distance)
        .fold(f64::INFINITY, f64::min)
}
