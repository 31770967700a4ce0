//! `cav scc` and `cav weak-points`.

use std::io::Write;

use cavern_engine::{WeakPoints, strongly_connected_components, weak_points};
use clap::Args;
use serde::Serialize;

use super::Session;
use crate::output::{pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug, Default)]
pub struct SccArgs {}

#[derive(Debug, Serialize)]
struct SccReport {
    strongly_connected: bool,
    count: usize,
    components: Vec<Vec<String>>,
}

pub fn run_scc(_args: &SccArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let components = strongly_connected_components(&graph);
    let report = SccReport {
        strongly_connected: components.len() == 1,
        count: components.len(),
        components,
    };

    render_mode(
        session.output,
        &report,
        |r, w| {
            for component in &r.components {
                writeln!(w, "{}", component.join(","))?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, "Strongly connected components")?;
            pretty_kv(w, "Count", r.count.to_string())?;
            pretty_kv(
                w,
                "Strong",
                if r.strongly_connected { "yes" } else { "no" },
            )?;
            for (idx, component) in r.components.iter().enumerate() {
                writeln!(w, "  #{:<3} {}", idx + 1, component.join(", "))?;
            }
            Ok(())
        },
    )
}

#[derive(Args, Debug, Default)]
pub struct WeakPointsArgs {}

pub fn run_weak_points(_args: &WeakPointsArgs, session: &Session) -> anyhow::Result<()> {
    let graph = session.load()?;
    let found = weak_points(&graph);

    render_mode(
        session.output,
        &found,
        |wp: &WeakPoints, w| {
            for (from, to) in &wp.bridges {
                writeln!(w, "bridge\t{from}\t{to}")?;
            }
            for site in &wp.articulation_sites {
                writeln!(w, "articulation\t{site}")?;
            }
            Ok(())
        },
        |wp, w| {
            pretty_section(w, "Weak points")?;
            if wp.is_empty() {
                return writeln!(w, "(none: no single link or site splits the network)");
            }
            for (from, to) in &wp.bridges {
                pretty_kv(w, "Bridge", format!("{from} - {to}"))?;
            }
            for site in &wp.articulation_sites {
                pretty_kv(w, "Articulation", site)?;
            }
            Ok(())
        },
    )
}
