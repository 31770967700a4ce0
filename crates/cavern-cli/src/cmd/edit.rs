//! Mutating commands: `cav obstruct`, `cav reverse` and `cav convert`.
//!
//! Each loads the snapshot, applies one store mutation, and writes the result
//! back in place or to `--out`.

use std::io::Write;
use std::path::PathBuf;

use cavern_core::{GraphError, RetypeReport};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::warn;

use super::Session;
use crate::output::{pretty_kv, pretty_section, render_mode};

// ---------------------------------------------------------------------------
// obstruct
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ObstructArgs {
    /// Link endpoints as alternating FROM TO pairs.
    #[arg(required = true, num_args = 2.., value_name = "FROM TO")]
    pub links: Vec<String>,

    /// Clear the obstruction instead of setting it.
    #[arg(long)]
    pub clear: bool,

    /// Write the result here instead of over the source snapshot.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ObstructReport {
    obstructed: bool,
    applied: Vec<(String, String)>,
    failed: Vec<FailedLink>,
    written: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FailedLink {
    from: String,
    to: String,
    error_code: &'static str,
    message: String,
}

/// Set or clear obstruction on a batch of links.
///
/// Links that fail (unknown pair) are reported individually and do not stop
/// the rest. The snapshot is written when at least one link changed state;
/// any failure makes the command exit non-zero.
pub fn run_obstruct(args: &ObstructArgs, session: &Session) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.links.len() % 2 == 0,
        "obstruct takes FROM TO pairs; got {} value(s)",
        args.links.len()
    );
    let pairs: Vec<(&str, &str)> = args
        .links
        .chunks_exact(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect();

    let mut graph = session.load()?;
    let value = !args.clear;
    let errors = graph.set_obstructed_many(pairs.iter().copied(), value);

    let failed: Vec<FailedLink> = errors.iter().map(failed_link).collect();
    let applied: Vec<(String, String)> = pairs
        .iter()
        .filter(|(from, to)| graph.contains_link(from, to))
        .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
        .collect();

    let written = if applied.is_empty() {
        None
    } else {
        Some(session.store(&graph, args.out.as_deref())?)
    };
    let report = ObstructReport {
        obstructed: value,
        applied,
        failed,
        written,
    };

    let verb = if value { "obstructed" } else { "cleared" };
    render_mode(
        session.output,
        &report,
        |r, w| {
            for (from, to) in &r.applied {
                writeln!(w, "{verb}\t{from}\t{to}")?;
            }
            for f in &r.failed {
                writeln!(w, "failed\t{}\t{}\t{}", f.from, f.to, f.error_code)?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, if value { "Obstruct links" } else { "Clear obstructions" })?;
            for (from, to) in &r.applied {
                pretty_kv(w, verb, format!("{from} -> {to}"))?;
            }
            for f in &r.failed {
                pretty_kv(w, "failed", format!("[{}] {}", f.error_code, f.message))?;
            }
            if let Some(path) = &r.written {
                pretty_kv(w, "Written", path.display().to_string())?;
            }
            Ok(())
        },
    )?;

    if let Some(first) = errors.into_iter().next() {
        warn!(failed = report.failed.len(), "some links could not be updated");
        return Err(anyhow::Error::new(first)
            .context(format!("{} of {} link(s) failed", report.failed.len(), pairs.len())));
    }
    Ok(())
}

fn failed_link(err: &GraphError) -> FailedLink {
    let (from, to) = match err {
        GraphError::LinkNotFound { from, to }
        | GraphError::DuplicateLink { from, to }
        | GraphError::NotDirected { from, to }
        | GraphError::NoRoute { from, to }
        | GraphError::InvalidDistance { from, to, .. } => (from.clone(), to.clone()),
        GraphError::UnknownSite(id) | GraphError::DuplicateId(id) => (id.clone(), String::new()),
    };
    FailedLink {
        from,
        to,
        error_code: err.code().code(),
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// reverse
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ReverseArgs {
    pub from: String,
    pub to: String,

    /// Write the result here instead of over the source snapshot.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReverseReport {
    from: String,
    to: String,
    written: PathBuf,
}

/// Flip a directed link so it runs `to → from`.
pub fn run_reverse(args: &ReverseArgs, session: &Session) -> anyhow::Result<()> {
    let mut graph = session.load()?;
    graph.reverse_link(&args.from, &args.to)?;
    let written = session.store(&graph, args.out.as_deref())?;

    let report = ReverseReport {
        from: args.to.clone(),
        to: args.from.clone(),
        written,
    };
    render_mode(
        session.output,
        &report,
        |r, w| writeln!(w, "reversed\t{}\t{}", r.from, r.to),
        |r, w| {
            pretty_section(w, "Reverse link")?;
            pretty_kv(w, "Now", format!("{} -> {}", r.from, r.to))?;
            pretty_kv(w, "Written", r.written.display().to_string())
        },
    )
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphKind {
    Directed,
    Undirected,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Target graph type; omit to keep the current one.
    #[arg(long = "to", value_enum)]
    pub kind: Option<GraphKind>,

    /// Write the result here instead of over the source snapshot. The
    /// extension picks the encoding (`.json` or text).
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ConvertReport {
    directed: bool,
    #[serde(flatten)]
    reconciled: RetypeReport,
    links: usize,
    written: PathBuf,
}

/// Switch between directed and undirected, and/or re-encode the snapshot.
pub fn run_convert(args: &ConvertArgs, session: &Session) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.kind.is_some() || args.out.is_some(),
        "nothing to do: pass --to directed|undirected and/or --out PATH"
    );

    let mut graph = session.load()?;
    let reconciled = match args.kind {
        Some(kind) => graph.retype(kind == GraphKind::Directed),
        None => RetypeReport::default(),
    };
    let written = session.store(&graph, args.out.as_deref())?;

    let report = ConvertReport {
        directed: graph.is_directed(),
        reconciled,
        links: graph.link_count(),
        written,
    };
    render_mode(
        session.output,
        &report,
        |r, w| {
            writeln!(
                w,
                "{}\tadded={}\tremoved={}\tsynchronized={}\tlinks={}",
                if r.directed { "directed" } else { "undirected" },
                r.reconciled.added,
                r.reconciled.removed,
                r.reconciled.synchronized,
                r.links
            )
        },
        |r, w| {
            pretty_section(w, "Convert")?;
            pretty_kv(w, "Type", if r.directed { "directed" } else { "undirected" })?;
            if r.reconciled.is_noop() {
                pretty_kv(w, "Links", format!("{} (unchanged)", r.links))?;
            } else {
                pretty_kv(
                    w,
                    "Links",
                    format!(
                        "{} ({} mirrors added, {} removed, {} synchronized)",
                        r.links, r.reconciled.added, r.reconciled.removed, r.reconciled.synchronized
                    ),
                )?;
            }
            pretty_kv(w, "Written", r.written.display().to_string())
        },
    )
}
