//! Subcommand handlers.
//!
//! Every handler takes a [`Session`] (resolved snapshot path and output
//! mode) plus its own clap arguments, loads the graph, runs one engine call
//! and renders the result.

pub mod edit;
pub mod inspect;
pub mod route;
pub mod structure;
pub mod tree;
pub mod walk;

use std::path::{Path, PathBuf};

use anyhow::Context;
use cavern_core::Graph;
use cavern_core::format;
use tracing::info;

use crate::output::OutputMode;

/// Per-invocation state shared by every handler.
#[derive(Debug, Clone)]
pub struct Session {
    pub graph_path: PathBuf,
    pub output: OutputMode,
}

impl Session {
    /// Load the snapshot named by `--graph` or the config.
    pub fn load(&self) -> anyhow::Result<Graph> {
        format::load_path(&self.graph_path)
            .with_context(|| format!("loading {}", self.graph_path.display()))
    }

    /// Write a mutated graph to `out`, or back over the source snapshot.
    ///
    /// The format follows the target's extension, so `--out net.json` also
    /// converts between encodings.
    pub fn store(&self, graph: &Graph, out: Option<&Path>) -> anyhow::Result<PathBuf> {
        let target = out.unwrap_or(self.graph_path.as_path());
        format::save_path(graph, target)
            .with_context(|| format!("writing {}", target.display()))?;
        info!(path = %target.display(), "snapshot written");
        Ok(target.to_path_buf())
    }
}
