#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use cavern_core::config::{self, EffectiveConfig};
use cavern_engine::TraversalKind;
use clap::{Parser, Subcommand};
use cmd::Session;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cav: cave-network routes, spanning trees and weak points",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by `CAVERN_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format. Defaults to pretty on a terminal, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of `.cavern/config.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Graph snapshot (`.json` or text). Defaults to `[graph] path` in the
    /// config.
    #[arg(short, long, global = true, value_name = "PATH")]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Inspect",
        about = "Summary statistics",
        after_help = "EXAMPLES:\n    cav -g caves.txt stats\n    cav -g caves.txt stats --json"
    )]
    Stats(cmd::inspect::StatsArgs),

    #[command(
        next_help_heading = "Inspect",
        about = "Validate a snapshot and report anomalies",
        long_about = "Load the snapshot through the graph store and report mirror asymmetry, \
                      self-loops, isolated sites and connectivity. Exits non-zero when an \
                      undirected link has no mirror."
    )]
    Check(cmd::inspect::CheckArgs),

    #[command(next_help_heading = "Inspect", about = "Sites one usable link away")]
    Neighbors(cmd::inspect::NeighborsArgs),

    #[command(
        next_help_heading = "Trees",
        about = "Minimum spanning tree or forest (Kruskal)",
        long_about = "Minimum spanning tree over non-obstructed links. Directed graphs use \
                      their undirected skeleton. A disconnected network yields one tree per \
                      component."
    )]
    Mst(cmd::tree::MstArgs),

    #[command(
        next_help_heading = "Trees",
        about = "Minimum spanning tree grown from one site (Prim)",
        after_help = "EXAMPLES:\n    cav -g caves.txt prim A"
    )]
    Prim(cmd::tree::PrimArgs),

    #[command(
        next_help_heading = "Routes",
        about = "Shortest route between two sites",
        after_help = "EXAMPLES:\n    cav -g caves.txt path A D\n    cav -g caves.txt path A D --format text"
    )]
    Path(cmd::route::PathArgs),

    #[command(next_help_heading = "Routes", about = "Shortest routes from one site to all others")]
    Routes(cmd::route::RoutesArgs),

    #[command(next_help_heading = "Structure", about = "Strongly connected components")]
    Scc(cmd::structure::SccArgs),

    #[command(
        next_help_heading = "Structure",
        about = "Bridges and articulation sites"
    )]
    WeakPoints(cmd::structure::WeakPointsArgs),

    #[command(next_help_heading = "Traversal", about = "Depth-first walk")]
    Dfs(cmd::walk::WalkArgs),

    #[command(next_help_heading = "Traversal", about = "Breadth-first walk")]
    Bfs(cmd::walk::WalkArgs),

    #[command(next_help_heading = "Traversal", about = "Whether one site reaches every other")]
    Reach(cmd::walk::ReachArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Obstruct (or clear) links",
        after_help = "EXAMPLES:\n    # Block two tunnels\n    cav -g caves.txt obstruct A B C D\n\n    # Reopen one, writing elsewhere\n    cav -g caves.txt obstruct A B --clear --out reopened.txt"
    )]
    Obstruct(cmd::edit::ObstructArgs),

    #[command(next_help_heading = "Edit", about = "Reverse a directed link")]
    Reverse(cmd::edit::ReverseArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Change graph type and/or snapshot encoding",
        after_help = "EXAMPLES:\n    cav -g caves.txt convert --to undirected\n    cav -g caves.txt convert --out caves.json"
    )]
    Convert(cmd::edit::ConvertArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CAVERN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cavern=debug,info"
        } else {
            "cavern=info,warn"
        })
    });

    let format = env::var("CAVERN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries command output only.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn resolve_graph_path(
    flag: Option<&Path>,
    config: &EffectiveConfig,
    project_root: &Path,
) -> anyhow::Result<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.graph_path(project_root))
        .context("no graph snapshot: pass --graph PATH or set [graph] path in .cavern/config.toml")
}

fn run(cli: &Cli, output: OutputMode, config: &EffectiveConfig) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    let session = Session {
        graph_path: resolve_graph_path(cli.graph.as_deref(), config, &project_root)?,
        output,
    };
    debug!(graph = %session.graph_path.display(), ?output, "session resolved");

    match &cli.command {
        Commands::Stats(args) => cmd::inspect::run_stats(args, &session),
        Commands::Check(args) => cmd::inspect::run_check(args, &session),
        Commands::Neighbors(args) => cmd::inspect::run_neighbors(args, &session),
        Commands::Mst(args) => cmd::tree::run_mst(args, &session),
        Commands::Prim(args) => cmd::tree::run_prim(args, &session),
        Commands::Path(args) => cmd::route::run_path(args, &session),
        Commands::Routes(args) => cmd::route::run_routes(args, &session),
        Commands::Scc(args) => cmd::structure::run_scc(args, &session),
        Commands::WeakPoints(args) => cmd::structure::run_weak_points(args, &session),
        Commands::Dfs(args) => cmd::walk::run_walk(TraversalKind::Dfs, args, &session),
        Commands::Bfs(args) => cmd::walk::run_walk(TraversalKind::Bfs, args, &session),
        Commands::Reach(args) => cmd::walk::run_reach(args, &session),
        Commands::Obstruct(args) => cmd::edit::run_obstruct(args, &session),
        Commands::Reverse(args) => cmd::edit::run_reverse(args, &session),
        Commands::Convert(args) => cmd::edit::run_convert(args, &session),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loaded = env::current_dir()
        .context("reading working directory")
        .and_then(|root| config::load_effective_config(&root, cli.config.as_deref()));

    let (output, result) = match loaded {
        Ok(config) => {
            let output = resolve_output_mode(cli.format, cli.json, config.output_format());
            (output, run(&cli, output, &config))
        }
        Err(err) => (resolve_output_mode(cli.format, cli.json, None), Err(err)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            info!(error = %format!("{err:#}"), "command failed");
            if let Err(render_err) = render_error(output, &CliError::from_anyhow(&err)) {
                eprintln!("error: {err:#} (while reporting: {render_err})");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["cav", "stats", "--json", "-g", "net.txt"]);
        assert!(cli.json);
        assert_eq!(cli.graph.as_deref(), Some(Path::new("net.txt")));
        assert!(matches!(cli.command, Commands::Stats(_)));
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["cav", "--format", "text", "scc"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn obstruct_takes_pairs() {
        let cli = Cli::parse_from(["cav", "obstruct", "A", "B", "C", "D", "--clear"]);
        match cli.command {
            Commands::Obstruct(args) => {
                assert_eq!(args.links, ["A", "B", "C", "D"]);
                assert!(args.clear);
                assert!(args.out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn obstruct_requires_a_pair() {
        assert!(Cli::try_parse_from(["cav", "obstruct"]).is_err());
        assert!(Cli::try_parse_from(["cav", "obstruct", "A"]).is_err());
    }

    #[test]
    fn convert_kind_values() {
        let cli = Cli::parse_from(["cav", "convert", "--to", "directed"]);
        assert!(matches!(
            cli.command,
            Commands::Convert(cmd::edit::ConvertArgs {
                kind: Some(cmd::edit::GraphKind::Directed),
                out: None,
            })
        ));
        assert!(Cli::try_parse_from(["cav", "convert", "--to", "sideways"]).is_err());
    }

    #[test]
    fn all_subcommands_parse() {
        let subcommands = [
            vec!["cav", "stats"],
            vec!["cav", "check"],
            vec!["cav", "neighbors", "A"],
            vec!["cav", "mst"],
            vec!["cav", "prim", "A"],
            vec!["cav", "path", "A", "B"],
            vec!["cav", "routes", "A"],
            vec!["cav", "scc"],
            vec!["cav", "weak-points"],
            vec!["cav", "dfs", "A"],
            vec!["cav", "bfs", "A"],
            vec!["cav", "reach", "A"],
            vec!["cav", "obstruct", "A", "B"],
            vec!["cav", "reverse", "A", "B"],
            vec!["cav", "convert", "--out", "x.json"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "failed to parse {args:?}: {:?}", result.err());
        }
    }

    #[test]
    fn graph_path_prefers_flag_then_config() {
        let root = Path::new("/work");
        let mut config = EffectiveConfig::default();
        assert!(resolve_graph_path(None, &config, root).is_err());

        config.project.graph.path = Some(PathBuf::from("caves.txt"));
        assert_eq!(
            resolve_graph_path(None, &config, root).expect("from config"),
            root.join("caves.txt")
        );
        assert_eq!(
            resolve_graph_path(Some(Path::new("other.json")), &config, root).expect("flag"),
            PathBuf::from("other.json")
        );
    }
}
