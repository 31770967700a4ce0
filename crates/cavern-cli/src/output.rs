//! Shared output layer for pretty/text/JSON parity across all `cav` commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its result
//! accordingly: framed output for humans, compact lines for scripts, or
//! stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `CAVERN_FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `[output] format` from the config files
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use std::io::{self, IsTerminal, Write};

use cavern_core::{ErrorCode, FormatError, GraphError};
use clap::ValueEnum;
use serde::Serialize;

/// Shared width for pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 60;

/// Write a horizontal separator used by pretty output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in pretty output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<16} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-oriented output (sections, aligned fields).
    Pretty,
    /// Compact plain text for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_format: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }
    if json_flag {
        return OutputMode::Json;
    }

    // Unknown values fall through to the next source.
    if let Some(mode) = format_env.and_then(OutputMode::parse) {
        return mode;
    }
    if let Some(mode) = config_format.and_then(OutputMode::parse) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, config and TTY
/// defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_format: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("CAVERN_FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_format,
        is_tty,
    )
}

/// Render a serializable value with explicit text and pretty renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Stable `E####` code when the failure came from the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Build from an `anyhow` chain, surfacing the engine's code and hint
    /// when a [`GraphError`] or [`FormatError`] is inside it.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = err.chain().find_map(|cause| {
            cause
                .downcast_ref::<GraphError>()
                .map(GraphError::code)
                .or_else(|| cause.downcast_ref::<FormatError>().map(FormatError::code))
        });

        Self {
            message: format!("{err:#}"),
            suggestion: code.and_then(ErrorCode::hint).map(str::to_string),
            error_code: code.map(|code| code.code().to_string()),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            let label = error
                .error_code
                .as_ref()
                .map_or_else(|| "error".to_string(), |code| format!("error[{code}]"));
            writeln!(out, "{label}: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Format a distance for display: integers without a fraction.
#[allow(clippy::float_cmp)]
pub fn fmt_distance(distance: f64) -> String {
    if distance.is_finite() && distance.fract() == 0.0 && distance.abs() < 1e15 {
        format!("{distance:.0}")
    } else {
        format!("{distance}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some("json"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn env_wins_over_config() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn config_used_when_env_unknown() {
        let mode = resolve_output_mode_inner(None, false, Some("fancy"), Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn tty_default() {
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, None, Some("bogus"), false),
            OutputMode::Text
        );
    }

    #[test]
    fn cli_error_carries_engine_code() {
        let err = anyhow::Error::new(GraphError::UnknownSite("Z".into()))
            .context("loading route");
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1001"));
        assert!(cli.message.contains("unknown site: 'Z'"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn cli_error_without_engine_code() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("boom")).context("outer");
        let cli = CliError::from_anyhow(&err.unwrap_err());
        assert!(cli.error_code.is_none());
        assert_eq!(cli.message, "outer: boom");
    }

    #[test]
    fn distances_print_compactly() {
        assert_eq!(fmt_distance(9.0), "9");
        assert_eq!(fmt_distance(2.5), "2.5");
        assert_eq!(fmt_distance(f64::INFINITY), "inf");
    }
}
