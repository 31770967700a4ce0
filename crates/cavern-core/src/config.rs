//! Configuration files for the `cav` front end.
//!
//! Two optional TOML files are read, both falling back to defaults when
//! absent:
//!
//! - project: `.cavern/config.toml` under the working directory
//! - user: `<config dir>/cavern/config.toml` (via `dirs`)
//!
//! Project settings win over user settings; an explicit `--config` path
//! replaces the project file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Snapshot used when a command is given no `--graph` argument.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output mode: `pretty`, `text` or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

/// The merged view handed to commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
}

impl EffectiveConfig {
    /// Default graph snapshot path, resolved against `project_root` when
    /// relative.
    #[must_use]
    pub fn graph_path(&self, project_root: &Path) -> Option<PathBuf> {
        self.project.graph.path.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                project_root.join(path)
            }
        })
    }

    /// Configured output mode name, project first.
    #[must_use]
    pub fn output_format(&self) -> Option<&str> {
        self.project
            .output
            .format
            .as_deref()
            .or(self.user.output.as_deref())
    }
}

fn read_toml<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<T>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    read_toml(&project_root.join(".cavern/config.toml"))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    read_toml(&config_dir.join("cavern/config.toml"))
}

/// Load the effective configuration.
///
/// `explicit` replaces the project file and must exist.
pub fn load_effective_config(project_root: &Path, explicit: Option<&Path>) -> Result<EffectiveConfig> {
    let project = match explicit {
        Some(path) => {
            anyhow::ensure!(path.exists(), "config file {} does not exist", path.display());
            read_toml(path)?
        }
        None => load_project_config(project_root)?,
    };

    Ok(EffectiveConfig {
        project,
        user: load_user_config()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = load_project_config(dir.path()).expect("load");
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn project_config_parses() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(".cavern")).expect("mkdir");
        std::fs::write(
            dir.path().join(".cavern/config.toml"),
            "[graph]\npath = \"net/caves.txt\"\n\n[output]\nformat = \"json\"\n",
        )
        .expect("write");

        let config = load_effective_config(dir.path(), None).expect("load");
        assert_eq!(config.output_format(), Some("json"));
        assert_eq!(
            config.graph_path(dir.path()),
            Some(dir.path().join("net/caves.txt"))
        );
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        assert!(load_effective_config(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[graph\n").expect("write");
        let err = load_effective_config(dir.path(), Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }
}
