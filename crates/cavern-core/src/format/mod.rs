//! Graph snapshot formats.
//!
//! The engine is agnostic to where a [`Graph`] came from; this module is the
//! thin collaborator that reads and writes snapshots on request.
//!
//! - [`text`]: line-oriented `[grafo]` / `[cuevas]` / `[aristas]` sections.
//! - [`json`]: `serde` representation of the full site and link lists.
//!
//! Both loaders rebuild the graph through the store API, so every invariant
//! (unique IDs, known endpoints, mirror symmetry) is enforced on load.

pub mod json;
pub mod text;

use std::path::Path;

use tracing::{info, instrument};

use crate::error::{FormatError, GraphError};
use crate::graph::Graph;
use crate::model::Link;

/// On-disk snapshot encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Text,
    Json,
}

impl SnapshotFormat {
    /// Pick the format from a file extension: `.json` is JSON, anything else
    /// is the text format.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }

    /// Decode a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the content is malformed or violates a
    /// graph invariant.
    pub fn parse(self, content: &str) -> Result<Graph, FormatError> {
        match self {
            Self::Text => text::parse(content),
            Self::Json => json::from_json(content),
        }
    }

    /// Encode a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Json`] if JSON encoding fails, or
    /// [`FormatError::Unrepresentable`] if the text format cannot hold a
    /// site ID or name.
    pub fn render(self, graph: &Graph) -> Result<String, FormatError> {
        match self {
            Self::Text => text::to_text(graph),
            Self::Json => json::to_json(graph),
        }
    }
}

/// Load a snapshot file, choosing the format from its extension.
///
/// # Errors
///
/// Returns [`FormatError::Io`] if the file cannot be read, or a parse/graph
/// error from the decoder.
#[instrument]
pub fn load_path(path: &Path) -> Result<Graph, FormatError> {
    let content = std::fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let format = SnapshotFormat::from_path(path);
    let graph = format.parse(&content)?;
    info!(
        ?format,
        sites = graph.site_count(),
        links = graph.link_count(),
        directed = graph.is_directed(),
        "loaded graph snapshot"
    );
    Ok(graph)
}

/// Write a snapshot file, choosing the format from its extension.
///
/// # Errors
///
/// Returns [`FormatError::Io`] if the file cannot be written, or the
/// encoder's error. The file is left untouched when encoding fails.
#[instrument(skip(graph))]
pub fn save_path(graph: &Graph, path: &Path) -> Result<(), FormatError> {
    let format = SnapshotFormat::from_path(path);
    let content = format.render(graph)?;
    std::fs::write(path, content).map_err(|source| FormatError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(?format, "saved graph snapshot");
    Ok(())
}

/// Insert a link read from a snapshot.
///
/// Snapshots of undirected graphs may list both halves of a mirror pair. The
/// second half is already present (inserted with the first), so an identical
/// record is accepted without change.
pub(crate) fn apply_link(graph: &mut Graph, link: Link) -> Result<(), GraphError> {
    if !graph.is_directed()
        && !link.directed
        && graph.link(&link.from, &link.to).is_some_and(|existing| *existing == link)
    {
        return Ok(());
    }
    graph.insert_link(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        let mut graph = Graph::undirected();
        graph.add_site("a", "Alpha", 0.0, 0.0).expect("site");
        graph.add_site("b", "Beta", 1.0, 2.0).expect("site");
        graph.add_link("a", "b", 3.5, false).expect("link");
        graph
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SnapshotFormat::from_path(Path::new("caves.JSON")),
            SnapshotFormat::Json
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("caves.txt")),
            SnapshotFormat::Text
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("caves")),
            SnapshotFormat::Text
        );
    }

    #[test]
    fn save_and_load_both_formats() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = sample();

        for name in ["net.txt", "net.json"] {
            let path = dir.path().join(name);
            save_path(&graph, &path).expect("save");
            let loaded = load_path(&path).expect("load");
            assert_eq!(loaded, graph, "round trip through {name}");
        }
    }

    #[test]
    fn refused_text_render_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("net.txt");
        let mut graph = sample();
        save_path(&graph, &path).expect("save");
        let before = std::fs::read_to_string(&path).expect("read");

        graph.site_mut("a").expect("site").name = "Alpha, upper".to_string();
        let err = save_path(&graph, &path).unwrap_err();
        assert!(matches!(err, FormatError::Unrepresentable { .. }));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), before);

        let json = dir.path().join("net.json");
        save_path(&graph, &json).expect("json holds any name");
        assert_eq!(load_path(&json).expect("load"), graph);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_path(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, FormatError::Io { .. }));
    }

    #[test]
    fn apply_link_accepts_listed_mirror() {
        let mut graph = sample();
        let mirror = graph.link("b", "a").cloned().expect("mirror");
        apply_link(&mut graph, mirror).expect("identical mirror accepted");
        assert_eq!(graph.link_count(), 2);

        let conflicting = Link::new("b", "a", 9.0, false);
        assert!(matches!(
            apply_link(&mut graph, conflicting),
            Err(GraphError::DuplicateLink { .. })
        ));
    }
}
