//! JSON snapshots.
//!
//! Every stored link is written, mirror halves included. Loading accepts files
//! with or without the mirror halves of undirected links, and always places a
//! mirror straight after its partner. A graph whose mirrors sit elsewhere in
//! the link list (after `retype(false)`, say) reloads with the same links in
//! that canonical order, so it may not compare equal to the saved value.

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::format::apply_link;
use crate::graph::Graph;
use crate::model::{Link, Site};

/// Serialized form of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl From<&Graph> for GraphSnapshot {
    fn from(graph: &Graph) -> Self {
        Self {
            directed: graph.is_directed(),
            sites: graph.sites().cloned().collect(),
            links: graph.links().to_vec(),
        }
    }
}

impl GraphSnapshot {
    /// Rebuild a graph through the store API.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Graph`] for the first invariant violation.
    pub fn into_graph(self) -> Result<Graph, FormatError> {
        let mut graph = Graph::new(self.directed);
        for site in self.sites {
            graph.insert_site(site)?;
        }
        for link in self.links {
            apply_link(&mut graph, link)?;
        }
        Ok(graph)
    }
}

/// Encode a graph as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`FormatError::Json`] if serialization fails.
pub fn to_json(graph: &Graph) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&GraphSnapshot::from(graph))?)
}

/// Decode a JSON snapshot.
///
/// # Errors
///
/// Returns [`FormatError::Json`] for malformed JSON, or [`FormatError::Graph`]
/// if the content violates a graph invariant.
pub fn from_json(content: &str) -> Result<Graph, FormatError> {
    serde_json::from_str::<GraphSnapshot>(content)?.into_graph()
}
