//! Line-oriented text snapshots.
//!
//! # Layout
//!
//! ```text
//! # comment
//! [grafo]
//! directed=false
//!
//! [cuevas]
//! c1,Gruta Norte,0,0,agua:3,oro:1
//! c2,Sima,4.5,-2
//!
//! [aristas]
//! c1,c2,5
//! c2,c1,7,true
//! c1,c3,2.5,false,true
//! ```
//!
//! - `[grafo]` holds `key=value` settings. The graph type is read from
//!   `directed`/`dirigido` (`true`/`false`) or `tipo`/`type`
//!   (`dirigido`/`no_dirigido`, `directed`/`undirected`). Default: undirected.
//! - `[cuevas]` lines are `id,name,x,y` followed by any number of
//!   `resource:quantity` fields.
//! - `[aristas]` lines are `from,to,distance[,directed[,obstructed]]`. A
//!   missing `directed` field takes the graph type.
//!
//! Blank lines and lines starting with `#` are ignored. Sections may appear in
//! any order; links are applied after every site is known.

use std::fmt::Write as _;

use tracing::warn;

use crate::error::FormatError;
use crate::format::apply_link;
use crate::graph::Graph;
use crate::model::{Link, Site};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Graph,
    Sites,
    Links,
}

impl Section {
    fn from_header(header: &str) -> Option<Self> {
        match header.to_ascii_lowercase().as_str() {
            "grafo" | "graph" => Some(Self::Graph),
            "cuevas" | "sites" => Some(Self::Sites),
            "aristas" | "links" => Some(Self::Links),
            _ => None,
        }
    }
}

/// A link line, kept until the graph type is known.
struct PendingLink {
    line: usize,
    from: String,
    to: String,
    distance: f64,
    directed: Option<bool>,
    obstructed: bool,
}

/// Parse a text snapshot into a [`Graph`].
///
/// # Errors
///
/// - [`FormatError::Parse`] for malformed lines (with the 1-based line number).
/// - [`FormatError::Rejected`] when a line is well-formed but violates a graph
///   invariant (duplicate ID, unknown endpoint, duplicate link, bad distance).
pub fn parse(content: &str) -> Result<Graph, FormatError> {
    let mut section: Option<Section> = None;
    let mut directed = false;
    let mut sites: Vec<(usize, Site)> = Vec::new();
    let mut links: Vec<PendingLink> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .strip_suffix(']')
                .ok_or_else(|| FormatError::parse(line_no, "unterminated section header"))?;
            section = Some(Section::from_header(header.trim()).ok_or_else(|| {
                FormatError::parse(line_no, format!("unknown section [{header}]"))
            })?);
            continue;
        }

        match section {
            None => {
                return Err(FormatError::parse(
                    line_no,
                    "content before the first section header",
                ));
            }
            Some(Section::Graph) => {
                if let Some(value) = parse_graph_setting(line, line_no)? {
                    directed = value;
                }
            }
            Some(Section::Sites) => sites.push((line_no, parse_site(line, line_no)?)),
            Some(Section::Links) => links.push(parse_link(line, line_no)?),
        }
    }

    let mut graph = Graph::new(directed);
    for (line, site) in sites {
        graph
            .insert_site(site)
            .map_err(|source| FormatError::Rejected { line, source })?;
    }
    for pending in links {
        let line = pending.line;
        let mut link = Link::new(
            pending.from,
            pending.to,
            pending.distance,
            pending.directed.unwrap_or(directed),
        );
        link.obstructed = pending.obstructed;
        apply_link(&mut graph, link).map_err(|source| FormatError::Rejected { line, source })?;
    }
    Ok(graph)
}

/// Render a [`Graph`] as a text snapshot.
///
/// Undirected mirror pairs are written once; [`parse`] re-creates the mirror.
///
/// # Errors
///
/// Returns [`FormatError::Unrepresentable`] if a site ID, name or resource
/// name would not survive [`parse`] unchanged. Nothing is written in that
/// case; the JSON format holds any string.
pub fn to_text(graph: &Graph) -> Result<String, FormatError> {
    let mut out = String::new();
    let _ = writeln!(out, "[grafo]");
    let _ = writeln!(out, "directed={}", graph.is_directed());

    let _ = writeln!(out, "\n[cuevas]");
    for site in graph.sites() {
        check_id(&site.id)?;
        check_field("site name", &site.name)?;
        let _ = write!(out, "{},{},{},{}", site.id, site.name, site.x, site.y);
        let mut resources: Vec<(&String, &i64)> = site.resources.iter().collect();
        resources.sort_unstable();
        for (name, qty) in resources {
            check_field("resource name", name)?;
            if name.contains(':') {
                return Err(unrepresentable("resource name", name, "contains ':'"));
            }
            let _ = write!(out, ",{name}:{qty}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\n[aristas]");
    let mut written: Vec<&Link> = Vec::new();
    for link in graph.links() {
        let is_second_half = !graph.is_directed()
            && !link.directed
            && written.iter().any(|prev| prev.is_mirror_of(link));
        if is_second_half {
            continue;
        }
        let _ = write!(out, "{},{},{},{}", link.from, link.to, link.distance, link.directed);
        if link.obstructed {
            out.push_str(",true");
        }
        out.push('\n');
        written.push(link);
    }
    Ok(out)
}

fn unrepresentable(field: &'static str, value: &str, reason: &'static str) -> FormatError {
    FormatError::Unrepresentable {
        field,
        value: value.to_string(),
        reason,
    }
}

/// A comma-separated field is read back split on `,` and trimmed.
fn check_field(field: &'static str, value: &str) -> Result<(), FormatError> {
    if value.contains(',') {
        return Err(unrepresentable(field, value, "contains ','"));
    }
    if value.contains(['\n', '\r']) {
        return Err(unrepresentable(field, value, "contains a line break"));
    }
    if value.trim() != value {
        return Err(unrepresentable(
            field,
            value,
            "has leading or trailing whitespace",
        ));
    }
    Ok(())
}

/// The ID opens the line, so it must not look like a comment or a header.
fn check_id(id: &str) -> Result<(), FormatError> {
    check_field("site id", id)?;
    if id.is_empty() {
        return Err(unrepresentable("site id", id, "is empty"));
    }
    if id.starts_with(['#', '[']) {
        return Err(unrepresentable("site id", id, "starts with '#' or '['"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Line parsers
// ---------------------------------------------------------------------------

fn parse_graph_setting(line: &str, line_no: usize) -> Result<Option<bool>, FormatError> {
    let (key, value) = line
        .split_once('=')
        .ok_or_else(|| FormatError::parse(line_no, "expected key=value"))?;
    let key = key.trim().to_ascii_lowercase();
    let value = value.trim();

    match key.as_str() {
        "directed" | "dirigido" => parse_bool(value, line_no).map(Some),
        "tipo" | "type" => match value.to_ascii_lowercase().as_str() {
            "dirigido" | "directed" => Ok(Some(true)),
            "no_dirigido" | "nodirigido" | "undirected" => Ok(Some(false)),
            other => Err(FormatError::parse(
                line_no,
                format!("unknown graph type '{other}'"),
            )),
        },
        _ => {
            warn!(line = line_no, key = %key, "ignoring unknown graph setting");
            Ok(None)
        }
    }
}

fn parse_site(line: &str, line_no: usize) -> Result<Site, FormatError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 4 {
        return Err(FormatError::parse(
            line_no,
            format!("site needs id,name,x,y (got {} fields)", fields.len()),
        ));
    }
    let id = fields[0];
    if id.is_empty() {
        return Err(FormatError::parse(line_no, "empty site id"));
    }

    let mut site = Site::new(
        id,
        fields[1],
        parse_f64(fields[2], "x", line_no)?,
        parse_f64(fields[3], "y", line_no)?,
    );
    for field in &fields[4..] {
        if field.is_empty() {
            continue;
        }
        let (name, qty) = field.split_once(':').ok_or_else(|| {
            FormatError::parse(line_no, format!("resource '{field}' is not name:quantity"))
        })?;
        let qty: i64 = qty.trim().parse().map_err(|_| {
            FormatError::parse(line_no, format!("resource quantity '{qty}' is not an integer"))
        })?;
        site.add_resource(name.trim(), qty);
    }
    Ok(site)
}

fn parse_link(line: &str, line_no: usize) -> Result<PendingLink, FormatError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if !(3..=5).contains(&fields.len()) {
        return Err(FormatError::parse(
            line_no,
            format!(
                "link needs from,to,distance[,directed[,obstructed]] (got {} fields)",
                fields.len()
            ),
        ));
    }

    Ok(PendingLink {
        line: line_no,
        from: fields[0].to_string(),
        to: fields[1].to_string(),
        distance: parse_f64(fields[2], "distance", line_no)?,
        directed: fields
            .get(3)
            .map(|value| parse_bool(value, line_no))
            .transpose()?,
        obstructed: fields
            .get(4)
            .map(|value| parse_bool(value, line_no))
            .transpose()?
            .unwrap_or(false),
    })
}

fn parse_f64(value: &str, field: &str, line_no: usize) -> Result<f64, FormatError> {
    value
        .parse()
        .map_err(|_| FormatError::parse(line_no, format!("{field} '{value}' is not a number")))
}

fn parse_bool(value: &str, line_no: usize) -> Result<bool, FormatError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "si" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(FormatError::parse(
            line_no,
            format!("'{other}' is not a boolean"),
        )),
    }
}
