use std::fmt;

/// Machine-readable error codes for script-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownSite,
    LinkNotFound,
    DuplicateId,
    DuplicateLink,
    NotDirected,
    InvalidDistance,
    NoRoute,
    SnapshotParseError,
    SnapshotIoFailed,
    SnapshotUnrepresentable,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownSite => "E1001",
            Self::LinkNotFound => "E1002",
            Self::DuplicateId => "E2001",
            Self::DuplicateLink => "E2002",
            Self::NotDirected => "E3001",
            Self::InvalidDistance => "E3002",
            Self::NoRoute => "E4001",
            Self::SnapshotParseError => "E5001",
            Self::SnapshotIoFailed => "E5002",
            Self::SnapshotUnrepresentable => "E5003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnknownSite => "Unknown site",
            Self::LinkNotFound => "Link not found",
            Self::DuplicateId => "Duplicate site ID",
            Self::DuplicateLink => "Duplicate link",
            Self::NotDirected => "Link is not directed",
            Self::InvalidDistance => "Invalid link distance",
            Self::NoRoute => "No route to destination",
            Self::SnapshotParseError => "Snapshot parse error",
            Self::SnapshotIoFailed => "Snapshot read/write failed",
            Self::SnapshotUnrepresentable => "Value not representable in text snapshot",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::UnknownSite => Some("Check the site ID; `cav stats` lists the loaded graph."),
            Self::LinkNotFound => Some("Links are ordered pairs; check the from/to order."),
            Self::DuplicateId => Some("Site IDs must be unique within a graph."),
            Self::DuplicateLink => {
                Some("Remove the existing link first, or adjust its distance instead.")
            }
            Self::NotDirected => {
                Some("Only directed links can be reversed; convert the graph with `cav convert`.")
            }
            Self::InvalidDistance => Some("Distances must be finite and non-negative."),
            Self::NoRoute => Some("Clear obstructions or add links to connect the destination."),
            Self::SnapshotParseError => Some("Fix the reported line in the snapshot and retry."),
            Self::SnapshotIoFailed => Some("Check that the file exists and is readable/writable."),
            Self::SnapshotUnrepresentable => {
                Some("Write a .json snapshot instead, or rename the offending site or resource.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// GraphError
// ---------------------------------------------------------------------------

/// Errors raised by the graph store and the algorithms that read it.
///
/// Validation errors are returned before any mutation happens, so the store
/// is never left half-updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An operation referenced a site ID not present in the graph.
    #[error("unknown site: '{0}'")]
    UnknownSite(String),

    /// A site with this ID already exists.
    #[error("duplicate site ID: '{0}'")]
    DuplicateId(String),

    /// A link with this ordered pair already exists.
    #[error("duplicate link: '{from}' -> '{to}'")]
    DuplicateLink { from: String, to: String },

    /// No link with this ordered pair exists.
    #[error("link not found: '{from}' -> '{to}'")]
    LinkNotFound { from: String, to: String },

    /// The operation needs a link flagged as directed.
    #[error("link '{from}' -> '{to}' is not directed")]
    NotDirected { from: String, to: String },

    /// The destination is not reachable from the source.
    #[error("no route from '{from}' to '{to}'")]
    NoRoute { from: String, to: String },

    /// Distances must be finite and non-negative.
    #[error("invalid distance {distance} for link '{from}' -> '{to}'")]
    InvalidDistance {
        from: String,
        to: String,
        distance: String,
    },
}

impl GraphError {
    pub(crate) fn duplicate_link(from: &str, to: &str) -> Self {
        Self::DuplicateLink {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub(crate) fn link_not_found(from: &str, to: &str) -> Self {
        Self::LinkNotFound {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Build a [`GraphError::NoRoute`] for an unreachable destination.
    #[must_use]
    pub fn no_route(from: &str, to: &str) -> Self {
        Self::NoRoute {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownSite(_) => ErrorCode::UnknownSite,
            Self::DuplicateId(_) => ErrorCode::DuplicateId,
            Self::DuplicateLink { .. } => ErrorCode::DuplicateLink,
            Self::LinkNotFound { .. } => ErrorCode::LinkNotFound,
            Self::NotDirected { .. } => ErrorCode::NotDirected,
            Self::NoRoute { .. } => ErrorCode::NoRoute,
            Self::InvalidDistance { .. } => ErrorCode::InvalidDistance,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

// ---------------------------------------------------------------------------
// FormatError
// ---------------------------------------------------------------------------

/// Errors from reading or writing graph snapshots.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A line in a text snapshot could not be parsed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A text snapshot line was well-formed but violates a graph invariant.
    #[error("line {line}: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: GraphError,
    },

    /// The snapshot parsed, but violates a graph invariant.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A JSON snapshot could not be decoded or encoded.
    #[error("json snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value cannot be written to a text snapshot without changing on reload.
    #[error("text snapshot cannot hold {field} {value:?}: {reason}")]
    Unrepresentable {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The snapshot file could not be read or written.
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { .. } | Self::Json(_) => ErrorCode::SnapshotParseError,
            Self::Rejected { source, .. } | Self::Graph(source) => source.code(),
            Self::Io { .. } => ErrorCode::SnapshotIoFailed,
            Self::Unrepresentable { .. } => ErrorCode::SnapshotUnrepresentable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, FormatError, GraphError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::UnknownSite,
            ErrorCode::LinkNotFound,
            ErrorCode::DuplicateId,
            ErrorCode::DuplicateLink,
            ErrorCode::NotDirected,
            ErrorCode::InvalidDistance,
            ErrorCode::NoRoute,
            ErrorCode::SnapshotParseError,
            ErrorCode::SnapshotIoFailed,
            ErrorCode::SnapshotUnrepresentable,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::NotDirected.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn graph_errors_map_to_codes() {
        assert_eq!(
            GraphError::UnknownSite("x".into()).code(),
            ErrorCode::UnknownSite
        );
        assert_eq!(GraphError::no_route("a", "b").code(), ErrorCode::NoRoute);
        assert_eq!(
            GraphError::duplicate_link("a", "b").to_string(),
            "duplicate link: 'a' -> 'b'"
        );
    }

    #[test]
    fn format_error_forwards_graph_code() {
        let err = FormatError::from(GraphError::DuplicateId("a".into()));
        assert_eq!(err.code(), ErrorCode::DuplicateId);
        assert_eq!(err.to_string(), "duplicate site ID: 'a'");

        let err = FormatError::Rejected {
            line: 3,
            source: GraphError::UnknownSite("z".into()),
        };
        assert_eq!(err.code(), ErrorCode::UnknownSite);
        assert_eq!(err.to_string(), "line 3: unknown site: 'z'");

        let err = FormatError::parse(7, "missing distance");
        assert_eq!(err.code(), ErrorCode::SnapshotParseError);
        assert_eq!(err.to_string(), "line 7: missing distance");
    }
}
