//! Links ("routes"): weighted, directed edges between sites.
//!
//! A logically-undirected connection is stored as two [`Link`] records,
//! `(a, b)` and `(b, a)`, each with `directed == false`. The graph store keeps
//! the pair symmetric; a single record never represents both directions.

use serde::{Deserialize, Serialize};

/// A directed edge `from → to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
    /// Non-negative traversal cost.
    pub distance: f64,
    /// Per-link direction intent. `false` means this record is one half of an
    /// undirected connection.
    #[serde(default)]
    pub directed: bool,
    /// Soft delete: obstructed links stay stored but are ignored by every
    /// algorithm.
    #[serde(default)]
    pub obstructed: bool,
}

impl Link {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, distance: f64, directed: bool) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            distance,
            directed,
            obstructed: false,
        }
    }

    /// `true` if this link connects exactly `from → to`.
    #[must_use]
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }

    /// `true` if `other` is this link's reverse pair.
    #[must_use]
    pub fn is_reverse_of(&self, other: &Self) -> bool {
        self.from == other.to && self.to == other.from
    }

    /// `true` if `other` is a faithful mirror: reverse pair, same distance,
    /// same obstruction, both undirected.
    #[must_use]
    pub fn is_mirror_of(&self, other: &Self) -> bool {
        self.is_reverse_of(other)
            && !self.directed
            && !other.directed
            && self.obstructed == other.obstructed
            && self.distance.total_cmp(&other.distance).is_eq()
    }

    /// A copy of this link running the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            distance: self.distance,
            directed: self.directed,
            obstructed: self.obstructed,
        }
    }

    /// `true` unless the link is obstructed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.obstructed
    }

    /// The endpoint opposite `site`, if `site` is one of the endpoints.
    #[must_use]
    pub fn other_end(&self, site: &str) -> Option<&str> {
        if self.from == site {
            Some(&self.to)
        } else if self.to == site {
            Some(&self.from)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_preserves_attributes() {
        let mut link = Link::new("a", "b", 4.5, true);
        link.obstructed = true;
        let rev = link.reversed();
        assert!(rev.connects("b", "a"));
        assert!((rev.distance - 4.5).abs() < f64::EPSILON);
        assert!(rev.directed);
        assert!(rev.obstructed);
    }

    #[test]
    fn mirror_requires_matching_state() {
        let ab = Link::new("a", "b", 2.0, false);
        let mut ba = ab.reversed();
        assert!(ab.is_mirror_of(&ba));

        ba.obstructed = true;
        assert!(!ab.is_mirror_of(&ba));
        assert!(ab.is_reverse_of(&ba));

        let directed = Link::new("b", "a", 2.0, true);
        assert!(!ab.is_mirror_of(&directed));
    }

    #[test]
    fn other_end_lookup() {
        let link = Link::new("a", "b", 1.0, false);
        assert_eq!(link.other_end("a"), Some("b"));
        assert_eq!(link.other_end("b"), Some("a"));
        assert_eq!(link.other_end("c"), None);
    }
}
