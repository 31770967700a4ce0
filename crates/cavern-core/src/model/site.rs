//! Sites ("caves"): the nodes of the network.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A node in the cave network.
///
/// Identity is the `id` field; the graph store rejects a second site with the
/// same ID. Everything else is freely mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique key within a graph.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Planar X coordinate.
    pub x: f64,
    /// Planar Y coordinate.
    pub y: f64,
    /// Resource inventory: resource name → quantity. No ordering guarantee.
    #[serde(default)]
    pub resources: HashMap<String, i64>,
}

impl Site {
    /// Create a site with an empty resource inventory.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x,
            y,
            resources: HashMap::new(),
        }
    }

    /// Add `quantity` of a resource, accumulating onto any existing amount.
    ///
    /// Returns the new quantity.
    pub fn add_resource(&mut self, resource: impl Into<String>, quantity: i64) -> i64 {
        let entry = self.resources.entry(resource.into()).or_insert(0);
        *entry = entry.saturating_add(quantity);
        *entry
    }

    /// Remove a resource entirely, returning the quantity it held.
    pub fn remove_resource(&mut self, resource: &str) -> Option<i64> {
        self.resources.remove(resource)
    }

    /// Quantity held for `resource`, or zero.
    #[must_use]
    pub fn resource(&self, resource: &str) -> i64 {
        self.resources.get(resource).copied().unwrap_or(0)
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Straight-line distance to another site's coordinates.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
