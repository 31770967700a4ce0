//! The mutable graph store.
//!
//! # Overview
//!
//! [`Graph`] owns the sites (keyed by ID) and the link list, and is the only
//! place the network is ever mutated. Algorithms in `cavern-engine` take a
//! `&Graph` per call and never hold on to it.
//!
//! ## Undirected Graphs
//!
//! An undirected connection is two [`Link`] records, `(a, b)` and `(b, a)`,
//! both with `directed == false`. In a graph whose type is undirected, every
//! mutation that touches one half of such a pair (insert, remove, obstruct,
//! distance change) applies the same change to the other half. Links added
//! with `directed == true` are never mirrored, whatever the graph type.
//!
//! ## Obstruction
//!
//! Obstruction is a soft delete. The record stays in the list (keeping its
//! position, distance and direction) and every read path that feeds an
//! algorithm skips it.
//!
//! ## Atomicity
//!
//! Every mutation validates first and writes second. An `Err` return means the
//! graph is exactly as it was before the call.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::error::GraphError;
use crate::model::{Link, Site};

// ---------------------------------------------------------------------------
// RetypeReport
// ---------------------------------------------------------------------------

/// Summary of the reconciliation pass performed by [`Graph::retype`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RetypeReport {
    /// Mirror links inserted (directed → undirected).
    pub added: usize,
    /// Redundant mirror links dropped (undirected → directed).
    pub removed: usize,
    /// Existing reverse links whose distance/obstruction were aligned with
    /// their earlier partner (directed → undirected).
    pub synchronized: usize,
}

impl RetypeReport {
    /// `true` if the pass changed nothing but the type flag (or not even that).
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.synchronized == 0
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A cave network: sites, links, and the declared graph type.
///
/// Sites iterate in ascending ID order and links in insertion order, so every
/// algorithm run over the same graph produces the same result.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    sites: BTreeMap<String, Site>,
    links: Vec<Link>,
    directed: bool,
}

impl Default for Graph {
    fn default() -> Self {
        Self::undirected()
    }
}

impl Graph {
    /// Create an empty graph of the given type.
    #[must_use]
    pub const fn new(directed: bool) -> Self {
        Self {
            sites: BTreeMap::new(),
            links: Vec::new(),
            directed,
        }
    }

    /// Create an empty directed graph.
    #[must_use]
    pub const fn directed() -> Self {
        Self::new(true)
    }

    /// Create an empty undirected graph.
    #[must_use]
    pub const fn undirected() -> Self {
        Self::new(false)
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The declared graph type.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Number of stored links, obstructed ones included.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    #[must_use]
    pub fn contains_site(&self, id: &str) -> bool {
        self.sites.contains_key(id)
    }

    #[must_use]
    pub fn site(&self, id: &str) -> Option<&Site> {
        self.sites.get(id)
    }

    /// Mutable access to a site's name, coordinates and resources.
    ///
    /// The ID must not be changed through this reference.
    pub fn site_mut(&mut self, id: &str) -> Option<&mut Site> {
        self.sites.get_mut(id)
    }

    /// All sites in ascending ID order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    /// All site IDs in ascending order.
    pub fn site_ids(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    /// Every stored link, obstructed ones included, in insertion order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Non-obstructed links in insertion order.
    pub fn active_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.is_active())
    }

    /// Obstructed links in insertion order.
    pub fn obstructed_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.obstructed)
    }

    /// Look up the link with exactly this ordered pair.
    #[must_use]
    pub fn link(&self, from: &str, to: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.connects(from, to))
    }

    #[must_use]
    pub fn contains_link(&self, from: &str, to: &str) -> bool {
        self.position(from, to).is_some()
    }

    /// Sites reachable in one step from `id` over non-obstructed links.
    ///
    /// Follows outgoing links; in an undirected graph incoming links are
    /// followed too. Each neighbor appears once, in link-list order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSite`] if `id` is not in the graph.
    pub fn neighbors(&self, id: &str) -> Result<Vec<&str>, GraphError> {
        self.require_site(id)?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for link in self.active_links() {
            let next = if link.from == id {
                Some(link.to.as_str())
            } else if !self.directed && link.to == id {
                Some(link.from.as_str())
            } else {
                None
            };
            if let Some(next) = next
                && seen.insert(next)
            {
                out.push(next);
            }
        }
        Ok(out)
    }

    /// Count of non-obstructed links leaving `id`.
    #[must_use]
    pub fn out_degree(&self, id: &str) -> usize {
        self.active_links().filter(|link| link.from == id).count()
    }

    /// Count of non-obstructed links entering `id`.
    #[must_use]
    pub fn in_degree(&self, id: &str) -> usize {
        self.active_links().filter(|link| link.to == id).count()
    }

    /// Undirected links whose mirror record is missing or out of sync.
    ///
    /// Always empty for a directed graph. A non-empty result means an invariant
    /// was broken, which the mutation API never does on its own.
    #[must_use]
    pub fn asymmetric_links(&self) -> Vec<&Link> {
        if self.directed {
            return Vec::new();
        }
        self.links
            .iter()
            .filter(|link| !link.directed && link.from != link.to)
            .filter(|link| !self.links.iter().any(|other| link.is_mirror_of(other)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Sites
    // -----------------------------------------------------------------------

    /// Add a site with an empty resource inventory.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateId`] if a site with `id` already exists.
    pub fn add_site(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        x: f64,
        y: f64,
    ) -> Result<(), GraphError> {
        self.insert_site(Site::new(id, name, x, y))
    }

    /// Add a fully-built site (resources included).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateId`] if a site with the same ID exists.
    pub fn insert_site(&mut self, site: Site) -> Result<(), GraphError> {
        if self.sites.contains_key(&site.id) {
            return Err(GraphError::DuplicateId(site.id));
        }
        debug!(site = %site.id, "add site");
        self.sites.insert(site.id.clone(), site);
        Ok(())
    }

    /// Remove a site and every link touching it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSite`] if `id` is not in the graph.
    pub fn remove_site(&mut self, id: &str) -> Result<Site, GraphError> {
        let site = self
            .sites
            .remove(id)
            .ok_or_else(|| GraphError::UnknownSite(id.to_string()))?;

        let before = self.links.len();
        self.links.retain(|link| link.from != id && link.to != id);
        debug!(site = %id, dropped_links = before - self.links.len(), "remove site");
        Ok(site)
    }

    // -----------------------------------------------------------------------
    // Links
    // -----------------------------------------------------------------------

    /// Add a link `from → to`.
    ///
    /// In an undirected graph, an undirected link (`directed == false`) is
    /// inserted together with its mirror `to → from`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidDistance`] for negative or non-finite distances.
    /// - [`GraphError::UnknownSite`] if either endpoint is missing.
    /// - [`GraphError::DuplicateLink`] if the ordered pair exists, or if the
    ///   mirror pair that would be inserted already exists.
    pub fn add_link(
        &mut self,
        from: &str,
        to: &str,
        distance: f64,
        directed: bool,
    ) -> Result<(), GraphError> {
        self.insert_link(Link::new(from, to, distance, directed))
    }

    /// Add a fully-built link, honouring its obstruction flag.
    ///
    /// Same validation and mirroring as [`Graph::add_link`]; the mirror
    /// inherits the obstruction state.
    ///
    /// # Errors
    ///
    /// See [`Graph::add_link`].
    pub fn insert_link(&mut self, link: Link) -> Result<(), GraphError> {
        validate_distance(&link.from, &link.to, link.distance)?;
        self.require_site(&link.from)?;
        self.require_site(&link.to)?;
        if self.contains_link(&link.from, &link.to) {
            return Err(GraphError::duplicate_link(&link.from, &link.to));
        }

        let mirrored = self.mirrors(&link) && link.from != link.to;
        if mirrored && self.contains_link(&link.to, &link.from) {
            return Err(GraphError::duplicate_link(&link.to, &link.from));
        }

        debug!(
            from = %link.from,
            to = %link.to,
            distance = link.distance,
            directed = link.directed,
            mirrored,
            "add link"
        );

        let mirror = mirrored.then(|| link.reversed());
        self.links.push(link);
        if let Some(mirror) = mirror {
            self.links.push(mirror);
        }
        Ok(())
    }

    /// Remove the link `from → to` (and its mirror in an undirected graph).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::LinkNotFound`] if no such ordered pair exists.
    pub fn remove_link(&mut self, from: &str, to: &str) -> Result<Link, GraphError> {
        let idx = self.require_link(from, to)?;
        let removed = self.links.remove(idx);

        if self.mirrors(&removed)
            && let Some(mirror) = self.mirror_position(&removed)
        {
            self.links.remove(mirror);
        }
        debug!(from = %from, to = %to, "remove link");
        Ok(removed)
    }

    /// Set the obstruction flag of `from → to` (and its mirror).
    ///
    /// Setting the same value twice leaves the graph unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::LinkNotFound`] if no such ordered pair exists.
    pub fn set_obstructed(&mut self, from: &str, to: &str, value: bool) -> Result<(), GraphError> {
        let idx = self.require_link(from, to)?;
        let mirror = self.mirror_of_index(idx);

        self.links[idx].obstructed = value;
        if let Some(mirror) = mirror {
            self.links[mirror].obstructed = value;
        }
        debug!(from = %from, to = %to, obstructed = value, "set obstruction");
        Ok(())
    }

    /// Batch form of [`Graph::set_obstructed`].
    ///
    /// Every pair is attempted; the returned list holds one error per pair that
    /// failed, in input order. Successful pairs are applied regardless.
    pub fn set_obstructed_many<'a, I>(&mut self, pairs: I, value: bool) -> Vec<GraphError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .filter_map(|(from, to)| self.set_obstructed(from, to, value).err())
            .collect()
    }

    /// Change the distance of `from → to` (and its mirror).
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidDistance`] for negative or non-finite distances.
    /// - [`GraphError::LinkNotFound`] if no such ordered pair exists.
    pub fn set_distance(&mut self, from: &str, to: &str, distance: f64) -> Result<(), GraphError> {
        validate_distance(from, to, distance)?;
        let idx = self.require_link(from, to)?;
        let mirror = self.mirror_of_index(idx);

        self.links[idx].distance = distance;
        if let Some(mirror) = mirror {
            self.links[mirror].distance = distance;
        }
        debug!(from = %from, to = %to, distance, "set distance");
        Ok(())
    }

    /// Replace the directed link `from → to` with `to → from`, in place.
    ///
    /// Distance, obstruction and list position are preserved.
    ///
    /// # Errors
    ///
    /// - [`GraphError::LinkNotFound`] if no such ordered pair exists.
    /// - [`GraphError::NotDirected`] if the link is one half of an undirected
    ///   connection.
    /// - [`GraphError::DuplicateLink`] if `to → from` already exists.
    pub fn reverse_link(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        let idx = self.require_link(from, to)?;
        if !self.links[idx].directed {
            return Err(GraphError::NotDirected {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if from == to {
            return Ok(());
        }
        if self.contains_link(to, from) {
            return Err(GraphError::duplicate_link(to, from));
        }

        self.links[idx] = self.links[idx].reversed();
        debug!(from = %from, to = %to, "reverse link");
        Ok(())
    }

    /// Switch the declared graph type and reconcile the link list.
    ///
    /// - Already of that type: no-op.
    /// - To undirected: every link becomes undirected; each link without a
    ///   reverse record gets a mirror with identical distance and obstruction;
    ///   an existing reverse record is aligned with the earlier of the two.
    /// - To directed: of each undirected mirror pair only the earlier record
    ///   survives; every remaining link becomes directed.
    pub fn retype(&mut self, directed: bool) -> RetypeReport {
        if self.directed == directed {
            return RetypeReport::default();
        }

        let report = if directed {
            self.reconcile_to_directed()
        } else {
            self.reconcile_to_undirected()
        };
        self.directed = directed;

        debug!(
            directed,
            added = report.added,
            removed = report.removed,
            synchronized = report.synchronized,
            "retype graph"
        );
        report
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn reconcile_to_directed(&mut self) -> RetypeReport {
        let mut kept: HashSet<(String, String)> = HashSet::new();
        let mut removed = 0;

        self.links.retain(|link| {
            if link.directed || link.from == link.to {
                return true;
            }
            if kept.contains(&(link.to.clone(), link.from.clone())) {
                removed += 1;
                return false;
            }
            kept.insert((link.from.clone(), link.to.clone()));
            true
        });

        for link in &mut self.links {
            link.directed = true;
        }

        RetypeReport {
            removed,
            ..RetypeReport::default()
        }
    }

    fn reconcile_to_undirected(&mut self) -> RetypeReport {
        let mut report = RetypeReport::default();
        let original = self.links.len();

        for link in &mut self.links {
            link.directed = false;
        }

        for idx in 0..original {
            if self.links[idx].from == self.links[idx].to {
                continue;
            }
            match self.mirror_position(&self.links[idx]) {
                Some(other) if other > idx => {
                    let (distance, obstructed) =
                        (self.links[idx].distance, self.links[idx].obstructed);
                    let partner = &mut self.links[other];
                    if partner.obstructed != obstructed
                        || partner.distance.total_cmp(&distance).is_ne()
                    {
                        partner.distance = distance;
                        partner.obstructed = obstructed;
                        report.synchronized += 1;
                    }
                }
                Some(_) => {}
                None => {
                    let mirror = self.links[idx].reversed();
                    self.links.push(mirror);
                    report.added += 1;
                }
            }
        }
        report
    }

    /// `true` if `link` is (or would be) mirrored in this graph.
    const fn mirrors(&self, link: &Link) -> bool {
        !self.directed && !link.directed
    }

    fn position(&self, from: &str, to: &str) -> Option<usize> {
        self.links.iter().position(|link| link.connects(from, to))
    }

    fn mirror_position(&self, link: &Link) -> Option<usize> {
        self.links
            .iter()
            .position(|other| other.is_reverse_of(link) && !other.directed)
    }

    /// Index of the mirror that must follow changes to `links[idx]`.
    fn mirror_of_index(&self, idx: usize) -> Option<usize> {
        let link = &self.links[idx];
        if !self.mirrors(link) || link.from == link.to {
            return None;
        }
        self.mirror_position(link)
    }

    fn require_site(&self, id: &str) -> Result<(), GraphError> {
        if self.sites.contains_key(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownSite(id.to_string()))
        }
    }

    fn require_link(&self, from: &str, to: &str) -> Result<usize, GraphError> {
        self.position(from, to)
            .ok_or_else(|| GraphError::link_not_found(from, to))
    }
}

fn validate_distance(from: &str, to: &str, distance: f64) -> Result<(), GraphError> {
    if distance.is_finite() && distance >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidDistance {
            from: from.to_string(),
            to: to.to_string(),
            distance: distance.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
