//! Reader/writer handle for a graph shared across threads.
//!
//! Algorithms take a shared lock for the whole computation; mutations take
//! the exclusive lock. Nothing here performs I/O, so no lock is ever held
//! across a blocking call.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::graph::Graph;

/// A cloneable, thread-safe handle to one [`Graph`].
///
/// Cloning the handle shares the graph. [`SharedGraph::replace`] swaps the
/// whole graph in place, so every holder sees the reload.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<Graph>>,
}

impl SharedGraph {
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Run `f` under the shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
        f(&self.read_guard())
    }

    /// Run `f` under the exclusive lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        f(&mut self.write_guard())
    }

    /// Replace the whole graph, returning the previous one.
    pub fn replace(&self, graph: Graph) -> Graph {
        std::mem::replace(&mut *self.write_guard(), graph)
    }

    /// Clone the current graph out of the lock.
    #[must_use]
    pub fn snapshot(&self) -> Graph {
        self.read(Graph::clone)
    }

    // Mutations validate before writing, so a panic inside a closure cannot
    // leave a half-applied change behind. Poisoning is safe to clear.
    fn read_guard(&self) -> RwLockReadGuard<'_, Graph> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("graph lock poisoned; recovering for read");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Graph> {
        self.inner.write().unwrap_or_else(|poisoned| {
            warn!("graph lock poisoned; recovering for write");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl From<Graph> for SharedGraph {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_one_graph() {
        let shared = SharedGraph::new(Graph::undirected());
        let other = shared.clone();

        shared
            .write(|g| g.add_site("a", "A", 0.0, 0.0))
            .expect("add site");

        assert!(other.read(|g| g.contains_site("a")));
    }

    #[test]
    fn replace_swaps_whole_graph() {
        let shared = SharedGraph::new(Graph::undirected());
        let mut next = Graph::directed();
        next.add_site("z", "Z", 0.0, 0.0).expect("add site");

        let previous = shared.replace(next);

        assert!(!previous.is_directed());
        assert!(shared.read(Graph::is_directed));
        assert_eq!(shared.snapshot().site_count(), 1);
    }

    #[test]
    fn concurrent_readers_and_writer() {
        let shared = SharedGraph::new(Graph::undirected());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .write(|g| g.add_site(format!("s{i}"), "S", 0.0, 0.0))
                        .expect("unique id");
                    shared.read(Graph::site_count)
                })
            })
            .collect();

        for handle in handles {
            let seen = handle.join().expect("thread");
            assert!((1..=4).contains(&seen));
        }
        assert_eq!(shared.read(Graph::site_count), 4);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let shared = SharedGraph::new(Graph::undirected());
        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            poisoner.write::<()>(|_| panic!("boom"));
        })
        .join();

        shared
            .write(|g| g.add_site("a", "A", 0.0, 0.0))
            .expect("write after poison");
        assert_eq!(shared.read(Graph::site_count), 1);
    }
}
