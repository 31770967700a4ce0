//! Disjoint-set forest with path compression and union by rank.
//!
//! Keys are registered with [`UnionFind::make_set`] and mapped to dense
//! indices; the forest itself is two parallel vectors. Queries on keys that
//! were never registered return `None` / `false` rather than panicking.

use std::collections::HashMap;
use std::hash::Hash;

/// Disjoint sets over arbitrary hashable keys.
#[derive(Debug, Clone)]
pub struct UnionFind<K> {
    index: HashMap<K, usize>,
    keys: Vec<K>,
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl<K> Default for UnionFind<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
            parent: Vec::new(),
            rank: Vec::new(),
            components: 0,
        }
    }
}

impl<K: Hash + Eq + Clone> UnionFind<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest with every key of `keys` as a singleton.
    #[must_use]
    pub fn from_keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut sets = Self::new();
        for key in keys {
            sets.make_set(key);
        }
        sets
    }

    /// Register `key` as a singleton set. Re-registering is a no-op.
    pub fn make_set(&mut self, key: K) {
        if self.index.contains_key(&key) {
            return;
        }
        let idx = self.keys.len();
        self.index.insert(key.clone(), idx);
        self.keys.push(key);
        self.parent.push(idx);
        self.rank.push(0);
        self.components += 1;
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of disjoint sets.
    #[must_use]
    pub const fn component_count(&self) -> usize {
        self.components
    }

    /// Representative of the set containing `key`.
    ///
    /// Every node on the walked path is re-pointed at the root.
    pub fn find(&mut self, key: &K) -> Option<K> {
        let idx = *self.index.get(key)?;
        let root = self.find_index(idx);
        Some(self.keys[root].clone())
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// Returns `true` if two distinct sets were merged, `false` if they were
    /// already one set or either key is unregistered.
    pub fn union(&mut self, a: &K, b: &K) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };

        let mut left = self.find_index(a);
        let mut right = self.find_index(b);
        if left == right {
            return false;
        }

        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
        self.components -= 1;
        true
    }

    /// `true` if both keys are registered and in the same set.
    pub fn connected(&mut self, a: &K, b: &K) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a), Some(&b)) => self.find_index(a) == self.find_index(b),
            _ => false,
        }
    }

    /// All sets, each listing its members in registration order. Sets are
    /// ordered by their first-registered member.
    pub fn groups(&mut self) -> Vec<Vec<K>> {
        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<K>> = Vec::new();

        for idx in 0..self.keys.len() {
            let root = self.find_index(idx);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(self.keys[idx].clone());
        }
        groups
    }

    fn find_index(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_are_disjoint() {
        let mut sets = UnionFind::from_keys(["a", "b", "c"]);
        assert_eq!(sets.len(), 3);
        assert_eq!(sets.component_count(), 3);
        assert!(!sets.connected(&"a", &"b"));
        assert_eq!(sets.find(&"b"), Some("b"));
    }

    #[test]
    fn union_joins_and_reports_change() {
        let mut sets = UnionFind::from_keys(["a", "b", "c"]);
        assert!(sets.union(&"a", &"b"));
        assert!(!sets.union(&"b", &"a"));
        assert!(sets.connected(&"a", &"b"));
        assert!(!sets.connected(&"a", &"c"));
        assert_eq!(sets.component_count(), 2);
    }

    #[test]
    fn union_is_transitive() {
        let mut sets = UnionFind::from_keys(0..6);
        sets.union(&0, &1);
        sets.union(&2, &3);
        sets.union(&1, &3);
        assert!(sets.connected(&0, &2));
        assert_eq!(sets.find(&0), sets.find(&3));
        assert_eq!(sets.component_count(), 3);
    }

    #[test]
    fn equal_ranks_grow_surviving_root() {
        let mut sets = UnionFind::from_keys(["a", "b", "c", "d"]);
        sets.union(&"a", &"b");
        sets.union(&"c", &"d");
        sets.union(&"a", &"c");

        let root = sets.find(&"d").expect("registered");
        let idx = sets.index[&root];
        assert_eq!(sets.rank[idx], 2);
    }

    #[test]
    fn find_compresses_paths() {
        let mut sets = UnionFind::from_keys(0..4);
        // Force a chain by hand: 3 -> 2 -> 1 -> 0.
        sets.parent = vec![0, 0, 1, 2];
        assert_eq!(sets.find(&3), Some(0));
        assert_eq!(sets.parent, vec![0, 0, 0, 0]);
    }

    #[test]
    fn make_set_twice_is_noop() {
        let mut sets = UnionFind::from_keys(["a", "b"]);
        sets.union(&"a", &"b");
        sets.make_set("a");
        assert_eq!(sets.len(), 2);
        assert_eq!(sets.component_count(), 1);
    }

    #[test]
    fn unknown_keys_are_not_fatal() {
        let mut sets = UnionFind::from_keys(["a"]);
        assert_eq!(sets.find(&"z"), None);
        assert!(!sets.union(&"a", &"z"));
        assert!(!sets.connected(&"z", &"z"));
        assert!(!sets.contains(&"z"));
    }

    #[test]
    fn groups_follow_registration_order() {
        let mut sets = UnionFind::from_keys(["a", "b", "c", "d"]);
        sets.union(&"d", &"b");
        assert_eq!(sets.groups(), vec![vec!["a"], vec!["b", "d"], vec!["c"]]);
        assert!(UnionFind::<u8>::new().groups().is_empty());
    }
}
