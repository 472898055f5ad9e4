use std::collections::BTreeMap;

use serde::Serialize;

/// Two related items, `earlier` positioned before `later` in the swept sequence.
///
/// Not commutative: `(a, b)` and `(b, a)` are different relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationPair<T> {
    pub earlier: T,
    pub later: T,
}

impl<T> RelationPair<T> {
    pub fn new(earlier: T, later: T) -> Self {
        Self { earlier, later }
    }
}

impl<T: Clone> RelationPair<&T> {
    /// Detach the pair from the sequence it was found in
    pub fn cloned(&self) -> RelationPair<T> {
        RelationPair {
            earlier: self.earlier.clone(),
            later: self.later.clone(),
        }
    }
}

/// Count of relations between one ordered pair of keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationEdge<K> {
    /// Key of the earlier item
    pub key1: K,
    /// Key of the later item
    pub key2: K,
    pub count: u64,
}

/// Relation edges keyed by their ordered `(key1, key2)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationCounts<K: Ord> {
    edges: BTreeMap<(K, K), RelationEdge<K>>,
}

impl<K: Ord + Clone> RelationCounts<K> {
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Count one more relation from `key1` to `key2`
    pub fn increment(&mut self, key1: K, key2: K) {
        self.edges
            .entry((key1.clone(), key2.clone()))
            .or_insert(RelationEdge {
                key1,
                key2,
                count: 0,
            })
            .count += 1;
    }

    /// The edge for an ordered key pair, if any relation was counted
    pub fn get(&self, key1: &K, key2: &K) -> Option<&RelationEdge<K>> {
        self.edges.get(&(key1.clone(), key2.clone()))
    }

    /// Count for an ordered key pair, 0 when absent
    pub fn count(&self, key1: &K, key2: &K) -> u64 {
        self.get(key1, key2).map(|e| e.count).unwrap_or(0)
    }

    /// All edges ordered by `(key1, key2)`
    pub fn edges(&self) -> impl Iterator<Item = &RelationEdge<K>> {
        self.edges.values()
    }

    /// Sum of all edge counts
    pub fn total(&self) -> u64 {
        self.edges.values().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn into_edges(self) -> Vec<RelationEdge<K>> {
        self.edges.into_values().collect()
    }
}

impl<K: Ord + Clone> Default for RelationCounts<K> {
    fn default() -> Self {
        Self::new()
    }
}
