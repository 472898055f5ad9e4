use crate::models::{RelationCounts, RelationPair};

/// Count relations grouped by a key of each item (typically the participant).
///
/// Direction is preserved: a relation from key A to key B is counted apart
/// from one from B to A. Whether A may equal B is up to the relation that
/// produced the pairs.
pub fn count_relations<T, K, F>(relations: &[RelationPair<T>], mut key_of: F) -> RelationCounts<K>
where
    K: Ord + Clone,
    F: FnMut(&T) -> K,
{
    let mut counts = RelationCounts::new();
    for relation in relations {
        let key1 = key_of(&relation.earlier);
        let key2 = key_of(&relation.later);
        counts.increment(key1, key2);
    }
    counts
}
