//! Join indexes keyed by joiner keys.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::ops::Bound;

use smallvec::SmallVec;

use super::TupleId;
use crate::stream::joiner::JoinRelation;

type Bucket = SmallVec<[TupleId; 4]>;

#[derive(Debug, Clone)]
enum Storage<K> {
    Hashed(HashMap<K, Bucket>),
    Ordered(BTreeMap<K, Bucket>),
    Overlap(BTreeMap<K, Bucket>),
    Scan(Vec<TupleId>),
}

/// Which side of a join the index holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Index over one side of a join.
///
/// A lookup returns a superset of the matching ids only for overlap keys; for
/// every other relation the candidates satisfy the relation exactly. Callers
/// always re-check candidates with the joiner's full predicate.
#[derive(Debug, Clone)]
pub struct JoinIndex<K> {
    relation: JoinRelation,
    side: Side,
    storage: Storage<K>,
}

fn remove_from(bucket: &mut Bucket, id: TupleId) -> bool {
    if let Some(pos) = bucket.iter().position(|&x| x == id) {
        bucket.swap_remove(pos);
        true
    } else {
        false
    }
}

impl<K> JoinIndex<K>
where
    K: Clone + Eq + Hash + Ord,
{
    pub fn new(relation: JoinRelation, side: Side) -> Self {
        let storage = match relation {
            JoinRelation::Equal => Storage::Hashed(HashMap::new()),
            JoinRelation::LessThan
            | JoinRelation::LessThanOrEqual
            | JoinRelation::GreaterThan
            | JoinRelation::GreaterThanOrEqual => Storage::Ordered(BTreeMap::new()),
            JoinRelation::Overlapping => Storage::Overlap(BTreeMap::new()),
            JoinRelation::Unindexed => Storage::Scan(Vec::new()),
        };
        Self {
            relation,
            side,
            storage,
        }
    }

    pub fn insert(&mut self, key: K, id: TupleId) {
        match &mut self.storage {
            Storage::Hashed(map) => map.entry(key).or_default().push(id),
            Storage::Ordered(map) | Storage::Overlap(map) => map.entry(key).or_default().push(id),
            Storage::Scan(ids) => ids.push(id),
        }
    }

    pub fn remove(&mut self, key: &K, id: TupleId) -> bool {
        match &mut self.storage {
            Storage::Hashed(map) => {
                let Some(bucket) = map.get_mut(key) else {
                    return false;
                };
                let removed = remove_from(bucket, id);
                if bucket.is_empty() {
                    map.remove(key);
                }
                removed
            }
            Storage::Ordered(map) | Storage::Overlap(map) => {
                let Some(bucket) = map.get_mut(key) else {
                    return false;
                };
                let removed = remove_from(bucket, id);
                if bucket.is_empty() {
                    map.remove(key);
                }
                removed
            }
            Storage::Scan(ids) => match ids.iter().position(|&x| x == id) {
                Some(pos) => {
                    ids.swap_remove(pos);
                    true
                }
                None => false,
            },
        }
    }

    /// Collects ids whose key stands in the join relation with `key`, a key
    /// taken from the opposite side.
    ///
    /// For overlap indexes `upper` is an exclusive bound on stored keys (see
    /// [`Joiner::overlap_bound`](crate::stream::joiner::Joiner::overlap_bound)).
    pub fn lookup(&self, key: &K, upper: Option<&K>, out: &mut Vec<TupleId>) {
        match &self.storage {
            Storage::Hashed(map) => {
                if let Some(bucket) = map.get(key) {
                    out.extend(bucket.iter().copied());
                }
            }
            Storage::Ordered(map) => {
                let range = self.ordered_bounds(key);
                for bucket in map.range::<K, _>(range).map(|(_, b)| b) {
                    out.extend(bucket.iter().copied());
                }
            }
            Storage::Overlap(map) => {
                // Keys are stored in start order; only intervals starting
                // before the looked-up interval ends can overlap it.
                let range = match upper {
                    Some(limit) => (Bound::Unbounded, Bound::Excluded(limit)),
                    None => (Bound::Unbounded, Bound::Unbounded),
                };
                for bucket in map.range::<K, _>(range).map(|(_, b)| b) {
                    out.extend(bucket.iter().copied());
                }
            }
            Storage::Scan(ids) => out.extend(ids.iter().copied()),
        }
    }

    /// Range of stored keys `k` satisfying the relation between the two sides.
    ///
    /// Relations are written left-to-right: `LessThan` means `left < right`.
    fn ordered_bounds<'a>(&self, key: &'a K) -> (Bound<&'a K>, Bound<&'a K>) {
        use Bound::{Excluded, Included, Unbounded};
        match (self.relation, self.side) {
            // Stored keys are right keys; the looked-up key is a left key.
            (JoinRelation::LessThan, Side::Right) => (Excluded(key), Unbounded),
            (JoinRelation::LessThanOrEqual, Side::Right) => (Included(key), Unbounded),
            (JoinRelation::GreaterThan, Side::Right) => (Unbounded, Excluded(key)),
            (JoinRelation::GreaterThanOrEqual, Side::Right) => (Unbounded, Included(key)),
            // Stored keys are left keys; the looked-up key is a right key.
            (JoinRelation::LessThan, Side::Left) => (Unbounded, Excluded(key)),
            (JoinRelation::LessThanOrEqual, Side::Left) => (Unbounded, Included(key)),
            (JoinRelation::GreaterThan, Side::Left) => (Excluded(key), Unbounded),
            (JoinRelation::GreaterThanOrEqual, Side::Left) => (Included(key), Unbounded),
            _ => (Included(key), Included(key)),
        }
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Hashed(map) => map.values().map(|b| b.len()).sum(),
            Storage::Ordered(map) | Storage::Overlap(map) => map.values().map(|b| b.len()).sum(),
            Storage::Scan(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match &mut self.storage {
            Storage::Hashed(map) => map.clear(),
            Storage::Ordered(map) | Storage::Overlap(map) => map.clear(),
            Storage::Scan(ids) => ids.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches<K: Clone + Eq + Hash + Ord>(index: &JoinIndex<K>, key: K) -> Vec<TupleId> {
        let mut out = Vec::new();
        index.lookup(&key, None, &mut out);
        out.sort_unstable();
        out
    }

    #[test]
    fn test_equal_index() {
        let mut index = JoinIndex::new(JoinRelation::Equal, Side::Right);
        index.insert(1, 10);
        index.insert(1, 11);
        index.insert(2, 12);
        assert_eq!(matches(&index, 1), vec![10, 11]);
        assert!(index.remove(&1, 10));
        assert!(!index.remove(&1, 10));
        assert_eq!(matches(&index, 1), vec![11]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_less_than_right_side() {
        // left < right: looking up a left key finds larger right keys.
        let mut index = JoinIndex::new(JoinRelation::LessThan, Side::Right);
        for (id, key) in [(0, 1), (1, 5), (2, 9)] {
            index.insert(key, id);
        }
        assert_eq!(matches(&index, 5), vec![2]);
        assert_eq!(matches(&index, 0), vec![0, 1, 2]);
    }

    #[test]
    fn test_less_than_left_side() {
        // left < right: looking up a right key finds smaller left keys.
        let mut index = JoinIndex::new(JoinRelation::LessThan, Side::Left);
        for (id, key) in [(0, 1), (1, 5), (2, 9)] {
            index.insert(key, id);
        }
        assert_eq!(matches(&index, 5), vec![0]);
        assert_eq!(matches(&index, 10), vec![0, 1, 2]);
    }

    #[test]
    fn test_greater_than_or_equal() {
        let mut index = JoinIndex::new(JoinRelation::GreaterThanOrEqual, Side::Right);
        for (id, key) in [(0, 1), (1, 5), (2, 9)] {
            index.insert(key, id);
        }
        assert_eq!(matches(&index, 5), vec![0, 1]);
    }

    #[test]
    fn test_overlap_bound_limits_candidates() {
        let mut index = JoinIndex::new(JoinRelation::Overlapping, Side::Right);
        index.insert((0, 4), 0);
        index.insert((3, 6), 1);
        index.insert((8, 9), 2);
        let mut out = Vec::new();
        index.lookup(&(2, 5), Some(&(5, 5)), &mut out);
        out.sort_unstable();
        assert_eq!(out, vec![0, 1]);
    }

    #[test]
    fn test_scan_returns_everything() {
        let mut index: JoinIndex<()> = JoinIndex::new(JoinRelation::Unindexed, Side::Left);
        index.insert((), 3);
        index.insert((), 4);
        assert_eq!(matches(&index, ()), vec![3, 4]);
        index.clear();
        assert!(index.is_empty());
    }
}
