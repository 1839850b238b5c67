//! Join node.

use std::collections::HashMap;
use std::hash::Hash;

use super::index::Side;
use super::{Delta, IdSequence, JoinIndex, SourceClass, SourceEvent, TupleId, TupleNode};
use crate::stream::joiner::Joiner;

/// Combines left and right tuples that satisfy a joiner.
///
/// Each side keeps a [`JoinIndex`] on its joiner key. An inserted left tuple
/// looks up the right index and emits one joined tuple per match, and vice
/// versa. A retract removes every joined tuple that shares the source. An
/// update is a retract followed by a re-insert, so joined tuples get fresh
/// ids.
///
/// For `for_each_unique_pair` both sides read the same collection and only
/// pairs with `left id < right id` are produced.
#[derive(Clone)]
pub struct JoinNode<L, R, J, A, B, K, O> {
    left: L,
    right: R,
    joiner: J,
    combine: fn(&A, &B) -> O,
    unique_pairs: bool,
    left_tuples: HashMap<TupleId, (K, A)>,
    right_tuples: HashMap<TupleId, (K, B)>,
    left_index: JoinIndex<K>,
    right_index: JoinIndex<K>,
    pairs: HashMap<(TupleId, TupleId), TupleId>,
    by_left: HashMap<TupleId, Vec<TupleId>>,
    by_right: HashMap<TupleId, Vec<TupleId>>,
    ids: IdSequence,
    candidates: Vec<TupleId>,
}

fn unlink(map: &mut HashMap<TupleId, Vec<TupleId>>, from: TupleId, to: TupleId) {
    if let Some(list) = map.get_mut(&from) {
        if let Some(pos) = list.iter().position(|&x| x == to) {
            list.swap_remove(pos);
        }
        if list.is_empty() {
            map.remove(&from);
        }
    }
}

impl<L, R, J, A, B, K, O> JoinNode<L, R, J, A, B, K, O>
where
    J: Joiner<A, B, Key = K>,
    K: Clone + Eq + Hash + Ord,
{
    pub fn new(left: L, right: R, joiner: J, combine: fn(&A, &B) -> O) -> Self {
        let relation = joiner.relation();
        Self {
            left,
            right,
            joiner,
            combine,
            unique_pairs: false,
            left_tuples: HashMap::new(),
            right_tuples: HashMap::new(),
            left_index: JoinIndex::new(relation, Side::Left),
            right_index: JoinIndex::new(relation, Side::Right),
            pairs: HashMap::new(),
            by_left: HashMap::new(),
            by_right: HashMap::new(),
            ids: IdSequence::default(),
            candidates: Vec::new(),
        }
    }

    /// Restricts output to pairs with `left id < right id`.
    pub fn unique_pairs(mut self) -> Self {
        self.unique_pairs = true;
        self
    }

    fn emit(&mut self, l: TupleId, r: TupleId, tuple: O, out: &mut Vec<Delta<O>>) {
        let id = self.ids.next();
        self.pairs.insert((l, r), id);
        self.by_left.entry(l).or_default().push(r);
        self.by_right.entry(r).or_default().push(l);
        out.push(Delta::Insert(id, tuple));
    }

    fn remove_left(&mut self, l: TupleId, out: &mut Vec<Delta<O>>) {
        let Some((key, _)) = self.left_tuples.remove(&l) else {
            return;
        };
        self.left_index.remove(&key, l);
        for r in self.by_left.remove(&l).unwrap_or_default() {
            if let Some(id) = self.pairs.remove(&(l, r)) {
                out.push(Delta::Retract(id));
            }
            unlink(&mut self.by_right, r, l);
        }
    }

    fn remove_right(&mut self, r: TupleId, out: &mut Vec<Delta<O>>) {
        let Some((key, _)) = self.right_tuples.remove(&r) else {
            return;
        };
        self.right_index.remove(&key, r);
        for l in self.by_right.remove(&r).unwrap_or_default() {
            if let Some(id) = self.pairs.remove(&(l, r)) {
                out.push(Delta::Retract(id));
            }
            unlink(&mut self.by_left, l, r);
        }
    }

    fn insert_left(&mut self, l: TupleId, a: A, out: &mut Vec<Delta<O>>) {
        let key = self.joiner.left_key(&a);
        let bound = self.joiner.overlap_bound(&key);
        let mut candidates = std::mem::take(&mut self.candidates);
        candidates.clear();
        self.right_index.lookup(&key, bound.as_ref(), &mut candidates);
        for &r in &candidates {
            if self.unique_pairs && l >= r {
                continue;
            }
            let Some((_, b)) = self.right_tuples.get(&r) else {
                continue;
            };
            if !self.joiner.matches(&a, b) {
                continue;
            }
            let tuple = (self.combine)(&a, b);
            self.emit(l, r, tuple, out);
        }
        self.candidates = candidates;
        self.left_index.insert(key.clone(), l);
        self.left_tuples.insert(l, (key, a));
    }

    fn insert_right(&mut self, r: TupleId, b: B, out: &mut Vec<Delta<O>>) {
        let key = self.joiner.right_key(&b);
        let bound = self.joiner.overlap_bound(&key);
        let mut candidates = std::mem::take(&mut self.candidates);
        candidates.clear();
        self.left_index.lookup(&key, bound.as_ref(), &mut candidates);
        for &l in &candidates {
            if self.unique_pairs && l >= r {
                continue;
            }
            let Some((_, a)) = self.left_tuples.get(&l) else {
                continue;
            };
            if !self.joiner.matches(a, &b) {
                continue;
            }
            let tuple = (self.combine)(a, &b);
            self.emit(l, r, tuple, out);
        }
        self.candidates = candidates;
        self.right_index.insert(key.clone(), r);
        self.right_tuples.insert(r, (key, b));
    }

    /// Removals on both sides first, then inserts. A pair whose tuples are
    /// both inserted in the same batch is produced exactly once, by the
    /// right-side insert.
    fn process(&mut self, left: Vec<Delta<A>>, right: Vec<Delta<B>>, out: &mut Vec<Delta<O>>) {
        for delta in &left {
            if let Delta::Retract(id) | Delta::Update(id, _) = delta {
                self.remove_left(*id, out);
            }
        }
        for delta in &right {
            if let Delta::Retract(id) | Delta::Update(id, _) = delta {
                self.remove_right(*id, out);
            }
        }
        for delta in left {
            if let Delta::Insert(id, a) | Delta::Update(id, a) = delta {
                self.insert_left(id, a, out);
            }
        }
        for delta in right {
            if let Delta::Insert(id, b) | Delta::Update(id, b) = delta {
                self.insert_right(id, b, out);
            }
        }
    }
}

impl<S, L, R, J, A, B, K, O> TupleNode<S> for JoinNode<L, R, J, A, B, K, O>
where
    L: TupleNode<S, Tuple = A>,
    R: TupleNode<S, Tuple = B>,
    J: Joiner<A, B, Key = K>,
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    K: Clone + Eq + Hash + Ord + Send + Sync + 'static,
    O: Clone + Send + Sync + 'static,
{
    type Tuple = O;

    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<O>>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        self.left.initialize(solution, &mut left);
        self.right.initialize(solution, &mut right);
        self.process(left, right, out);
    }

    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<O>>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        self.left.propagate(solution, event, &mut left);
        self.right.propagate(solution, event, &mut right);
        if left.is_empty() && right.is_empty() {
            return;
        }
        self.process(left, right, out);
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.left_tuples.clear();
        self.right_tuples.clear();
        self.left_index.clear();
        self.right_index.clear();
        self.pairs.clear();
        self.by_left.clear();
        self.by_right.clear();
        self.ids.reset();
    }

    fn listens_to(&self, class: SourceClass) -> bool {
        self.left.listens_to(class) || self.right.listens_to(class)
    }
}
