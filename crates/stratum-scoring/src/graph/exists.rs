//! Conditional propagation: `if_exists` and `if_not_exists`.

use std::collections::HashMap;
use std::hash::Hash;

use super::index::Side;
use super::{Delta, JoinIndex, SourceClass, SourceEvent, TupleId, TupleNode};
use crate::stream::joiner::Joiner;

struct LeftState<K, A> {
    key: K,
    tuple: A,
    matches: usize,
}

impl<K: Clone, A: Clone> Clone for LeftState<K, A> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            tuple: self.tuple.clone(),
            matches: self.matches,
        }
    }
}

/// Passes a left tuple through while the number of matching right tuples is
/// non-zero (`if_exists`) or zero (`if_not_exists`).
///
/// Left tuple ids are preserved. Each left tuple keeps a running match count,
/// so a right-side change only touches the left tuples it matches.
#[derive(Clone)]
pub struct ExistsNode<L, R, J, A, B, K> {
    left: L,
    right: R,
    joiner: J,
    should_exist: bool,
    left_tuples: HashMap<TupleId, LeftState<K, A>>,
    right_tuples: HashMap<TupleId, (K, B)>,
    left_index: JoinIndex<K>,
    right_index: JoinIndex<K>,
    candidates: Vec<TupleId>,
}

impl<L, R, J, A, B, K> ExistsNode<L, R, J, A, B, K>
where
    J: Joiner<A, B, Key = K>,
    K: Clone + Eq + Hash + Ord,
    A: Clone,
{
    pub fn new(left: L, right: R, joiner: J, should_exist: bool) -> Self {
        let relation = joiner.relation();
        Self {
            left,
            right,
            joiner,
            should_exist,
            left_tuples: HashMap::new(),
            right_tuples: HashMap::new(),
            left_index: JoinIndex::new(relation, Side::Left),
            right_index: JoinIndex::new(relation, Side::Right),
            candidates: Vec::new(),
        }
    }

    fn passes(&self, matches: usize) -> bool {
        (matches > 0) == self.should_exist
    }

    fn remove_left(&mut self, id: TupleId, out: &mut Vec<Delta<A>>) {
        if let Some(state) = self.left_tuples.remove(&id) {
            self.left_index.remove(&state.key, id);
            if self.passes(state.matches) {
                out.push(Delta::Retract(id));
            }
        }
    }

    fn insert_left(&mut self, id: TupleId, a: A, out: &mut Vec<Delta<A>>) {
        let key = self.joiner.left_key(&a);
        let bound = self.joiner.overlap_bound(&key);
        let mut candidates = std::mem::take(&mut self.candidates);
        candidates.clear();
        self.right_index.lookup(&key, bound.as_ref(), &mut candidates);
        let matches = candidates
            .iter()
            .filter_map(|r| self.right_tuples.get(r))
            .filter(|(_, b)| self.joiner.matches(&a, b))
            .count();
        self.candidates = candidates;
        if self.passes(matches) {
            out.push(Delta::Insert(id, a.clone()));
        }
        self.left_index.insert(key.clone(), id);
        self.left_tuples.insert(
            id,
            LeftState {
                key,
                tuple: a,
                matches,
            },
        );
    }

    // Moves the match count of every left tuple matching `b` up or down by one.
    fn adjust_matches(&mut self, key: &K, b: &B, increment: bool, out: &mut Vec<Delta<A>>) {
        let bound = self.joiner.overlap_bound(key);
        let mut candidates = std::mem::take(&mut self.candidates);
        candidates.clear();
        self.left_index.lookup(key, bound.as_ref(), &mut candidates);
        for &l in &candidates {
            let should_exist = self.should_exist;
            let Some(state) = self.left_tuples.get_mut(&l) else {
                continue;
            };
            if !self.joiner.matches(&state.tuple, b) {
                continue;
            }
            let before = (state.matches > 0) == should_exist;
            if increment {
                state.matches += 1;
            } else {
                state.matches = state.matches.saturating_sub(1);
            }
            let after = (state.matches > 0) == should_exist;
            match (before, after) {
                (true, false) => out.push(Delta::Retract(l)),
                (false, true) => out.push(Delta::Insert(l, state.tuple.clone())),
                _ => {}
            }
        }
        self.candidates = candidates;
    }

    fn remove_right(&mut self, id: TupleId, out: &mut Vec<Delta<A>>) {
        if let Some((key, b)) = self.right_tuples.remove(&id) {
            self.right_index.remove(&key, id);
            self.adjust_matches(&key, &b, false, out);
        }
    }

    fn insert_right(&mut self, id: TupleId, b: B, out: &mut Vec<Delta<A>>) {
        let key = self.joiner.right_key(&b);
        self.adjust_matches(&key, &b, true, out);
        self.right_index.insert(key.clone(), id);
        self.right_tuples.insert(id, (key, b));
    }

    fn process(&mut self, left: Vec<Delta<A>>, right: Vec<Delta<B>>, out: &mut Vec<Delta<A>>) {
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

impl<S, L, R, J, A, B, K> TupleNode<S> for ExistsNode<L, R, J, A, B, K>
where
    L: TupleNode<S, Tuple = A>,
    R: TupleNode<S, Tuple = B>,
    J: Joiner<A, B, Key = K>,
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    K: Clone + Eq + Hash + Ord + Send + Sync + 'static,
{
    type Tuple = A;

    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<A>>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        self.left.initialize(solution, &mut left);
        self.right.initialize(solution, &mut right);
        // Right side first so each left tuple counts its matches on insert.
        self.process(Vec::new(), right, out);
        self.process(left, Vec::new(), out);
    }

    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<A>>) {
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
    }

    fn listens_to(&self, class: SourceClass) -> bool {
        self.left.listens_to(class) || self.right.listens_to(class)
    }
}
