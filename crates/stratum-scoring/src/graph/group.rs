//! Group-by node.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;

use super::{Delta, IdSequence, SourceClass, SourceEvent, TupleId, TupleNode};
use crate::stream::collector::{Accumulator, UniCollector};

#[derive(Clone)]
struct Group<X> {
    id: TupleId,
    size: usize,
    accumulator: X,
}

/// Groups upstream tuples by key and folds each group with a collector.
///
/// One output tuple per non-empty group. A group's output is emitted as an
/// insert when the group appears, an update when its collected result
/// changes, and a retract when its last tuple leaves. Results that do not
/// change after a batch emit nothing.
#[derive(Clone)]
pub struct GroupByNode<N, T, KF, C, K, O>
where
    C: UniCollector<T>,
{
    upstream: N,
    key_fn: KF,
    collector: C,
    output: fn(&K, &C::Result) -> O,
    groups: HashMap<K, Group<C::Accumulator>>,
    inputs: HashMap<TupleId, (K, C::Value)>,
    ids: IdSequence,
    _phantom: PhantomData<fn(&T)>,
}

impl<N, T, KF, C, K, O> GroupByNode<N, T, KF, C, K, O>
where
    KF: Fn(&T) -> K,
    C: UniCollector<T>,
    K: Clone + Eq + Hash,
{
    pub fn new(upstream: N, key_fn: KF, collector: C, output: fn(&K, &C::Result) -> O) -> Self {
        Self {
            upstream,
            key_fn,
            collector,
            output,
            groups: HashMap::new(),
            inputs: HashMap::new(),
            ids: IdSequence::default(),
            _phantom: PhantomData,
        }
    }

    // First touch of a key in a batch records the group's prior state.
    fn touch(
        &self,
        key: &K,
        seen: &mut HashSet<K>,
        touched: &mut Vec<(K, Option<(TupleId, C::Result)>)>,
    ) {
        if seen.insert(key.clone()) {
            let before = self
                .groups
                .get(key)
                .map(|g| (g.id, g.accumulator.finish()));
            touched.push((key.clone(), before));
        }
    }

    fn add(&mut self, id: TupleId, key: K, value: C::Value) {
        let ids = &mut self.ids;
        let collector = &self.collector;
        let group = self.groups.entry(key.clone()).or_insert_with(|| Group {
            id: ids.next(),
            size: 0,
            accumulator: collector.create_accumulator(),
        });
        group.size += 1;
        group.accumulator.accumulate(&value);
        self.inputs.insert(id, (key, value));
    }

    fn remove(&mut self, key: &K, value: &C::Value) {
        let emptied = match self.groups.get_mut(key) {
            Some(group) => {
                group.accumulator.retract(value);
                group.size -= 1;
                group.size == 0
            }
            None => false,
        };
        if emptied {
            self.groups.remove(key);
        }
    }

    fn apply(&mut self, input: Vec<Delta<T>>, out: &mut Vec<Delta<O>>) {
        let mut seen = HashSet::new();
        let mut touched = Vec::new();

        for delta in input {
            match delta {
                Delta::Insert(id, t) => {
                    let key = (self.key_fn)(&t);
                    self.touch(&key, &mut seen, &mut touched);
                    let value = self.collector.extract(&t);
                    self.add(id, key, value);
                }
                Delta::Update(id, t) => {
                    if let Some((old_key, old_value)) = self.inputs.remove(&id) {
                        self.touch(&old_key, &mut seen, &mut touched);
                        self.remove(&old_key, &old_value);
                    }
                    let key = (self.key_fn)(&t);
                    self.touch(&key, &mut seen, &mut touched);
                    let value = self.collector.extract(&t);
                    self.add(id, key, value);
                }
                Delta::Retract(id) => {
                    if let Some((key, value)) = self.inputs.remove(&id) {
                        self.touch(&key, &mut seen, &mut touched);
                        self.remove(&key, &value);
                    }
                }
            }
        }

        for (key, before) in touched {
            let after = self.groups.get(&key).map(|g| (g.id, g.accumulator.finish()));
            match (before, after) {
                (None, None) => {}
                (None, Some((id, result))) => {
                    out.push(Delta::Insert(id, (self.output)(&key, &result)))
                }
                (Some((id, _)), None) => out.push(Delta::Retract(id)),
                (Some((old_id, old)), Some((id, result))) => {
                    if old_id != id {
                        out.push(Delta::Retract(old_id));
                        out.push(Delta::Insert(id, (self.output)(&key, &result)));
                    } else if old != result {
                        out.push(Delta::Update(id, (self.output)(&key, &result)));
                    }
                }
            }
        }
    }
}

impl<S, N, T, KF, C, K, O> TupleNode<S> for GroupByNode<N, T, KF, C, K, O>
where
    N: TupleNode<S, Tuple = T>,
    T: Clone + Send + Sync + 'static,
    KF: Fn(&T) -> K + Clone + Send + Sync,
    C: UniCollector<T>,
    K: Clone + Eq + Hash + Send + Sync + 'static,
    O: Clone + Send + Sync + 'static,
{
    type Tuple = O;

    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<O>>) {
        let mut input = Vec::new();
        self.upstream.initialize(solution, &mut input);
        self.apply(input, out);
    }

    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<O>>) {
        let mut input = Vec::new();
        self.upstream.propagate(solution, event, &mut input);
        if !input.is_empty() {
            self.apply(input, out);
        }
    }

    fn reset(&mut self) {
        self.upstream.reset();
        self.groups.clear();
        self.inputs.clear();
        self.ids.reset();
    }

    fn listens_to(&self, class: SourceClass) -> bool {
        self.upstream.listens_to(class)
    }
}
