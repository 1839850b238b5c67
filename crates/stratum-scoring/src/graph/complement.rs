//! Complement node: fills in rows for source elements missing from a grouped
//! stream.

use std::collections::HashMap;
use std::hash::Hash;

use super::{Delta, IdSequence, SourceClass, SourceEvent, TupleId, TupleNode};

/// Passes the upstream tuples through and adds one synthetic tuple per
/// source element whose key no upstream tuple carries.
///
/// A synthetic tuple is `build(key, fill(element))`. It is retracted as soon
/// as an upstream tuple with that key appears and re-inserted when the last
/// one leaves, so every source element has at most one synthetic row.
#[derive(Clone)]
pub struct ComplementNode<N, M, T, K, D, KF, DF> {
    upstream: N,
    source: M,
    upstream_key: fn(&T) -> K,
    key_fn: KF,
    fill: DF,
    build: fn(K, D) -> T,
    passthrough: HashMap<TupleId, (K, TupleId)>,
    key_counts: HashMap<K, usize>,
    sources: HashMap<TupleId, (K, D)>,
    by_key: HashMap<K, Vec<TupleId>>,
    synthetic: HashMap<TupleId, TupleId>,
    ids: IdSequence,
}

impl<N, M, T, K, D, KF, DF> ComplementNode<N, M, T, K, D, KF, DF>
where
    K: Clone + Eq + Hash,
    D: Clone,
{
    pub fn new(
        upstream: N,
        source: M,
        upstream_key: fn(&T) -> K,
        key_fn: KF,
        fill: DF,
        build: fn(K, D) -> T,
    ) -> Self {
        Self {
            upstream,
            source,
            upstream_key,
            key_fn,
            fill,
            build,
            passthrough: HashMap::new(),
            key_counts: HashMap::new(),
            sources: HashMap::new(),
            by_key: HashMap::new(),
            synthetic: HashMap::new(),
            ids: IdSequence::default(),
        }
    }

    fn sources_with(&self, key: &K) -> Vec<TupleId> {
        self.by_key.get(key).cloned().unwrap_or_default()
    }

    fn add_synthetic(&mut self, sid: TupleId, out: &mut Vec<Delta<T>>) {
        if let Some((key, fill)) = self.sources.get(&sid) {
            let tuple = (self.build)(key.clone(), fill.clone());
            let id = self.ids.next();
            self.synthetic.insert(sid, id);
            out.push(Delta::Insert(id, tuple));
        }
    }

    fn insert_upstream(&mut self, id: TupleId, tuple: T, out: &mut Vec<Delta<T>>) {
        let key = (self.upstream_key)(&tuple);
        let out_id = self.ids.next();
        out.push(Delta::Insert(out_id, tuple));
        self.passthrough.insert(id, (key.clone(), out_id));
        let count = self.key_counts.entry(key.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            for sid in self.sources_with(&key) {
                if let Some(synthetic) = self.synthetic.remove(&sid) {
                    out.push(Delta::Retract(synthetic));
                }
            }
        }
    }

    fn retract_upstream(&mut self, id: TupleId, out: &mut Vec<Delta<T>>) {
        let Some((key, out_id)) = self.passthrough.remove(&id) else {
            return;
        };
        out.push(Delta::Retract(out_id));
        let remaining = match self.key_counts.get_mut(&key) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => 0,
        };
        if remaining == 0 {
            self.key_counts.remove(&key);
            for sid in self.sources_with(&key) {
                self.add_synthetic(sid, out);
            }
        }
    }

    fn update_upstream(&mut self, id: TupleId, tuple: T, out: &mut Vec<Delta<T>>) {
        let key = (self.upstream_key)(&tuple);
        match self.passthrough.get(&id) {
            Some((old_key, out_id)) if *old_key == key => out.push(Delta::Update(*out_id, tuple)),
            _ => {
                self.retract_upstream(id, out);
                self.insert_upstream(id, tuple, out);
            }
        }
    }

    fn retract_source(&mut self, sid: TupleId, out: &mut Vec<Delta<T>>) {
        if let Some((key, _)) = self.sources.remove(&sid) {
            if let Some(list) = self.by_key.get_mut(&key) {
                list.retain(|&x| x != sid);
                if list.is_empty() {
                    self.by_key.remove(&key);
                }
            }
        }
        if let Some(synthetic) = self.synthetic.remove(&sid) {
            out.push(Delta::Retract(synthetic));
        }
    }

    fn insert_source<E>(&mut self, sid: TupleId, element: &E, out: &mut Vec<Delta<T>>)
    where
        KF: Fn(&E) -> K,
        DF: Fn(&E) -> D,
    {
        let key = (self.key_fn)(element);
        let fill = (self.fill)(element);
        let covered = self.key_counts.contains_key(&key);
        self.by_key.entry(key.clone()).or_default().push(sid);
        self.sources.insert(sid, (key, fill));
        if !covered {
            self.add_synthetic(sid, out);
        }
    }

    fn process<E>(
        &mut self,
        upstream: Vec<Delta<T>>,
        source: Vec<Delta<E>>,
        out: &mut Vec<Delta<T>>,
    ) where
        KF: Fn(&E) -> K,
        DF: Fn(&E) -> D,
    {
        for delta in upstream {
            match delta {
                Delta::Insert(id, t) => self.insert_upstream(id, t, out),
                Delta::Update(id, t) => self.update_upstream(id, t, out),
                Delta::Retract(id) => self.retract_upstream(id, out),
            }
        }
        for delta in source {
            match delta {
                Delta::Insert(sid, e) => self.insert_source(sid, &e, out),
                Delta::Update(sid, e) => {
                    self.retract_source(sid, out);
                    self.insert_source(sid, &e, out);
                }
                Delta::Retract(sid) => self.retract_source(sid, out),
            }
        }
    }
}

impl<S, N, M, T, E, K, D, KF, DF> TupleNode<S> for ComplementNode<N, M, T, K, D, KF, DF>
where
    N: TupleNode<S, Tuple = T>,
    M: TupleNode<S, Tuple = E>,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    K: Clone + Eq + Hash + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
    KF: Fn(&E) -> K + Clone + Send + Sync,
    DF: Fn(&E) -> D + Clone + Send + Sync,
{
    type Tuple = T;

    fn initialize(&mut self, solution: &S, out: &mut Vec<Delta<T>>) {
        let mut upstream = Vec::new();
        let mut source = Vec::new();
        self.upstream.initialize(solution, &mut upstream);
        self.source.initialize(solution, &mut source);
        self.process(upstream, source, out);
    }

    fn propagate(&mut self, solution: &S, event: &SourceEvent, out: &mut Vec<Delta<T>>) {
        let mut upstream = Vec::new();
        let mut source = Vec::new();
        self.upstream.propagate(solution, event, &mut upstream);
        self.source.propagate(solution, event, &mut source);
        if upstream.is_empty() && source.is_empty() {
            return;
        }
        self.process(upstream, source, out);
    }

    fn reset(&mut self) {
        self.upstream.reset();
        self.source.reset();
        self.passthrough.clear();
        self.key_counts.clear();
        self.sources.clear();
        self.by_key.clear();
        self.synthetic.clear();
        self.ids.reset();
    }

    fn listens_to(&self, class: SourceClass) -> bool {
        self.upstream.listens_to(class) || self.source.listens_to(class)
    }
}
