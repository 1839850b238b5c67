//! Plain functions used as nameable combiners inside stream node types.

pub(crate) fn pair<A: Clone, B: Clone>(a: &A, b: &B) -> (A, B) {
    (a.clone(), b.clone())
}

pub(crate) fn append<A: Clone, B: Clone, C: Clone>(ab: &(A, B), c: &C) -> (A, B, C) {
    (ab.0.clone(), ab.1.clone(), c.clone())
}

pub(crate) fn keyed<K: Clone, R: Clone>(key: &K, result: &R) -> (K, R) {
    (key.clone(), result.clone())
}

pub(crate) fn key_only<K: Clone, R>(key: &K, _result: &R) -> K {
    key.clone()
}

pub(crate) fn result_only<R: Clone>(_key: &(), result: &R) -> R {
    result.clone()
}

pub(crate) fn unit_key<A>(_tuple: &A) {}

pub(crate) fn unit_weight<A>(_tuple: &A) -> i64 {
    1
}

pub(crate) fn identity<K: Clone>(key: &K) -> K {
    key.clone()
}

pub(crate) fn first<K: Clone, R>(tuple: &(K, R)) -> K {
    tuple.0.clone()
}

pub(crate) fn unit_fill<E>(_element: &E) {}

pub(crate) fn key_alone<K>(key: K, _fill: ()) -> K {
    key
}

pub(crate) fn key_and<K, R>(key: K, fill: R) -> (K, R) {
    (key, fill)
}
