// Constraint stream over triples.

impl_tuple_stream!(
    /// A stream of `(A, B, C)` tuples, produced by joining a bi stream.
    TriConstraintStream, (A, B, C), (0, 1, 2)
);
