//! Arena for per-step move storage.
//!
//! A local search step generates a batch of moves, evaluates them and keeps
//! one. The arena keeps its buffer between steps so the batch never
//! reallocates once it has grown to the selector's size.

/// Reusable move buffer with index-based access.
///
/// # Example
///
/// ```
/// use stratum_solver::heuristic::r#move::MoveArena;
///
/// let mut arena: MoveArena<i32> = MoveArena::new();
///
/// arena.push(1);
/// arena.push(2);
/// arena.push(3);
/// assert_eq!(arena.len(), 3);
///
/// arena.reset();
/// assert!(arena.is_empty());
///
/// arena.push(10);
/// arena.push(20);
/// assert_eq!(arena.take(1), Some(20));
/// assert_eq!(arena.get(1), None);
/// ```
#[derive(Debug)]
pub struct MoveArena<M> {
    // Taken moves leave `None` behind until the next reset.
    moves: Vec<Option<M>>,
}

impl<M> MoveArena<M> {
    #[inline]
    pub fn new() -> Self {
        Self { moves: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            moves: Vec::with_capacity(capacity),
        }
    }

    /// Empties the arena, keeping its capacity.
    #[inline]
    pub fn reset(&mut self) {
        self.moves.clear();
    }

    /// Adds a move and returns its index.
    #[inline]
    pub fn push(&mut self, m: M) -> usize {
        self.moves.push(Some(m));
        self.moves.len() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&M> {
        self.moves.get(index).and_then(Option::as_ref)
    }

    /// Moves the selected move out; its slot stays empty until `reset`.
    pub fn take(&mut self, index: usize) -> Option<M> {
        self.moves.get_mut(index).and_then(Option::take)
    }

    /// Iterates over `(index, move)` for every move not yet taken.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &M)> {
        self.moves
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|m| (i, m)))
    }

    /// Slice view for chunked parallel evaluation.
    pub(crate) fn as_slice(&self) -> &[Option<M>] {
        &self.moves
    }
}

impl<M> Default for MoveArena<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Extend<M> for MoveArena<M> {
    fn extend<I: IntoIterator<Item = M>>(&mut self, iter: I) {
        self.moves.extend(iter.into_iter().map(Some));
    }
}
