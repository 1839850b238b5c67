//! Search tree nodes and the frontier holding them.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use stratum_config::ExplorationType;

/// A partial assignment: `path[i]` is the value of the i-th searched entity.
#[derive(Debug, Clone)]
pub(super) struct Node<V, Sc> {
    pub path: Vec<V>,
    /// Working score with exactly `path` assigned.
    pub score: Sc,
    sequence: u64,
}

impl<V, Sc> Node<V, Sc> {
    pub fn root(score: Sc) -> Self {
        Self {
            path: Vec::new(),
            score,
            sequence: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

impl<V: Clone, Sc> Node<V, Sc> {
    pub fn child(&self, value: V, score: Sc, sequence: u64) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(value);
        Self {
            path,
            score,
            sequence,
        }
    }
}

// Heap order: better score, then deeper, then created first.
impl<V, Sc: Ord> Ord for Node<V, Sc> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.path.len().cmp(&other.path.len()))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<V, Sc: Ord> PartialOrd for Node<V, Sc> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V, Sc: Ord> PartialEq for Node<V, Sc> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V, Sc: Ord> Eq for Node<V, Sc> {}

/// Open nodes, popped in exploration order.
#[derive(Debug)]
pub(super) enum Frontier<V, Sc: Ord> {
    DepthFirst(Vec<Node<V, Sc>>),
    ScoreFirst(BinaryHeap<Node<V, Sc>>),
}

impl<V, Sc: Ord> Frontier<V, Sc> {
    pub fn new(exploration_type: ExplorationType) -> Self {
        match exploration_type {
            ExplorationType::DepthFirst => Frontier::DepthFirst(Vec::new()),
            ExplorationType::ScoreFirst => Frontier::ScoreFirst(BinaryHeap::new()),
        }
    }

    /// Adds the children of one node, given in value order.
    pub fn push_children(&mut self, children: Vec<Node<V, Sc>>) {
        match self {
            // Reversed so the first value is explored first.
            Frontier::DepthFirst(stack) => stack.extend(children.into_iter().rev()),
            Frontier::ScoreFirst(heap) => heap.extend(children),
        }
    }

    pub fn push(&mut self, node: Node<V, Sc>) {
        self.push_children(vec![node]);
    }

    pub fn pop(&mut self) -> Option<Node<V, Sc>> {
        match self {
            Frontier::DepthFirst(stack) => stack.pop(),
            Frontier::ScoreFirst(heap) => heap.pop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::score::SimpleScore;

    fn children(root: &Node<u8, SimpleScore>) -> Vec<Node<u8, SimpleScore>> {
        vec![
            root.child(0, SimpleScore::of(-3), 1),
            root.child(1, SimpleScore::of(-1), 2),
            root.child(2, SimpleScore::of(-1), 3),
        ]
    }

    #[test]
    fn test_depth_first_pops_first_value_first() {
        let root = Node::root(SimpleScore::of(0));
        let mut frontier = Frontier::new(ExplorationType::DepthFirst);
        frontier.push_children(children(&root));
        let order: Vec<u8> = std::iter::from_fn(|| frontier.pop()).map(|n| n.path[0]).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_score_first_pops_best_then_oldest() {
        let root = Node::root(SimpleScore::of(0));
        let mut frontier = Frontier::new(ExplorationType::ScoreFirst);
        frontier.push_children(children(&root));
        let deeper = children(&root)[0].child(5, SimpleScore::of(-1), 4);
        frontier.push(deeper);
        let order: Vec<Vec<u8>> =
            std::iter::from_fn(|| frontier.pop()).map(|n| n.path).collect();
        assert_eq!(order, vec![vec![0, 5], vec![1], vec![2], vec![0]]);
    }
}
