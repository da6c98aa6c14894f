use std::fmt::Debug;
use std::hash::Hash;

use ordered_float::OrderedFloat;

use crate::frontier::FrontierItem;

/// Tri-state tag the oracle attaches to every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Dead end. Recorded as closed and never expanded.
    Unsolvable,
    /// Ordinary, expandable state.
    Open,
    /// Terminal success.
    Goal,
}

impl Classification {
    /// Decode the `-1` / `0` / `1` integer convention used by grid fixtures.
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => Some(Self::Unsolvable),
            0 => Some(Self::Open),
            1 => Some(Self::Goal),
            _ => None,
        }
    }
}

/// A caller-owned state descriptor.
///
/// The engine only reads these three fields; any domain payload the oracle
/// needs lives in the implementing type and is never touched by the engine.
pub trait SearchState {
    /// Value uniquely naming a state; the deduplication key.
    type Id: Eq + Hash + Clone + Debug;
    /// Edge label that produced a state from its predecessor.
    type Action: Clone + Debug;

    fn identity(&self) -> Self::Id;

    fn classification(&self) -> Classification;

    /// `None` only for the initial state.
    fn action(&self) -> Option<Self::Action>;
}

/// A node in the search arena.
///
/// Nodes are stored in a flat arena (`Vec<SearchNode<S>>`) owned by the
/// engine and reference their parent by index, so cyclic state graphs never
/// produce ownership cycles. A child's depth is always strictly greater than
/// its parent's, which keeps every parent chain finite.
#[derive(Debug, Clone)]
pub struct SearchNode<S: SearchState> {
    /// The caller's state, never mutated by the engine.
    pub state: S,
    /// Cached `state.identity()`.
    pub identity: S::Id,
    /// Estimated remaining cost.
    pub heuristic: f64,
    /// Edges from the initial state.
    pub depth: u32,
    /// `depth + heuristic`, the frontier ordering key.
    pub score: OrderedFloat<f64>,
    /// Index of the parent node in the arena, `None` for the initial node.
    pub parent: Option<usize>,
}

impl<S: SearchState> SearchNode<S> {
    pub fn new(state: S, parent: Option<usize>, depth: u32, heuristic: f64) -> Self {
        let identity = state.identity();
        Self {
            state,
            identity,
            heuristic,
            depth,
            score: compose_score(depth, heuristic),
            parent,
        }
    }

    /// The initial node: depth 0, no parent.
    pub fn root(state: S, heuristic: f64) -> Self {
        Self::new(state, None, 0, heuristic)
    }

    pub fn classification(&self) -> Classification {
        self.state.classification()
    }

    /// Take over a cheaper path to the same identity.
    ///
    /// Parent, heuristic, depth and score are overwritten, and so is the
    /// state, so the recorded action always matches the new parent.
    pub fn relax_from(&mut self, cheaper: SearchNode<S>) {
        debug_assert_eq!(self.identity, cheaper.identity);
        debug_assert!(cheaper.depth < self.depth);
        self.state = cheaper.state;
        self.parent = cheaper.parent;
        self.heuristic = cheaper.heuristic;
        self.depth = cheaper.depth;
        self.score = cheaper.score;
    }
}

fn compose_score(depth: u32, heuristic: f64) -> OrderedFloat<f64> {
    OrderedFloat(f64::from(depth) + heuristic)
}

/// A frontier entry: identity, arena index and priority.
///
/// The node itself stays in the arena; the frontier only orders indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredNode<K> {
    /// Identity of the referenced node.
    pub identity: K,
    /// Index into the `Vec<SearchNode>` arena.
    pub node_index: usize,
    /// Copy of the node's score for heap ordering.
    pub score: OrderedFloat<f64>,
}

impl<K: Clone> ScoredNode<K> {
    pub fn of<S: SearchState<Id = K>>(node: &SearchNode<S>, node_index: usize) -> Self {
        Self {
            identity: node.identity.clone(),
            node_index,
            score: node.score,
        }
    }
}

impl<K: Eq + Hash + Clone> FrontierItem for ScoredNode<K> {
    type Key = K;

    fn key(&self) -> &K {
        &self.identity
    }

    fn score(&self) -> OrderedFloat<f64> {
        self.score
    }
}

/// Trace the parent chain from `terminal_index` back to the initial node,
/// returning arena indices in initial-to-terminal order.
pub fn extract_path<S: SearchState>(arena: &[SearchNode<S>], terminal_index: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = Some(terminal_index);
    while let Some(idx) = current {
        path.push(idx);
        current = arena[idx].parent;
    }
    path.reverse();
    path
}

/// The action of every node on the path, initial node first.
///
/// The first element is the initial state's action, which is `None` by
/// contract, so a path of `n` moves yields `n + 1` elements.
pub fn extract_action_sequence<S: SearchState>(
    arena: &[SearchNode<S>],
    terminal_index: usize,
) -> Vec<Option<S::Action>> {
    extract_path(arena, terminal_index)
        .into_iter()
        .map(|idx| arena[idx].state.action())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockState;

    fn make_node(id: u32, parent: Option<usize>, action: Option<&str>, depth: u32) -> SearchNode<MockState> {
        let state = MockState {
            id,
            class: Classification::Open,
            action: action.map(str::to_string),
        };
        SearchNode::new(state, parent, depth, 0.5)
    }

    #[test]
    fn test_score_is_depth_plus_heuristic() {
        let node = make_node(0, None, None, 3);
        assert_eq!(node.score, OrderedFloat(3.5));
        assert_eq!(node.identity, 0);
    }

    #[test]
    fn test_classification_codes() {
        assert_eq!(Classification::from_code(-1), Some(Classification::Unsolvable));
        assert_eq!(Classification::from_code(0), Some(Classification::Open));
        assert_eq!(Classification::from_code(1), Some(Classification::Goal));
        assert_eq!(Classification::from_code(2), None);
    }

    #[test]
    fn test_relax_from_adopts_cheaper_path() {
        let mut slow = make_node(7, Some(3), Some("slow"), 5);
        let fast = make_node(7, Some(1), Some("fast"), 2);
        slow.relax_from(fast);
        assert_eq!(slow.parent, Some(1));
        assert_eq!(slow.depth, 2);
        assert_eq!(slow.score, OrderedFloat(2.5));
        assert_eq!(slow.state.action.as_deref(), Some("fast"));
    }

    #[test]
    fn test_extract_path_branching() {
        // Tree: 0 -> 1, 0 -> 2, 1 -> 3 (terminal)
        let arena = vec![
            make_node(0, None, None, 0),
            make_node(1, Some(0), Some("a"), 1),
            make_node(2, Some(0), Some("b"), 1),
            make_node(3, Some(1), Some("c"), 2),
        ];
        assert_eq!(extract_path(&arena, 3), vec![0, 1, 3]);
        assert_eq!(
            extract_action_sequence(&arena, 3),
            vec![None, Some("a".to_string()), Some("c".to_string())]
        );
    }

    #[test]
    fn test_root_only_path() {
        let arena = vec![make_node(0, None, None, 0)];
        assert_eq!(extract_path(&arena, 0), vec![0]);
        assert_eq!(extract_action_sequence(&arena, 0), vec![None]);
    }

    #[test]
    fn test_scored_node_mirrors_arena_node() {
        let node = make_node(4, Some(0), Some("x"), 1);
        let scored = ScoredNode::of(&node, 9);
        assert_eq!(scored.identity, 4);
        assert_eq!(scored.node_index, 9);
        assert_eq!(scored.score(), node.score);
    }
}
