//! Mock state spaces for testing the engine without a real domain.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::{Heuristic, Neighbors};
use crate::node::{Classification, SearchState};

/// A state in a [`MockGraph`] or [`UnboundedSpace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockState {
    pub id: u32,
    pub class: Classification,
    pub action: Option<String>,
}

impl SearchState for MockState {
    type Id = u32;
    type Action = String;

    fn identity(&self) -> u32 {
        self.id
    }

    fn classification(&self) -> Classification {
        self.class
    }

    fn action(&self) -> Option<String> {
        self.action.clone()
    }
}

// ---------------------------------------------------------------------------
// MockGraph
// ---------------------------------------------------------------------------

/// Explicit directed graph with canned classifications.
///
/// Edges are returned in insertion order and labelled `"{from}->{to}"`.
/// Nodes default to [`Classification::Open`].
pub struct MockGraph {
    edges: HashMap<u32, Vec<u32>>,
    classes: HashMap<u32, Classification>,
    expanded: Arc<Mutex<Vec<u32>>>,
}

impl Default for MockGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
            classes: HashMap::new(),
            expanded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Override the classification of a node.
    pub fn set_class(&mut self, id: u32, class: Classification) {
        self.classes.insert(id, class);
    }

    /// Add a directed edge `from -> to`.
    pub fn add_edge(&mut self, from: u32, to: u32) {
        self.edges.entry(from).or_default().push(to);
    }

    /// Add both `a -> b` and `b -> a`.
    pub fn add_undirected(&mut self, a: u32, b: u32) {
        self.add_edge(a, b);
        self.add_edge(b, a);
    }

    pub fn class_of(&self, id: u32) -> Classification {
        self.classes.get(&id).copied().unwrap_or(Classification::Open)
    }

    /// The initial state for a search starting at `id` (no action).
    pub fn initial(&self, id: u32) -> MockState {
        MockState {
            id,
            class: self.class_of(id),
            action: None,
        }
    }

    /// Shared log of ids whose neighbors were requested, in call order.
    ///
    /// Grab it before handing the graph to the engine.
    pub fn expansion_log(&self) -> Arc<Mutex<Vec<u32>>> {
        Arc::clone(&self.expanded)
    }
}

impl Neighbors<MockState> for MockGraph {
    fn neighbors(&self, state: &MockState) -> Vec<MockState> {
        self.expanded.lock().unwrap().push(state.id);
        self.edges
            .get(&state.id)
            .map(|targets| {
                targets
                    .iter()
                    .map(|&to| MockState {
                        id: to,
                        class: self.class_of(to),
                        action: Some(format!("{}->{}", state.id, to)),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// MockHeuristic
// ---------------------------------------------------------------------------

/// Table-driven heuristic; unlisted states estimate to zero.
#[derive(Debug, Clone, Default)]
pub struct MockHeuristic {
    table: HashMap<u32, f64>,
}

impl MockHeuristic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, id: u32, estimate: f64) -> Self {
        self.table.insert(id, estimate);
        self
    }
}

impl Heuristic<MockState> for MockHeuristic {
    fn estimate(&self, state: &MockState) -> f64 {
        self.table.get(&state.id).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// UnboundedSpace
// ---------------------------------------------------------------------------

/// A space that manufactures two never-seen-before open states on every
/// expansion. It has no goal and its frontier never empties, so a search over
/// it only ends through a timeout.
#[derive(Debug)]
pub struct UnboundedSpace {
    next_id: AtomicU32,
}

impl Default for UnboundedSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl UnboundedSpace {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(1),
        }
    }

    pub fn initial(&self) -> MockState {
        MockState {
            id: 0,
            class: Classification::Open,
            action: None,
        }
    }
}

impl Neighbors<MockState> for UnboundedSpace {
    fn neighbors(&self, _state: &MockState) -> Vec<MockState> {
        (0..2)
            .map(|branch| MockState {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                class: Classification::Open,
                action: Some(format!("branch{branch}")),
            })
            .collect()
    }
}
