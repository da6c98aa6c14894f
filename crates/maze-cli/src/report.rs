//! Printable result of a maze solve.

use astar::{Direction, SearchOutcome, SearchStats, SearchStatus};
use serde::Serialize;

/// What the CLI prints, as text or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// Path of the maze file.
    pub maze: String,
    pub status: SearchStatus,
    pub success: bool,
    /// Number of moves on the path, `0` when unsolved.
    pub cost: usize,
    /// Move codes (North 0, East 1, South 2, West 3); the first entry is
    /// always `null` for the start.
    pub actions: Vec<Option<u8>>,
    pub stats: SearchStats,
    /// The maze with the path drawn in, text output only.
    #[serde(skip)]
    pub rendered: Option<String>,
}

impl SolveReport {
    pub fn new(
        maze: String,
        status: SearchStatus,
        outcome: Option<&SearchOutcome<Direction>>,
        stats: SearchStats,
    ) -> Self {
        let (success, cost, actions) = match outcome {
            Some(o) => (
                o.success,
                o.cost,
                o.actions.iter().map(|a| a.map(Direction::code)).collect(),
            ),
            None => (false, 0, Vec::new()),
        };
        Self {
            maze,
            status,
            success,
            cost,
            actions,
            stats,
            rendered: None,
        }
    }

    pub fn with_rendered(mut self, rendered: String) -> Self {
        self.rendered = Some(rendered);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}: {}\n", self.maze, self.status);
        if self.success {
            let moves: Vec<String> = self
                .actions
                .iter()
                .flatten()
                .map(|code| code.to_string())
                .collect();
            out.push_str(&format!("cost: {}\n", self.cost));
            out.push_str(&format!("moves: [{}]\n", moves.join(", ")));
        }
        if let Some(rendered) = &self.rendered {
            out.push_str(rendered);
            out.push('\n');
        }
        out.push_str(&format!("{}\n", self.stats));
        out
    }
}
