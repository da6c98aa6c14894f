use std::fmt;

/// Counters collected over a single search run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SearchStats {
    /// Nodes removed from the frontier and expanded.
    pub nodes_expanded: u32,
    /// Neighbor states returned by the oracle and inspected.
    pub nodes_generated: u32,
    /// Frontier or closed entries updated because a cheaper path was found.
    pub relaxations: u32,
    /// Closed entries put back on the frontier (only with `reopen_closed`).
    pub reopened: u32,
    /// Unsolvable states recorded in the closed set.
    pub unsolvable_recorded: u32,
    /// Maximum size of the frontier during search.
    pub peak_frontier_size: usize,
    /// Wall-clock time from construction to termination.
    pub wall_time_ms: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded: {}, generated: {}, relaxed: {}, reopened: {}, dead ends: {}, peak frontier: {}, time: {}ms",
            self.nodes_expanded,
            self.nodes_generated,
            self.relaxations,
            self.reopened,
            self.unsolvable_recorded,
            self.peak_frontier_size,
            self.wall_time_ms
        )
    }
}
