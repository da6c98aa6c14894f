//! Interruptible best-first (A*) search over caller-supplied state spaces.
//!
//! The caller provides the initial state, a neighbor function and an optional
//! heuristic. The engine owns all bookkeeping (depth, score, parent links) in
//! an arena of [`SearchNode`]s, keeps the open set in an indexed binary heap
//! ([`Frontier`]) and runs as a cooperative tokio task that yields between
//! expansion steps so a deadline can interrupt it.
//!
//! # Key types
//!
//! - [`AsyncAstar`]: the search driver (explicit [`AsyncAstar::step`] or async [`AsyncAstar::run`])
//! - [`SearchOptions`]: builder for the six construction options, validated eagerly
//! - [`SearchConfig`]: tunables loaded from TOML
//! - [`SearchState`] / [`Classification`]: what a caller's state must expose
//! - [`Neighbors`] / [`Heuristic`]: oracle traits, implemented for plain closures
//! - [`SearchOutcome`]: the `{ success, actions, cost }` value handed to `on_complete`
//! - [`GridMaze`]: a ready-made grid oracle used by the CLI and tests
//!
//! ```rust,no_run
//! use astar::{AsyncAstar, GridMaze, SearchOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let maze = GridMaze::parse("####\n#SG#\n####")?;
//! let handle = AsyncAstar::spawn(
//!     SearchOptions::new()
//!         .initial(maze.start_state())
//!         .neighbors(maze.clone())
//!         .heuristic(maze.clone())
//!         .on_complete(|outcome| println!("cost = {}", outcome.cost)),
//! )?;
//! let report = handle.join().await?;
//! println!("{:?}", report.status);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod maze;
pub mod mocks;
pub mod node;
pub mod stats;

pub use config::{load_toml, SearchConfig};
pub use engine::{
    AsyncAstar, Heuristic, Neighbors, SearchHandle, SearchOptions, SearchOutcome, SearchReport,
    SearchStatus,
};
pub use error::{ConfigError, ContractViolation, SearchError};
pub use frontier::{Frontier, FrontierItem};
pub use maze::{Direction, GridMaze, MazeError, MazeState};
pub use node::{extract_action_sequence, extract_path, Classification, ScoredNode, SearchNode, SearchState};
pub use stats::SearchStats;
