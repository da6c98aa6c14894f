//! End-to-end searches over grid mazes and an unbounded mock space, driven
//! through `AsyncAstar::spawn` the way an application would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use astar::mocks::UnboundedSpace;
use astar::{
    AsyncAstar, Direction, GridMaze, SearchConfig, SearchOptions, SearchOutcome, SearchStatus,
};
use tokio::sync::oneshot;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CORRIDOR: &str = "\
####
#SG#
####";

/// Unique 12-move solution.
const WINDING: &str = "\
#######
#S#...#
#.#.#.#
#...#.#
#.#.#.#
#.#.#G#
#######";

/// Same as `WINDING` with the connecting passage walled off.
const BLOCKED: &str = "\
#######
#S#...#
#.#.#.#
#.#.#.#
#.#.#.#
#.#.#G#
#######";

fn codes(actions: &[Option<Direction>]) -> Vec<Option<u8>> {
    actions.iter().map(|a| a.map(Direction::code)).collect()
}

async fn solve(maze: &GridMaze) -> (SearchStatus, SearchOutcome<Direction>) {
    let (tx, rx) = oneshot::channel();
    let handle = AsyncAstar::spawn(
        SearchOptions::new()
            .initial(maze.start_state())
            .neighbors(maze.clone())
            .heuristic(maze.clone())
            .on_complete(move |outcome| {
                let _ = tx.send(outcome);
            }),
    )
    .expect("valid options");

    let report = handle.join().await.expect("search task failed");
    let outcome = rx.await.expect("on_complete was not called");
    (report.status, outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_corridor_one_step() {
    let maze = GridMaze::parse(CORRIDOR).unwrap();
    let (status, outcome) = solve(&maze).await;

    assert_eq!(status, SearchStatus::Solved);
    assert!(outcome.success);
    assert_eq!(outcome.actions, vec![None, Some(Direction::East)]);
    assert_eq!(outcome.cost, 1);
}

#[tokio::test]
async fn test_corridor_from_codes() {
    let maze = GridMaze::from_codes(
        &[[-1i8, -1, -1, -1], [-1, 0, 1, -1], [-1, -1, -1, -1]],
        (1, 1),
    )
    .unwrap();
    let (_, outcome) = solve(&maze).await;
    assert_eq!(codes(&outcome.actions), vec![None, Some(1)]);
}

#[tokio::test]
async fn test_winding_maze_exact_path() {
    let maze = GridMaze::parse(WINDING).unwrap();
    let (status, outcome) = solve(&maze).await;

    assert_eq!(status, SearchStatus::Solved);
    assert_eq!(
        codes(&outcome.actions),
        vec![
            None,
            Some(2),
            Some(2),
            Some(1),
            Some(1),
            Some(0),
            Some(0),
            Some(1),
            Some(1),
            Some(2),
            Some(2),
            Some(2),
            Some(2),
        ]
    );
    assert_eq!(outcome.actions.len(), 13);
    assert_eq!(outcome.cost, 12);
}

#[tokio::test]
async fn test_blocked_maze_is_unsolvable() {
    let maze = GridMaze::parse(BLOCKED).unwrap();
    let (status, outcome) = solve(&maze).await;

    assert_eq!(status, SearchStatus::Unsolvable);
    assert!(!outcome.success);
    assert!(outcome.actions.is_empty());
    assert_eq!(outcome.cost, 0);
}

#[tokio::test]
async fn test_start_on_goal() {
    let maze = GridMaze::from_codes(&[[1i8, 0]], (0, 0)).unwrap();
    let (status, outcome) = solve(&maze).await;
    assert_eq!(status, SearchStatus::Solved);
    assert_eq!(outcome.actions, vec![None]);
    assert_eq!(outcome.cost, 0);
}

#[tokio::test]
async fn test_start_on_wall_is_unsolvable() {
    let maze = GridMaze::from_codes(&[[-1i8, 1]], (0, 0)).unwrap();
    let (status, outcome) = solve(&maze).await;
    assert_eq!(status, SearchStatus::Unsolvable);
    assert_eq!(outcome, SearchOutcome::no_path());
}

/// An unbounded space with a tiny budget ends through the timeout callback
/// only; the completion consumer is never called.
#[tokio::test]
async fn test_timeout_takes_precedence() {
    let completed = Arc::new(AtomicUsize::new(0));
    let timed_out = Arc::new(AtomicUsize::new(0));
    let (c, t) = (Arc::clone(&completed), Arc::clone(&timed_out));
    let space = UnboundedSpace::new();

    let handle = AsyncAstar::spawn(
        SearchOptions::new()
            .initial(space.initial())
            .neighbors(space)
            .timeout(Duration::from_millis(5))
            .on_complete(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .on_timeout(move || {
                t.fetch_add(1, Ordering::SeqCst);
            }),
    )
    .unwrap();

    let report = handle.join().await.unwrap();
    assert_eq!(report.status, SearchStatus::TimedOut);
    assert_eq!(timed_out.load(Ordering::SeqCst), 1);
    assert_eq!(completed.load(Ordering::SeqCst), 0);
    assert!(report.stats.nodes_expanded > 0);
}

/// The same budget supplied through `SearchConfig` behaves identically.
#[tokio::test]
async fn test_timeout_from_config() {
    let config = SearchConfig::from_toml_str("timeout_ms = 5\nyield_every = 8").unwrap();
    let space = UnboundedSpace::new();
    let handle = AsyncAstar::spawn(
        SearchOptions::new()
            .initial(space.initial())
            .neighbors(space)
            .config(config)
            .on_complete(|_| panic!("unbounded space cannot complete")),
    )
    .unwrap();

    let report = handle.join().await.unwrap();
    assert_eq!(report.status, SearchStatus::TimedOut);
}

#[tokio::test]
async fn test_solution_path_reconstruction_is_idempotent() {
    let maze = GridMaze::parse(WINDING).unwrap();
    let mut engine = SearchOptions::new()
        .initial(maze.start_state())
        .neighbors(maze.clone())
        .heuristic(maze)
        .on_complete(|_| {})
        .build()
        .unwrap();

    assert_eq!(engine.run().await.unwrap(), SearchStatus::Solved);
    let first = engine.solution_path().unwrap();
    let second = engine.solution_path().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 13);
}

#[tokio::test]
async fn test_repeated_runs_are_deterministic() {
    let maze = GridMaze::parse(WINDING).unwrap();
    let (_, first) = solve(&maze).await;
    let (_, second) = solve(&maze).await;
    assert_eq!(first, second);
}

/// A caller-defined state space wired in with plain closures.
#[tokio::test]
async fn test_closure_oracles() {
    use astar::{Classification, SearchState};

    // Count up from 0 by +1 or +3; 10 is the goal.
    #[derive(Debug, Clone)]
    struct Counter {
        value: u32,
        step: Option<u32>,
    }

    impl SearchState for Counter {
        type Id = u32;
        type Action = u32;

        fn identity(&self) -> u32 {
            self.value
        }

        fn classification(&self) -> Classification {
            match self.value {
                10 => Classification::Goal,
                v if v > 10 => Classification::Unsolvable,
                _ => Classification::Open,
            }
        }

        fn action(&self) -> Option<u32> {
            self.step
        }
    }

    let (tx, rx) = oneshot::channel();
    let handle = AsyncAstar::spawn(
        SearchOptions::new()
            .initial(Counter {
                value: 0,
                step: None,
            })
            .neighbors(|c: &Counter| {
                [1, 3]
                    .into_iter()
                    .map(|step| Counter {
                        value: c.value + step,
                        step: Some(step),
                    })
                    .collect::<Vec<_>>()
            })
            .heuristic(|c: &Counter| f64::from(10u32.saturating_sub(c.value)) / 3.0)
            .on_complete(move |outcome| {
                let _ = tx.send(outcome);
            }),
    )
    .unwrap();

    assert_eq!(handle.join().await.unwrap().status, SearchStatus::Solved);
    let outcome = rx.await.unwrap();
    // 10 = 3 + 3 + 3 + 1 in some order: four moves.
    assert_eq!(outcome.cost, 4);
    let total: u32 = outcome.actions.iter().flatten().sum();
    assert_eq!(total, 10);
}
