//! Maze solving pipeline: load, configure, search, report.

use std::path::PathBuf;

use astar::{GridMaze, SearchConfig, SearchOptions, SearchStatus};

use crate::config::{apply_overrides, load_maze_toml, SearchOverrides};
use crate::report::SolveReport;

/// Arguments for a single solve.
#[derive(Debug)]
pub struct SolveArgs {
    /// Path to the text maze.
    pub maze: PathBuf,
    /// Optional TOML config with a `[search]` section.
    pub config: Option<PathBuf>,
    pub overrides: SearchOverrides,
    /// Print JSON instead of text.
    pub json: bool,
}

/// Solve one maze and print the report to stdout.
///
/// Returns an error if the maze or config cannot be loaded, the search
/// faults, or the search times out.
pub async fn run_solve(args: SolveArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.maze)
        .map_err(|e| anyhow::anyhow!("Failed to read maze {}: {e}", args.maze.display()))?;
    let maze = GridMaze::parse(&text)?;
    tracing::info!(
        path = %args.maze.display(),
        width = maze.width(),
        height = maze.height(),
        goals = maze.goals().len(),
        "Loaded maze"
    );

    let config = match &args.config {
        Some(path) => load_maze_toml(path)?.search,
        None => SearchConfig::default(),
    };
    let config = apply_overrides(config, args.overrides);

    let mut engine = SearchOptions::new()
        .initial(maze.start_state())
        .neighbors(maze.clone())
        .heuristic(maze.clone())
        .config(config)
        .on_complete(|outcome| {
            tracing::debug!(success = outcome.success, cost = outcome.cost, "Search complete");
        })
        .on_timeout(|| tracing::warn!("Search deadline reached"))
        .build()?;

    let status = engine.run().await?;

    let mut report = SolveReport::new(
        args.maze.display().to_string(),
        status,
        engine.outcome(),
        engine.stats().clone(),
    );
    if let Some(path) = engine.solution_path() {
        report = report.with_rendered(maze.render_path(&path));
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    if status == SearchStatus::TimedOut {
        anyhow::bail!(
            "search timed out after {}ms",
            engine.stats().wall_time_ms
        );
    }
    Ok(())
}
