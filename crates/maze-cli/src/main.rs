mod config;
mod report;
mod solve;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::SearchOverrides;
use solve::SolveArgs;

/// astar-maze: solve a text-grid maze with interruptible A* search.
#[derive(Parser)]
#[command(name = "astar-maze", version, about)]
struct Cli {
    /// Path to the maze file (`#` wall, `.` floor, `S` start, `G` goal).
    #[arg(long)]
    maze: PathBuf,
    /// Path to a TOML config file with a `[search]` section.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the search deadline in milliseconds (0 = unbounded).
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Re-expand closed cells when a cheaper path to them is found.
    #[arg(long)]
    reopen_closed: bool,
    /// Output as JSON instead of human-readable text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays parseable with --json.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    solve::run_solve(SolveArgs {
        maze: cli.maze,
        config: cli.config,
        overrides: SearchOverrides {
            timeout_ms: cli.timeout_ms,
            reopen_closed: cli.reopen_closed,
        },
        json: cli.json,
    })
    .await
}
