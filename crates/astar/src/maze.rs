//! Rectangular grid mazes as a ready-made state space.
//!
//! Text format, one row per line:
//!
//! ```text
//! #######
//! #S#..G#
//! #...#.#
//! #######
//! ```
//!
//! `#` is a wall, `.` or a space is open floor, `S` marks the single start
//! cell and `G` marks a goal (there may be several). Empty lines are skipped.

use std::sync::Arc;

use crate::engine::{Heuristic, Neighbors};
use crate::node::{Classification, SearchState};

/// Errors building a [`GridMaze`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell {ch:?} at row {row}, column {col}")]
    UnknownCell { ch: char, row: usize, col: usize },
    #[error("unknown cell code {code} at row {row}, column {col}")]
    UnknownCode { code: i8, row: usize, col: usize },
    #[error("maze has no start cell `S`")]
    MissingStart,
    #[error("maze has more than one start cell: {first:?} and {second:?}")]
    MultipleStarts {
        first: (usize, usize),
        second: (usize, usize),
    },
    #[error("start ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// A cardinal move. Integer codes: North 0, East 1, South 2, West 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Order in which a cell's neighbors are generated.
    pub const EXPANSION_ORDER: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    pub fn code(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::North),
            1 => Some(Self::East),
            2 => Some(Self::South),
            3 => Some(Self::West),
            _ => None,
        }
    }

    /// The cell one move away, or `None` if it falls off the grid.
    fn step(self, x: usize, y: usize, width: usize, height: usize) -> Option<(usize, usize)> {
        let (nx, ny) = match self {
            Self::North => (Some(x), y.checked_sub(1)),
            Self::East => (x.checked_add(1), Some(y)),
            Self::South => (Some(x), y.checked_add(1)),
            Self::West => (x.checked_sub(1), Some(y)),
        };
        match (nx, ny) {
            (Some(nx), Some(ny)) if nx < width && ny < height => Some((nx, ny)),
            _ => None,
        }
    }
}

/// A position in a [`GridMaze`] plus the move that reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeState {
    pub x: usize,
    pub y: usize,
    pub cell: Classification,
    pub action: Option<Direction>,
}

impl SearchState for MazeState {
    type Id = (usize, usize);
    type Action = Direction;

    fn identity(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    fn classification(&self) -> Classification {
        self.cell
    }

    fn action(&self) -> Option<Direction> {
        self.action
    }
}

#[derive(Debug)]
struct Grid {
    /// Row-major.
    cells: Vec<Classification>,
    width: usize,
    height: usize,
    start: (usize, usize),
    goals: Vec<(usize, usize)>,
}

/// Immutable grid maze; cheap to clone and share between the neighbor and
/// heuristic slots of a search.
#[derive(Debug, Clone)]
pub struct GridMaze {
    grid: Arc<Grid>,
}

impl GridMaze {
    /// Parse the text format described in the module docs.
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.first().ok_or(MazeError::Empty)?.chars().count();

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut start: Option<(usize, usize)> = None;
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MazeError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => Classification::Unsolvable,
                    '.' | ' ' => Classification::Open,
                    'G' => Classification::Goal,
                    'S' => {
                        if let Some(first) = start {
                            return Err(MazeError::MultipleStarts {
                                first,
                                second: (col, row),
                            });
                        }
                        start = Some((col, row));
                        Classification::Open
                    }
                    _ => return Err(MazeError::UnknownCell { ch, row, col }),
                };
                cells.push(cell);
            }
        }

        let start = start.ok_or(MazeError::MissingStart)?;
        Ok(Self::from_cells(cells, width, rows.len(), start))
    }

    /// Build from integer cell codes (`-1` wall, `0` open, `1` goal) and an
    /// explicit `(x, y)` start.
    pub fn from_codes<R: AsRef<[i8]>>(rows: &[R], start: (usize, usize)) -> Result<Self, MazeError> {
        let first: &[i8] = rows.first().ok_or(MazeError::Empty)?.as_ref();
        let width = first.len();
        let height = rows.len();

        let mut cells = Vec::with_capacity(width * height);
        for (row, codes) in rows.iter().enumerate() {
            let codes: &[i8] = codes.as_ref();
            if codes.len() != width {
                return Err(MazeError::Ragged {
                    row,
                    expected: width,
                    found: codes.len(),
                });
            }
            for (col, &code) in codes.iter().enumerate() {
                let cell = Classification::from_code(code)
                    .ok_or(MazeError::UnknownCode { code, row, col })?;
                cells.push(cell);
            }
        }

        let (x, y) = start;
        if x >= width || y >= height {
            return Err(MazeError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        Ok(Self::from_cells(cells, width, height, start))
    }

    fn from_cells(
        cells: Vec<Classification>,
        width: usize,
        height: usize,
        start: (usize, usize),
    ) -> Self {
        let goals = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Classification::Goal)
            .map(|(i, _)| (i % width, i / width))
            .collect();
        Self {
            grid: Arc::new(Grid {
                cells,
                width,
                height,
                start,
                goals,
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn start(&self) -> (usize, usize) {
        self.grid.start
    }

    pub fn goals(&self) -> &[(usize, usize)] {
        &self.grid.goals
    }

    /// Classification of the cell at `(x, y)`, `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<Classification> {
        if x < self.grid.width && y < self.grid.height {
            Some(self.grid.cells[y * self.grid.width + x])
        } else {
            None
        }
    }

    /// The search's initial state: the start cell with no action.
    pub fn start_state(&self) -> MazeState {
        let (x, y) = self.grid.start;
        MazeState {
            x,
            y,
            cell: self.grid.cells[y * self.grid.width + x],
            action: None,
        }
    }

    /// Manhattan distance to the nearest goal, `0` if the maze has none.
    pub fn distance_to_goal(&self, x: usize, y: usize) -> usize {
        self.grid
            .goals
            .iter()
            .map(|&(gx, gy)| gx.abs_diff(x) + gy.abs_diff(y))
            .min()
            .unwrap_or(0)
    }

    /// Draw the maze with the cells visited by `actions` marked `*`.
    ///
    /// `actions` is a path as produced by a search: the first element (the
    /// start's `None`) is skipped and moves falling off the grid stop the
    /// trace.
    pub fn render_path(&self, actions: &[Option<Direction>]) -> String {
        let Grid {
            width,
            height,
            start,
            ..
        } = *self.grid;
        let mut canvas: Vec<Vec<char>> = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| match self.grid.cells[y * width + x] {
                        Classification::Unsolvable => '#',
                        Classification::Open => '.',
                        Classification::Goal => 'G',
                    })
                    .collect()
            })
            .collect();

        let (mut x, mut y) = start;
        for dir in actions.iter().flatten() {
            match dir.step(x, y, width, height) {
                Some((nx, ny)) => (x, y) = (nx, ny),
                None => break,
            }
            if canvas[y][x] == '.' {
                canvas[y][x] = '*';
            }
        }
        canvas[start.1][start.0] = 'S';

        canvas
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Neighbors<MazeState> for GridMaze {
    /// The up-to-four adjacent cells in [`Direction::EXPANSION_ORDER`].
    /// Walls are returned as unsolvable states; cells off the grid are
    /// skipped.
    fn neighbors(&self, state: &MazeState) -> Vec<MazeState> {
        let Grid { width, height, .. } = *self.grid;
        Direction::EXPANSION_ORDER
            .iter()
            .filter_map(|&dir| {
                let (x, y) = dir.step(state.x, state.y, width, height)?;
                Some(MazeState {
                    x,
                    y,
                    cell: self.grid.cells[y * width + x],
                    action: Some(dir),
                })
            })
            .collect()
    }
}

impl Heuristic<MazeState> for GridMaze {
    fn estimate(&self, state: &MazeState) -> f64 {
        self.distance_to_goal(state.x, state.y) as f64
    }
}
