//! Hex board geometry: cell enumeration, directions, neighbor table,
//! insertion points and capture lines.
//!
//! The board has 61 cells arranged in 9 files (columns) of
//! 5/6/7/8/9/8/7/6/5 cells. Files are numbered 0..9 from left to right,
//! rows 0.. from the bottom of each file. The tables below are built once
//! and shared read-only.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Number of playable cells
pub const CELL_COUNT: usize = 61;

/// Number of files (columns)
pub const FILE_COUNT: usize = 9;

/// Cells per file
pub const FILE_LENGTHS: [u8; FILE_COUNT] = [5, 6, 7, 8, 9, 8, 7, 6, 5];

/// Index of the first cell of each file in the canonical enumeration
pub const FILE_STARTS: [u8; FILE_COUNT] = [0, 5, 11, 18, 26, 35, 43, 50, 56];

/// The longest file; the column deltas of diagonal steps flip around it
const MID_FILE: i8 = 4;

/// Shortest line that can hold a capture
pub const MIN_LINE_LENGTH: usize = 4;

// ============================================================================
// POSITION
// ============================================================================

/// A board cell, indexed in canonical file-major order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position(u8);

impl Position {
    /// Middle cell of the middle file
    pub const CENTER: Position = Position(FILE_STARTS[4] + 4);

    /// Cell at canonical index, if in range
    pub fn new(index: usize) -> Option<Self> {
        (index < CELL_COUNT).then(|| Position(index as u8))
    }

    /// Cell at (file, row), if on the board
    pub fn from_coords(file: i8, row: i8) -> Option<Self> {
        if is_on_board(file, row) {
            Some(Position(FILE_STARTS[file as usize] + row as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn file(self) -> i8 {
        FILE_STARTS
            .iter()
            .rposition(|&start| start <= self.0)
            .map_or(0, |file| file as i8)
    }

    pub fn row(self) -> i8 {
        (self.0 - FILE_STARTS[self.file() as usize]) as i8
    }

    /// All cells in canonical order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT as u8).map(Position)
    }

    /// Adjacent cell in `direction`, or `None` past the board edge
    pub fn neighbor(self, direction: Direction) -> Option<Position> {
        GEOMETRY.neighbor(self, direction)
    }

    /// Hex distance from the center cell (0..=4)
    pub fn distance_to_center(self) -> u8 {
        GEOMETRY.distance_to_center(self)
    }

    /// True for the 24 cells on the outer ring
    pub fn is_perimeter(self) -> bool {
        Direction::ALL.iter().any(|&dir| self.neighbor(dir).is_none())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = (b'a' + self.file() as u8) as char;
        write!(f, "{}{}", letter, self.row() + 1)
    }
}

/// Check if (file, row) lies on the board
pub fn is_on_board(file: i8, row: i8) -> bool {
    (0..FILE_COUNT as i8).contains(&file)
        && row >= 0
        && row < FILE_LENGTHS[file as usize] as i8
}

// ============================================================================
// DIRECTION
// ============================================================================

/// Push / line direction
///
/// ```text
///        N
///   NW   |   NE
///      >-o-<
///   SW   |   SE
///        S
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    S,
    NE,
    NW,
    SE,
    SW,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::N,
        Direction::S,
        Direction::NE,
        Direction::NW,
        Direction::SE,
        Direction::SW,
    ];

    /// One direction per axis; lines are built walking these
    pub const AXES: [Direction; 3] = [Direction::N, Direction::NE, Direction::SE];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn reverse(self) -> Self {
        match self {
            Direction::N => Direction::S,
            Direction::S => Direction::N,
            Direction::NE => Direction::SW,
            Direction::SW => Direction::NE,
            Direction::NW => Direction::SE,
            Direction::SE => Direction::NW,
        }
    }

    /// Raw (file, row) step; the result may be off the board
    fn step(self, file: i8, row: i8) -> (i8, i8) {
        match self {
            Direction::N => (file, row + 1),
            Direction::S => (file, row - 1),
            Direction::NE if file < MID_FILE => (file + 1, row + 1),
            Direction::NE => (file + 1, row),
            Direction::SE if file < MID_FILE => (file + 1, row),
            Direction::SE => (file + 1, row - 1),
            Direction::SW if file <= MID_FILE => (file - 1, row - 1),
            Direction::SW => (file - 1, row),
            Direction::NW if file <= MID_FILE => (file - 1, row),
            Direction::NW => (file - 1, row + 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::N => "N",
            Direction::S => "S",
            Direction::NE => "NE",
            Direction::NW => "NW",
            Direction::SE => "SE",
            Direction::SW => "SW",
        };
        f.write_str(name)
    }
}

// ============================================================================
// GEOMETRY TABLES
// ============================================================================

/// An edge cell where new pieces enter, with its legal push directions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertionPoint {
    pub position: Position,
    pub directions: Vec<Direction>,
}

/// A maximal straight run of cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub direction: Direction,
    pub cells: Vec<Position>,
}

/// Precomputed board tables
#[derive(Debug)]
pub struct Geometry {
    neighbors: [[Option<Position>; 6]; CELL_COUNT],
    distances: [u8; CELL_COUNT],
    entries: [[bool; 6]; CELL_COUNT],
    insertion_points: Vec<InsertionPoint>,
    lines: Vec<Line>,
}

/// Process-wide geometry, built on first use
pub static GEOMETRY: Lazy<Geometry> = Lazy::new(Geometry::build);

impl Geometry {
    fn build() -> Self {
        let mut neighbors = [[None; 6]; CELL_COUNT];
        for pos in Position::all() {
            for dir in Direction::ALL {
                let (file, row) = dir.step(pos.file(), pos.row());
                neighbors[pos.index()][dir.index()] = Position::from_coords(file, row);
            }
        }

        let next = |pos: Position, dir: Direction| neighbors[pos.index()][dir.index()];
        let on_perimeter =
            |pos: Position| Direction::ALL.iter().any(|&dir| next(pos, dir).is_none());

        // Ring index by breadth-first search from the center
        let mut distances = [u8::MAX; CELL_COUNT];
        let mut queue = VecDeque::from([Position::CENTER]);
        distances[Position::CENTER.index()] = 0;
        while let Some(pos) = queue.pop_front() {
            for dir in Direction::ALL {
                if let Some(adj) = next(pos, dir) {
                    if distances[adj.index()] == u8::MAX {
                        distances[adj.index()] = distances[pos.index()] + 1;
                        queue.push_back(adj);
                    }
                }
            }
        }

        // Entry directions: nothing behind, an interior cell ahead
        let mut entries = [[false; 6]; CELL_COUNT];
        let mut insertion_points = Vec::new();
        for pos in Position::all().filter(|&pos| on_perimeter(pos)) {
            let directions: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|&dir| {
                    next(pos, dir.reverse()).is_none()
                        && next(pos, dir).map_or(false, |ahead| !on_perimeter(ahead))
                })
                .collect();
            for &dir in &directions {
                entries[pos.index()][dir.index()] = true;
            }
            insertion_points.push(InsertionPoint { position: pos, directions });
        }

        let mut lines = Vec::new();
        for dir in Direction::AXES {
            for start in Position::all().filter(|&pos| next(pos, dir.reverse()).is_none()) {
                let mut cells = vec![start];
                let mut current = start;
                while let Some(ahead) = next(current, dir) {
                    cells.push(ahead);
                    current = ahead;
                }
                if cells.len() >= MIN_LINE_LENGTH {
                    lines.push(Line { direction: dir, cells });
                }
            }
        }

        Self {
            neighbors,
            distances,
            entries,
            insertion_points,
            lines,
        }
    }

    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        self.neighbors[pos.index()][dir.index()]
    }

    pub fn distance_to_center(&self, pos: Position) -> u8 {
        self.distances[pos.index()]
    }

    /// Edge cells and their entry directions
    pub fn insertion_points(&self) -> &[InsertionPoint] {
        &self.insertion_points
    }

    /// True if a piece may be introduced at `pos` pushing toward `dir`
    pub fn is_entry(&self, pos: Position, dir: Direction) -> bool {
        self.entries[pos.index()][dir.index()]
    }

    /// Every maximal line of length >= 4
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}
