//! Fixed 4x4 board and pure spatial queries
//!
//! The board is the single source of truth for tile placement. Tiles are
//! only ever addressed through `Pos`, which is bounds-checked on creation.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

/// A cell coordinate, always inside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    /// Returns None for coordinates outside the grid
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < GRID_SIZE && col < GRID_SIZE).then_some(Self { row, col })
    }

    /// Step by a signed offset (x = col, y = row), clipped to the grid
    pub fn offset(self, delta: IVec2) -> Option<Self> {
        let row = self.row as i32 + delta.y;
        let col = self.col as i32 + delta.x;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as usize, col as usize)
    }

    /// Every cell in row-major order
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Pos { row, col }))
    }

    /// The 3x3 block centred here, clipped to the grid (row-major)
    pub fn neighborhood(self) -> Vec<Pos> {
        let mut cells = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(p) = self.offset(IVec2::new(dx, dy)) {
                    cells.push(p);
                }
            }
        }
        cells
    }
}

/// Slide directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "w" => Some(Direction::Up),
            "down" | "s" => Some(Direction::Down),
            "left" | "a" => Some(Direction::Left),
            "right" | "d" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit step (x = col, y = row)
    pub fn vector(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Row and column visiting order: cells nearest the target wall come first
    pub fn traversal(&self) -> ([usize; GRID_SIZE], [usize; GRID_SIZE]) {
        let forward: [usize; GRID_SIZE] = std::array::from_fn(|i| i);
        let mut backward = forward;
        backward.reverse();
        let v = self.vector();
        let rows = if v.y == 1 { backward } else { forward };
        let cols = if v.x == 1 { backward } else { forward };
        (rows, cols)
    }
}

/// A placed tile as seen by collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub value: u64,
}

impl Tile {
    pub fn pos(&self) -> Pos {
        Pos {
            row: self.row,
            col: self.col,
        }
    }
}

/// Result of walking from a tile toward a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reach {
    /// Last empty cell before an obstacle (or the start cell)
    pub farthest: Pos,
    /// First occupied cell beyond `farthest`, None when the wall was hit
    pub next: Option<Pos>,
}

/// The 4x4 playfield. `cells[row][col]` holds a tile value or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<u64>; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from literal rows, 0 meaning empty (handy for scenarios)
    pub fn from_rows(rows: [[u64; GRID_SIZE]; GRID_SIZE]) -> Self {
        let mut board = Self::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value != 0 {
                    board.cells[r][c] = Some(value);
                }
            }
        }
        board
    }

    /// Literal rows, 0 meaning empty
    pub fn to_rows(&self) -> [[u64; GRID_SIZE]; GRID_SIZE] {
        self.cells.map(|row| row.map(|cell| cell.unwrap_or(0)))
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Option<u64> {
        self.cells[pos.row][pos.col]
    }

    #[inline]
    pub fn is_empty_at(&self, pos: Pos) -> bool {
        self.get(pos).is_none()
    }

    #[inline]
    pub fn place(&mut self, pos: Pos, value: u64) {
        self.cells[pos.row][pos.col] = Some(value);
    }

    /// Take the tile out of a cell
    #[inline]
    pub fn remove(&mut self, pos: Pos) -> Option<u64> {
        self.cells[pos.row][pos.col].take()
    }

    /// Move a tile; the destination must be empty
    pub fn relocate(&mut self, from: Pos, to: Pos) {
        if let Some(value) = self.remove(from) {
            debug_assert!(self.is_empty_at(to), "relocating onto occupied cell");
            self.place(to, value);
        }
    }

    /// Occupied cells as tiles, row-major
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        Pos::all().filter_map(|pos| {
            self.get(pos).map(|value| Tile {
                row: pos.row,
                col: pos.col,
                value,
            })
        })
    }

    pub fn empty_cells(&self) -> Vec<Pos> {
        Pos::all().filter(|&p| self.is_empty_at(p)).collect()
    }

    pub fn occupied_cells(&self) -> Vec<Pos> {
        Pos::all().filter(|&p| !self.is_empty_at(p)).collect()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Sum of all tile values
    pub fn total_value(&self) -> u64 {
        self.tiles().map(|t| t.value).sum()
    }

    pub fn max_value(&self) -> Option<u64> {
        self.tiles().map(|t| t.value).max()
    }

    /// Walk from `from` in `dir` while cells are empty and in bounds
    pub fn reach(&self, from: Pos, dir: Direction) -> Reach {
        let step = dir.vector();
        let mut farthest = from;
        loop {
            match farthest.offset(step) {
                Some(cell) if self.is_empty_at(cell) => farthest = cell,
                Some(cell) => {
                    return Reach {
                        farthest,
                        next: Some(cell),
                    };
                }
                None => {
                    return Reach {
                        farthest,
                        next: None,
                    };
                }
            }
        }
    }

    /// No empty cell and no equal right/down neighbours
    pub fn is_stuck(&self) -> bool {
        for pos in Pos::all() {
            let Some(value) = self.get(pos) else {
                return false;
            };
            let right = pos.offset(IVec2::new(1, 0)).and_then(|p| self.get(p));
            let down = pos.offset(IVec2::new(0, 1)).and_then(|p| self.get(p));
            if right == Some(value) || down == Some(value) {
                return false;
            }
        }
        true
    }
}
