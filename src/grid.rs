use core::str::FromStr;
use std::fmt;

use enum_map::Enum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Edge length of the board.
pub const SIZE: usize = 4;

/// `(row, col)`, row-major from the top left corner.
pub type Position = (usize, usize);

pub type Cells = [[u32; SIZE]; SIZE];

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Enum)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
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

    pub fn invert(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Maps a position in the left-sliding frame of this direction back onto the board.
    pub fn board_position(self, row: usize, col: usize) -> Position {
        let last = SIZE - 1;

        match self {
            Direction::Up => (col, row),
            Direction::Down => (last - col, row),
            Direction::Left => (row, col),
            Direction::Right => (row, last - col),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Direction::Up),
            "d" | "down" => Ok(Direction::Down),
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            _ => Err(EngineError::invalid(format!("unknown direction: {:?}", s))),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| EngineError::invalid(format!("direction code out of range: {}", code)))
    }
}

/// Largest tile a cell may hold. Two of them sit side by side without merging.
pub const MAX_TILE: u32 = 1 << 30;

/// Whether `value` may sit in a cell: empty, or a power of two from 2 up to [`MAX_TILE`].
pub fn is_tile_value(value: u32) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

/// The fixed 4x4 board of tile values, 0 meaning empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Cells", into = "Cells"))]
pub struct Grid {
    cells: Cells,
}

pub struct GridIter<'a> {
    grid: &'a Grid,
    pos: usize,
}

impl Grid {
    pub const EMPTY: Grid = Grid {
        cells: [[0; SIZE]; SIZE],
    };

    pub fn from_rows(cells: Cells) -> Result<Self, EngineError> {
        for (row, values) in cells.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !is_tile_value(value) {
                    return Err(EngineError::invalid(format!(
                        "invalid tile value {} at ({}, {})",
                        value, row, col
                    )));
                }
            }
        }

        Ok(Self { cells })
    }

    pub fn rows(&self) -> &Cells {
        &self.cells
    }

    pub fn row(&self, row: usize) -> Option<&[u32; SIZE]> {
        self.cells.get(row)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) -> Result<(), EngineError> {
        if row >= SIZE || col >= SIZE {
            Err(EngineError::invalid(format!("cell out of range: ({}, {})", row, col)))?
        }

        if !is_tile_value(value) {
            Err(EngineError::invalid(format!("invalid tile value {}", value)))?
        }

        self.cells[row][col] = value;

        Ok(())
    }

    pub(crate) fn set_row(&mut self, row: usize, values: [u32; SIZE]) {
        self.cells[row] = values;
    }

    pub fn iter(&self) -> GridIter<'_> {
        GridIter { grid: self, pos: 0 }
    }

    pub fn empty_cells(&self) -> Vec<Position> {
        self.iter()
            .filter(|&(_, _, value)| value == 0)
            .map(|(row, col, _)| (row, col))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.iter().filter(|&(_, _, value)| value == 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.count_empty() == 0
    }

    pub fn highest_tile(&self) -> u32 {
        self.iter().map(|(_, _, value)| value).max().unwrap_or(0)
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Self {
        let mut cells = [[0; SIZE]; SIZE];

        for (row, col, value) in self {
            cells[col][row] = value;
        }

        Self { cells }
    }

    /// Reverses the order of values within every row.
    pub fn reverse_rows(&self) -> Self {
        let mut cells = self.cells;

        for row in cells.iter_mut() {
            row.reverse();
        }

        Self { cells }
    }

    /// Reorients the grid so that moving in `direction` becomes a left slide.
    pub fn oriented(&self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.transpose(),
            Direction::Down => self.transpose().reverse_rows(),
            Direction::Left => *self,
            Direction::Right => self.reverse_rows(),
        }
    }

    /// Exact inverse of [`Grid::oriented`].
    pub fn restored(&self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.transpose(),
            Direction::Down => self.reverse_rows().transpose(),
            Direction::Left => *self,
            Direction::Right => self.reverse_rows(),
        }
    }
}

impl TryFrom<Cells> for Grid {
    type Error = EngineError;

    fn try_from(cells: Cells) -> Result<Self, Self::Error> {
        Grid::from_rows(cells)
    }
}

impl From<Grid> for Cells {
    fn from(grid: Grid) -> Self {
        grid.cells
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = (usize, usize, u32);
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> Iterator for GridIter<'a> {
    type Item = (usize, usize, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= SIZE * SIZE {
            None
        } else {
            let row = self.pos / SIZE;
            let col = self.pos % SIZE;
            let value = self.grid.cells[row][col];

            self.pos += 1;

            Some((row, col, value))
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.cells.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
                writeln!(f, "{}", "-".repeat(SIZE * 7 - 1))?;
            }

            let line: Vec<String> = row
                .iter()
                .map(|&value| match value {
                    0 => " ".repeat(6),
                    value => format!("{:>6}", value),
                })
                .collect();

            write!(f, "{}", line.join("|"))?;
        }

        Ok(())
    }
}
