//! Sliding and merging of a single row towards index 0.

use crate::grid::{MAX_TILE, SIZE};

/// Where one tile of the input row ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMove {
    pub from: usize,
    pub to: usize,
    /// Value of the tile before the slide.
    pub value: u32,
    /// Whether the tile was combined with its neighbour at `to`.
    pub merged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineShift {
    pub cells: [u32; SIZE],
    /// Sum of the values produced by merges.
    pub score: u64,
    pub moves: Vec<LineMove>,
}

impl LineShift {
    pub fn changed(&self, before: &[u32; SIZE]) -> bool {
        &self.cells != before
    }
}

/// Compacts the non-empty tiles to the left, then merges equal neighbours in a single
/// left-to-right pass. A tile produced by a merge is never merged again, and tiles
/// already at [`MAX_TILE`] do not merge.
pub fn shift_left(line: &[u32; SIZE]) -> LineShift {
    let tiles: Vec<(usize, u32)> = line
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, value)| value != 0)
        .collect();

    let mut cells = [0; SIZE];
    let mut score = 0;
    let mut moves = Vec::with_capacity(tiles.len());
    let mut index = 0;
    let mut target = 0;

    while index < tiles.len() {
        let (from, value) = tiles[index];

        match tiles.get(index + 1) {
            Some(&(next_from, next_value)) if next_value == value && value < MAX_TILE => {
                let merged = value * 2;

                cells[target] = merged;
                score += merged as u64;

                moves.push(LineMove { from, to: target, value, merged: true });
                moves.push(LineMove { from: next_from, to: target, value, merged: true });

                index += 2;
            }
            _ => {
                cells[target] = value;
                moves.push(LineMove { from, to: target, value, merged: false });

                index += 1;
            }
        }

        target += 1;
    }

    LineShift { cells, score, moves }
}
