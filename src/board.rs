use std::fmt;

use log::{debug, trace};
use rand::{thread_rng, Rng, RngCore, SeedableRng};
use rand_xorshift::XorShiftRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::grid::{Direction, Grid, Position, SIZE};
use crate::line::shift_left;

/// Chance that a spawned tile is a 2 rather than a 4.
pub const TWO_PROBABILITY: f64 = 0.9;

/// A tile placed by [`Board::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spawn {
    pub position: Position,
    pub value: u32,
}

/// Movement of one tile present before a shift.
///
/// Every tile produces exactly one transition. Two transitions with `merged` set share a
/// destination, which then holds `value * 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    pub from: Position,
    pub to: Position,
    pub value: u32,
    pub merged: bool,
}

impl Transition {
    pub fn is_stationary(&self) -> bool {
        self.from == self.to && !self.merged
    }
}

/// Result of sliding the board in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shift {
    moved: bool,
    score: u64,
    transitions: Vec<Transition>,
}

impl Shift {
    /// Whether any cell differs from the grid before the shift.
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Points gained, the sum of every merged value.
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Destinations of the merges, with the value they now hold.
    pub fn merges(&self) -> Vec<(Position, u32)> {
        let mut merges: Vec<(Position, u32)> = self
            .transitions
            .iter()
            .filter(|t| t.merged)
            .map(|t| (t.to, t.value * 2))
            .collect();

        merges.dedup();
        merges
    }
}

/// Slides `grid` in `direction` without touching any engine state.
pub fn shift_grid(grid: &Grid, direction: Direction) -> (Grid, Shift) {
    let oriented = grid.oriented(direction);
    let mut shifted = Grid::EMPTY;
    let mut score = 0;
    let mut transitions = Vec::with_capacity(SIZE * SIZE);

    for (row, line) in oriented.rows().iter().enumerate() {
        let result = shift_left(line);

        score += result.score;
        transitions.extend(result.moves.iter().map(|m| Transition {
            from: direction.board_position(row, m.from),
            to: direction.board_position(row, m.to),
            value: m.value,
            merged: m.merged,
        }));

        shifted.set_row(row, result.cells);
    }

    let shifted = shifted.restored(direction);
    let moved = shifted != *grid;

    (shifted, Shift { moved, score, transitions })
}

/// The 2048 board engine: owns the grid, the score and the tile RNG.
///
/// All mutation goes through [`Board::initialize`], [`Board::shift`] and
/// [`Board::spawn`].
pub struct Board {
    grid: Grid,
    score: u64,
    rng: Box<dyn RngCore>,
}

impl Board {
    /// An initialized board with an RNG seeded from the thread RNG.
    pub fn new() -> Self {
        let rng = XorShiftRng::from_rng(thread_rng()).unwrap_or_else(|_| XorShiftRng::seed_from_u64(0));
        let mut board = Self::with_rng(rng);

        board.initialize();
        board
    }

    /// An initialized board whose tile placement is reproducible from `seed`.
    pub fn seeded(seed: u64) -> Self {
        let mut board = Self::with_rng(XorShiftRng::seed_from_u64(seed));

        board.initialize();
        board
    }

    /// An empty, uninitialized board drawing from `rng`.
    pub fn with_rng<R: RngCore + 'static>(rng: R) -> Self {
        Self {
            grid: Grid::EMPTY,
            score: 0,
            rng: Box::new(rng),
        }
    }

    /// A board in an arbitrary state, e.g. to replay a position.
    pub fn from_parts<R: RngCore + 'static>(grid: Grid, score: u64, rng: R) -> Self {
        Self {
            grid,
            score,
            rng: Box::new(rng),
        }
    }

    /// Clears the grid and score and places the two starting tiles.
    pub fn initialize(&mut self) {
        self.grid = Grid::EMPTY;
        self.score = 0;

        for _ in 0..2 {
            if let Err(err) = self.spawn() {
                debug!("Initial spawn skipped: {}", err);
            }
        }
    }

    /// Places a 2 (90%) or a 4 (10%) in a uniformly chosen empty cell.
    ///
    /// Returns [`EngineError::BoardFull`] and leaves the board untouched when no cell is
    /// empty.
    pub fn spawn(&mut self) -> Result<Spawn, EngineError> {
        let empty = self.grid.empty_cells();

        if empty.is_empty() {
            return Err(EngineError::BoardFull);
        }

        let position = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen_bool(TWO_PROBABILITY) { 2 } else { 4 };

        self.grid.set(position.0, position.1, value)?;

        debug!("Spawned {} at {:?}", value, position);

        Ok(Spawn { position, value })
    }

    /// Slides and merges every tile towards `direction`, adding merged values to the
    /// score.
    pub fn shift(&mut self, direction: Direction) -> Shift {
        let (grid, shift) = shift_grid(&self.grid, direction);

        if shift.moved() {
            self.grid = grid;
            self.score += shift.score();
        }

        debug!(
            "Shift {}: moved {}, +{} (score {})",
            direction,
            shift.moved(),
            shift.score(),
            self.score
        );

        for transition in shift.transitions().iter().filter(|t| !t.is_stationary()) {
            trace!("{:?}", transition);
        }

        shift
    }

    /// Like [`Board::shift`] but takes the direction by name.
    pub fn shift_named(&mut self, direction: &str) -> Result<Shift, EngineError> {
        Ok(self.shift(direction.parse()?))
    }

    pub fn can_shift(&self, direction: Direction) -> bool {
        shift_grid(&self.grid, direction).1.moved()
    }

    pub fn has_moves(&self) -> bool {
        Direction::ALL.iter().any(|&direction| self.can_shift(direction))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("grid", &self.grid)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(cells: [[u32; SIZE]; SIZE]) -> Board {
        Board::from_parts(Grid::from_rows(cells).unwrap(), 0, XorShiftRng::seed_from_u64(7))
    }

    #[test]
    fn test_move_left() {
        let mut game = board([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        game.shift(Direction::Left);
        assert_eq!(
            game.grid().rows(),
            &[[2, 4, 8, 16], [2, 16, 4, 0], [8, 0, 0, 0], [2, 4, 0, 0]]
        );
        assert_eq!(game.score(), 24);
    }

    #[test]
    fn test_move_right() {
        let mut game = board([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        game.shift(Direction::Right);
        assert_eq!(
            game.grid().rows(),
            &[[2, 4, 8, 16], [0, 2, 16, 4], [0, 0, 0, 8], [0, 0, 2, 4]]
        );
    }

    #[test]
    fn test_move_up() {
        let mut game = board([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        game.shift(Direction::Up);
        assert_eq!(
            game.grid().rows(),
            &[[2, 2, 8, 2], [4, 16, 0, 4], [8, 4, 0, 0], [16, 0, 0, 0]]
        );
        assert_eq!(game.score(), 24);
    }

    #[test]
    fn test_move_down() {
        let mut game = board([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        game.shift(Direction::Down);
        assert_eq!(
            game.grid().rows(),
            &[[2, 0, 0, 0], [4, 2, 0, 0], [8, 16, 0, 2], [16, 4, 8, 4]]
        );
    }

    #[test]
    fn transitions_rebuild_the_shifted_grid() {
        let start = [[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]];

        for direction in Direction::ALL {
            let mut game = board(start);
            let tiles = 16 - game.grid().count_empty();
            let shift = game.shift(direction);

            assert_eq!(shift.transitions().len(), tiles);

            let mut rebuilt = Grid::EMPTY;
            for t in shift.transitions() {
                assert_eq!(Grid::from_rows(start).unwrap().get(t.from.0, t.from.1), Some(t.value));
                let value = if t.merged { t.value * 2 } else { t.value };
                rebuilt.set(t.to.0, t.to.1, value).unwrap();
            }

            assert_eq!(&rebuilt, game.grid(), "{}", direction);
        }
    }

    #[test]
    fn merges_report_destinations() {
        let mut game = board([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);
        let shift = game.shift(Direction::Right);

        assert_eq!(shift.merges(), vec![((0, 3), 4), ((0, 2), 4)]);
        assert_eq!(shift.score(), 8);
    }

    #[test]
    fn blocked_shift_is_idempotent() {
        let mut game = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let before = *game.grid();

        for direction in Direction::ALL {
            assert!(!game.shift(direction).moved());
            assert_eq!(game.grid(), &before);
            assert_eq!(game.score(), 0);
        }

        assert!(!game.has_moves());
    }

    #[test]
    fn shift_named_rejects_unknown_directions() {
        let mut game = board([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);

        assert!(matches!(game.shift_named("sideways"), Err(EngineError::InvalidArgument(_))));
        assert_eq!(game.grid().get(0, 1), Some(2));
        assert!(game.shift_named("LEFT").unwrap().moved());
    }

    #[test]
    fn initialize_places_two_tiles() {
        let mut game = Board::seeded(3);
        assert_eq!(game.grid().count_empty(), 14);
        assert_eq!(game.score(), 0);

        game.shift(Direction::Up);
        game.initialize();
        assert_eq!(game.grid().count_empty(), 14);
        assert_eq!(game.score(), 0);
        assert!(game.grid().iter().all(|(_, _, v)| v == 0 || v == 2 || v == 4));
    }
}
