use enum_map::EnumMap;
use log::{debug, info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, Shift, Spawn};
use crate::error::EngineError;
use crate::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a direction.
    Idle,
    /// A shift was applied and its spawn is still outstanding.
    Resolved,
}

/// One completed input -> shift -> spawn cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Turn {
    pub number: usize,
    pub direction: Direction,
    pub shift: Shift,
    pub spawn: Option<Spawn>,
    pub score: u64,
}

/// Drives a [`Board`] turn by turn and keeps session statistics.
#[derive(Debug)]
pub struct Game {
    board: Board,
    pending: Option<(Direction, Shift)>,
    turns: usize,
    moves: EnumMap<Direction, usize>,
    blocked: EnumMap<Direction, usize>,
}

impl Game {
    /// Wraps an initialized board.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            pending: None,
            turns: 0,
            moves: EnumMap::default(),
            blocked: EnumMap::default(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Board::seeded(seed))
    }

    pub fn phase(&self) -> Phase {
        match self.pending {
            None => Phase::Idle,
            Some(_) => Phase::Resolved,
        }
    }

    /// Applies the shift for `direction`. The turn stays open until [`Game::complete`].
    pub fn resolve(&mut self, direction: Direction) -> Result<&Shift, EngineError> {
        if self.pending.is_some() {
            return Err(EngineError::TurnPending);
        }

        let shift = self.board.shift(direction);

        if shift.moved() {
            self.moves[direction] += 1;
        } else {
            self.blocked[direction] += 1;
        }

        let (_, shift) = &*self.pending.insert((direction, shift));

        Ok(shift)
    }

    /// Spawns a tile if the resolved shift moved anything and closes the turn.
    pub fn complete(&mut self) -> Option<Turn> {
        let (direction, shift) = self.pending.take()?;

        let spawn = if shift.moved() {
            self.turns += 1;

            match self.board.spawn() {
                Ok(spawn) => Some(spawn),
                Err(err) => {
                    debug!("No spawn after {}: {}", direction, err);
                    None
                }
            }
        } else {
            None
        };

        Some(Turn {
            number: self.turns,
            direction,
            shift,
            spawn,
            score: self.board.score(),
        })
    }

    /// Runs a whole turn.
    pub fn play(&mut self, direction: Direction) -> Result<Turn, EngineError> {
        self.resolve(direction)?;
        self.complete().ok_or(EngineError::TurnPending)
    }

    /// Starts over with a fresh board, dropping any open turn.
    pub fn restart(&mut self) {
        info!(
            "Restarting after {} turns with score {}",
            self.turns,
            self.board.score()
        );

        self.pending = None;
        self.turns = 0;
        self.moves = EnumMap::default();
        self.blocked = EnumMap::default();
        self.board.initialize();
    }

    /// True once no direction can move any tile.
    pub fn is_over(&self) -> bool {
        self.pending.is_none() && !self.board.has_moves()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.board.score()
    }

    pub fn highest_tile(&self) -> u32 {
        self.board.grid().highest_tile()
    }

    /// Turns whose shift moved at least one tile.
    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn moves(&self) -> &EnumMap<Direction, usize> {
        &self.moves
    }

    pub fn blocked(&self) -> &EnumMap<Direction, usize> {
        &self.blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn game_from(cells: [[u32; 4]; 4]) -> Game {
        let grid = Grid::from_rows(cells).unwrap();
        Game::new(Board::from_parts(grid, 0, XorShiftRng::seed_from_u64(11)))
    }

    #[test]
    fn resolve_twice_is_rejected() {
        let mut game = game_from([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);

        assert!(game.resolve(Direction::Left).unwrap().moved());
        assert_eq!(game.phase(), Phase::Resolved);
        assert_eq!(game.resolve(Direction::Right), Err(EngineError::TurnPending));

        let turn = game.complete().unwrap();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(turn.number, 1);
        assert_eq!(turn.score, 4);
        assert!(turn.spawn.is_some());
        assert!(game.complete().is_none());
    }

    #[test]
    fn spawns_only_after_moving_turns() {
        let mut game = game_from([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);

        let blocked = game.play(Direction::Left).unwrap();
        assert!(!blocked.shift.moved());
        assert!(blocked.spawn.is_none());
        assert_eq!(game.board().grid().count_empty(), 15);
        assert_eq!(game.blocked()[Direction::Left], 1);

        let moved = game.play(Direction::Right).unwrap();
        assert!(moved.shift.moved());
        let spawn = moved.spawn.unwrap();
        assert_ne!(spawn.position, (0, 3));
        assert_eq!(game.board().grid().count_empty(), 14);
        assert_eq!(game.moves()[Direction::Right], 1);
        assert_eq!(game.turns(), 1);
    }

    #[test]
    fn detects_end_of_game() {
        let game = game_from([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(game.is_over());

        let game = game_from([[2, 2, 4, 8], [4, 8, 16, 32], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!game.is_over());
    }

    #[test]
    fn restart_resets_the_session() {
        let mut game = Game::seeded(5);

        for direction in Direction::ALL.iter().cycle().take(12) {
            game.play(*direction).unwrap();
        }

        game.resolve(Direction::Up).unwrap();
        game.restart();

        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.turns(), 0);
        assert_eq!(game.score(), 0);
        assert_eq!(game.board().grid().count_empty(), 14);
        assert!(game.moves().values().all(|&count| count == 0));
    }
}
