use std::io::Write;

use super::{RenderEvent, Renderer};
use crate::game::Game;

/// Writes every turn, transitions included, as one JSON object per line
pub struct TraceRenderer<W: Write> {
    out: W,
}

impl<W: Write> TraceRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TraceRenderer<W> {
    type Error = String;

    fn initialize(&mut self, game: &Game) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.out, game.board().grid())
            .map_err(|e| format!("Failed to write trace: {}", e))?;
        writeln!(self.out).map_err(|e| e.to_string())
    }

    fn handle_event(&mut self, event: &RenderEvent) -> Result<(), Self::Error> {
        if let RenderEvent::Turn(turn) = event {
            serde_json::to_writer(&mut self.out, turn)
                .map_err(|e| format!("Failed to write trace: {}", e))?;
            writeln!(self.out).map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    fn finalize(&mut self, _game: &Game) -> Result<(), Self::Error> {
        self.out.flush().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Turn;
    use crate::grid::{Direction, Grid};

    #[test]
    fn writes_one_line_per_turn() {
        let mut game = Game::seeded(21);
        let mut renderer = TraceRenderer::new(Vec::new());

        renderer.initialize(&game).unwrap();

        for direction in [Direction::Left, Direction::Up] {
            let turn = game.play(direction).unwrap();
            renderer.handle_event(&RenderEvent::Turn(turn)).unwrap();
        }

        renderer.finalize(&game).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);

        let start: Grid = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(start.count_empty(), 14);

        let turn: Turn = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(turn.direction, Direction::Up);
        assert_eq!(turn.score, game.score());
    }
}
