use std::io::Write;

use log::debug;

use super::{RenderEvent, Renderer};
use crate::game::Game;

/// Prints the board to a writer after every turn that changed it
pub struct TextRenderer<W: Write> {
    out: W,
    dirty: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, dirty: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, game: &Game) -> Result<(), String> {
        writeln!(self.out, "\nScore: {}\n{}", game.score(), game.board().grid())
            .and_then(|_| self.out.flush())
            .map_err(|e| format!("Failed to write board: {}", e))
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    type Error = String;

    fn initialize(&mut self, _game: &Game) -> Result<(), Self::Error> {
        self.dirty = true;
        Ok(())
    }

    fn handle_event(&mut self, event: &RenderEvent) -> Result<(), Self::Error> {
        match event {
            RenderEvent::Started | RenderEvent::Restarted => self.dirty = true,
            RenderEvent::Turn(turn) if turn.shift.moved() => self.dirty = true,
            RenderEvent::Turn(turn) => debug!("{} is blocked", turn.direction),
            RenderEvent::Completed => {}
        }

        Ok(())
    }

    fn update(&mut self, game: &Game) -> Result<(), Self::Error> {
        if self.dirty {
            self.dirty = false;
            self.draw(game)?;
        }

        Ok(())
    }

    fn finalize(&mut self, game: &Game) -> Result<(), Self::Error> {
        writeln!(
            self.out,
            "\n{} turns, score {}, highest tile {}",
            game.turns(),
            game.score(),
            game.highest_tile()
        )
        .map_err(|e| format!("Failed to write summary: {}", e))
    }
}
