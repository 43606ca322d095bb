pub mod events;
pub mod text_renderer;

#[cfg(feature = "serde")]
pub mod trace_renderer;

#[cfg(feature = "visual")]
pub mod sdl_renderer;

pub use events::RenderEvent;

use crate::game::Game;
use crate::input::Command;

/// Core trait for presenting a game
pub trait Renderer {
    type Error;

    /// Prepare output for the initial board
    fn initialize(&mut self, game: &Game) -> Result<(), Self::Error>;

    /// Handle an event from the game loop
    fn handle_event(&mut self, event: &RenderEvent) -> Result<(), Self::Error>;

    /// Redraw from the current state (for visual renderers)
    fn update(&mut self, game: &Game) -> Result<(), Self::Error> {
        let _ = game;
        Ok(())
    }

    /// Input captured by the renderer itself (for interactive renderers)
    fn poll_command(&mut self) -> Option<Command> {
        None
    }

    /// Check if the user wants to quit (for interactive renderers)
    fn should_quit(&mut self) -> bool {
        false
    }

    /// Finalize rendering with the final state
    fn finalize(&mut self, game: &Game) -> Result<(), Self::Error>;
}
