use crate::game::Turn;

/// Events emitted by the game loop that renderers can handle
#[derive(Debug, Clone)]
pub enum RenderEvent {
    /// A fresh board is on screen
    Started,

    /// A turn finished, whether or not it moved anything
    Turn(Turn),

    /// The board was re-initialized
    Restarted,

    /// The session ended
    Completed,
}
