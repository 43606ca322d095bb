use thiserror::Error;

/// Failures reported by the board engine and the turn bookkeeping around it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A direction, tile value or position that the engine cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No empty cell was left to place a tile in.
    #[error("board is full")]
    BoardFull,

    /// A move was requested before the previous turn was completed.
    #[error("previous turn has not been completed")]
    TurnPending,
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument(message.into())
    }
}
