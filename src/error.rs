//! Error types for the nineboard crate

use thiserror::Error;

/// Main error type for the nineboard crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("move command arrived before start() initialized the game")]
    GameNotStarted,

    #[error("command '{command}' arrived out of sequence")]
    OutOfSequence { command: &'static str },

    #[error("invalid move: cell {position} on board {board} is already occupied")]
    OccupiedCell { board: usize, position: usize },

    #[error("index {value} is out of range (must be 1-9)")]
    IndexOutOfRange { value: u64 },

    #[error("invalid mark '{mark}' (expected 'x' or 'o')")]
    InvalidMark { mark: String },

    #[error("malformed arguments '{args}' for command '{command}'")]
    MalformedArguments { command: String, args: String },

    #[error("no legal move available in any sub-board")]
    NoLegalMoves,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
