//! Structured error types for puzzle construction and solving.

/// Errors raised when a rack or a move request violates the puzzle contract.
///
/// Absence of a solution is never an error; both searches report it as a
/// regular value (`None` / `false`). These variants cover malformed inputs
/// only, so callers can fail fast instead of searching a corrupted rack.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("tube height must be positive")]
    ZeroTubeHeight,

    #[error("tube {tube} holds {len} blocks but the tube height is {height}")]
    TubeOverflow {
        tube: usize,
        len: usize,
        height: usize,
    },

    #[error("tube index {index} out of range (rack has {tubes} tubes)")]
    TubeIndexOutOfRange { index: usize, tubes: usize },

    #[error("unrecognized color character '{ch}' in row {row}")]
    UnrecognizedColor { ch: char, row: usize },

    #[error("row {row} holds {len} blocks but the tube height is {height}")]
    RowTooLong {
        row: usize,
        len: usize,
        height: usize,
    },
}
