/// Errors produced by the puzzle engine.
///
/// All of these are local, recoverable conditions reported to the caller;
/// none are fatal. A rejected operation leaves the puzzle untouched —
/// every check runs before the first field is written.

use thiserror::Error;

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PuzzleError {
    /// Construction was given a solution with no letters in it at all.
    /// An all-punctuation quote would otherwise satisfy the win check
    /// vacuously and be born solved.
    #[error("solution contains no letters")]
    EmptySolution,

    /// A guess was submitted with no cipher letter selected.
    #[error("no cipher letter selected")]
    NoSelection,

    /// A mutating operation was attempted after the game ended.
    #[error("puzzle is already finished")]
    TerminalState,

    /// A hint was requested but every letter is already revealed.
    #[error("no letters left to reveal")]
    NoLettersRemaining,
}
