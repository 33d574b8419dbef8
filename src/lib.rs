/// Cipherquote: a substitution-cipher puzzle engine.
///
/// Turns a plaintext quote into a cryptogram (a random bijective letter
/// substitution), tracks player guesses against the mapping, enforces
/// win/loss conditions, charges hints as mistakes, and scores terminal
/// games. Pure in-memory logic: the engine performs no I/O, owns no
/// threads, and references no globals. Quote selection, persistence,
/// accounts, and rendering are the host's problem.
///
/// Layering mirrors the split between rules and live state:
///   - `domain` — pure functions and value types (alphabet, cipher,
///     difficulty policy, scoring). No mutation, no randomness of their
///     own; random sources are threaded in by the caller.
///   - `game` — the owned, mutable `Puzzle` plus the events it emits,
///     snapshot capture/restore, and the terminal game report.

pub mod domain;
pub mod game;

mod error;

pub use error::PuzzleError;

pub use domain::cipher::{initial_display, CipherMapping, InvalidPermutation, MASK_GLYPH};
pub use domain::difficulty::{classify, max_mistakes, Tier};
pub use domain::score::score;

pub use game::event::GameEvent;
pub use game::puzzle::{Puzzle, Status};
pub use game::report::GameReport;
pub use game::snapshot::{LetterPair, Snapshot, SnapshotError};
