/// Terminal game report for the statistics collaborator.
/// Available once, and only once, the puzzle has ended — while the game
/// is running there is nothing to report.

use serde::{Deserialize, Serialize};

use crate::domain::score::score;

use super::puzzle::{Puzzle, Status};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameReport {
    pub status: Status,
    pub mistakes: u32,
    pub elapsed_secs: u64,
    pub score: u32,
}

impl Puzzle {
    /// Summarize a finished game: final status, mistakes, the scored time
    /// window, and the score. `None` while the game is in progress.
    ///
    /// Lost games are scored like any other — whether the host records
    /// that score is its own policy.
    pub fn report(&self) -> Option<GameReport> {
        if !self.status().is_terminal() {
            return None;
        }
        Some(GameReport {
            status: self.status(),
            mistakes: self.mistakes(),
            elapsed_secs: self.elapsed_secs(),
            score: score(self.tier(), self.mistakes(), self.elapsed_secs()),
        })
    }
}
