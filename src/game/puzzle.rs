/// The live puzzle: selection, guesses, hints, win/loss.
///
/// ## State machine
/// ┌─────────────┬──────────────────────────────┬──────────────┐
/// │ Operation    │ Condition                     │ Effect       │
/// ├─────────────┼──────────────────────────────┼──────────────┤
/// │ select       │ terminal / letter not in game │ no-op        │
/// │ select       │ letter already guessed        │ clear sel    │
/// │ select       │ otherwise                     │ set sel      │
/// │ guess        │ terminal                      │ Err(Terminal)│
/// │ guess        │ nothing selected              │ Err(NoSel)   │
/// │ guess        │ matches inverse mapping       │ reveal, win? │
/// │ guess        │ wrong                         │ mistake,lose?│
/// │ hint         │ terminal                      │ Err(Terminal)│
/// │ hint         │ nothing left to reveal        │ Err(NoLeft)  │
/// │ hint         │ otherwise                     │ reveal + cost│
/// └─────────────┴──────────────────────────────┴──────────────┘
///
/// Win: the distinct cipher letters of `encrypted` equal the key set of
/// `guessed` (set equality — repeats never inflate the requirement).
/// Loss: `mistakes >= max_mistakes`, checked right after every increment.
/// `Won` and `Lost` are sticky; a rejected operation changes nothing.
///
/// The puzzle is exclusively owned by one caller; there is no locking and
/// no claim about concurrent mutation.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::alphabet::letter_index;
use crate::domain::cipher::{CipherMapping, MASK_GLYPH};
use crate::domain::difficulty::{classify, max_mistakes, Tier};
use crate::error::PuzzleError;

use super::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    InProgress,
    Won,
    Lost,
}

impl Status {
    /// Terminal states admit no further mutation.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Won | Status::Lost)
    }
}

#[derive(Clone, Debug)]
pub struct Puzzle {
    // ── Immutable for the puzzle's life ──
    /// Uppercase plaintext.
    solution: String,
    /// Solution with every letter pushed through the cipher.
    encrypted: String,
    /// Inverse cipher restricted to the letters this puzzle uses,
    /// derived from the solution/encrypted pairing.
    cipher_to_plain: BTreeMap<char, char>,
    /// Distinct cipher letters appearing in `encrypted` — the reveal goal.
    cipher_letters: BTreeSet<char>,
    tier: Tier,
    max_mistakes: u32,

    // ── Mutated by operations ──
    /// Cipher letter → plaintext letter, one entry per reveal. The sole
    /// source of truth for what the player has uncovered.
    guessed: BTreeMap<char, char>,
    /// Recomputed from `guessed` after every reveal.
    display: String,
    /// At most one cipher letter under the cursor. Never persisted.
    selected: Option<char>,
    mistakes: u32,
    status: Status,

    // ── Scored time window (unix-epoch seconds) ──
    started_at: u64,
    last_action_at: u64,
}

// ── Construction ──

impl Puzzle {
    /// Build a puzzle from a plaintext quote and a difficulty score,
    /// generating a fresh random cipher from `rng`.
    ///
    /// Fails with `EmptySolution` when the quote contains no letters at
    /// all — an all-punctuation quote would otherwise be born solved.
    pub fn new(
        solution: &str,
        difficulty: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, PuzzleError> {
        let mapping = CipherMapping::generate(rng);
        Self::with_mapping(solution, difficulty, &mapping)
    }

    /// Build a puzzle over an explicit cipher mapping. This is how hosts
    /// replay a known cipher (daily challenges, deterministic tests).
    pub fn with_mapping(
        solution: &str,
        difficulty: f64,
        mapping: &CipherMapping,
    ) -> Result<Self, PuzzleError> {
        let solution = solution.to_ascii_uppercase();
        if !solution.chars().any(|c| letter_index(c).is_some()) {
            return Err(PuzzleError::EmptySolution);
        }
        let encrypted = mapping.encrypt(&solution);
        let tier = classify(difficulty);
        let now = unix_now();
        let puzzle = Self::assemble(
            solution,
            encrypted,
            BTreeMap::new(),
            0,
            max_mistakes(tier),
            tier,
            Status::InProgress,
            now,
            now,
        );
        debug!(
            "new puzzle: tier={} letters={} budget={}",
            puzzle.tier.name(),
            puzzle.cipher_letters.len(),
            puzzle.max_mistakes
        );
        Ok(puzzle)
    }

    /// Assemble a puzzle from already-validated parts. Derived fields
    /// (inverse pairing, distinct letters, display) are rebuilt here, and
    /// the selection always starts cleared. Snapshot restore comes
    /// through this path.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        solution: String,
        encrypted: String,
        guessed: BTreeMap<char, char>,
        mistakes: u32,
        max_mistakes: u32,
        tier: Tier,
        status: Status,
        started_at: u64,
        last_action_at: u64,
    ) -> Self {
        let mut cipher_to_plain = BTreeMap::new();
        let mut cipher_letters = BTreeSet::new();
        for (plain, cipher) in solution.chars().zip(encrypted.chars()) {
            if letter_index(cipher).is_some() {
                cipher_to_plain.insert(cipher, plain);
                cipher_letters.insert(cipher);
            }
        }
        let mut puzzle = Puzzle {
            solution,
            encrypted,
            cipher_to_plain,
            cipher_letters,
            tier,
            max_mistakes,
            guessed,
            display: String::new(),
            selected: None,
            mistakes,
            status,
            started_at,
            last_action_at,
        };
        puzzle.recompute_display();
        puzzle
    }
}

// ── Queries ──

impl Puzzle {
    pub fn solution(&self) -> &str {
        &self.solution
    }

    pub fn encrypted(&self) -> &str {
        &self.encrypted
    }

    /// What the player sees: revealed letters in the clear, everything
    /// else masked, non-letters passed through.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Reveals so far, cipher letter → plaintext letter.
    pub fn guessed(&self) -> &BTreeMap<char, char> {
        &self.guessed
    }

    pub fn selected(&self) -> Option<char> {
        self.selected
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn max_mistakes(&self) -> u32 {
        self.max_mistakes
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn last_action_at(&self) -> u64 {
        self.last_action_at
    }

    /// The scored time window: first action to last, in whole seconds.
    pub fn elapsed_secs(&self) -> u64 {
        self.last_action_at.saturating_sub(self.started_at)
    }

    /// Distinct cipher letters not yet revealed.
    pub fn letters_remaining(&self) -> usize {
        self.cipher_letters
            .iter()
            .filter(|c| !self.guessed.contains_key(c))
            .count()
    }
}

// ── Operations ──

impl Puzzle {
    /// Put the cursor on a cipher letter.
    ///
    /// No-op outside `InProgress` and for letters the encrypted text does
    /// not contain. Selecting a letter that is already guessed clears the
    /// selection instead (toggle-off). Never touches anything but
    /// `selected`.
    pub fn select(&mut self, letter: char) {
        if self.status.is_terminal() {
            return;
        }
        let cipher = letter.to_ascii_uppercase();
        if !self.cipher_letters.contains(&cipher) {
            return;
        }
        if self.guessed.contains_key(&cipher) {
            self.selected = None;
        } else {
            self.selected = Some(cipher);
        }
    }

    /// Guess the plaintext behind the selected cipher letter.
    ///
    /// Correct: the letter is revealed, the selection clears, and the win
    /// condition is re-evaluated. Wrong: one mistake, which may end the
    /// game. Either way the selection is consumed.
    pub fn guess(&mut self, letter: char) -> Result<Vec<GameEvent>, PuzzleError> {
        if self.status.is_terminal() {
            return Err(PuzzleError::TerminalState);
        }
        let selected = self.selected.ok_or(PuzzleError::NoSelection)?;
        let guess = letter.to_ascii_uppercase();

        let mut events = Vec::new();
        if self.cipher_to_plain.get(&selected) == Some(&guess) {
            self.reveal(selected, guess, false, &mut events);
        } else {
            self.record_mistake(&mut events);
        }
        self.selected = None;
        self.last_action_at = unix_now();
        Ok(events)
    }

    /// Reveal one unrevealed cipher letter, chosen uniformly at random.
    ///
    /// Costs exactly one mistake. The reveal always completes: a hint that
    /// exhausts the budget still shows its letter before the game is
    /// marked lost, and a hint that completes the board wins outright.
    pub fn hint(&mut self, rng: &mut impl Rng) -> Result<Vec<GameEvent>, PuzzleError> {
        if self.status.is_terminal() {
            return Err(PuzzleError::TerminalState);
        }
        let unrevealed: Vec<char> = self
            .cipher_letters
            .iter()
            .copied()
            .filter(|c| !self.guessed.contains_key(c))
            .collect();
        let cipher = *unrevealed
            .choose(rng)
            .ok_or(PuzzleError::NoLettersRemaining)?;
        let plain = match self.cipher_to_plain.get(&cipher) {
            Some(&p) => p,
            // Unrevealed letters come from `cipher_letters`, which is
            // built alongside the pairing; a miss cannot happen.
            None => return Err(PuzzleError::NoLettersRemaining),
        };

        let mut events = Vec::new();
        self.mistakes += 1;
        self.reveal(cipher, plain, true, &mut events);
        if self.status == Status::InProgress && self.mistakes >= self.max_mistakes {
            self.lose(&mut events);
        }
        if self.selected == Some(cipher) {
            self.selected = None;
        }
        self.last_action_at = unix_now();
        Ok(events)
    }
}

// ── Internal transitions ──

impl Puzzle {
    /// Record a reveal and re-evaluate the win condition.
    fn reveal(&mut self, cipher: char, plain: char, via_hint: bool, events: &mut Vec<GameEvent>) {
        self.guessed.insert(cipher, plain);
        self.recompute_display();
        events.push(if via_hint {
            GameEvent::HintRevealed { cipher, plain }
        } else {
            GameEvent::LetterRevealed { cipher, plain }
        });
        let all_revealed = self
            .cipher_letters
            .iter()
            .all(|c| self.guessed.contains_key(c));
        if all_revealed {
            self.status = Status::Won;
            debug!("puzzle won: mistakes={} of {}", self.mistakes, self.max_mistakes);
            events.push(GameEvent::PuzzleWon);
        }
    }

    /// Charge one mistake and check the budget.
    fn record_mistake(&mut self, events: &mut Vec<GameEvent>) {
        self.mistakes += 1;
        events.push(GameEvent::Mistake {
            mistakes: self.mistakes,
            remaining: self.max_mistakes.saturating_sub(self.mistakes),
        });
        if self.mistakes >= self.max_mistakes {
            self.lose(events);
        }
    }

    fn lose(&mut self, events: &mut Vec<GameEvent>) {
        self.status = Status::Lost;
        debug!("puzzle lost: mistakes={}", self.mistakes);
        events.push(GameEvent::PuzzleLost);
    }

    /// Rebuild `display` from `guessed`: position i shows the plaintext
    /// letter iff the cipher letter at position i is revealed; other
    /// letters show the mask glyph; non-letters pass straight through.
    fn recompute_display(&mut self) {
        self.display = self
            .solution
            .chars()
            .zip(self.encrypted.chars())
            .map(|(plain, cipher)| {
                if letter_index(cipher).is_none() {
                    plain
                } else if self.guessed.contains_key(&cipher) {
                    plain
                } else {
                    MASK_GLYPH
                }
            })
            .collect();
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
