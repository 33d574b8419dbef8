/// Snapshot capture and restore — the persistence boundary.
///
/// The engine never touches files itself; it hands the host a plain data
/// snapshot (and a TOML text rendering of it) and rebuilds a live puzzle
/// from one on the way back. Restore recomputes everything derivable —
/// the inverse cipher pairing from solution/encrypted, the display from
/// `guessed` — and always comes back with the selection cleared:
/// the cursor is never persisted.
///
/// Restore validates before it builds. Corrupt snapshots (truncated text,
/// a cipher letter mapped two ways, a guess that belongs to a different
/// puzzle) are reported, never patched over.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::alphabet::letter_index;
use crate::domain::difficulty::Tier;

use super::puzzle::{Puzzle, Status};

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshot's solution contains no letters.
    #[error("snapshot solution contains no letters")]
    EmptySolution,

    /// Solution and encrypted text differ in length.
    #[error("solution is {solution} chars but encrypted is {encrypted}")]
    LengthMismatch { solution: usize, encrypted: usize },

    /// A letter faces a non-letter (or a different non-letter) at the
    /// same position — the texts cannot be images of one another.
    #[error("solution and encrypted text disagree at position {position}")]
    ShapeMismatch { position: usize },

    /// The solution/encrypted pairing is not a consistent substitution
    /// (some letter maps two ways).
    #[error("inconsistent cipher mapping at position {position}")]
    MappingConflict { position: usize },

    /// A guessed pair does not belong to this puzzle's cipher.
    #[error("guessed pair {cipher}→{plain} is not part of this puzzle")]
    ForeignGuess { cipher: char, plain: char },

    #[error("snapshot parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("snapshot encode error: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// One revealed letter, as carried in a snapshot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LetterPair {
    pub cipher: char,
    pub plain: char,
}

/// Everything needed to rebuild a puzzle with no information loss.
/// The selection is deliberately absent. `guessed` sits last so the TOML
/// rendering emits every scalar key before the array of tables.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub solution: String,
    pub encrypted: String,
    pub display: String,
    pub mistakes: u32,
    pub max_mistakes: u32,
    /// Tier by name; unrecognized names restore as medium.
    pub tier: String,
    pub status: Status,
    pub started_at: u64,
    pub last_action_at: u64,
    pub guessed: Vec<LetterPair>,
}

impl Snapshot {
    /// Capture the persistable state of a puzzle.
    pub fn capture(puzzle: &Puzzle) -> Snapshot {
        Snapshot {
            solution: puzzle.solution().to_string(),
            encrypted: puzzle.encrypted().to_string(),
            display: puzzle.display().to_string(),
            guessed: puzzle
                .guessed()
                .iter()
                .map(|(&cipher, &plain)| LetterPair { cipher, plain })
                .collect(),
            mistakes: puzzle.mistakes(),
            max_mistakes: puzzle.max_mistakes(),
            tier: puzzle.tier().name().to_string(),
            status: puzzle.status(),
            started_at: puzzle.started_at(),
            last_action_at: puzzle.last_action_at(),
        }
    }

    /// Rebuild a live puzzle. Validates the solution/encrypted pairing,
    /// checks every guessed pair against it, recomputes the display from
    /// `guessed`, and restores with the selection cleared.
    pub fn restore(&self) -> Result<Puzzle, SnapshotError> {
        let sol_len = self.solution.chars().count();
        let enc_len = self.encrypted.chars().count();
        if sol_len != enc_len {
            return Err(SnapshotError::LengthMismatch {
                solution: sol_len,
                encrypted: enc_len,
            });
        }

        // Derive the substitution from the text pair, rejecting any
        // position that contradicts an earlier one.
        let mut cipher_to_plain: BTreeMap<char, char> = BTreeMap::new();
        let mut plain_to_cipher: BTreeMap<char, char> = BTreeMap::new();
        let mut has_letters = false;
        for (position, (plain, cipher)) in
            self.solution.chars().zip(self.encrypted.chars()).enumerate()
        {
            match (letter_index(plain), letter_index(cipher)) {
                (Some(_), Some(_)) => {
                    has_letters = true;
                    if *cipher_to_plain.entry(cipher).or_insert(plain) != plain {
                        return Err(SnapshotError::MappingConflict { position });
                    }
                    if *plain_to_cipher.entry(plain).or_insert(cipher) != cipher {
                        return Err(SnapshotError::MappingConflict { position });
                    }
                }
                (None, None) if plain == cipher => {}
                _ => return Err(SnapshotError::ShapeMismatch { position }),
            }
        }
        if !has_letters {
            return Err(SnapshotError::EmptySolution);
        }

        let mut guessed = BTreeMap::new();
        for &LetterPair { cipher, plain } in &self.guessed {
            if cipher_to_plain.get(&cipher) != Some(&plain) {
                return Err(SnapshotError::ForeignGuess { cipher, plain });
            }
            guessed.insert(cipher, plain);
        }

        Ok(Puzzle::assemble(
            self.solution.clone(),
            self.encrypted.clone(),
            guessed,
            self.mistakes,
            self.max_mistakes,
            Tier::from_name(&self.tier),
            self.status,
            self.started_at,
            self.last_action_at,
        ))
    }

    /// Render as TOML text. The host owns where it lands.
    pub fn to_toml_string(&self) -> Result<String, SnapshotError> {
        Ok(toml::to_string(self)?)
    }

    /// Parse TOML text produced by `to_toml_string`.
    pub fn from_toml_str(text: &str) -> Result<Snapshot, SnapshotError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alphabet::ALPHABET;
    use crate::domain::cipher::CipherMapping;

    fn shift23() -> CipherMapping {
        let mut forward = ALPHABET;
        for (i, slot) in forward.iter_mut().enumerate() {
            *slot = ALPHABET[(i + 23) % 26];
        }
        CipherMapping::from_permutation(forward).unwrap()
    }

    fn mid_game() -> Puzzle {
        let mut p = Puzzle::with_mapping("AN APPLE A DAY.", 2.0, &shift23()).unwrap();
        p.select('X'); // cipher of A
        p.guess('A').unwrap();
        p.select('M'); // cipher of P
        p.guess('Q').unwrap(); // wrong
        p
    }

    #[test]
    fn capture_restore_round_trip() {
        let mut p = mid_game();
        p.select('K'); // leave a live selection behind (cipher of N)

        let snap = Snapshot::capture(&p);
        assert_eq!(snap.tier, "medium");

        let restored = snap.restore().unwrap();
        assert_eq!(restored.solution(), p.solution());
        assert_eq!(restored.encrypted(), p.encrypted());
        assert_eq!(restored.display(), p.display());
        assert_eq!(restored.guessed(), p.guessed());
        assert_eq!(restored.mistakes(), p.mistakes());
        assert_eq!(restored.max_mistakes(), p.max_mistakes());
        assert_eq!(restored.tier(), p.tier());
        assert_eq!(restored.status(), p.status());
        assert_eq!(restored.started_at(), p.started_at());
        assert_eq!(restored.last_action_at(), p.last_action_at());
        // The cursor never survives persistence.
        assert_eq!(restored.selected(), None);
    }

    #[test]
    fn restored_puzzle_keeps_playing() {
        let p = mid_game();
        let mut restored = Snapshot::capture(&p).restore().unwrap();
        restored.select('M');
        let ev = restored.guess('P').unwrap();
        assert!(!ev.is_empty());
        assert!(restored.display().contains('P'));
    }

    #[test]
    fn toml_text_round_trip() {
        let snap = Snapshot::capture(&mid_game());
        let text = snap.to_toml_string().unwrap();
        let back = Snapshot::from_toml_str(&text).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn restore_rejects_length_mismatch() {
        let mut snap = Snapshot::capture(&mid_game());
        snap.encrypted.push('Q');
        assert!(matches!(
            snap.restore(),
            Err(SnapshotError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn restore_rejects_inconsistent_mapping() {
        let snap = Snapshot {
            solution: "ABA".into(),
            encrypted: "XYZ".into(), // A encrypted as both X and Z
            display: "___".into(),
            guessed: vec![],
            mistakes: 0,
            max_mistakes: 5,
            tier: "medium".into(),
            status: Status::InProgress,
            started_at: 0,
            last_action_at: 0,
        };
        assert!(matches!(
            snap.restore(),
            Err(SnapshotError::MappingConflict { .. })
        ));
    }

    #[test]
    fn restore_rejects_foreign_guess() {
        let mut snap = Snapshot::capture(&mid_game());
        snap.guessed.push(LetterPair { cipher: 'Z', plain: 'Z' });
        assert!(matches!(
            snap.restore(),
            Err(SnapshotError::ForeignGuess { cipher: 'Z', plain: 'Z' })
        ));
    }

    #[test]
    fn restore_rejects_letterless_solution() {
        let snap = Snapshot {
            solution: "...".into(),
            encrypted: "...".into(),
            display: "...".into(),
            guessed: vec![],
            mistakes: 0,
            max_mistakes: 5,
            tier: "easy".into(),
            status: Status::InProgress,
            started_at: 0,
            last_action_at: 0,
        };
        assert!(matches!(snap.restore(), Err(SnapshotError::EmptySolution)));
    }

    #[test]
    fn unknown_tier_restores_as_medium() {
        let mut snap = Snapshot::capture(&mid_game());
        snap.tier = "nightmare".into();
        let restored = snap.restore().unwrap();
        assert_eq!(restored.tier(), Tier::Medium);
    }

    #[test]
    fn display_is_recomputed_not_trusted() {
        let mut snap = Snapshot::capture(&mid_game());
        let truth = snap.display.clone();
        snap.display = "garbage".into();
        let restored = snap.restore().unwrap();
        assert_eq!(restored.display(), truth);
    }
}
