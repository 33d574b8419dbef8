/// Events emitted by mutating puzzle operations.
/// The presentation layer consumes these for animation/sound; they are
/// descriptive only, and the puzzle's accessors remain the source of truth.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// A correct guess revealed a cipher letter.
    LetterRevealed { cipher: char, plain: char },
    /// A hint revealed a cipher letter (and cost one mistake).
    HintRevealed { cipher: char, plain: char },
    /// A wrong guess. `remaining` is how many more the budget allows.
    Mistake { mistakes: u32, remaining: u32 },
    /// Every distinct cipher letter is revealed.
    PuzzleWon,
    /// The mistake budget is exhausted.
    PuzzleLost,
}
