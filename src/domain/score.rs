/// Scoring: a pure function of tier, mistakes, and elapsed time.
///
/// ## Score table
/// ┌─────────────────────┬─────────┐
/// │ Tier base            │ points  │
/// ├─────────────────────┼─────────┤
/// │ Easy                 │ 100     │
/// │ Medium               │ 200     │
/// │ Hard                 │ 300     │
/// └─────────────────────┴─────────┘
/// ┌─────────────────────┬─────────┐
/// │ Elapsed seconds `t`  │ adjust  │
/// ├─────────────────────┼─────────┤
/// │ t < 60               │ +50     │
/// │ 60 ≤ t < 180         │ +30     │
/// │ 180 ≤ t < 300        │ +10     │
/// │ 300 ≤ t ≤ 600        │ +0      │
/// │ t > 600              │ −20     │
/// └─────────────────────┴─────────┘
/// Each mistake costs 20 points; the result never goes below zero.
///
/// Called once a puzzle is terminal. The function itself does not care
/// whether the game was won — whether a lost game is scored at all is the
/// caller's policy.

use super::difficulty::Tier;

/// Compute the final score for a finished game.
pub fn score(tier: Tier, mistakes: u32, elapsed_secs: u64) -> u32 {
    let base: i64 = match tier {
        Tier::Easy => 100,
        Tier::Medium => 200,
        Tier::Hard => 300,
    };
    let time_adjust: i64 = match elapsed_secs {
        0..=59 => 50,
        60..=179 => 30,
        180..=299 => 10,
        300..=600 => 0,
        _ => -20,
    };
    let penalty = i64::from(mistakes) * 20;
    (base + time_adjust - penalty).max(0) as u32
}
