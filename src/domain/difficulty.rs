/// Difficulty policy: numeric difficulty score → named tier → mistake
/// budget. Total functions, no failure path.
///
/// ## Tier bands (half-open)
/// ┌──────────────┬────────┬─────────────┐
/// │ Score        │ Tier   │ Budget      │
/// ├──────────────┼────────┼─────────────┤
/// │ below 1.0    │ Easy   │ 8 mistakes  │
/// │ [1.0, 3.0)   │ Medium │ 5 mistakes  │
/// │ 3.0 and up   │ Hard   │ 3 mistakes  │
/// └──────────────┴────────┴─────────────┘

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    /// Lowercase name, as carried in snapshots.
    pub fn name(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }

    /// Parse a tier name, case-insensitively. Unrecognized names fall
    /// back to Medium rather than failing — snapshot text is the one
    /// place a tier arrives untyped.
    pub fn from_name(name: &str) -> Tier {
        match name.to_ascii_lowercase().as_str() {
            "easy" => Tier::Easy,
            "hard" => Tier::Hard,
            _ => Tier::Medium,
        }
    }
}

/// Classify a numeric difficulty score into a tier. See the band table
/// above; everything below the medium band (including negative scores)
/// is easy.
pub fn classify(difficulty: f64) -> Tier {
    if difficulty < 1.0 {
        Tier::Easy
    } else if difficulty < 3.0 {
        Tier::Medium
    } else {
        Tier::Hard
    }
}

/// Mistake budget for a tier.
pub fn max_mistakes(tier: Tier) -> u32 {
    match tier {
        Tier::Easy => 8,
        Tier::Medium => 5,
        Tier::Hard => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_are_half_open() {
        assert_eq!(classify(0.0), Tier::Easy);
        assert_eq!(classify(0.99), Tier::Easy);
        assert_eq!(classify(1.0), Tier::Medium);
        assert_eq!(classify(2.99), Tier::Medium);
        assert_eq!(classify(3.0), Tier::Hard);
        assert_eq!(classify(100.0), Tier::Hard);
    }

    #[test]
    fn negative_scores_are_easy() {
        assert_eq!(classify(-1.5), Tier::Easy);
    }

    #[test]
    fn budgets() {
        assert_eq!(max_mistakes(Tier::Easy), 8);
        assert_eq!(max_mistakes(Tier::Medium), 5);
        assert_eq!(max_mistakes(Tier::Hard), 3);
    }

    #[test]
    fn unrecognized_name_defaults_to_medium() {
        assert_eq!(Tier::from_name("easy"), Tier::Easy);
        assert_eq!(Tier::from_name("HARD"), Tier::Hard);
        assert_eq!(Tier::from_name("brutal"), Tier::Medium);
        assert_eq!(Tier::from_name(""), Tier::Medium);
    }
}
