//! Difficulty presets
//!
//! Chosen once when a run starts and read-only afterwards.

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "normal" | "n" | "medium" => Some(Difficulty::Normal),
            "hard" | "h" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Display label for menus and badges
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Relaxed",
            Difficulty::Normal => "Standard",
            Difficulty::Hard => "Frantic",
        }
    }

    /// Tuning values for this preset
    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                start_time_ms: 60_000,
                max_time_ms: 90_000,
                time_multiplier: 1.5,
                bad_event_chance: 0.08,
                good_event_chance: 0.15,
                rewind_recharge_ms: 20_000,
            },
            Difficulty::Normal => DifficultyConfig {
                start_time_ms: 45_000,
                max_time_ms: 75_000,
                time_multiplier: 1.0,
                bad_event_chance: 0.12,
                good_event_chance: 0.12,
                rewind_recharge_ms: 30_000,
            },
            Difficulty::Hard => DifficultyConfig {
                start_time_ms: 30_000,
                max_time_ms: 60_000,
                time_multiplier: 0.5,
                bad_event_chance: 0.18,
                good_event_chance: 0.08,
                rewind_recharge_ms: 45_000,
            },
        }
    }
}

/// Per-run tuning record
///
/// Assumed valid: the engine only clamps, it does not validate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Countdown at game start (ms)
    pub start_time_ms: i64,
    /// Countdown ceiling (ms)
    pub max_time_ms: i64,
    /// Scales every merge time bonus
    pub time_multiplier: f64,
    /// Width of the harmful-event band of the per-move roll
    pub bad_event_chance: f64,
    /// Width of the beneficial-event band of the per-move roll
    pub good_event_chance: f64,
    /// Play time needed to regenerate one rewind charge (ms)
    pub rewind_recharge_ms: u64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(difficulty.as_str()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_str(" HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_presets_start_below_max() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            assert!(config.start_time_ms <= config.max_time_ms);
            assert!(config.good_event_chance + config.bad_event_chance < 1.0);
        }
    }

    #[test]
    fn test_normal_matches_default() {
        let config = DifficultyConfig::default();
        assert_eq!(config.start_time_ms, 45_000);
        assert_eq!(config.max_time_ms, 75_000);
        assert_eq!(config.time_multiplier, 1.0);
    }
}
