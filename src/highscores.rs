//! High score leaderboard and score ranks
//!
//! Keeps the top 10 finished runs across all difficulties. Storage is left to
//! the caller: the board round-trips through JSON.

use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Successful moves in the run
    pub moves: u32,
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) when achieved
    pub timestamp_ms: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run. Returns the rank achieved (1-indexed) or None if it
    /// didn't make the board.
    pub fn add_score(
        &mut self,
        score: u64,
        moves: u32,
        difficulty: Difficulty,
        timestamp_ms: u64,
    ) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                moves,
                difficulty,
                timestamp_ms,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!(
            "High score #{rank}: {score} on {}",
            difficulty.as_str()
        );
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best entry recorded on one difficulty
    pub fn best_for(&self, difficulty: Difficulty) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.difficulty == difficulty)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored board, re-sorting and trimming whatever was saved
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }
}

/// Verdict tier for a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreRank {
    Pathetic,
    Weak,
    Okay,
    Good,
    Great,
    Amazing,
    Legendary,
    Godlike,
}

impl ScoreRank {
    pub const ALL: [ScoreRank; 8] = [
        ScoreRank::Pathetic,
        ScoreRank::Weak,
        ScoreRank::Okay,
        ScoreRank::Good,
        ScoreRank::Great,
        ScoreRank::Amazing,
        ScoreRank::Legendary,
        ScoreRank::Godlike,
    ];

    pub fn for_score(score: u64) -> Self {
        match score {
            0..500 => ScoreRank::Pathetic,
            500..1500 => ScoreRank::Weak,
            1500..3000 => ScoreRank::Okay,
            3000..6000 => ScoreRank::Good,
            6000..12000 => ScoreRank::Great,
            12000..25000 => ScoreRank::Amazing,
            25000..50000 => ScoreRank::Legendary,
            _ => ScoreRank::Godlike,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreRank::Pathetic => "Pathetic",
            ScoreRank::Weak => "Weak",
            ScoreRank::Okay => "Okay",
            ScoreRank::Good => "Good",
            ScoreRank::Great => "Great",
            ScoreRank::Amazing => "Amazing",
            ScoreRank::Legendary => "Legendary",
            ScoreRank::Godlike => "Godlike",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_insert_and_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(100, 10, Difficulty::Normal, 1), Some(1));
        assert_eq!(scores.add_score(300, 20, Difficulty::Hard, 2), Some(1));
        assert_eq!(scores.add_score(200, 15, Difficulty::Easy, 3), Some(2));
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
        assert_eq!(scores.add_score(0, 0, Difficulty::Easy, 4), None);
    }

    #[test]
    fn test_board_capped_at_ten() {
        let mut scores = HighScores::new();
        for i in 1..=12u64 {
            scores.add_score(i * 100, 5, Difficulty::Normal, i);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(300));
        assert!(!scores.qualifies(300));
        assert_eq!(scores.potential_rank(301), Some(10));
        assert_eq!(scores.add_score(250, 5, Difficulty::Normal, 99), None);
    }

    #[test]
    fn test_best_per_difficulty() {
        let mut scores = HighScores::new();
        scores.add_score(900, 40, Difficulty::Easy, 1);
        scores.add_score(400, 30, Difficulty::Hard, 2);
        scores.add_score(700, 35, Difficulty::Easy, 3);
        assert_eq!(scores.best_for(Difficulty::Easy).map(|e| e.score), Some(900));
        assert_eq!(scores.best_for(Difficulty::Hard).map(|e| e.score), Some(400));
        assert!(scores.best_for(Difficulty::Normal).is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let mut scores = HighScores::new();
        scores.add_score(1234, 50, Difficulty::Hard, 1_700_000_000_000);
        let json = scores.to_json().unwrap();
        assert_eq!(HighScores::from_json(&json).unwrap(), scores);
        assert!(HighScores::from_json("{not json").is_err());
    }

    #[test]
    fn test_rank_tiers() {
        assert_eq!(ScoreRank::for_score(0), ScoreRank::Pathetic);
        assert_eq!(ScoreRank::for_score(499), ScoreRank::Pathetic);
        assert_eq!(ScoreRank::for_score(500), ScoreRank::Weak);
        assert_eq!(ScoreRank::for_score(2999), ScoreRank::Okay);
        assert_eq!(ScoreRank::for_score(6000), ScoreRank::Great);
        assert_eq!(ScoreRank::for_score(49_999), ScoreRank::Legendary);
        assert_eq!(ScoreRank::for_score(50_000), ScoreRank::Godlike);
        assert!(ScoreRank::ALL.windows(2).all(|w| w[0] < w[1]));
    }
}
