use serde::{Deserialize, Serialize};

use crate::bank::question::{Level, Question};

/// Point value of one correct answer in a daily challenge. Questions with
/// no (or an unrecognized) level tag score as easy.
pub fn daily_points(level: Option<Level>) -> u32 {
    match level {
        Some(Level::Medium) => 2,
        Some(Level::Hard) => 3,
        Some(Level::Easy) | None => 1,
    }
}

/// Score one correct answer: practice counts answers, daily weights them
/// by level.
pub fn answer_points(question: &Question, daily: bool) -> u32 {
    if daily {
        daily_points(question.parsed_level())
    } else {
        1
    }
}

/// Per-level point totals accumulated over one daily session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBreakdown {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl LevelBreakdown {
    pub fn add(&mut self, level: Option<Level>, points: u32) {
        match level {
            Some(Level::Medium) => self.medium += points,
            Some(Level::Hard) => self.hard += points,
            Some(Level::Easy) | None => self.easy += points,
        }
    }

    pub fn total(&self) -> u32 {
        self.easy + self.medium + self.hard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leveled(tag: &str) -> Question {
        Question {
            question: Some("q".to_string()),
            level: Some(tag.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_daily_points_by_level() {
        assert_eq!(daily_points(Some(Level::Easy)), 1);
        assert_eq!(daily_points(Some(Level::Medium)), 2);
        assert_eq!(daily_points(Some(Level::Hard)), 3);
        assert_eq!(daily_points(None), 1);
    }

    #[test]
    fn test_practice_always_scores_one() {
        assert_eq!(answer_points(&leveled("hard"), false), 1);
        assert_eq!(answer_points(&leveled("easy"), false), 1);
    }

    #[test]
    fn test_daily_scores_weighted() {
        assert_eq!(answer_points(&leveled("hard"), true), 3);
        assert_eq!(answer_points(&leveled(" Medium "), true), 2);
        // Unknown tags fall back to the easy weight.
        assert_eq!(answer_points(&leveled("expert"), true), 1);
    }

    #[test]
    fn test_breakdown_accumulates_and_totals() {
        let mut breakdown = LevelBreakdown::default();
        breakdown.add(Some(Level::Hard), 3);
        breakdown.add(Some(Level::Easy), 1);
        breakdown.add(None, 1);
        assert_eq!(breakdown.hard, 3);
        assert_eq!(breakdown.easy, 2);
        assert_eq!(breakdown.medium, 0);
        assert_eq!(breakdown.total(), 5);
    }
}
