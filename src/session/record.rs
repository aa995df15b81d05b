use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::bank::question::QuestionId;
use crate::engine::scoring::LevelBreakdown;
use crate::session::quiz::QuizState;

/// One completed session as persisted to history. Append-only: a record is
/// never mutated after creation, and only the explicit clear operation
/// removes any.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub package: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    pub score: u32,
    /// Per-level point totals; present on daily sessions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<LevelBreakdown>,
    /// Question IDs consumed by this session, read back for fresh-question
    /// dedup. Sessions recorded by this app leave it empty; imported or
    /// hand-maintained histories that populate it are honored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_ids: Vec<QuestionId>,
}

fn default_mode() -> String {
    "practice".to_string()
}

impl SessionRecord {
    pub fn from_quiz(quiz: &QuizState) -> Self {
        Self {
            id: short_id(),
            date: Utc::now(),
            package: quiz.package.clone(),
            mode: quiz.mode.as_str().to_string(),
            score: quiz.score,
            breakdown: quiz.mode.is_daily().then_some(quiz.breakdown),
            all_ids: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn empty_for_tests() -> Self {
        Self {
            id: "00000000".to_string(),
            date: Utc::now(),
            package: String::new(),
            mode: default_mode(),
            score: 0,
            breakdown: None,
            all_ids: Vec::new(),
        }
    }
}

/// Short random identifier for a history record.
pub fn short_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::bank::question::{Answer, Question};
    use crate::session::quiz::QuizMode;

    fn finished_quiz(mode: QuizMode) -> QuizState {
        let questions = vec![Question {
            question: Some("q".to_string()),
            level: Some("hard".to_string()),
            choices: vec!["a".to_string(), "b".to_string()],
            correct_answer: Some(Answer::Index(0)),
            ..Default::default()
        }];
        let mut quiz = QuizState::new(
            questions,
            "math".to_string(),
            mode,
            Duration::from_secs(60),
        )
        .unwrap();
        quiz.select(0);
        quiz.submit();
        quiz
    }

    #[test]
    fn test_short_id_shape() {
        let id = short_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_practice_record_has_no_breakdown() {
        let record = SessionRecord::from_quiz(&finished_quiz(QuizMode::Practice));
        assert_eq!(record.package, "math");
        assert_eq!(record.mode, "practice");
        assert_eq!(record.score, 1);
        assert!(record.breakdown.is_none());
        assert!(record.all_ids.is_empty());
    }

    #[test]
    fn test_daily_record_keeps_breakdown() {
        let record = SessionRecord::from_quiz(&finished_quiz(QuizMode::Daily));
        assert_eq!(record.mode, "daily");
        assert_eq!(record.score, 3);
        assert_eq!(record.breakdown.unwrap().hard, 3);
    }

    #[test]
    fn test_record_without_mode_field_defaults_to_practice() {
        let json = r#"{
            "id": "ab12cd34",
            "date": "2026-08-06T10:00:00Z",
            "package": "math",
            "score": 4
        }"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.mode, "practice");
        assert!(record.all_ids.is_empty());
    }
}
