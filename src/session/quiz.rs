use std::time::{Duration, Instant};

use crate::bank::question::Question;
use crate::engine::scoring::{self, LevelBreakdown};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizMode {
    Practice,
    Daily,
}

impl QuizMode {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Practice => "practice",
            QuizMode::Daily => "daily",
        }
    }

    pub fn is_daily(self) -> bool {
        matches!(self, QuizMode::Daily)
    }
}

/// Two-phase flow inside a running session: an answer is submitted and
/// graded first, then the user acknowledges the feedback (and explanation)
/// before the session moves on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    AwaitingAnswer,
    ShowingFeedback,
}

/// One in-flight quiz session. Owned by the app controller; widgets only
/// borrow it for rendering.
pub struct QuizState {
    pub questions: Vec<Question>,
    pub package: String,
    pub mode: QuizMode,
    pub index: usize,
    pub phase: QuizPhase,
    pub selected: Option<usize>,
    pub last_correct: Option<bool>,
    pub score: u32,
    pub breakdown: LevelBreakdown,
    pub started_at: Instant,
    pub time_limit: Duration,
}

impl QuizState {
    /// Requires a non-empty question list; the caller stays on its current
    /// screen and surfaces "no questions available" when selection came
    /// back empty.
    pub fn new(
        questions: Vec<Question>,
        package: String,
        mode: QuizMode,
        time_limit: Duration,
    ) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            package,
            mode,
            index: 0,
            phase: QuizPhase::AwaitingAnswer,
            selected: None,
            last_correct: None,
            score: 0,
            breakdown: LevelBreakdown::default(),
            started_at: Instant::now(),
            time_limit,
        })
    }

    pub fn current(&self) -> &Question {
        &self.questions[self.index]
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    /// Move the choice cursor. Only meaningful while an answer is pending;
    /// during feedback the selection is frozen so the graded choice stays
    /// visible.
    pub fn select(&mut self, choice: usize) {
        if self.phase != QuizPhase::AwaitingAnswer {
            return;
        }
        if choice < self.current().choices.len() {
            self.selected = Some(choice);
        }
    }

    pub fn select_next(&mut self) {
        let count = self.current().choices.len();
        if count == 0 || self.phase != QuizPhase::AwaitingAnswer {
            return;
        }
        self.selected = Some(match self.selected {
            Some(current) => (current + 1) % count,
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        let count = self.current().choices.len();
        if count == 0 || self.phase != QuizPhase::AwaitingAnswer {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => count - 1,
            Some(current) => current - 1,
        });
    }

    /// Grade the pending selection and enter the feedback phase.
    ///
    /// `None` means nothing was selected yet: the caller re-prompts and no
    /// state changes. Repeated submits during feedback are no-ops that
    /// return the already-recorded verdict.
    pub fn submit(&mut self) -> Option<bool> {
        if self.phase == QuizPhase::ShowingFeedback {
            return self.last_correct;
        }
        let choice = self.selected?;
        let correct = self.current().is_correct_choice(choice);
        if correct {
            let points = scoring::answer_points(self.current(), self.mode.is_daily());
            self.score += points;
            if self.mode.is_daily() {
                self.breakdown.add(self.current().parsed_level(), points);
            }
        }
        self.last_correct = Some(correct);
        self.phase = QuizPhase::ShowingFeedback;
        Some(correct)
    }

    /// Acknowledge feedback and move to the next question. Returns `false`
    /// when the last question's feedback was acknowledged: the session is
    /// over and the caller finalizes it.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        self.phase = QuizPhase::AwaitingAnswer;
        self.selected = None;
        self.last_correct = None;
        true
    }

    pub fn remaining(&self) -> Duration {
        self.time_limit.saturating_sub(self.started_at.elapsed())
    }

    /// The countdown expired; the periodic tick forces the session to
    /// finish when this turns true.
    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::question::Answer;

    const LIMIT: Duration = Duration::from_secs(75 * 60);

    fn question(level: Option<&str>, correct: usize) -> Question {
        Question {
            question: Some("prompt".to_string()),
            level: level.map(|l| l.to_string()),
            choices: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_answer: Some(Answer::Index(correct as i64)),
            explanation: Some("because".to_string()),
            ..Default::default()
        }
    }

    fn practice(questions: Vec<Question>) -> QuizState {
        QuizState::new(questions, "math".to_string(), QuizMode::Practice, LIMIT).unwrap()
    }

    #[test]
    fn test_empty_question_list_refuses_to_start() {
        assert!(QuizState::new(Vec::new(), "math".to_string(), QuizMode::Practice, LIMIT).is_none());
    }

    #[test]
    fn test_submit_without_selection_changes_nothing() {
        let mut quiz = practice(vec![question(None, 0)]);
        assert_eq!(quiz.submit(), None);
        assert_eq!(quiz.phase, QuizPhase::AwaitingAnswer);
        assert_eq!(quiz.score, 0);
        assert_eq!(quiz.index, 0);
    }

    #[test]
    fn test_two_phase_submit_then_advance() {
        let mut quiz = practice(vec![question(None, 1), question(None, 0)]);

        quiz.select(1);
        assert_eq!(quiz.submit(), Some(true));
        assert_eq!(quiz.phase, QuizPhase::ShowingFeedback);
        assert_eq!(quiz.index, 0, "feedback phase stays on the question");

        assert!(quiz.advance());
        assert_eq!(quiz.index, 1);
        assert_eq!(quiz.phase, QuizPhase::AwaitingAnswer);
        assert_eq!(quiz.selected, None);

        quiz.select(2);
        assert_eq!(quiz.submit(), Some(false));
        assert!(!quiz.advance(), "acknowledging the last question ends it");
    }

    #[test]
    fn test_practice_scores_one_per_correct() {
        let mut quiz = practice(vec![question(Some("hard"), 0), question(Some("easy"), 0)]);
        quiz.select(0);
        quiz.submit();
        quiz.advance();
        quiz.select(0);
        quiz.submit();
        assert_eq!(quiz.score, 2);
        assert_eq!(quiz.breakdown.total(), 0, "practice keeps no breakdown");
    }

    #[test]
    fn test_daily_scores_weighted_with_breakdown() {
        let questions = vec![
            question(Some("hard"), 0),
            question(Some("medium"), 0),
            question(Some("easy"), 0),
            question(None, 0),
        ];
        let mut quiz =
            QuizState::new(questions, "math".to_string(), QuizMode::Daily, LIMIT).unwrap();
        for _ in 0..4 {
            quiz.select(0);
            quiz.submit();
            quiz.advance();
        }
        assert_eq!(quiz.score, 3 + 2 + 1 + 1);
        assert_eq!(quiz.breakdown.hard, 3);
        assert_eq!(quiz.breakdown.medium, 2);
        assert_eq!(quiz.breakdown.easy, 2);
    }

    #[test]
    fn test_wrong_answer_scores_nothing() {
        let mut quiz = practice(vec![question(None, 1)]);
        quiz.select(0);
        assert_eq!(quiz.submit(), Some(false));
        assert_eq!(quiz.score, 0);
    }

    #[test]
    fn test_selection_frozen_during_feedback() {
        let mut quiz = practice(vec![question(None, 0)]);
        quiz.select(0);
        quiz.submit();
        quiz.select(2);
        quiz.select_next();
        assert_eq!(quiz.selected, Some(0));
    }

    #[test]
    fn test_repeat_submit_does_not_double_score() {
        let mut quiz = practice(vec![question(None, 0)]);
        quiz.select(0);
        assert_eq!(quiz.submit(), Some(true));
        assert_eq!(quiz.submit(), Some(true));
        assert_eq!(quiz.score, 1);
    }

    #[test]
    fn test_choice_cursor_wraps() {
        let mut quiz = practice(vec![question(None, 0)]);
        quiz.select_next();
        assert_eq!(quiz.selected, Some(0));
        quiz.select_prev();
        assert_eq!(quiz.selected, Some(2));
        quiz.select_next();
        assert_eq!(quiz.selected, Some(0));
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        let mut quiz = practice(vec![question(None, 0)]);
        quiz.select(9);
        assert_eq!(quiz.selected, None);
    }

    #[test]
    fn test_zero_time_limit_is_immediately_expired() {
        let quiz = QuizState::new(
            vec![question(None, 0)],
            "math".to_string(),
            QuizMode::Practice,
            Duration::ZERO,
        )
        .unwrap();
        assert!(quiz.is_expired());
    }
}
