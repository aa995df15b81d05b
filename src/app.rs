use chrono::Local;

use crate::bank::question::{self, Level, LevelFilter, Question};
use crate::bank::repository::QuestionBank;
use crate::config::Config;
use crate::engine::daily::{self, SelectError};
use crate::engine::select;
use crate::session::quiz::{QuizMode, QuizPhase, QuizState};
use crate::session::record::SessionRecord;
use crate::store::json_store::JsonStore;
use crate::store::schema::HistoryData;
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    PackageSelect,
    LevelSelect,
    DailySelect,
    Quiz,
    Result,
    History,
}

/// All cross-screen state, owned in one place. Widgets borrow pieces of it
/// for rendering; nothing here is reachable from the render path by any
/// other route.
pub struct App {
    pub screen: AppScreen,
    pub quiz: Option<QuizState>,
    pub last_record: Option<SessionRecord>,
    pub history: Vec<SessionRecord>,
    pub bank: QuestionBank,
    pub packages: Vec<String>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub store: Option<JsonStore>,
    pub should_quit: bool,
    /// One-line informational notice ("no questions available", "pick an
    /// answer first", ...). Never fatal; cleared by the next action.
    pub notice: Option<String>,
    pub package_selected: usize,
    pub level_selected: usize,
    pub pending_package: Option<String>,
    pub history_confirm_clear: bool,
}

/// Level menu entries, in display order. "all" mirrors the unfiltered
/// practice mode.
pub const LEVEL_CHOICES: [LevelFilter; 4] = [
    LevelFilter::Only(Level::Easy),
    LevelFilter::Only(Level::Medium),
    LevelFilter::Only(Level::Hard),
    LevelFilter::All,
];

impl App {
    pub fn new(store: Option<JsonStore>) -> Self {
        let mut config = Config::load().unwrap_or_default();
        config.normalize();
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let mut notice = None;
        if let Some(ref s) = store
            && let Err(err) = s.ensure_ready()
        {
            notice = Some(format!("Storage not ready: {err}"));
        }

        let (history, bank) = match store {
            Some(ref s) => (
                s.load_history().sessions,
                QuestionBank::load(&s.bank_path()),
            ),
            None => (Vec::new(), QuestionBank::default()),
        };
        let packages = bank.packages();

        Self {
            screen: AppScreen::Home,
            quiz: None,
            last_record: None,
            history,
            bank,
            packages,
            menu,
            theme,
            config,
            store,
            should_quit: false,
            notice,
            package_selected: 0,
            level_selected: 0,
            pending_package: None,
            history_confirm_clear: false,
        }
    }

    /// Load, normalize, and hand back the package's pool, or set a notice
    /// and return None when the bank has nothing for it.
    fn pool_for(&mut self, package: &str) -> Option<Vec<Question>> {
        let mut pool = self.bank.questions_for_package(package);
        if pool.is_empty() {
            self.notice = Some(format!("No questions available for {package}"));
            return None;
        }
        question::normalize_answers(&mut pool);
        Some(pool)
    }

    pub fn start_practice(&mut self, package: &str, filter: LevelFilter) {
        let package = package.trim().to_string();
        let Some(pool) = self.pool_for(&package) else {
            return;
        };

        let questions = select::pick_fresh_priority(
            &pool,
            self.config.questions_per_session,
            &self.history,
            &package,
            filter,
        );

        match QuizState::new(
            questions,
            package.clone(),
            QuizMode::Practice,
            self.config.session_limit(),
        ) {
            Some(quiz) => {
                self.quiz = Some(quiz);
                self.notice = None;
                self.screen = AppScreen::Quiz;
            }
            None => {
                self.notice = Some(format!(
                    "No questions available for {package} at level {}",
                    filter.as_str()
                ));
            }
        }
    }

    pub fn start_daily(&mut self, package: &str) {
        let package = package.trim().to_string();
        let Some(pool) = self.pool_for(&package) else {
            return;
        };

        let today = Local::now().date_naive();
        match daily::compose_daily(&pool, &package, today) {
            Ok(questions) => {
                // compose_daily never returns an empty Ok, so this can't
                // fall back to None.
                self.quiz = QuizState::new(
                    questions,
                    package,
                    QuizMode::Daily,
                    self.config.session_limit(),
                );
                self.notice = None;
                self.screen = AppScreen::Quiz;
            }
            Err(SelectError::NoContent) => {
                self.notice = Some(format!("No daily questions available for {package}"));
            }
        }
    }

    /// The single "next step" action inside a session: grade the pending
    /// answer, or acknowledge feedback and move on (finishing after the
    /// last question).
    pub fn next_step(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        match quiz.phase {
            QuizPhase::AwaitingAnswer => {
                if quiz.submit().is_none() {
                    self.notice = Some("Pick an answer first".to_string());
                } else {
                    self.notice = None;
                }
            }
            QuizPhase::ShowingFeedback => {
                if !quiz.advance() {
                    self.finish_quiz();
                }
            }
        }
    }

    /// Periodic countdown callback. Guarded: it only ever touches a session
    /// that is actually on screen, so a stale tick after leaving the quiz
    /// cannot fire against torn-down state.
    pub fn on_tick(&mut self) {
        if self.screen != AppScreen::Quiz {
            return;
        }
        if self.quiz.as_ref().is_some_and(|q| q.is_expired()) {
            self.notice = Some("Time is up".to_string());
            self.finish_quiz();
        }
    }

    /// Finalize the session: exactly one record is appended to history and
    /// persisted, then the result screen takes over.
    fn finish_quiz(&mut self) {
        let Some(quiz) = self.quiz.take() else {
            return;
        };
        let record = SessionRecord::from_quiz(&quiz);
        self.history.push(record.clone());
        self.persist_history();
        self.last_record = Some(record);
        self.screen = AppScreen::Result;
    }

    fn persist_history(&mut self) {
        if let Some(ref store) = self.store
            && let Err(err) = store.save_history(&HistoryData::with_sessions(self.history.clone()))
        {
            self.notice = Some(format!("Could not save history: {err}"));
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist_history();
        self.history_confirm_clear = false;
    }

    /// Back to the menu. Dropping the quiz here also detaches the countdown:
    /// ticks are only applied while the quiz screen is live. An abandoned
    /// session leaves no history record.
    pub fn go_home(&mut self) {
        self.screen = AppScreen::Home;
        self.quiz = None;
        self.notice = None;
    }

    pub fn go_package_select(&mut self) {
        self.package_selected = 0;
        self.pending_package = None;
        self.notice = None;
        self.screen = AppScreen::PackageSelect;
    }

    pub fn go_daily_select(&mut self) {
        self.package_selected = 0;
        self.notice = None;
        self.screen = AppScreen::DailySelect;
    }

    pub fn go_history(&mut self) {
        self.history_confirm_clear = false;
        self.notice = None;
        self.screen = AppScreen::History;
    }

    pub fn choose_package(&mut self) {
        let Some(package) = self.packages.get(self.package_selected).cloned() else {
            return;
        };
        self.pending_package = Some(package);
        self.level_selected = 0;
        self.screen = AppScreen::LevelSelect;
    }

    pub fn choose_level(&mut self) {
        let Some(package) = self.pending_package.clone() else {
            return;
        };
        let filter = LEVEL_CHOICES[self.level_selected.min(LEVEL_CHOICES.len() - 1)];
        self.start_practice(&package, filter);
    }

    pub fn choose_daily_package(&mut self) {
        let Some(package) = self.packages.get(self.package_selected).cloned() else {
            return;
        };
        self.start_daily(&package);
    }

    pub fn list_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.package_selected = if self.package_selected == 0 {
            len - 1
        } else {
            self.package_selected - 1
        };
    }

    pub fn list_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.package_selected = (self.package_selected + 1) % len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::question::{Answer, Question, QuestionId};

    fn bank_item(id: i64, package: &str, level: &str) -> Question {
        Question {
            id: Some(QuestionId::Int(id)),
            package: Some(package.to_string()),
            level: Some(level.to_string()),
            question: Some(format!("q{id}")),
            choices: vec!["a".to_string(), "b".to_string()],
            correct_answer: Some(Answer::Index(0)),
            ..Default::default()
        }
    }

    fn test_app() -> App {
        let mut app = App::new(None);
        // Independent of whatever config the host machine carries.
        app.config = Config::default();
        let items: Vec<Question> = (0..12).map(|i| bank_item(i, "math", "easy")).collect();
        app.bank = QuestionBank::from_items(items);
        app.packages = app.bank.packages();
        app
    }

    #[test]
    fn test_start_practice_enters_quiz_screen() {
        let mut app = test_app();
        app.start_practice("math", LevelFilter::All);
        assert_eq!(app.screen, AppScreen::Quiz);
        let quiz = app.quiz.as_ref().unwrap();
        assert_eq!(quiz.total(), app.config.questions_per_session);
    }

    #[test]
    fn test_start_practice_unknown_package_stays_put() {
        let mut app = test_app();
        let before = app.screen;
        app.start_practice("geography", LevelFilter::All);
        assert_eq!(app.screen, before);
        assert!(app.quiz.is_none());
        assert!(app.notice.as_deref().unwrap_or("").contains("geography"));
    }

    #[test]
    fn test_start_practice_empty_level_stays_put() {
        let mut app = test_app();
        app.start_practice("math", LevelFilter::Only(Level::Hard));
        // All bank items are easy, so a hard-only session has no content...
        // except untagged items would pass; these are all tagged easy.
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.quiz.is_none());
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_full_session_records_history() {
        let mut app = test_app();
        app.config.questions_per_session = 2;
        app.start_practice("math", LevelFilter::All);

        for _ in 0..2 {
            app.quiz.as_mut().unwrap().select(0);
            app.next_step(); // grade
            app.next_step(); // acknowledge
        }

        assert_eq!(app.screen, AppScreen::Result);
        assert!(app.quiz.is_none());
        assert_eq!(app.history.len(), 1);
        let record = &app.history[0];
        assert_eq!(record.package, "math");
        assert_eq!(record.score, 2);
        assert_eq!(record.mode, "practice");
    }

    #[test]
    fn test_submit_without_answer_warns_and_stays() {
        let mut app = test_app();
        app.start_practice("math", LevelFilter::All);
        app.next_step();
        assert_eq!(app.notice.as_deref(), Some("Pick an answer first"));
        assert_eq!(app.quiz.as_ref().unwrap().index, 0);
        assert_eq!(app.quiz.as_ref().unwrap().phase, QuizPhase::AwaitingAnswer);
    }

    #[test]
    fn test_abandoning_a_session_records_nothing() {
        let mut app = test_app();
        app.start_practice("math", LevelFilter::All);
        app.go_home();
        assert!(app.quiz.is_none());
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_tick_outside_quiz_screen_is_inert() {
        let mut app = test_app();
        app.config.session_minutes = 1;
        app.start_practice("math", LevelFilter::All);
        // Simulate a stale tick arriving after the view is gone.
        app.screen = AppScreen::Home;
        app.on_tick();
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_expired_timer_forces_finish() {
        let mut app = test_app();
        app.start_practice("math", LevelFilter::All);
        app.quiz.as_mut().unwrap().time_limit = std::time::Duration::ZERO;
        app.on_tick();
        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.notice.as_deref(), Some("Time is up"));
    }

    #[test]
    fn test_daily_session_is_capped_at_target() {
        let mut app = test_app();
        app.start_daily("math");
        assert_eq!(app.screen, AppScreen::Quiz);
        assert!(app.quiz.as_ref().unwrap().total() <= daily::DAILY_TARGET);
    }

    #[test]
    fn test_clear_history_empties_everything() {
        let mut app = test_app();
        app.config.questions_per_session = 1;
        app.start_practice("math", LevelFilter::All);
        app.quiz.as_mut().unwrap().select(0);
        app.next_step();
        app.next_step();
        assert_eq!(app.history.len(), 1);

        app.clear_history();
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_list_navigation_wraps() {
        let mut app = test_app();
        assert_eq!(app.packages.len(), 1);
        app.list_down(app.packages.len());
        assert_eq!(app.package_selected, 0);
        app.list_up(app.packages.len());
        assert_eq!(app.package_selected, 0);
    }
}
