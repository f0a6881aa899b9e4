use std::path::PathBuf;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use crate::config::Config;
use crate::export::{ResultReport, write_report};
use crate::quiz::{Level, Question, QuestionGenerator};
use crate::session::{
    AnswerFeedback, MAX_NAME_CHARS, Phase, QuizEvent, SessionError, SessionState, Summary,
    summarize, transition,
};
use crate::ui::components::name_input::NameInput;
use crate::ui::theme::Theme;

/// The answered question, kept on screen until `until` so the player sees
/// the outcome before the next question replaces it.
#[derive(Clone, Debug)]
pub struct Flash {
    pub question: Question,
    pub chosen: usize,
    pub feedback: AnswerFeedback,
    pub level: Level,
    pub number: usize,
    pub total: usize,
    pub retry: bool,
    pub until: Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
}

pub struct App {
    pub session: SessionState,
    pub generator: QuestionGenerator,
    pub config: Config,
    pub theme: &'static Theme,
    pub name_input: NameInput,
    pub level_selected: usize,
    pub choice_selected: usize,
    pub result_scroll: usize,
    pub flash: Option<Flash>,
    pub notice: Option<Notice>,
    pub last_export: Option<PathBuf>,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, generator: QuestionGenerator, seed: Option<u64>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            tracing::warn!(
                theme = %config.theme,
                available = ?Theme::available_themes(),
                "theme not found, using default"
            );
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            session: SessionState::new(),
            generator,
            config,
            theme,
            name_input: NameInput::new(MAX_NAME_CHARS),
            level_selected: 0,
            choice_selected: 0,
            result_scroll: 0,
            flash: None,
            notice: None,
            last_export: None,
            should_quit: false,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    fn apply(&mut self, event: QuizEvent) -> Result<Option<AnswerFeedback>, SessionError> {
        match transition(&self.session, event, &self.generator, &mut self.rng) {
            Ok(step) => {
                self.session = step.state;
                self.notice = None;
                Ok(step.feedback)
            }
            Err(err) => {
                tracing::debug!(%err, phase = ?self.session.phase, "event rejected");
                self.notice = Some(Notice::Error(describe_error(&err)));
                Err(err)
            }
        }
    }

    pub fn submit_name(&mut self) {
        let name = self.name_input.value().to_string();
        if self.apply(QuizEvent::SubmitName(name)).is_ok() {
            self.level_selected = 0;
        }
    }

    pub fn select_level(&mut self, index: usize) {
        let Some(level) = Level::ALL.get(index).copied() else {
            return;
        };
        self.level_selected = index;
        if self.apply(QuizEvent::SelectLevel(level)).is_ok() {
            self.choice_selected = 0;
        }
    }

    /// Submit the choice at `index` of the current question. Ignored while
    /// the previous answer is still being shown.
    pub fn answer(&mut self, index: usize) {
        if self.input_locked() {
            return;
        }
        let Some(question) = self.session.current_question().cloned() else {
            return;
        };
        let Some(choice) = question.choices.get(index).cloned() else {
            return;
        };
        let Some(level) = self.session.active_level else {
            return;
        };
        let number = self.session.cursor + 1;
        let total = self.session.question_batch.len();
        let retry = self.session.is_retry_round;

        if let Ok(Some(feedback)) = self.apply(QuizEvent::Answer(choice)) {
            let until = Instant::now() + self.config.flash_duration(feedback.is_correct());
            self.flash = Some(Flash {
                question,
                chosen: index,
                feedback,
                level,
                number,
                total,
                retry,
                until,
            });
            self.choice_selected = 0;
        }
    }

    pub fn answer_selected(&mut self) {
        self.answer(self.choice_selected);
    }

    /// Choices sit in a 2x2 grid; horizontal moves flip the column.
    pub fn move_choice_horizontal(&mut self) {
        self.move_choice(1);
    }

    pub fn move_choice_vertical(&mut self) {
        self.move_choice(2);
    }

    fn move_choice(&mut self, mask: usize) {
        let count = self
            .session
            .current_question()
            .map_or(0, |question| question.choices.len());
        let next = self.choice_selected ^ mask;
        if next < count {
            self.choice_selected = next;
        }
    }

    pub fn abandon_level(&mut self) {
        if self.input_locked() {
            return;
        }
        if self.apply(QuizEvent::AbandonLevel).is_ok() {
            self.choice_selected = 0;
        }
    }

    pub fn continue_to_levels(&mut self) {
        if self.apply(QuizEvent::ContinueToLevelSelect).is_ok() {
            self.level_selected = self
                .session
                .remaining_levels()
                .first()
                .and_then(|level| Level::ALL.iter().position(|l| l == level))
                .unwrap_or(0);
        }
    }

    pub fn show_final_result(&mut self) {
        if self.apply(QuizEvent::ShowFinalResult).is_ok() {
            self.result_scroll = 0;
        }
    }

    pub fn restart(&mut self) {
        if self.apply(QuizEvent::Restart).is_ok() {
            self.name_input.clear();
            self.level_selected = 0;
            self.choice_selected = 0;
            self.result_scroll = 0;
            self.flash = None;
            self.last_export = None;
        }
    }

    pub fn input_locked(&self) -> bool {
        self.flash
            .as_ref()
            .is_some_and(|flash| Instant::now() < flash.until)
    }

    /// Drop the answer flash once it has been shown long enough.
    pub fn tick(&mut self) {
        if self.flash.is_some() && !self.input_locked() {
            self.flash = None;
        }
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.session.all_records)
    }

    pub fn scroll_results(&mut self, down: bool) {
        let max = self.session.all_records.len().saturating_sub(1);
        self.result_scroll = if down {
            (self.result_scroll + 1).min(max)
        } else {
            self.result_scroll.saturating_sub(1)
        };
    }

    pub fn export_results(&mut self) {
        let report = ResultReport::new(&self.session.user_name, self.summary());
        let renderer = self.config.export_format.renderer();
        let dir = PathBuf::from(&self.config.export_dir);
        match write_report(&dir, &report, renderer.as_ref()) {
            Ok(path) => {
                self.notice = Some(Notice::Info(
                    t!("result.exported", path = path.display()).to_string(),
                ));
                self.last_export = Some(path);
            }
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "export failed");
                self.notice = Some(Notice::Error(
                    t!("result.export_failed", error = format!("{err:#}")).to_string(),
                ));
            }
        }
    }
}

/// Player-facing text for a rejected event.
pub fn describe_error(err: &SessionError) -> String {
    match err {
        SessionError::EmptyName => t!("error.empty_name"),
        SessionError::NameTooLong { max } => t!("error.name_too_long", max = max),
        SessionError::LevelAlreadyCompleted(_) => t!("error.level_completed"),
        SessionError::LevelsIncomplete { remaining } => {
            t!("error.levels_incomplete", remaining = remaining)
        }
        SessionError::UnexpectedEvent { .. } => t!("error.unexpected"),
        SessionError::Generator(inner) => t!("error.generator", error = inner),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{SamplingPolicy, Vocabulary};

    fn test_app(questions: usize) -> App {
        let mut config = Config::default();
        config.correct_flash_ms = 0;
        config.incorrect_flash_ms = 0;
        let generator = QuestionGenerator::new(
            Vocabulary::builtin().unwrap(),
            SamplingPolicy::WithoutReplacement,
        )
        .unwrap()
        .with_batch_size(Some(questions));
        App::new(config, generator, Some(11))
    }

    fn correct_index(app: &App) -> usize {
        let question = app.session.current_question().unwrap();
        question
            .choices
            .iter()
            .position(|c| *c == question.correct_answer)
            .unwrap()
    }

    fn wrong_index(app: &App) -> usize {
        let question = app.session.current_question().unwrap();
        question
            .choices
            .iter()
            .position(|c| *c != question.correct_answer)
            .unwrap()
    }

    fn start(app: &mut App) {
        app.name_input.insert_str("Mina");
        app.submit_name();
        assert_eq!(app.phase(), Phase::LevelSelect);
    }

    #[test]
    fn test_empty_name_sets_error_notice() {
        let mut app = test_app(3);
        app.submit_name();
        assert_eq!(app.phase(), Phase::NotStarted);
        assert!(matches!(app.notice, Some(Notice::Error(_))));

        app.name_input.insert_str("Mina");
        app.submit_name();
        assert_eq!(app.phase(), Phase::LevelSelect);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_answer_records_flash() {
        let mut app = test_app(3);
        start(&mut app);
        app.select_level(0);
        assert_eq!(app.phase(), Phase::InRound);

        let index = wrong_index(&app);
        app.answer(index);
        let flash = app.flash.as_ref().unwrap();
        assert_eq!(flash.chosen, index);
        assert_eq!(flash.number, 1);
        assert_eq!(flash.total, 3);
        assert!(!flash.feedback.is_correct());
        assert_eq!(app.session.cursor, 1);

        app.tick();
        assert!(app.flash.is_none());
    }

    #[test]
    fn test_locked_input_ignores_answers() {
        let mut app = test_app(3);
        app.config.correct_flash_ms = 60_000;
        start(&mut app);
        app.select_level(0);

        let index = correct_index(&app);
        app.answer(index);
        assert!(app.input_locked());
        app.answer(0);
        assert_eq!(app.session.cursor, 1);
        app.tick();
        assert!(app.flash.is_some());
    }

    #[test]
    fn test_level_with_retry_then_complete() {
        let mut app = test_app(2);
        start(&mut app);
        app.select_level(1);

        let wrong = wrong_index(&app);
        app.answer(wrong);
        let right = correct_index(&app);
        app.answer(right);
        assert!(app.session.is_retry_round);
        assert_eq!(app.session.question_batch.len(), 1);

        let right = correct_index(&app);
        app.answer(right);
        assert_eq!(app.phase(), Phase::LevelComplete);
        assert!(app.session.completed_levels.contains(&Level::Medium));

        app.continue_to_levels();
        assert_eq!(app.phase(), Phase::LevelSelect);
        assert_eq!(app.level_selected, 0);
    }

    #[test]
    fn test_final_result_requires_all_levels() {
        let mut app = test_app(1);
        start(&mut app);
        app.show_final_result();
        assert_eq!(app.phase(), Phase::LevelSelect);
        assert!(matches!(app.notice, Some(Notice::Error(_))));

        for index in 0..Level::ALL.len() {
            app.select_level(index);
            let right = correct_index(&app);
            app.answer(right);
            assert_eq!(app.phase(), Phase::LevelComplete);
            app.continue_to_levels();
        }
        app.show_final_result();
        assert_eq!(app.phase(), Phase::FinalResult);
        assert_eq!(app.summary().total, 3);
    }

    #[test]
    fn test_choice_grid_navigation() {
        let mut app = test_app(1);
        start(&mut app);
        app.select_level(0);
        app.move_choice_horizontal();
        assert_eq!(app.choice_selected, 1);
        app.move_choice_vertical();
        assert_eq!(app.choice_selected, 3);
        app.move_choice_horizontal();
        assert_eq!(app.choice_selected, 2);
    }

    #[test]
    fn test_export_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(1);
        app.config.export_dir = dir.path().display().to_string();
        start(&mut app);
        app.select_level(2);
        let right = correct_index(&app);
        app.answer(right);

        app.export_results();
        let path = app.last_export.clone().unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(matches!(app.notice, Some(Notice::Info(_))));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Mina"));
    }

    #[test]
    fn test_abandon_resets_choice_and_discards_level() {
        let mut app = test_app(3);
        start(&mut app);
        app.select_level(0);
        let right = correct_index(&app);
        app.answer(right);
        app.move_choice_horizontal();
        assert_eq!(app.choice_selected, 1);

        app.abandon_level();
        assert_eq!(app.phase(), Phase::LevelSelect);
        assert_eq!(app.choice_selected, 0);
        assert!(app.session.all_records.is_empty());
        assert!(app.session.completed_levels.is_empty());
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut app = test_app(1);
        start(&mut app);
        app.select_level(0);
        let right = correct_index(&app);
        app.answer(right);
        app.restart();
        assert_eq!(app.phase(), Phase::NotStarted);
        assert_eq!(app.name_input.value(), "");
        assert!(app.session.all_records.is_empty());
        assert!(app.flash.is_none());
    }
}
