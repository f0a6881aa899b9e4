mod app;
mod config;
mod event;
mod export;
mod logging;
mod quiz;
mod session;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;

use app::{App, Notice};
use config::Config;
use event::{AppEvent, EventHandler};
use quiz::{Level, SamplingPolicy};
use session::Phase;
use ui::components::banner::Banner;
use ui::components::level_menu::LevelMenu;
use ui::components::name_input::{InputResult, NameInputView};
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::result_table::ResultTable;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines, split_hints};

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "doushi", version, about = "Multiple-choice Japanese verb quiz")]
struct Cli {
    #[arg(short, long, help = "Player name; skips the name screen")]
    name: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "UI language (en, ko)")]
    language: Option<String>,

    #[arg(short, long, help = "Questions per level")]
    questions: Option<usize>,

    #[arg(long, help = "Seed for reproducible question order")]
    seed: Option<u64>,

    #[arg(long, help = "JSON vocabulary file replacing the built-in list")]
    vocabulary: Option<String>,

    #[arg(long, help = "Allow the same verb more than once per level")]
    with_replacement: bool,

    #[arg(long, help = "Validate the vocabulary, print usable question kinds and exit")]
    check: bool,

    #[arg(long, help = "Write the effective configuration to the config file and exit")]
    write_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(questions) = cli.questions {
        config.questions_per_level = Some(questions);
    }
    if let Some(path) = cli.vocabulary {
        config.vocabulary_path = Some(path);
    }
    if cli.with_replacement {
        config.sampling = SamplingPolicy::WithReplacement;
    }

    let log_path = logging::init(&config::data_dir())?;
    tracing::info!(log = %log_path.display(), version = env!("CARGO_PKG_VERSION"), "starting");

    config.normalize_language(&rust_i18n::available_locales!());
    rust_i18n::set_locale(&config.language);

    if cli.write_config {
        let path = config.save()?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    // Vocabulary problems are fatal before the terminal is taken over.
    let generator = config
        .question_generator()
        .context("vocabulary cannot produce a quiz")?;

    if cli.check {
        println!(
            "{} verbs loaded, sampling {:?}",
            generator.vocabulary().len(),
            generator.sampling()
        );
        for level in Level::ALL {
            let kinds: Vec<&str> = generator
                .kinds_for(level)
                .into_iter()
                .map(|kind| kind.as_str())
                .collect();
            println!("{level}: {}", kinds.join(", "));
        }
        println!("themes: {}", ui::theme::Theme::available_themes().join(", "));
        return Ok(());
    }

    let mut app = App::new(config, generator, cli.seed);
    if let Some(name) = cli.name {
        app.name_input.insert_str(&name);
        app.submit_name();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %format!("{err:#}"), "exiting with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => {
                if app.phase() == Phase::NotStarted {
                    app.name_input.insert_str(&text);
                }
            }
            AppEvent::Tick => app.tick(),
        }

        if app.should_quit {
            tracing::info!("quit");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    app.tick();
    if app.input_locked() {
        return;
    }

    match app.phase() {
        Phase::NotStarted => handle_name_key(app, key),
        Phase::LevelSelect => handle_level_key(app, key),
        Phase::InRound => handle_quiz_key(app, key),
        Phase::LevelComplete => handle_complete_key(app, key),
        Phase::FinalResult => handle_result_key(app, key),
    }
}

fn handle_name_key(app: &mut App, key: KeyEvent) {
    match app.name_input.handle(key) {
        InputResult::Submit => app.submit_name(),
        InputResult::Cancel => app.should_quit = true,
        InputResult::Continue => {}
    }
}

fn handle_level_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(ch @ '1'..='3') => app.select_level(ch as usize - '1' as usize),
        KeyCode::Up | KeyCode::Char('k') => app.level_selected = LevelMenu::prev(app.level_selected),
        KeyCode::Down | KeyCode::Char('j') => app.level_selected = LevelMenu::next(app.level_selected),
        KeyCode::Enter => app.select_level(app.level_selected),
        KeyCode::Char('f') => app.show_final_result(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch @ '1'..='4') => app.answer(ch as usize - '1' as usize),
        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
            app.move_choice_horizontal()
        }
        KeyCode::Up | KeyCode::Down | KeyCode::Char('k') | KeyCode::Char('j') => {
            app.move_choice_vertical()
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.answer_selected(),
        KeyCode::Esc => app.abandon_level(),
        _ => {}
    }
}

fn handle_complete_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('c') => app.continue_to_levels(),
        KeyCode::Char('f') => app.show_final_result(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') => app.export_results(),
        KeyCode::Char('r') => app.restart(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results(true),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results(false),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    // The answered question stays up until its flash expires, even when
    // the session has already moved on to the retry round or level end.
    if app.flash.is_some() {
        render_quiz(frame, app);
        return;
    }

    match app.phase() {
        Phase::NotStarted => render_name(frame, app),
        Phase::LevelSelect => render_level_select(frame, app),
        Phase::InRound => render_quiz(frame, app),
        Phase::LevelComplete => render_level_complete(frame, app),
        Phase::FinalResult => render_final_result(frame, app),
    }
}

/// Split the screen, draw the header and the footer (notice line plus
/// wrapped key hints), and return the body area.
fn render_frame(frame: &mut ratatui::Frame, app: &App, info: &str, hints: &str) -> Rect {
    let area = frame.area();
    let colors = &app.theme.colors;

    let hint_lines = pack_hint_lines(&split_hints(hints), area.width as usize);
    let notice = match (&app.notice, app.phase()) {
        // The name screen shows its own validation message.
        (_, Phase::NotStarted) => None,
        (Some(Notice::Error(text)), _) => Some((text.as_str(), colors.warning())),
        (Some(Notice::Info(text)), _) => Some((text.as_str(), colors.success())),
        (None, _) => None,
    };
    let footer_lines = hint_lines.len() as u16 + u16::from(notice.is_some());
    let layout = AppLayout::new(area, footer_lines);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", t!("app.title")),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {info}"),
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let mut footer: Vec<Line> = Vec::new();
    if let Some((text, color)) = notice {
        footer.push(Line::from(Span::styled(
            format!("  {text}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }
    footer.extend(hint_lines.into_iter().map(|line| {
        Line::from(Span::styled(line, Style::default().fg(colors.text_pending())))
    }));
    frame.render_widget(Paragraph::new(footer), layout.footer);

    layout.main
}

fn render_name(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(frame, app, &t!("app.subtitle"), &t!("name.hint"));
    let error = match &app.notice {
        Some(Notice::Error(text)) => Some(text.as_str()),
        _ => None,
    };
    let view = NameInputView::new(
        &app.name_input,
        t!("name.prompt").to_string(),
        error,
        app.theme,
    );
    frame.render_widget(view, centered_rect(50, 40, main));
}

fn render_level_select(frame: &mut ratatui::Frame, app: &App) {
    let info = format!(
        "{}/{}",
        app.session.completed_levels.len(),
        Level::ALL.len()
    );
    let main = render_frame(frame, app, &info, &t!("level.hint"));
    let menu = LevelMenu::new(
        &app.session.user_name,
        app.level_selected,
        &app.session.completed_levels,
        app.theme,
    );
    frame.render_widget(menu, centered_rect(60, 80, main));
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let (question, selected, reveal, level, number, total, retry) = match &app.flash {
        Some(flash) => (
            &flash.question,
            flash.chosen,
            Some(&flash.feedback),
            flash.level,
            flash.number,
            flash.total,
            flash.retry,
        ),
        None => {
            let (Some(question), Some(level)) =
                (app.session.current_question(), app.session.active_level)
            else {
                return;
            };
            (
                question,
                app.choice_selected,
                None,
                level,
                app.session.cursor + 1,
                app.session.question_batch.len(),
                app.session.is_retry_round,
            )
        }
    };

    let info = if retry {
        t!("quiz.retry", current = number, total = total)
    } else {
        t!(
            "quiz.header",
            level = ui::level_label(level),
            current = number,
            total = total
        )
    };
    let main = render_frame(frame, app, &info, &t!("quiz.hint"));

    let body = centered_rect(70, 90, main);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body);

    // While flashing, the bar already counts the answered question.
    let done = if reveal.is_some() { number } else { number - 1 };
    let bar = ProgressBar::new(t!("quiz.progress").to_string(), done, total, app.theme);
    frame.render_widget(bar, layout[0]);

    let mut card = QuestionCard::new(question, selected, app.theme);
    if let Some(feedback) = reveal {
        card = card.reveal(feedback);
    }
    frame.render_widget(card, layout[1]);
}

fn render_level_complete(frame: &mut ratatui::Frame, app: &App) {
    let info = app
        .session
        .active_level
        .map(ui::level_label)
        .unwrap_or_default();
    let main = render_frame(frame, app, &info, &t!("complete.hint"));
    let banner = Banner::new(t!("complete.title").to_string(), app.theme)
        .line(t!("complete.cheer").to_string());
    frame.render_widget(banner, centered_rect(50, 40, main));
}

fn render_final_result(frame: &mut ratatui::Frame, app: &App) {
    let main = render_frame(frame, app, &app.session.user_name, &t!("result.hint"));
    let summary = app.summary();
    let table = ResultTable::new(&app.session.user_name, &summary, app.result_scroll, app.theme);
    frame.render_widget(table, main);
}
