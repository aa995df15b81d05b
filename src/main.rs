mod app;
mod bank;
mod config;
mod engine;
mod event;
mod session;
mod store;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen, LEVEL_CHOICES};
use event::{AppEvent, EventHandler};
use session::quiz::QuizPhase;
use store::json_store::JsonStore;
use ui::components::history_table::HistoryTable;
use ui::components::package_list::PackageList;
use ui::components::question_card::QuestionCard;
use ui::components::result_card::ResultCard;
use ui::layout::{AppLayout, centered_rect, format_remaining};

#[derive(Parser)]
#[command(name = "quizdr", version, about = "Terminal quiz trainer with daily challenges")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Data directory (question bank and history)")]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = match cli.data_dir {
        Some(dir) => JsonStore::with_base_dir(dir).ok(),
        None => JsonStore::new().ok(),
    };
    let mut app = App::new(store);

    if let Some(theme_name) = cli.theme
        && let Some(theme) = ui::theme::Theme::load(&theme_name)
    {
        let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
        app.theme = theme;
        app.menu.theme = theme;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Report the failure after the terminal is restored so the message is
    // actually readable.
    if let Err(err) = result {
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
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::PackageSelect => handle_package_key(app, key),
        AppScreen::LevelSelect => handle_level_key(app, key),
        AppScreen::DailySelect => handle_daily_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.go_package_select(),
        KeyCode::Char('2') => app.go_daily_select(),
        KeyCode::Char('h') => app.go_history(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.go_package_select(),
            1 => app.go_daily_select(),
            2 => app.go_history(),
            3 => app.should_quit = true,
            _ => {}
        },
        _ => {}
    }
}

fn handle_package_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Up | KeyCode::Char('k') => app.list_up(app.packages.len()),
        KeyCode::Down | KeyCode::Char('j') => app.list_down(app.packages.len()),
        KeyCode::Enter => app.choose_package(),
        _ => {}
    }
}

fn handle_level_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_package_select(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.level_selected = if app.level_selected == 0 {
                LEVEL_CHOICES.len() - 1
            } else {
                app.level_selected - 1
            };
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.level_selected = (app.level_selected + 1) % LEVEL_CHOICES.len();
        }
        KeyCode::Enter => app.choose_level(),
        _ => {}
    }
}

fn handle_daily_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Up | KeyCode::Char('k') => app.list_up(app.packages.len()),
        KeyCode::Down | KeyCode::Char('j') => app.list_down(app.packages.len()),
        KeyCode::Enter => app.choose_daily_package(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => app.go_home(),
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(quiz) = app.quiz.as_mut() {
                quiz.select_prev();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(quiz) = app.quiz.as_mut() {
                quiz.select_next();
            }
        }
        KeyCode::Char(ch @ '1'..='9') => {
            if let Some(quiz) = app.quiz.as_mut() {
                quiz.select(ch as usize - '1' as usize);
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.next_step(),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Char('h') => app.go_history(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    if app.history_confirm_clear {
        match key.code {
            KeyCode::Char('y') => app.clear_history(),
            KeyCode::Char('n') | KeyCode::Esc => app.history_confirm_clear = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Char('c') => {
            if !app.history.is_empty() {
                app.history_confirm_clear = true;
            }
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::PackageSelect => render_package_select(frame, app),
        AppScreen::LevelSelect => render_level_select(frame, app),
        AppScreen::DailySelect => render_daily_select(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::History => render_history(frame, app),
    }
}

fn render_notice(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let text = match app.notice.as_deref() {
        Some(notice) => format!(" {notice}"),
        None => String::new(),
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default()
            .fg(colors.warning())
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(footer, area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = AppLayout::new(frame.area());

    let header_info = format!(
        " {} packages | {} sessions recorded",
        app.packages.len(),
        app.history.len(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizdr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let menu_area = centered_rect(50, 80, layout.main);
    frame.render_widget(&app.menu, menu_area);

    if app.notice.is_some() {
        render_notice(frame, app, layout.footer);
    } else {
        let footer = Paragraph::new(Line::from(Span::styled(
            " [1] Session  [2] Daily  [h] History  [q] Quit ",
            Style::default().fg(colors.text_dim()),
        )));
        frame.render_widget(footer, layout.footer);
    }
}

fn render_package_select(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let area = centered_rect(50, 70, layout.main);
    let list = PackageList::new("Select Subject", &app.packages, app.package_selected, app.theme)
        .empty_text("No packages in the question bank");
    frame.render_widget(list, area);
    render_footer_hint(frame, app, " [Enter] Choose  [j/k] Move  [Esc] Back ", layout.footer);
}

fn render_level_select(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let area = centered_rect(40, 50, layout.main);

    let labels: Vec<String> = LEVEL_CHOICES
        .iter()
        .map(|filter| {
            let tag = filter.as_str();
            let mut label = tag.to_string();
            label[..1].make_ascii_uppercase();
            label
        })
        .collect();

    let title = match app.pending_package.as_deref() {
        Some(package) => format!("{package} | Level"),
        None => "Level".to_string(),
    };
    let list = PackageList::new(title, &labels, app.level_selected, app.theme);
    frame.render_widget(list, area);
    render_footer_hint(frame, app, " [Enter] Start  [j/k] Move  [Esc] Back ", layout.footer);
}

fn render_daily_select(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let area = centered_rect(50, 70, layout.main);
    let list = PackageList::new("Daily Challenge", &app.packages, app.package_selected, app.theme)
        .empty_text("No packages in the question bank");
    frame.render_widget(list, area);
    render_footer_hint(frame, app, " [Enter] Start today's set  [j/k] Move  [Esc] Back ", layout.footer);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = AppLayout::new(frame.area());

    let Some(ref quiz) = app.quiz else {
        return;
    };

    let header_text = format!(
        " {} | {} | {} ",
        quiz.package,
        quiz.mode.as_str(),
        format_remaining(quiz.remaining().as_secs()),
    );
    let header = Paragraph::new(Line::from(Span::styled(
        &*header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let card = QuestionCard::new(quiz, app.theme);
    frame.render_widget(card, layout.main);

    if app.notice.is_some() {
        render_notice(frame, app, layout.footer);
    } else {
        let hint = match quiz.phase {
            QuizPhase::AwaitingAnswer => " [j/k or 1-9] Pick  [Enter] Submit  [Esc] Menu ",
            QuizPhase::ShowingFeedback => " [Enter] Next  [Esc] Menu ",
        };
        let footer = Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(colors.text_dim()),
        )));
        frame.render_widget(footer, layout.footer);
    }
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    if let Some(ref record) = app.last_record {
        let centered = centered_rect(50, 60, area);
        let card = ResultCard::new(record, app.theme);
        frame.render_widget(card, centered);
    }
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let table = HistoryTable::new(&app.history, app.history_confirm_clear, app.theme);
    frame.render_widget(table, layout.main);
    render_footer_hint(frame, app, " [c] Clear  [Esc] Back ", layout.footer);
}

fn render_footer_hint(
    frame: &mut ratatui::Frame,
    app: &App,
    hint: &str,
    area: ratatui::layout::Rect,
) {
    if app.notice.is_some() {
        render_notice(frame, app, area);
        return;
    }
    let colors = &app.theme.colors;
    let footer = Paragraph::new(Line::from(Span::styled(
        hint.to_string(),
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, area);
}
