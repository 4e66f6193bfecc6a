use std::{io, sync::Mutex, time::Duration};

use anyhow::Context;
use board::{App, ui};
use chrono::Local;
use client::{DEFAULT_API_BASE_URL, HttpTaskApi, TaskApi, TaskStore};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use tracing_subscriber::EnvFilter;

const API_URL_ENV: &str = "TASKS_API_URL";
const LOG_FILE_ENV: &str = "BOARD_LOG";
const TICK: Duration = Duration::from_millis(250);

fn init_tracing() -> anyhow::Result<()> {
    // stdout belongs to the board, so logs only go to a file when asked
    let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.to_string_lossy()))?;

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_new(format!(
        "warn,board={level},client={level}",
        level = log_level
    ))
    .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    tracing::info!("Using task API at {base_url}");
    let store = TaskStore::new(HttpTaskApi::new(&base_url));
    let mut app = App::new(store, Local::now().date_naive());
    app.refresh().await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend, A: TaskApi>(
    terminal: &mut Terminal<B>,
    app: &mut App<A>,
) -> anyhow::Result<()> {
    loop {
        app.today = Local::now().date_naive();
        terminal.draw(|frame| ui::draw(frame, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key).await;
        }
        if app.should_quit() {
            return Ok(());
        }
    }
}
