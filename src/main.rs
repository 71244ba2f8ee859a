use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use smart_finance_manager::ui::{calendar::CalendarOptions, render};
use smart_finance_manager::{App, Config, OpenAiAdvisor, logging};

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render::draw(f, app))?;

        // The "Analyzing with AI..." frame is on screen; block on the request.
        if app.has_pending_request() {
            app.resolve_suggestion().await;
            continue;
        }

        if app.quit {
            return Ok(());
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_file)?;
    info!(model = %config.advisor.model, "starting session");

    let advisor = OpenAiAdvisor::new(&config.advisor).context("Failed to create AI client")?;
    let now = Local::now();
    let mut app = App::new(
        Box::new(advisor),
        config.advisor.timeout,
        CalendarOptions {
            initial_view: config.calendar_view,
        },
        now.date_naive(),
        now.naive_local().time(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    info!(
        expenses = app.session.ledger.len(),
        reminders = app.session.reminders.len(),
        "session ended, state discarded"
    );
    Ok(())
}
