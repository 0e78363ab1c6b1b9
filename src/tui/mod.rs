pub mod app;
pub mod effect;
pub mod input;
pub mod message;
pub mod ui;
pub mod views;

use crate::config::Workspace;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub use app::{App, Connector, Outcome, Session, ViewState};
pub use effect::{Effect, Scheduler};
pub use message::Message;

/// Run one interactive session until it ends, returning how it ended and
/// the workspace that was active at the end.
pub async fn run(session: Session, connect: Connector) -> Result<(Outcome, Workspace)> {
    // Check if stdout is a terminal
    if !std::io::IsTerminal::is_terminal(&io::stdout()) {
        anyhow::bail!("linc requires an interactive terminal");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, connect);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map(|outcome| (outcome, app.workspace().clone()))
}

/// Feed a message to the app and start the effects it asks for.
fn apply(app: &mut App, scheduler: &Scheduler, msg: Message) {
    for effect in app.update(msg) {
        scheduler.spawn(effect, app.tracker());
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<Outcome> {
    let (tx, mut rx) = mpsc::channel(64);
    let scheduler = Scheduler::new(tx);
    for effect in app.init() {
        scheduler.spawn(effect, app.tracker());
    }

    let poll_interval = Duration::from_millis(50);
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let msg = input::dispatch(app, key);
                    apply(app, &scheduler, msg);
                }
            }
        }

        // Effect results (non-blocking)
        while let Ok(msg) = rx.try_recv() {
            apply(app, &scheduler, msg);
        }

        if let Some(outcome) = app.take_outcome() {
            return Ok(outcome);
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick_spinner();
            last_tick = Instant::now();
        }
    }
}
