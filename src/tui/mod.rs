//! Terminal dashboard for the grid backend.
//!
//! Feature-gated behind `tui`. Launch with `urja dashboard`.

mod controls;
mod layout;
/// Dashboard application state.
pub mod runtime;
mod style;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::api::ApiClient;
use crate::platform::Platform;
use crate::status::StatusPoller;
use runtime::App;

/// How long the render loop waits for input before redrawing.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Launches the dashboard against `client`.
///
/// Spawns the status poller and a one-off service description fetch, then
/// runs the blocking render loop until the user quits. With `every` set,
/// the poller also re-polls on that interval.
///
/// # Errors
///
/// Returns any terminal setup or drawing error.
pub async fn run(client: ApiClient, every: Option<Duration>) -> io::Result<()> {
    let poller = StatusPoller::new(client.clone());
    let state_rx = poller.subscribe();
    let (refresh_tx, refresh_rx) = mpsc::channel(1);
    let poll_task = tokio::spawn(poller.run(refresh_rx, every));

    let (service_tx, service_rx) = watch::channel(None);
    let service_client = client.clone();
    let service_task = tokio::spawn(async move {
        let outcome = service_client
            .service_info()
            .await
            .map_err(|e| e.to_string());
        service_tx.send_replace(Some(outcome));
    });

    let app = App::new(
        client.api_url().to_string(),
        Platform::detect(),
        state_rx,
        service_rx,
        refresh_tx,
    );

    let result = tokio::task::spawn_blocking(move || run_terminal(app))
        .await
        .map_err(io::Error::other)?;

    poll_task.abort();
    service_task.abort();
    debug!("dashboard closed");
    result
}

/// Sets up the terminal, runs the event loop, and always restores it.
fn run_terminal(mut app: App) -> io::Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e);
        }
    };

    let result = event_loop(&mut terminal, &mut app);

    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

/// Core event loop: pull state, draw, handle input.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.sync();
        terminal.draw(|frame| layout::render(frame, app))?;

        if app.quit {
            return Ok(());
        }

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(app, key);
            }
        }
    }
}
