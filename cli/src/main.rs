//! Scout CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`scout_engine`] (application state) and [`scout_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> ApplicationState::for_process -> TerminalSession::new() -> run_app()
//!                                                                        |
//!                         wait_for_terminal() --ready--> app.mark_ready()
//! ```
//!
//! # Event Loop
//!
//! A fixed 16ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Deliver the ready signal once the terminal reports a usable size
//! 3. Drain input (non-blocking)
//! 4. Render frame

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        size as terminal_size,
    },
};
use ratatui::prelude::*;
use std::{
    env,
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tokio::{
    sync::oneshot::{self, error::TryRecvError},
    time::{self, MissedTickBehavior},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use scout_engine::{AppOptions, ApplicationState, FireOutcome, ScoutConfig, initial_seed};
use scout_tui::{KeyOutcome, UiOptions, draw, handle_events};

const LOCATION_ENV: &str = "SCOUT_LOCATION";
const FRAME_DURATION: Duration = Duration::from_millis(16);
const READY_POLL: Duration = Duration::from_millis(10);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_scout_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Writing to stdout/stderr would corrupt the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_scout_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in scout_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!("Failed to create log dir {}: {e}", parent.display()));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!("Failed to open log file {}: {e}", candidate.display()));
            }
        }
    }

    (None, warnings)
}

fn scout_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.scout/logs/scout.log
    if let Some(config_path) = ScoutConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("scout.log"));
    }

    // Fallback: ./.scout/logs/scout.log
    candidates.push(PathBuf::from(".scout").join("logs").join("scout.log"));

    candidates
}

/// The launch location: first CLI argument, else `$SCOUT_LOCATION`.
fn launch_location() -> Option<String> {
    env::args()
        .nth(1)
        .or_else(|| env::var(LOCATION_ENV).ok())
}

/// Full-screen terminal state (raw mode + alternate screen).
///
/// Restored on drop, so the terminal stays usable after early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Signal readiness once the terminal reports a non-empty size.
async fn wait_for_terminal(ready: oneshot::Sender<()>) {
    let mut poll = time::interval(READY_POLL);
    loop {
        poll.tick().await;
        match terminal_size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => {
                tracing::debug!(cols, rows, "terminal ready");
                let _ = ready.send(());
                return;
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(%err, "terminal size unavailable"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let config = match ScoutConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %err.path().display(), %err, "ignoring unreadable config");
            None
        }
    };

    let location = launch_location();
    let configured = config.as_ref().and_then(ScoutConfig::connection_uri);
    let seed = initial_seed(location.as_deref(), configured.as_deref());

    let mut options = AppOptions::default().with_uri(seed);
    if let Some(limit) = config.as_ref().and_then(ScoutConfig::query_limit) {
        options = options.with_query_limit(limit);
    }
    let mut app =
        ApplicationState::for_process(options).context("failed to create application state")?;

    let ui = UiOptions {
        ascii_only: config.as_ref().is_some_and(ScoutConfig::ascii_only),
    };

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app, ui).await
    };

    if let Err(err) = &result {
        tracing::error!(?err, "scout exited with error");
    }
    result
}

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut ApplicationState, ui: UiOptions) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let (ready_tx, ready_rx) = oneshot::channel();
    let waiter = tokio::spawn(wait_for_terminal(ready_tx));
    let mut ready = Some(ready_rx);

    let mut frames = time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        frames.tick().await;

        if let Some(rx) = ready.as_mut() {
            match rx.try_recv() {
                Ok(()) => {
                    ready = None;
                    match app.mark_ready() {
                        Ok(FireOutcome::Fired) => {}
                        Ok(outcome) => tracing::warn!(?outcome, "ready signal had no effect"),
                        Err(err) => break Err(err).context("bootstrap failed"),
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    ready = None;
                    tracing::warn!("terminal readiness signal dropped");
                }
            }
        }

        match handle_events(app) {
            Ok(KeyOutcome::Quit) => break Ok(()),
            Ok(KeyOutcome::Continue) => {}
            Err(e) => break Err(e),
        }

        if let Err(e) = terminal.draw(|frame| draw(frame, app, ui)) {
            break Err(e.into());
        }
    };

    waiter.abort();
    result
}
