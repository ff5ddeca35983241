//! Input handling for Scout TUI.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::{Value, json};
use tracing::{debug, warn};

use scout_engine::{ApplicationState, NavigateOptions, QueryParams};

const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Drain pending terminal events without blocking.
pub fn handle_events(app: &mut ApplicationState) -> Result<KeyOutcome> {
    for _ in 0..MAX_EVENTS_PER_FRAME {
        if !event::poll(Duration::ZERO)? {
            break;
        }
        if let Event::Key(key) = event::read()?
            && handle_key(app, key) == KeyOutcome::Quit
        {
            return Ok(KeyOutcome::Quit);
        }
    }
    Ok(KeyOutcome::Continue)
}

/// Apply a single key press.
pub fn handle_key(app: &mut ApplicationState, key: KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyOutcome::Quit;
        }
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('h') => go(app, "/", NavigateOptions::default()),
        KeyCode::Char('s') => {
            let params = params([("limit", json!(app.query_options().limit()))]);
            go(app, "/schema", NavigateOptions::with_params(params));
        }
        KeyCode::Char('d') => {
            let options = app.query_options();
            let params = params([
                ("query", options.query().clone()),
                ("sort", options.sort().clone()),
                ("limit", json!(options.limit())),
                ("skip", json!(options.skip())),
            ]);
            go(app, "/documents", NavigateOptions::with_params(params));
        }
        KeyCode::Char('r') => {
            app.update_query_options(|options| options.reset());
            app.update_statusbar(|bar| bar.show("Query options reset"));
        }
        KeyCode::Char('x') => app.update_statusbar(|bar| bar.hide()),
        _ => {}
    }
    KeyOutcome::Continue
}

fn params<const N: usize>(entries: [(&str, Value); N]) -> QueryParams {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn go(app: &mut ApplicationState, fragment: &str, options: NavigateOptions) {
    match app.navigate(fragment, options) {
        Ok(()) => {
            let route = app.router().fragment().to_string();
            debug!(%route, "navigated");
            app.update_statusbar(|bar| {
                bar.show(format!("Loaded #{route}"));
                bar.set_progress(100);
            });
        }
        Err(err) => {
            warn!(fragment, %err, "navigation failed");
            app.update_statusbar(|bar| {
                bar.show(format!("Navigation failed: {err}"));
                bar.set_progress(0);
            });
        }
    }
}
