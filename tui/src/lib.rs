//! TUI rendering for Scout.
//!
//! [`draw`] renders the application root. Until the readiness gate has fired
//! there is no mount, and only a waiting placeholder is drawn.

mod input;
mod theme;

pub use input::{KeyOutcome, handle_events, handle_key};
pub use theme::{Glyphs, Palette, glyphs};

use std::error::Error as StdError;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use scout_engine::{ApplicationState, ClientHandle, DerivedError, Mount};

use self::theme::styles;

const PROGRESS_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 12;

/// Rendering options taken from config.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
}

/// Main draw function
pub fn draw(frame: &mut Frame, app: &ApplicationState, options: UiOptions) {
    let palette = Palette::standard();
    let glyphs = glyphs(options.ascii_only);
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let Some(mount) = app.mount() else {
        draw_waiting(frame, &palette);
        return;
    };

    let status_height = u16::from(app.statusbar().is_visible());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Min(1),                // Page
            Constraint::Length(status_height), // Status bar
        ])
        .split(frame.area());

    // A failed client stays dirty, so every read recomputes it.
    let client = app.client();
    draw_header(frame, app, &client, chunks[0], &palette, &glyphs);
    draw_page(frame, app, &client, mount, chunks[1], &palette, &glyphs);
    if app.statusbar().is_visible() {
        draw_status_bar(frame, app, chunks[2], &palette, &glyphs);
    }
}

fn draw_waiting(frame: &mut Frame, palette: &Palette) {
    let area = frame.area();
    let y = area.y + area.height / 2;
    let line = Rect {
        x: area.x,
        y,
        width: area.width,
        height: 1.min(area.height),
    };
    let waiting = Paragraph::new(Line::from(Span::styled(
        "Waiting for terminal...",
        styles::label(palette),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(waiting, line);
}

fn draw_header(
    frame: &mut Frame,
    app: &ApplicationState,
    client: &Result<ClientHandle, DerivedError>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let connection = app.connection();
    let (indicator, color) = match client {
        Ok(_) => (glyphs.status_ready, palette.success),
        Err(_) => (glyphs.status_missing, palette.error),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Scout", styles::title(palette)),
        Span::styled(format!(" {} ", glyphs.separator), styles::label(palette)),
        Span::styled(indicator, Style::default().fg(color)),
        Span::styled(
            format!(" {}:{}", connection.hostname(), connection.port()),
            styles::value(palette),
        ),
    ]));
    frame.render_widget(header, area);
}

fn field_line<'a>(label: &'a str, value: String, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<LABEL_WIDTH$}"), styles::label(palette)),
        Span::styled(value, styles::value(palette)),
    ])
}

fn describe_client_error(err: &DerivedError) -> String {
    match err.source() {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}

fn draw_page(
    frame: &mut Frame,
    app: &ApplicationState,
    client: &Result<ClientHandle, DerivedError>,
    mount: &Mount,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let fragment = app.router().fragment();
    let route = if fragment.is_empty() { "home" } else { fragment };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border(palette))
        .style(Style::default().bg(palette.bg_panel))
        .title(Span::styled(
            format!(" {} {route} ", glyphs.route),
            styles::title(palette),
        ));

    let options = app.query_options();
    let client = match client {
        Ok(client) => format!("#{} ({})", client.id(), client.seed()),
        Err(err) => format!("unavailable: {}", describe_client_error(err)),
    };

    let lines = vec![
        field_line("Connection", app.connection().uri().to_string(), palette),
        field_line("Client", client, palette),
        Line::from(""),
        field_line("Query", options.query().to_string(), palette),
        field_line("Sort", options.sort().to_string(), palette),
        field_line("Limit", options.limit().to_string(), palette),
        field_line("Skip", options.skip().to_string(), palette),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "h home {sep} s schema {sep} d documents {sep} r reset {sep} x clear {sep} q quit",
                sep = glyphs.separator
            ),
            styles::label(palette),
        )),
        Line::from(Span::styled(
            format!("mounted at {}", mount.container()),
            Style::default().fg(palette.text_secondary),
        )),
    ];

    let page = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(page, area);
}

pub(crate) fn progress_bar(progress: u8, glyphs: &Glyphs) -> String {
    let filled = usize::from(progress.min(100)) * PROGRESS_WIDTH / 100;
    let mut bar = glyphs.progress_full.repeat(filled);
    bar.push_str(&glyphs.progress_empty.repeat(PROGRESS_WIDTH - filled));
    bar
}

fn draw_status_bar(
    frame: &mut Frame,
    app: &ApplicationState,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let statusbar = app.statusbar();
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            progress_bar(statusbar.progress(), glyphs),
            Style::default().fg(palette.accent),
        ),
        Span::raw(" "),
        Span::styled(
            statusbar.message().to_string(),
            Style::default().fg(palette.warning),
        ),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use scout_engine::{AppOptions, ClientError, ClientFactory, NavigateOptions};
    use std::cell::Cell;
    use std::rc::Rc;

    fn render(app: &ApplicationState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| draw(frame, app, UiOptions { ascii_only: true }))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn placeholder_before_ready() {
        let app = ApplicationState::new(AppOptions::default()).unwrap();
        let screen = render(&app);
        assert!(screen.contains("Waiting for terminal..."));
        assert!(!screen.contains("Connection"));
    }

    #[test]
    fn mounted_page_shows_connection_and_route() {
        let mut app =
            ApplicationState::new(AppOptions::default().with_uri("mongodb://host:1")).unwrap();
        app.mark_ready().unwrap();
        app.navigate("/schema", NavigateOptions::default()).unwrap();

        let screen = render(&app);
        assert!(screen.contains("Scout | * host:1"));
        assert!(screen.contains("> schema"));
        assert!(screen.contains("mongodb://host:1"));
        assert!(screen.contains("mounted at #application"));
    }

    #[test]
    fn failing_client_is_built_once_per_frame() {
        let attempts = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&attempts);
        let factory = move |seed: &str| -> Result<ClientHandle, ClientError> {
            counter.set(counter.get() + 1);
            Err(ClientError::Rejected {
                seed: seed.to_string(),
                reason: "offline".to_string(),
            })
        };
        let mut app = ApplicationState::new(
            AppOptions::default().with_client_factory(Rc::new(factory) as Rc<dyn ClientFactory>),
        )
        .unwrap();
        app.mark_ready().unwrap();

        let screen = render(&app);
        assert_eq!(attempts.get(), 1);
        assert!(screen.contains("Scout | o localhost:27017"));
        assert!(screen.contains("unavailable:"));
    }

    #[test]
    fn status_bar_renders_progress_when_visible() {
        let mut app = ApplicationState::new(AppOptions::default()).unwrap();
        app.mark_ready().unwrap();
        app.update_statusbar(|bar| {
            bar.show("Loading schema");
            bar.set_progress(50);
        });
        let screen = render(&app);
        assert!(screen.contains("##########---------- Loading schema"));
    }

    #[test]
    fn progress_bar_bounds() {
        let glyphs = glyphs(true);
        assert_eq!(progress_bar(0, &glyphs), "-".repeat(PROGRESS_WIDTH));
        assert_eq!(progress_bar(100, &glyphs), "#".repeat(PROGRESS_WIDTH));
    }
}
