use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::collections::VecDeque;
use std::io::stderr;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

pub mod controller;
pub mod inputs;
pub mod row;
pub mod theme;
pub mod viewport;

use crate::git::{Commit, CommitSource, LoadError};
use controller::ViewportController;

/// How long one pass of the event loop waits for input or for the pending load.
const TICK: Duration = Duration::from_millis(100);

/// High-level actions emitted by the input layer and handled by the picker loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Up,
    Down,
    Confirm,
    Quit,
}

/// Messages sent from the picker to whoever launched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerMessage {
    Selected { hash: String },
}

struct AppState {
    controller: ViewportController,
    selected: String,
    loading: bool,
    error: Option<String>,
    pending: VecDeque<AppAction>,
    started: Instant,
}

impl AppState {
    fn new(selected: String, tx: UnboundedSender<PickerMessage>) -> Self {
        Self {
            controller: ViewportController::new(tx),
            selected,
            loading: true,
            error: None,
            pending: VecDeque::new(),
            started: Instant::now(),
        }
    }

    /// Install the load result and replay the keys queued while it was pending.
    ///
    /// Returns `true` when one of the replayed keys closes the picker.
    fn finish_load(&mut self, result: Result<Vec<Commit>, LoadError>) -> bool {
        self.loading = false;
        if let Err(e) = self.controller.apply_load(result) {
            self.error = Some(format!("Failed to load commits: {e}"));
        }
        while let Some(action) = self.pending.pop_front() {
            if self.handle(action) {
                self.pending.clear();
                return true;
            }
        }
        false
    }

    /// Apply one action. Returns `true` when the picker should close.
    fn handle(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::Quit => true,
            AppAction::Up => {
                self.controller.move_up();
                false
            }
            AppAction::Down => {
                self.controller.move_down();
                false
            }
            AppAction::Confirm => self.controller.confirm(),
        }
    }
}

/// Launch the interactive picker. Returns when the user confirms a commit or quits.
///
/// The picker draws on stderr so that stdout stays free for the caller's output.
pub async fn run<S: CommitSource>(
    source: S,
    selected: String,
    tx: UnboundedSender<PickerMessage>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr))?;

    let mut app = AppState::new(selected, tx);
    let res = run_app(&mut terminal, &mut app, &source).await;

    // The loop's own error is returned only after the terminal is back in cooked mode.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend, S: CommitSource>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    source: &S,
) -> Result<()> {
    let load = source.load_commits();
    tokio::pin!(load);

    loop {
        terminal.draw(|f| draw(f, app))?;

        if app.loading {
            if let Ok(result) = tokio::time::timeout(TICK, &mut load).await {
                if app.finish_load(result) {
                    return Ok(());
                }
                continue;
            }
            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    match inputs::key_event_to_action(&key) {
                        Some(AppAction::Quit) => {
                            info!("Picker closed while loading");
                            return Ok(());
                        }
                        Some(action) => app.pending.push_back(action),
                        None => {}
                    }
                }
            }
            continue;
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = inputs::key_event_to_action(&key) {
                    if app.handle(action) {
                        break;
                    }
                    debug!(?action, cursor = app.controller.cursor(), "Input");
                }
            }
        }
    }

    Ok(())
}

fn draw(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let width = size.width as usize;
    let height = size.height as usize;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::Palette::BORDER))
        .padding(Padding::uniform(1))
        .title_bottom(
            Line::styled(
                " ↑/↓ move  enter select  q quit ",
                Style::default().fg(theme::Palette::FOOTER),
            )
            .alignment(Alignment::Right),
        );

    let window = app.controller.viewport(height);
    let rows = app.controller.row_displays(&window, &app.selected, width);

    let mut lines: Vec<Line> = Vec::with_capacity(window.total_rows());
    lines.extend((0..window.start_blank_lines).map(|_| Line::raw(" ")));
    lines.extend(rows.iter().map(|row| row.to_line()));
    lines.extend((0..window.end_blank_lines).map(|_| Line::raw(" ")));

    f.render_widget(Paragraph::new(lines).block(block), size);

    // Loading spinner overlay
    if app.loading {
        let spinner_frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        let idx = ((Instant::now().duration_since(app.started).as_millis() / 100) % 10) as usize;
        let area = centered_rect(20, 3, size);
        let spinner = Paragraph::new(format!("{} loading", spinner_frames[idx]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(spinner, area);
    }

    // Error banner
    if let Some(err) = &app.error {
        let banner = Paragraph::new(err.as_str()).style(
            Style::default()
                .fg(theme::Palette::ERROR_FG)
                .bg(theme::Palette::ERROR_BG),
        );
        let area = Rect::new(
            1,
            size.height.saturating_sub(2),
            size.width.saturating_sub(2),
            1.min(size.height),
        );
        f.render_widget(banner, area);
    }
}

/// A rect of at most `width` x `height` centred in `r`.
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}
