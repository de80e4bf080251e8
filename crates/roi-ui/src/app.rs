//! Main application state and TUI event loop for the ROI dashboard.
//!
//! [`App`] owns the theme, the dashboard session and the most recent
//! [`DashboardState`]. Every filter change or reload recomputes the state
//! from the session before the next draw.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame, Terminal,
};

use roi_runtime::session::DashboardSession;
use roi_runtime::snapshot::DashboardState;

use crate::chart_view;
use crate::components::header::Header;
use crate::filter_panel::{self, FilterCursor};
use crate::metrics_view;
use crate::table_view;
use crate::themes::Theme;

/// Width of the filter side panel.
const FILTER_PANEL_WIDTH: u16 = 30;

/// Raw-data rows skipped per PageUp / PageDown.
const PAGE_ROWS: usize = 10;

/// Leave raw mode and the alternate screen.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Which dashboard tab is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Metrics,
    Insights,
    Charts,
    RawData,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Metrics, Tab::Insights, Tab::Charts, Tab::RawData];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Metrics => "📈 Metrics",
            Tab::Insights => "🧠 Insights",
            Tab::Charts => "📊 Charts",
            Tab::RawData => "🗃 Raw Data",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Metrics => 0,
            Tab::Insights => 1,
            Tab::Charts => 2,
            Tab::RawData => 3,
        }
    }

    pub fn next(&self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub tab: Tab,
    pub session: DashboardSession,
    /// Result of the last recompute.
    pub state: DashboardState,
    /// `true` while the filter panel has keyboard focus.
    pub filter_focus: bool,
    pub cursor: FilterCursor,
    /// First raw-data row shown.
    pub raw_offset: usize,
    /// One-line message shown in the footer (reload result, errors).
    pub status: Option<String>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Construct the application around an already loaded session.
    pub fn new(theme_name: &str, session: DashboardSession) -> Self {
        let state = session.state();
        Self {
            theme: Theme::from_name(theme_name),
            tab: Tab::Metrics,
            session,
            state,
            filter_focus: false,
            cursor: FilterCursor::default(),
            raw_offset: 0,
            status: None,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the current thread.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        restore_terminal()?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                return;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.tab = Tab::ALL[index];
                return;
            }
            KeyCode::Char('f') => {
                self.filter_focus = !self.filter_focus;
                return;
            }
            KeyCode::Esc => {
                self.filter_focus = false;
                return;
            }
            KeyCode::Char('r') => {
                self.reload();
                return;
            }
            _ => {}
        }

        if self.filter_focus {
            self.handle_filter_key(key.code);
        } else if self.tab == Tab::RawData {
            self.handle_scroll_key(key.code);
        }
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        let options = self.session.options().clone();
        match code {
            KeyCode::Left => self.cursor.prev_field(),
            KeyCode::Right => self.cursor.next_field(),
            KeyCode::Up => self.cursor.move_up(),
            KeyCode::Down => self.cursor.move_down(&options),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(value) = self.cursor.current(&options) {
                    tracing::debug!("Toggle {} = {value}", self.cursor.field);
                    self.session.toggle(self.cursor.field, value);
                    self.recompute();
                }
            }
            KeyCode::Char('a') => {
                self.session.select_all(self.cursor.field);
                self.recompute();
            }
            KeyCode::Char('c') => {
                self.session.clear(self.cursor.field);
                self.recompute();
            }
            _ => {}
        }
    }

    fn handle_scroll_key(&mut self, code: KeyCode) {
        let rows = self.state.snapshot().map(|s| s.rows.len()).unwrap_or(0);
        let last = rows.saturating_sub(1);
        self.raw_offset = match code {
            KeyCode::Down => (self.raw_offset + 1).min(last),
            KeyCode::Up => self.raw_offset.saturating_sub(1),
            KeyCode::PageDown => (self.raw_offset + PAGE_ROWS).min(last),
            KeyCode::PageUp => self.raw_offset.saturating_sub(PAGE_ROWS),
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => self.raw_offset,
        };
    }

    /// Re-read the input files and recompute.
    pub fn reload(&mut self) {
        self.status = Some(match self.session.reload() {
            Ok(()) => {
                tracing::info!("Reloaded input files");
                "Reloaded input files".to_string()
            }
            Err(e) => {
                tracing::warn!("Reload failed: {e}");
                format!("Reload failed: {e}")
            }
        });
        self.recompute();
    }

    /// Run the pipeline stages again for the current session state.
    pub fn recompute(&mut self) {
        self.state = self.session.state();
        self.cursor.clamp(self.session.options());
        let rows = self.state.snapshot().map(|s| s.rows.len()).unwrap_or(0);
        self.raw_offset = self.raw_offset.min(rows.saturating_sub(1));
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_tabs(frame, chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(FILTER_PANEL_WIDTH), Constraint::Min(20)])
            .split(chunks[2]);

        filter_panel::render_filter_panel(
            frame,
            body[0],
            self.session.options(),
            self.session.selection(),
            self.filter_focus.then_some(&self.cursor),
            &self.theme,
        );
        self.render_body(frame, body[1]);
        self.render_footer(frame, chunks[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let (status, detail) = match &self.state {
            DashboardState::Ready { snapshot } => (
                format!("{} of {} rows", snapshot.rows.len(), snapshot.merged_rows),
                snapshot.generated_at.format("%H:%M:%S UTC").to_string(),
            ),
            DashboardState::AwaitingUploads { missing } => {
                ("awaiting uploads".to_string(), missing.join(", "))
            }
            DashboardState::Failed { .. } => ("load failed".to_string(), "press r".to_string()),
        };
        let lines = Header::new(&status, &detail, &self.theme).to_lines();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .divider(Span::styled("│", self.theme.separator));
        frame.render_widget(tabs, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let DashboardState::Ready { snapshot } = &self.state else {
            let guidance = self.state.guidance().unwrap_or_default();
            let is_error = matches!(self.state, DashboardState::Failed { .. });
            table_view::render_no_data(frame, area, &guidance, is_error, &self.theme);
            return;
        };

        match self.tab {
            Tab::Metrics => metrics_view::render_metrics_view(
                frame,
                area,
                &snapshot.summary,
                &snapshot.rows,
                &self.theme,
            ),
            Tab::Insights => {
                table_view::render_insights_table(frame, area, &snapshot.insights, &self.theme)
            }
            Tab::Charts => chart_view::render_chart_view(
                frame,
                area,
                &snapshot.bar_chart,
                &snapshot.scatter,
                &self.theme,
            ),
            Tab::RawData => table_view::render_raw_table(
                frame,
                area,
                &snapshot.rows,
                self.raw_offset,
                &self.theme,
            ),
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = if self.filter_focus {
            "←/→ field  ↑/↓ move  space toggle  a all  c none  esc done  q quit"
        } else {
            "tab/1-4 switch  f filters  r reload  q quit"
        };
        let mut spans = vec![Span::styled(help, self.theme.dim)];
        if let Some(status) = &self.status {
            let style = if status.starts_with("Reload failed") {
                self.theme.error
            } else {
                self.theme.success
            };
            spans.push(Span::styled("  ·  ", self.theme.separator));
            spans.push(Span::styled(status.clone(), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
