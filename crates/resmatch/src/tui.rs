//! Interactive resolution picker
//!
//! Shows the session's original and current resolution, the supported mode
//! list and the technician shortcuts, and asks about restoring on quit.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

use resmatch_display::{
    ApplyOutcome, DisplayMode, DisplayModeSet, DriverHealth, DriverInfoProbe, ExitPolicy, Shortcut,
    shortcut_availability,
};

use crate::DynSession;

/// Application state
pub struct App {
    /// Display session
    session: DynSession,

    /// Supported modes at startup
    modes: DisplayModeSet,

    /// Technician shortcuts with availability
    shortcuts: Vec<Shortcut>,

    /// Mode list state
    list_state: ListState,

    /// Current view/screen
    view: View,

    /// Driver diagnostic text, fetched on first request
    driver_info: Option<String>,

    probe: DriverInfoProbe,
    probe_before_apply: bool,
    exit_policy: ExitPolicy,

    /// Status message
    status: String,
    status_warn: bool,

    /// Answer to the restore prompt
    restore_on_exit: bool,

    /// Should quit
    should_quit: bool,
}

/// Current view/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Modes,
    DriverInfo,
    ConfirmRestore,
}

impl App {
    /// Create new application
    pub fn new(
        session: DynSession,
        shortcut_modes: &[DisplayMode],
        probe: DriverInfoProbe,
        probe_before_apply: bool,
        exit_policy: ExitPolicy,
    ) -> Self {
        let modes = session.controller().enumerate_supported_modes();
        let shortcuts = shortcut_availability(session.controller(), &modes, shortcut_modes);

        let (status, status_warn) = match DriverHealth::assess(&modes).warning() {
            Some(warning) => (warning.to_string(), true),
            None => ("Ready.".to_string(), false),
        };

        let mut app = Self {
            session,
            modes,
            shortcuts,
            list_state: ListState::default(),
            view: View::Modes,
            driver_info: None,
            probe,
            probe_before_apply,
            exit_policy,
            status,
            status_warn,
            restore_on_exit: false,
            should_quit: false,
        };
        app.select_current();
        app
    }

    /// Handle input
    fn handle_input(&mut self, key: KeyCode) {
        match self.view {
            View::Modes => self.handle_modes_input(key),
            View::DriverInfo => self.handle_driver_info_input(key),
            View::ConfirmRestore => self.handle_confirm_input(key),
        }
    }

    /// Handle mode list input
    fn handle_modes_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter => self.apply_selected(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.apply_shortcut(index);
            }
            KeyCode::Char('r') => {
                let outcome = self.session.restore();
                self.report(outcome);
            }
            KeyCode::Char('d') => self.show_driver_info(),
            KeyCode::Esc | KeyCode::Char('q') => self.request_quit(),
            _ => {}
        }
    }

    /// Handle driver info view input
    fn handle_driver_info_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('d') | KeyCode::Backspace) {
            self.view = View::Modes;
        }
    }

    /// Handle restore prompt input
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.restore_on_exit = true;
                self.should_quit = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.restore_on_exit = false;
                self.should_quit = true;
            }
            KeyCode::Esc => self.view = View::Modes,
            _ => {}
        }
    }

    fn select_current(&mut self) {
        let index = self.modes.position(&self.session.current());
        self.list_state.select(index.or(if self.modes.is_empty() { None } else { Some(0) }));
    }

    /// Select previous mode
    fn select_prev(&mut self) {
        if self.modes.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.modes.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select next mode
    fn select_next(&mut self) {
        if self.modes.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.modes.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Apply the highlighted mode
    fn apply_selected(&mut self) {
        match self.list_state.selected().and_then(|i| self.modes.get(i)) {
            Some(mode) => {
                let outcome = self.session.select_with(mode, self.probe_before_apply);
                self.report(outcome);
            }
            None => self.set_status("Select a resolution from the list.", true),
        }
    }

    /// Apply a technician shortcut
    fn apply_shortcut(&mut self, index: usize) {
        let Some(shortcut) = self.shortcuts.get(index).copied() else {
            return;
        };

        if !shortcut.available {
            self.set_status(
                &format!("{} is not available on this machine.", shortcut.mode),
                true,
            );
            return;
        }

        let outcome = self.session.select_with(shortcut.mode, self.probe_before_apply);
        self.report(outcome);
    }

    fn show_driver_info(&mut self) {
        if self.driver_info.is_none() {
            self.driver_info = Some(self.probe.query());
        }
        self.view = View::DriverInfo;
    }

    fn request_quit(&mut self) {
        if self.session.needs_restore() && self.exit_policy == ExitPolicy::Ask {
            self.view = View::ConfirmRestore;
        } else {
            self.should_quit = true;
        }
    }

    fn report(&mut self, outcome: ApplyOutcome) {
        if outcome.changed() {
            self.select_current();
        }
        self.set_status(&outcome.to_string(), outcome.is_warning());
    }

    fn set_status(&mut self, message: &str, warn: bool) {
        self.status = message.to_string();
        self.status_warn = warn;
    }

    /// Hand the session back for the exit step
    pub fn into_exit(self) -> (DynSession, ExitPolicy, bool) {
        (self.session, self.exit_policy, self.restore_on_exit)
    }
}

/// Draw the UI
fn draw_ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Shortcuts
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], app);
    draw_shortcuts(frame, chunks[1], app);

    match app.view {
        View::Modes => draw_modes_view(frame, chunks[2], app),
        View::DriverInfo => draw_driver_info_view(frame, chunks[2], app),
        View::ConfirmRestore => draw_confirm_view(frame, chunks[2], app),
    }

    draw_footer(frame, chunks[3], app);
}

/// Draw header
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled("Original resolution: ", label),
            Span::styled(app.session.original().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Current resolution:  ", label),
            Span::styled(app.session.current().to_string(), value),
        ]),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("resmatch - Remote Support Resolution"),
    );

    frame.render_widget(header, area);
}

/// Draw technician shortcuts
fn draw_shortcuts(frame: &mut Frame, area: Rect, app: &App) {
    let spans: Vec<Span> = app
        .shortcuts
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if s.available {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!("[{}] {}  ", i + 1, s.mode), style)
        })
        .collect();

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Technician shortcuts"));

    frame.render_widget(bar, area);
}

/// Draw supported modes
fn draw_modes_view(frame: &mut Frame, area: Rect, app: &mut App) {
    let current = app.session.current();
    let original = app.session.original();

    let items: Vec<ListItem> = if app.modes.is_empty() {
        vec![ListItem::new("No resolutions detected")]
    } else {
        app.modes
            .iter()
            .map(|mode| {
                let mut tag = String::new();
                if *mode == current {
                    tag.push_str("  <- current");
                }
                if *mode == original && original != current {
                    tag.push_str("  (original)");
                }
                ListItem::new(format!("{:>11}{}", mode.to_string(), tag))
            })
            .collect()
    };

    let title = format!("Supported resolutions ({})", app.modes.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Draw driver info view
fn draw_driver_info_view(frame: &mut Frame, area: Rect, app: &App) {
    let text = app.driver_info.as_deref().unwrap_or_default();

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Video adapter"))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Draw restore prompt
fn draw_confirm_view(frame: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::from(format!(
            "The resolution was changed to {} (original {}).",
            app.session.current(),
            app.session.original()
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Restore the original resolution before exiting? [y/n]",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Restore resolution?"))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Draw footer
fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.view {
        View::Modes => "[↑↓] Navigate  [Enter] Apply  [1-9] Shortcut  [R] Restore  [D] Driver  [Q] Quit",
        View::DriverInfo => "[B] Back",
        View::ConfirmRestore => "[Y] Restore and quit  [N] Keep and quit  [Esc] Cancel",
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    let status_color = if app.status_warn { Color::Yellow } else { Color::Green };
    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(status_color))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, chunks[0]);
    frame.render_widget(status, chunks[1]);
}

/// Run the picker until the user quits
///
/// The app stays with the caller so its session can still be closed when the
/// terminal fails.
pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key.code);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            info!("Picker closed at {}", app.session.current());
            return Ok(());
        }
    }
}
