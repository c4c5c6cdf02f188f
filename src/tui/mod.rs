pub mod widgets;

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::clipboard::ClipboardSink;
use crate::pipeline::assign::SwatchGrid;
use crate::pipeline::extract::{extract_palette, load_image};
use self::widgets::{hit_test, SwatchGridWidget};

/// How long an activated swatch shows the copied confirmation before the
/// hex label comes back.
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(1);

/// Event poll timeout; also how often feedback deadlines are checked.
const TICK: Duration = Duration::from_millis(100);

const HELP: &str = "drop an image onto the window | click or arrows+enter copies | q quits";

/// A scheduled end of one swatch's copied feedback. Every activation pushes
/// its own entry; entries are never cancelled, a firing entry simply
/// restores the hex label.
struct Revert {
    slot: usize,
    due: Instant,
}

/// All mutable state of the running application. Pure data: rendering maps
/// this onto the terminal each frame, events mutate it.
pub struct App<C> {
    pub grid: SwatchGrid,
    clipboard: C,
    hovered: Option<usize>,
    selected: Option<usize>,
    status: Option<String>,
    copied: Vec<bool>,
    reverts: Vec<Revert>,
}

impl<C: ClipboardSink> App<C> {
    pub fn new(grid: SwatchGrid, clipboard: C) -> Self {
        let capacity = grid.capacity();
        Self {
            grid,
            clipboard,
            hovered: None,
            selected: None,
            status: None,
            copied: vec![false; capacity],
            reverts: Vec::new(),
        }
    }

    /// Scan an image file and bind its palette onto the grid.
    ///
    /// The palette is fully computed before any slot is touched, so a decode
    /// failure leaves the grid exactly as it was.
    pub fn scan_image(&mut self, path: &Path) -> Result<()> {
        let image = load_image(path)?;
        let palette = extract_palette(&image, self.grid.capacity());
        self.grid.bind(&palette);
        self.copied.fill(false);
        self.reverts.clear();
        Ok(())
    }

    /// Treat a paste payload as a file drop. Only the first path is used;
    /// a blank payload is a no-op. Failures land on the status line and the
    /// grid keeps its previous contents.
    fn handle_drop(&mut self, data: &str) {
        let Some(path) = first_dropped_path(data) else {
            return;
        };
        match self.scan_image(&path) {
            Ok(()) => self.status = None,
            Err(err) => self.status = Some(format!("{err:#}")),
        }
    }

    /// Activate a slot: put its hex code on the clipboard and show the
    /// transient confirmation. Empty slots ignore activation.
    fn activate(&mut self, index: usize, now: Instant) {
        let Some(color) = self.grid.slot(index).color() else {
            return;
        };
        match self.clipboard.set_text(&color.to_hex()) {
            Ok(()) => {
                self.copied[index] = true;
                self.reverts.push(Revert {
                    slot: index,
                    due: now + COPIED_FEEDBACK,
                });
                self.status = None;
            }
            Err(err) => self.status = Some(format!("{err:#}")),
        }
    }

    /// Fire every due revert. Overlapping activations of the same slot each
    /// fire independently; the last one to fire wins.
    fn expire_feedback(&mut self, now: Instant) {
        for revert in &self.reverts {
            if revert.due <= now {
                self.copied[revert.slot] = false;
            }
        }
        self.reverts.retain(|revert| revert.due > now);
    }

    /// Move the keyboard selection by one cell, clamped to the grid edges.
    /// The first movement lands on slot 0.
    fn move_selection(&mut self, dcol: isize, drow: isize) {
        let Some(index) = self.selected else {
            self.selected = Some(0);
            return;
        };
        let (col, row) = self.grid.position_of(index);
        let col = (col as isize + dcol).clamp(0, self.grid.cols() as isize - 1) as usize;
        let row = (row as isize + drow).clamp(0, self.grid.rows() as isize - 1) as usize;
        self.selected = Some(self.grid.index_of(col, row));
    }
}

/// Extract the first file path from a drop/paste payload.
///
/// Terminals deliver a file drop as pasted text: one or more paths separated
/// by whitespace, possibly quoted, backslash-escaped, or `file://` URIs.
fn first_dropped_path(data: &str) -> Option<PathBuf> {
    let data = data.trim();
    let first = data.chars().next()?;

    let raw: String = if first == '\'' || first == '"' {
        data.chars().skip(1).take_while(|&c| c != first).collect()
    } else {
        let mut token = String::new();
        let mut escaped = false;
        for c in data.chars() {
            if escaped {
                token.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c.is_whitespace() {
                break;
            } else {
                token.push(c);
            }
        }
        token
    };

    let path = raw.strip_prefix("file://").unwrap_or(&raw);
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Set up the terminal, run the event loop, and restore the terminal even
/// when the loop errors.
pub fn run<C: ClipboardSink>(mut app: App<C>) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("failed to set up terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut app);

    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}

fn restore_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )
    .context("failed to restore terminal")?;
    terminal.show_cursor()?;
    Ok(())
}

/// Single-threaded poll loop. Scan and bind run synchronously on the drop
/// event; feedback deadlines are checked every tick.
fn event_loop<B: Backend, C: ClipboardSink>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
) -> Result<()> {
    let mut viewport = Rect::default();
    loop {
        terminal.draw(|frame| {
            viewport = frame.area();
            draw(frame, app);
        })?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse, viewport),
                Event::Paste(data) => app.handle_drop(&data),
                _ => {}
            }
        }
        app.expire_feedback(Instant::now());
    }
}

/// Returns true when the app should quit.
fn handle_key<C: ClipboardSink>(app: &mut App<C>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Left => app.move_selection(-1, 0),
        KeyCode::Right => app.move_selection(1, 0),
        KeyCode::Up => app.move_selection(0, -1),
        KeyCode::Down => app.move_selection(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(index) = app.selected {
                app.activate(index, Instant::now());
            }
        }
        _ => {}
    }
    false
}

fn handle_mouse<C: ClipboardSink>(app: &mut App<C>, mouse: MouseEvent, viewport: Rect) {
    let (grid_area, _) = split_frame(viewport);
    match mouse.kind {
        MouseEventKind::Moved => {
            app.hovered = hit_test(grid_area, &app.grid, mouse.column, mouse.row);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = hit_test(grid_area, &app.grid, mouse.column, mouse.row) {
                app.activate(index, Instant::now());
            }
        }
        _ => {}
    }
}

/// Everything above the one-line status bar belongs to the grid.
fn split_frame(frame_area: Rect) -> (Rect, Rect) {
    let [grid, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame_area);
    (grid, status)
}

fn draw<C: ClipboardSink>(frame: &mut Frame, app: &App<C>) {
    let (grid_region, status_region) = split_frame(frame.area());

    let widget = SwatchGridWidget::new(&app.grid, &app.copied)
        .hovered(app.hovered)
        .selected(app.selected);
    frame.render_widget(widget, grid_region);

    let status = match &app.status {
        Some(message) => Line::styled(message.as_str(), Style::default().fg(Color::Red)),
        None => Line::styled(HELP, Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(Paragraph::new(status), status_region);
}
