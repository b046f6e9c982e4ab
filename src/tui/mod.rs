// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The source pane shows the current file with its line gutter. Selecting text (mouse drag, or
//! `v` plus motion and `Enter`) opens the mode menu; the chosen query's answer lands in the
//! output pane, whose references can be followed by click, `Enter` or link hints.

use std::{
    collections::BTreeMap,
    error::Error,
    io, mem,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::debug;

use crate::backend::Backend;
use crate::controller::{OutputLine, OutputStatus, Pointer, QueryOutcome, SelectionEnd, Signal};
use crate::model::{encode, Mode, PositionDescriptor, Span as SourceSpan};
use crate::nav::{NavOutcome, Phase};
use crate::session::{Session, SessionEvent};

mod demo;
mod hints;
mod theme;

pub use demo::{demo_backend, DEMO_FILE};
pub use theme::{ThemeError, TuiTheme, PALETTE_ENV};

const TAB_WIDTH: usize = 4;
const LINK_HINT_CHARS: &str = "asdfjklewcmpgh";
const FOOTER_BRAND: &str = "pythia";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const TOAST_TTL: Duration = Duration::from_secs(2);
const MOUSE_SCROLL_LINES: isize = 3;

/// Runs the interactive terminal UI until the user quits.
///
/// The session's requests run on its runtime; call this from a blocking thread.
pub fn run<B: Backend>(session: Session<B>, theme: TuiTheme) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(session, theme);
    let mut title = String::new();

    while !app.should_quit {
        app.tick();

        let next_title = app.session.engine().title();
        if next_title != title {
            terminal.set_title(&next_title)?;
            title = next_title;
        }
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw<B: Backend>(frame: &mut Frame<'_>, app: &mut App<B>) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let header_area = layout[0];
    let main_area = layout[1];
    let status_area = layout[2];

    let direction = if stack_panes_vertically(main_area) {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_area);
    let source_area = panes[0];
    let output_area = panes[1];

    frame.render_widget(Paragraph::new(header_line(app)), header_area);
    let position = Paragraph::new(history_counter_line(app)).alignment(Alignment::Right);
    frame.render_widget(position, header_area);

    let source_block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Source", app.session.engine().current_file()))
        .border_style(app.theme.panel_border_style(app.focus == Focus::Source));
    let source_inner = source_block.inner(source_area);
    let gutter_width = app.session.engine().buffer().map_or(1, |buffer| buffer.gutter_width());
    app.geometry.source = source_inner;
    app.geometry.text_x = source_inner.x.saturating_add(gutter_width as u16 + 1);
    app.keep_cursor_visible();
    let source = Paragraph::new(app.source_text(source_inner.height as usize, gutter_width))
        .style(app.theme.base_style())
        .block(source_block);
    frame.render_widget(source, source_area);

    let output_block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Output", output_status_label(app)))
        .border_style(app.theme.panel_border_style(app.focus == Focus::Output));
    let output_inner = output_block.inner(output_area);
    app.geometry.output = output_inner;
    app.keep_output_cursor_visible(output_inner.height as usize);
    let output = Paragraph::new(app.output_text(output_inner.height as usize))
        .style(app.theme.base_style())
        .block(output_block);
    frame.render_widget(output, output_area);

    app.geometry.menu = None;
    if app.session.controller().menu().is_visible() {
        render_menu(frame, app, area);
    }

    app.expire_toast();
    frame.render_widget(Paragraph::new(footer_help_line(app)), status_area);
    let context = Paragraph::new(footer_context_line(app)).alignment(Alignment::Right);
    frame.render_widget(context, status_area);

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

// Extracted panel/header/footer/help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
struct HintTarget {
    label: String,
    line: usize,
}

#[derive(Debug, Clone, Default)]
enum HintMode {
    #[default]
    Inactive,
    Active {
        typed: String,
        targets: Vec<HintTarget>,
    },
}

/// Screen regions from the last draw, used to map mouse positions.
#[derive(Debug, Clone, Copy, Default)]
struct Geometry {
    source: Rect,
    text_x: u16,
    output: Rect,
    menu: Option<Rect>,
}

struct App<B: Backend> {
    session: Session<B>,
    theme: TuiTheme,
    focus: Focus,
    // Caret and selection anchor, as character offsets into the displayed file.
    cursor: usize,
    mark: Option<usize>,
    drag: Option<SelectionEnd>,
    output_cursor: Option<usize>,
    output_scroll: usize,
    hint_mode: HintMode,
    show_help: bool,
    help_scroll: u16,
    help_viewport_height: u16,
    toast: Option<Toast>,
    geometry: Geometry,
    should_quit: bool,
}

impl<B: Backend> App<B> {
    fn new(session: Session<B>, theme: TuiTheme) -> Self {
        Self {
            session,
            theme,
            focus: Focus::Source,
            cursor: 0,
            mark: None,
            drag: None,
            output_cursor: None,
            output_scroll: 0,
            hint_mode: HintMode::Inactive,
            show_help: false,
            help_scroll: 0,
            help_viewport_height: 0,
            toast: None,
            geometry: Geometry::default(),
            should_quit: false,
        }
    }

    fn tick(&mut self) {
        let events = self.session.pump();
        self.apply_events(events);
    }

    fn apply_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::Navigated(NavOutcome::Displayed { file, line, .. }) => {
                    self.cursor = self
                        .session
                        .engine()
                        .buffer()
                        .and_then(|buffer| buffer.char_offset(line as usize, 0))
                        .unwrap_or(0);
                    self.mark = None;
                    self.drag = None;
                    self.set_toast(format!("Opened {file}:{line}"));
                }
                SessionEvent::Navigated(NavOutcome::Failed { file, error }) => {
                    self.set_toast(format!("Cannot open {file}: {error}"));
                }
                SessionEvent::Queried(QueryOutcome::Rendered { links, .. }) => {
                    self.output_cursor = self.session.controller().next_link(None);
                    self.output_scroll = 0;
                    self.set_toast(format!("{links} references"));
                }
                SessionEvent::Queried(QueryOutcome::Failed { error }) => {
                    self.output_cursor = None;
                    self.output_scroll = 0;
                    self.set_toast(format!("Query failed: {error}"));
                }
                SessionEvent::Navigated(NavOutcome::Stale)
                | SessionEvent::Queried(QueryOutcome::Stale) => {}
            }
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= Instant::now()) {
            self.toast = None;
        }
    }

    fn current_file(&self) -> Option<String> {
        self.session.engine().current_file().map(str::to_owned)
    }

    /// Selected character range, start inclusive and end exclusive.
    fn selection_range(&self) -> Option<(usize, usize)> {
        let controller = self.session.controller();
        if controller.menu().is_visible() {
            return controller
                .bound_selection()
                .map(|selection| (selection.start_offset(), selection.end_offset()));
        }
        self.mark
            .map(|mark| (mark.min(self.cursor), mark.max(self.cursor)))
    }

    fn selection_descriptor(&self) -> Option<PositionDescriptor> {
        let file = self.session.engine().current_file()?;
        let (start, end) = self.selection_range().unwrap_or((self.cursor, self.cursor));
        Some(encode(file, start, end))
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => self.help_scroll_by(1),
                KeyCode::Up | KeyCode::Char('k') => self.help_scroll_by(-1),
                KeyCode::PageDown => self.help_scroll_page(1),
                KeyCode::PageUp => self.help_scroll_page(-1),
                KeyCode::Home => self.help_scroll = 0,
                _ => {}
            }
            return false;
        }

        if self.handle_hint_key(code) {
            return false;
        }

        if self.session.controller().menu().is_visible() {
            return self.handle_menu_key(code);
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Esc => self.escape(),
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.cycle(),
            KeyCode::Char('[') => self.go_back(),
            KeyCode::Char(']') => self.go_forward(),
            KeyCode::Char('f') => self.enter_hint_mode(),
            KeyCode::Char('y') => self.yank_position(),
            _ => match self.focus {
                Focus::Source => self.handle_source_key(code),
                Focus::Output => self.handle_output_key(code),
            },
        }

        false
    }

    fn handle_menu_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => self.escape(),
            KeyCode::Up | KeyCode::Char('k') => self.session.controller_mut().menu_move(-1),
            KeyCode::Down | KeyCode::Char('j') => self.session.controller_mut().menu_move(1),
            KeyCode::Enter => {
                let mode = self.session.controller().menu().highlighted();
                self.choose_mode(mode);
            }
            KeyCode::Char(ch @ '1'..='9') => {
                let idx = ch as usize - '1' as usize;
                if let Some(mode) = Mode::ALL.get(idx).copied() {
                    self.choose_mode(mode);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_source_key(&mut self, code: KeyCode) {
        let page = self.geometry.source.height.max(1) as isize;
        match code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor_chars(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor_chars(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor_lines(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor_lines(1),
            KeyCode::PageUp => {
                self.session.engine_mut().scroll_by(-page);
                self.move_cursor_lines(-page);
            }
            KeyCode::PageDown => {
                self.session.engine_mut().scroll_by(page);
                self.move_cursor_lines(page);
            }
            KeyCode::Home | KeyCode::Char('0') => self.move_cursor_to_column(0),
            KeyCode::End | KeyCode::Char('$') => self.move_cursor_to_column(usize::MAX),
            KeyCode::Char('g') => self.cursor = 0,
            KeyCode::Char('G') => self.move_cursor_lines(isize::MAX),
            KeyCode::Char('v') => {
                self.mark = match self.mark {
                    Some(_) => None,
                    None => Some(self.cursor),
                };
            }
            KeyCode::Enter | KeyCode::Char('m') => self.open_menu_at_cursor(),
            _ => {}
        }
    }

    fn handle_output_key(&mut self, code: KeyCode) {
        let len = self.session.controller().output().lines().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.output_cursor = Some(self.output_cursor.unwrap_or(0).saturating_sub(1));
            }
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                let next = self.output_cursor.map_or(0, |idx| idx + 1);
                self.output_cursor = Some(next.min(len - 1));
            }
            KeyCode::Home => self.output_cursor = (len > 0).then_some(0),
            KeyCode::End => self.output_cursor = len.checked_sub(1),
            KeyCode::Char('n') => {
                if let Some(idx) = self.session.controller().next_link(self.output_cursor) {
                    self.output_cursor = Some(idx);
                }
            }
            KeyCode::Char('N') => {
                if let Some(idx) = self.session.controller().prev_link(self.output_cursor) {
                    self.output_cursor = Some(idx);
                }
            }
            KeyCode::Enter => {
                if let Some(idx) = self.output_cursor {
                    self.follow_output_line(idx);
                }
            }
            _ => {}
        }
    }

    fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.cancel_hint_mode();
            self.help_scroll = 0;
        }
    }

    fn help_scroll_by(&mut self, delta: i32) {
        if delta < 0 {
            self.help_scroll = self.help_scroll.saturating_sub(delta.unsigned_abs() as u16);
        } else {
            self.help_scroll = self.help_scroll.saturating_add(delta as u16);
        }
    }

    fn help_scroll_page(&mut self, direction: i32) {
        let page = self.help_viewport_height.max(1).saturating_sub(1) as i32;
        self.help_scroll_by(direction.signum() * page.max(1));
    }

    /// Esc: the controller hides the menu first; otherwise the raised signal drops the selection and
    /// leaves the output pane.
    fn escape(&mut self) {
        self.session.controller_mut().escape();
        while let Some(signal) = self.session.take_signal() {
            match signal {
                Signal::Esc => {
                    self.mark = None;
                    self.drag = None;
                    self.focus = Focus::Source;
                }
            }
        }
    }

    fn choose_mode(&mut self, mode: Mode) {
        if self.session.select_mode(mode) {
            debug!(%mode, "mode chosen");
            self.output_cursor = None;
            self.output_scroll = 0;
        }
    }

    fn open_menu_at_cursor(&mut self) {
        let file = self.current_file();
        let anchor = self.mark.unwrap_or(self.cursor);
        let at = self.cursor_screen_position();
        self.session.controller_mut().finish_selection(
            file.as_deref(),
            SelectionEnd::Source(anchor),
            SelectionEnd::Source(self.cursor),
            at,
        );
    }

    fn follow_output_line(&mut self, idx: usize) {
        self.output_cursor = Some(idx);
        if !self.session.follow_link(idx) {
            self.set_toast("Not a reference");
        }
    }

    fn go_back(&mut self) {
        if !self.session.go_back() {
            self.set_toast("No previous location");
        }
    }

    fn go_forward(&mut self) {
        if !self.session.go_forward() {
            self.set_toast("No next location");
        }
    }

    fn yank_position(&mut self) {
        let Some(descriptor) = self.selection_descriptor() else {
            self.set_toast("No file displayed");
            return;
        };
        match copy_to_clipboard(descriptor.as_str()) {
            Ok(backend) => self.set_toast(format!("Yanked {descriptor} ({backend})")),
            Err(err) => self.set_toast(format!("Clipboard error: {err}")),
        }
    }

    fn enter_hint_mode(&mut self) {
        let links: Vec<usize> = self.session.controller().output().link_indices().collect();
        if links.is_empty() {
            self.set_toast("No references to follow");
            return;
        }
        let labels = hints::gen_labels(links.len(), LINK_HINT_CHARS);
        let targets = labels
            .into_iter()
            .zip(links)
            .map(|(label, line)| HintTarget { label, line })
            .collect();
        self.hint_mode = HintMode::Active {
            typed: String::new(),
            targets,
        };
    }

    fn cancel_hint_mode(&mut self) {
        self.hint_mode = HintMode::Inactive;
    }

    fn handle_hint_key(&mut self, code: KeyCode) -> bool {
        let HintMode::Active { mut typed, targets } = mem::take(&mut self.hint_mode) else {
            return false;
        };
        let KeyCode::Char(ch) = code else {
            if code != KeyCode::Esc {
                self.hint_mode = HintMode::Active { typed, targets };
            }
            return true;
        };

        typed.push(ch.to_ascii_lowercase());
        if let Some(target) = targets.iter().find(|target| target.label == typed) {
            let line = target.line;
            self.focus = Focus::Output;
            self.follow_output_line(line);
        } else if targets.iter().any(|target| target.label.starts_with(typed.as_str())) {
            self.hint_mode = HintMode::Active { typed, targets };
        } else {
            self.set_toast(format!("No hint '{typed}'"));
        }
        true
    }

    fn hint_labels(&self) -> BTreeMap<usize, &str> {
        match &self.hint_mode {
            HintMode::Inactive => BTreeMap::new(),
            HintMode::Active { targets, .. } => targets
                .iter()
                .map(|target| (target.line, target.label.as_str()))
                .collect(),
        }
    }

    fn max_cursor(&self) -> usize {
        self.session
            .engine()
            .buffer()
            .and_then(|buffer| buffer.char_offset(buffer.line_count(), usize::MAX))
            .unwrap_or(0)
    }

    fn cursor_line_col(&self) -> Option<(usize, usize)> {
        self.session.engine().buffer()?.line_col_of(self.cursor)
    }

    fn move_cursor_chars(&mut self, delta: isize) {
        let next = self.cursor.saturating_add_signed(delta).min(self.max_cursor());
        // Offsets that fall on a line terminator snap to the end of that line.
        self.cursor = self
            .session
            .engine()
            .buffer()
            .and_then(|buffer| {
                let (line, col) = buffer.line_col_of(next)?;
                buffer.char_offset(line, col)
            })
            .unwrap_or(next);
    }

    fn move_cursor_lines(&mut self, delta: isize) {
        let Some((line, col)) = self.cursor_line_col() else {
            return;
        };
        let Some(buffer) = self.session.engine().buffer() else {
            return;
        };
        let target = line.saturating_add_signed(delta).clamp(1, buffer.line_count().max(1));
        if let Some(offset) = buffer.char_offset(target, col) {
            self.cursor = offset;
        }
    }

    fn move_cursor_to_column(&mut self, col: usize) {
        let Some((line, _)) = self.cursor_line_col() else {
            return;
        };
        if let Some(offset) = self.session.engine().buffer().and_then(|b| b.char_offset(line, col)) {
            self.cursor = offset;
        }
    }

    fn keep_cursor_visible(&mut self) {
        let height = self.geometry.source.height as usize;
        if height == 0 {
            return;
        }
        let Some((line, _)) = self.cursor_line_col() else {
            return;
        };
        let top = self.session.engine().scroll_top() + 1;
        if line < top {
            self.session.engine_mut().scroll_to_line(line as u32);
        } else if line >= top + height {
            self.session.engine_mut().scroll_to_line((line + 1 - height) as u32);
        }
    }

    fn keep_output_cursor_visible(&mut self, height: usize) {
        let Some(idx) = self.output_cursor else {
            return;
        };
        if height == 0 {
            return;
        }
        if idx < self.output_scroll {
            self.output_scroll = idx;
        } else if idx >= self.output_scroll + height {
            self.output_scroll = idx + 1 - height;
        }
    }

    fn cursor_screen_position(&self) -> Pointer {
        let area = self.geometry.source;
        let Some(buffer) = self.session.engine().buffer() else {
            return Pointer { x: area.x, y: area.y };
        };
        let Some((line, col)) = buffer.line_col_of(self.cursor) else {
            return Pointer { x: area.x, y: area.y };
        };
        let text = buffer.line(line).unwrap_or_default();
        let row = line.saturating_sub(self.session.engine().scroll_top() + 1);
        Pointer {
            x: self.geometry.text_x.saturating_add(column_of_char_index(text, col) as u16),
            y: area.y.saturating_add(row as u16),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(col, row),
            MouseEventKind::Drag(MouseButton::Left) => self.mouse_drag(col, row),
            MouseEventKind::Up(MouseButton::Left) => self.mouse_up(col, row),
            MouseEventKind::ScrollUp => self.mouse_scroll(col, row, -MOUSE_SCROLL_LINES),
            MouseEventKind::ScrollDown => self.mouse_scroll(col, row, MOUSE_SCROLL_LINES),
            _ => {}
        }
    }

    fn mouse_down(&mut self, col: u16, row: u16) {
        if self.show_help {
            return;
        }
        self.cancel_hint_mode();

        if self.session.controller().menu().is_visible() {
            if let Some(menu) = self.geometry.menu.filter(|menu| rect_contains(*menu, col, row)) {
                if let Some(mode) = menu_item_at(menu, row) {
                    self.choose_mode(mode);
                }
                return;
            }
        }

        if rect_contains(self.geometry.source, col, row) {
            let end = self.source_end_at(col, row);
            self.session.controller_mut().hide_menu();
            self.focus = Focus::Source;
            self.drag = Some(end);
            if let SelectionEnd::Source(offset) = end {
                self.cursor = offset;
                self.mark = Some(offset);
            }
            return;
        }

        self.drag = None;
        self.session.controller_mut().click_outside_source();
        if let Some(idx) = self.output_line_at(col, row) {
            self.focus = Focus::Output;
            self.follow_output_line(idx);
        }
    }

    fn mouse_drag(&mut self, col: u16, row: u16) {
        if self.drag.is_none() {
            return;
        }
        if let SelectionEnd::Source(offset) = self.source_end_at(col, row) {
            self.cursor = offset;
        }
    }

    fn mouse_up(&mut self, col: u16, row: u16) {
        let Some(anchor) = self.drag.take() else {
            return;
        };
        let head = self.source_end_at(col, row);
        let file = self.current_file();
        let opened = self.session.controller_mut().finish_selection(
            file.as_deref(),
            anchor,
            head,
            Pointer { x: col, y: row },
        );
        if !opened {
            self.mark = None;
        }
    }

    fn mouse_scroll(&mut self, col: u16, row: u16, delta: isize) {
        if rect_contains(self.geometry.source, col, row) {
            // The cursor travels with the view so the next draw keeps the new scroll position.
            self.session.engine_mut().scroll_by(delta);
            self.move_cursor_lines(delta);
        } else if rect_contains(self.geometry.output, col, row) {
            let len = self.session.controller().output().lines().len();
            self.output_scroll =
                self.output_scroll.saturating_add_signed(delta).min(len.saturating_sub(1));
        }
    }

    /// Maps a screen cell onto the displayed text. The gutter and rows past the end are outside.
    fn source_end_at(&self, col: u16, row: u16) -> SelectionEnd {
        let area = self.geometry.source;
        if !rect_contains(area, col, row) || col < self.geometry.text_x {
            return SelectionEnd::Outside;
        }
        let engine = self.session.engine();
        let Some(buffer) = engine.buffer() else {
            return SelectionEnd::Outside;
        };
        let number = engine.scroll_top() + (row - area.y) as usize + 1;
        let Some(text) = buffer.line(number) else {
            return SelectionEnd::Outside;
        };
        let col = char_index_at_column(text, (col - self.geometry.text_x) as usize);
        buffer.char_offset(number, col).map_or(SelectionEnd::Outside, SelectionEnd::Source)
    }

    fn output_line_at(&self, col: u16, row: u16) -> Option<usize> {
        let area = self.geometry.output;
        if !rect_contains(area, col, row) {
            return None;
        }
        let idx = self.output_scroll + (row - area.y) as usize;
        (idx < self.session.controller().output().lines().len()).then_some(idx)
    }

    fn source_text(&self, height: usize, gutter_width: usize) -> Text<'static> {
        let engine = self.session.engine();
        let Some(buffer) = engine.buffer() else {
            let message = match engine.phase() {
                Phase::Loading => "Loading ...",
                _ => "No file displayed",
            };
            return Text::from(Span::styled(message, self.theme.dim_style()));
        };

        let target_line = engine.state().map(|state| state.current_line as usize);
        let highlight = engine.highlight();
        let selection = self.selection_range().filter(|(start, end)| start < end);
        let show_cursor =
            self.focus == Focus::Source && !self.session.controller().menu().is_visible();

        let mut out = Text::default();
        for number in (engine.scroll_top() + 1..=buffer.line_count()).take(height) {
            let line = buffer.line(number).unwrap_or_default();
            let line_start = buffer.char_offset(number, 0).unwrap_or(0);
            let is_target = target_line == Some(number);

            let gutter_style = if is_target {
                self.theme.key_style()
            } else {
                self.theme.gutter_style()
            };
            let base = if is_target {
                self.theme.target_line_style()
            } else {
                self.theme.base_style()
            };

            let mut runs = StyledRuns::new(base);
            runs.push(&format!("{number:>gutter_width$} "), gutter_style);
            let mut column = 0usize;
            let mut byte = 0usize;
            let len = line.chars().count();
            for (idx, ch) in line.chars().chain(std::iter::once(' ')).enumerate() {
                let offset = line_start + idx;
                let at_cursor = show_cursor && offset == self.cursor;
                if idx == len && !at_cursor {
                    break;
                }

                let mut style = base;
                if span_contains(highlight, number, byte + 1) {
                    style = style.patch(self.theme.span_style());
                }
                if selection.is_some_and(|(start, end)| start <= offset && offset < end) {
                    style = style.patch(self.theme.selection_style());
                }
                if at_cursor {
                    style = style.patch(self.theme.cursor_style());
                }

                let next = advance_column(column, ch);
                if ch == '\t' {
                    runs.push(&" ".repeat(next - column), style);
                } else {
                    runs.push(ch.encode_utf8(&mut [0; 4]), style);
                }
                column = next;
                byte += ch.len_utf8();
            }
            out.lines.push(Line::from(runs.finish()));
        }

        out
    }

    fn output_text(&self, height: usize) -> Text<'static> {
        let output = self.session.controller().output();
        let labels = self.hint_labels();

        let mut out = Text::default();
        for (idx, line) in output.lines().iter().enumerate().skip(self.output_scroll).take(height) {
            let mut style = match line {
                OutputLine::Link { .. } => self.theme.link_style(),
                OutputLine::Indented(_) => self.theme.base_style(),
                OutputLine::Verbatim(_) => match output.status() {
                    OutputStatus::Working => self.theme.working_style(),
                    OutputStatus::Failed => self.theme.error_style(),
                    OutputStatus::Empty | OutputStatus::Ready => self.theme.dim_style(),
                },
            };
            if self.focus == Focus::Output && self.output_cursor == Some(idx) {
                style = style.patch(self.theme.output_cursor_style());
            }

            let mut spans = Vec::new();
            if let Some(label) = labels.get(&idx) {
                spans.push(Span::styled(label.to_string(), self.theme.hint_label_style()));
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(expand_tabs(line.text()), style));
            out.lines.push(Line::from(spans));
        }

        if out.lines.is_empty() && output.status() == OutputStatus::Empty {
            out.lines.push(Line::from(Span::styled(
                "Select source text to query the oracle.",
                self.theme.dim_style(),
            )));
        }
        out
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        execute!(self.terminal.backend_mut(), SetTitle(title))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// `col` is 1-based and counts bytes, like the columns the oracle reports.
fn span_contains(span: Option<SourceSpan>, line: usize, col: usize) -> bool {
    let Some(span) = span else {
        return false;
    };
    let at = (line as u64, col as u64);
    let from = (u64::from(span.from.line), u64::from(span.from.col));
    let to = (u64::from(span.to.line), u64::from(span.to.col));
    from <= at && at < to
}

#[cfg(test)]
mod tests;
