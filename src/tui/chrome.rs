// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, footer, menu, help, and text helpers used by TUI rendering.
fn stack_panes_vertically(area: Rect) -> bool {
    area.width < 120
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Source,
    Output,
}

impl Focus {
    fn cycle(self) -> Self {
        match self {
            Self::Source => Self::Output,
            Self::Output => Self::Source,
        }
    }
}

fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!("─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn output_status_label<B: Backend>(app: &App<B>) -> Option<&'static str> {
    match app.session.controller().output().status() {
        OutputStatus::Working => Some("(working)"),
        OutputStatus::Failed => Some("(error)"),
        OutputStatus::Empty | OutputStatus::Ready => None,
    }
}

fn header_line<B: Backend>(app: &App<B>) -> Line<'static> {
    let engine = app.session.engine();
    let heading = engine.heading().unwrap_or_else(|| engine.title());
    let mut spans = vec![Span::styled(heading, app.theme.header_style())];
    if engine.phase() == Phase::Loading {
        let loading = match engine.pending() {
            Some(ticket) => format!("  loading {}:{} ...", ticket.file(), ticket.line()),
            None => "  loading ...".to_owned(),
        };
        spans.push(Span::styled(loading, app.theme.working_style()));
    }
    Line::from(spans)
}

fn history_counter_line<B: Backend>(app: &App<B>) -> Line<'static> {
    let history = app.session.engine().history();
    if history.is_empty() {
        return Line::default();
    }
    let back = if history.can_go_back() { "[" } else { " " };
    let forward = if history.can_go_forward() { "]" } else { " " };
    Line::from(vec![
        Span::styled(back, app.theme.key_style()),
        Span::styled(
            format!("{}/{}", history.index() + 1, history.len()),
            app.theme.dim_style(),
        ),
        Span::styled(forward, app.theme.key_style()),
    ])
}

/// Popup placed just below the pointer, flipped above it near the bottom edge.
fn menu_rect(at: Pointer, area: Rect) -> Rect {
    let name_width = Mode::ALL.iter().map(|mode| mode.name().len()).max().unwrap_or(0);
    let width = ((name_width + 6) as u16).min(area.width);
    let height = (Mode::ALL.len() as u16 + 2).min(area.height);

    let max_x = area.x + area.width - width;
    let x = at.x.clamp(area.x, max_x);
    let below = at.y.saturating_add(1);
    let y = if below.saturating_add(height) <= area.y + area.height {
        below
    } else {
        at.y.saturating_sub(height).max(area.y)
    };
    Rect::new(x, y, width, height)
}

fn menu_item_at(menu: Rect, row: u16) -> Option<Mode> {
    let idx = row.checked_sub(menu.y + 1)? as usize;
    Mode::ALL.get(idx).copied()
}

fn render_menu<B: Backend>(frame: &mut Frame<'_>, app: &mut App<B>, area: Rect) {
    let menu = app.session.controller().menu();
    let rect = menu_rect(menu.position(), area);
    let highlighted = menu.highlighted();
    let name_width = rect.width.saturating_sub(4) as usize;

    let lines: Vec<Line<'static>> = menu
        .items()
        .iter()
        .enumerate()
        .map(|(idx, mode)| {
            Line::from(vec![
                Span::styled(format!("{} ", idx + 1), app.theme.key_style()),
                Span::styled(
                    format!("{:<name_width$}", mode.name()),
                    app.theme.menu_item_style(*mode == highlighted),
                ),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Query ")
        .border_style(app.theme.panel_border_style(true));
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).style(app.theme.base_style()).block(block),
        rect,
    );
    app.geometry.menu = Some(rect);
}

fn footer_help_line<B: Backend>(app: &App<B>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    if app.show_help {
        push_footer_entry(&mut spans, app, "CLOSE", "?");
        push_footer_entry(&mut spans, app, "SCROLL", "j/k");
        push_footer_entry(&mut spans, app, "QUIT", "q");
    } else if let HintMode::Active { typed, .. } = &app.hint_mode {
        let typed = if typed.is_empty() { "_" } else { typed.as_str() };
        push_footer_entry(&mut spans, app, "HINT", typed);
        push_footer_entry(&mut spans, app, "CANCEL", "Esc");
    } else if app.session.controller().menu().is_visible() {
        push_footer_entry(&mut spans, app, "MODE", "j/k");
        push_footer_entry(&mut spans, app, "QUERY", "Enter/1-9");
        push_footer_entry(&mut spans, app, "CANCEL", "Esc");
    } else {
        match app.focus {
            Focus::Source => {
                push_footer_entry(&mut spans, app, "MOVE", "hjkl");
                push_footer_entry(&mut spans, app, "MARK", "v");
                push_footer_entry(&mut spans, app, "QUERY", "Enter");
            }
            Focus::Output => {
                push_footer_entry(&mut spans, app, "LINK", "n/N");
                push_footer_entry(&mut spans, app, "FOLLOW", "Enter");
                push_footer_entry(&mut spans, app, "HINT", "f");
            }
        }
        push_footer_entry(&mut spans, app, "HISTORY", "[]");
        push_footer_entry(&mut spans, app, "HELP", "?");
        push_footer_entry(&mut spans, app, "QUIT", "q");
    }

    if let Some(toast) = &app.toast {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(toast.message.clone(), app.theme.header_style()));
    }

    Line::from(spans)
}

/// Right side of the footer: menu description, link tooltip or current location, then the brand.
fn footer_context_line<B: Backend>(app: &App<B>) -> Line<'static> {
    let controller = app.session.controller();
    let context = if controller.menu().is_visible() {
        Some(controller.menu().highlighted().description().to_owned())
    } else if app.focus == Focus::Output {
        app.output_cursor
            .and_then(|idx| controller.output().lines().get(idx))
            .and_then(OutputLine::tooltip)
            .map(str::to_owned)
    } else {
        app.session.engine().url()
    };

    let mut spans = Vec::new();
    if let Some(context) = context {
        spans.push(Span::styled(context, app.theme.dim_style()));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(FOOTER_BRAND, app.theme.key_style()));
    Line::from(spans)
}

fn push_footer_entry<B: Backend>(
    spans: &mut Vec<Span<'static>>,
    app: &App<B>,
    label: &str,
    value: &str,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", app.theme.label_style()));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        app.theme.label_style(),
    ));
    spans.push(Span::styled(value.to_owned(), app.theme.key_style()));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn help_lines(theme: &TuiTheme) -> Vec<Line<'static>> {
    let key_style = theme.key_style();
    let header_style = theme.header_style();
    let key_col_width = ["h/j/k/l, arrows", "PgUp/PgDn, Home/End"]
        .iter()
        .map(|s| s.len())
        .max()
        .unwrap_or(0);
    let kv = |key: &str, desc: &str| help_kv(key, desc, key_col_width, key_style);

    let mut lines = Vec::<Line<'static>>::new();
    lines.push(Line::from(Span::styled("--- Global ---", header_style)));
    lines.push(kv("?", "Help (toggle)"));
    lines.push(kv("q", "Quit"));
    lines.push(kv("Tab/Shift-Tab", "Switch between source and output"));
    lines.push(kv("[/]", "Back/forward through visited locations"));
    lines.push(kv("Esc", "Close the mode menu, then clear the selection"));
    lines.push(kv("f", "Follow a reference by its hint label"));
    lines.push(kv("y", "Copy the selection's position (OSC 52)"));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled("--- Source ---", header_style)));
    lines.push(kv("h/j/k/l, arrows", "Move the cursor"));
    lines.push(kv("PgUp/PgDn, Home/End", "Page, line start/end"));
    lines.push(kv("g/G", "First/last line"));
    lines.push(kv("v", "Start/clear a selection at the cursor"));
    lines.push(kv("Enter/m", "Open the mode menu for the selection"));
    lines.push(kv("drag", "Select with the mouse; release opens the menu"));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled("--- Mode menu ---", header_style)));
    lines.push(kv("j/k", "Highlight previous/next mode"));
    lines.push(kv("Enter, 1-9", "Run the query"));
    lines.push(kv("Esc", "Close"));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled("--- Output ---", header_style)));
    lines.push(kv("j/k", "Move between lines"));
    lines.push(kv("n/N", "Next/previous reference"));
    lines.push(kv("Enter, click", "Open the referenced location"));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled("--- Query modes ---", header_style)));
    for (idx, mode) in Mode::ALL.iter().enumerate() {
        lines.push(kv(&format!("{} {}", idx + 1, mode.name()), mode.description()));
    }
    lines
}

fn render_help<B: Backend>(frame: &mut Frame<'_>, app: &mut App<B>, main_area: Rect) {
    let area = centered_rect(82, 84, main_area);
    frame.render_widget(Clear, area);

    let lines = help_lines(&app.theme);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Help ─")
        .border_style(app.theme.panel_border_style(true))
        .title_style(app.theme.header_style());
    let inner = block.inner(area);
    app.help_viewport_height = inner.height;
    let max_scroll = lines
        .len()
        .saturating_sub(inner.height.max(1) as usize)
        .min(u16::MAX as usize) as u16;
    app.help_scroll = app.help_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .style(app.theme.base_style())
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

fn advance_column(column: usize, ch: char) -> usize {
    if ch == '\t' {
        (column / TAB_WIDTH + 1) * TAB_WIDTH
    } else {
        column + 1
    }
}

/// Screen column where the `index`-th character of `line` starts.
fn column_of_char_index(line: &str, index: usize) -> usize {
    line.chars().take(index).fold(0, advance_column)
}

/// Character index covering screen `column`; columns past the end map to the line length.
fn char_index_at_column(line: &str, column: usize) -> usize {
    let mut at = 0;
    for (idx, ch) in line.chars().enumerate() {
        let next = advance_column(at, ch);
        if column < next {
            return idx;
        }
        at = next;
    }
    line.chars().count()
}

fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        let next = advance_column(column, ch);
        if ch == '\t' {
            out.extend(std::iter::repeat(' ').take(next - column));
        } else {
            out.push(ch);
        }
        column = next;
    }
    out
}

/// Collects per-character styles into as few spans as possible.
struct StyledRuns {
    spans: Vec<Span<'static>>,
    buf: String,
    style: Style,
}

impl StyledRuns {
    fn new(style: Style) -> Self {
        Self {
            spans: Vec::new(),
            buf: String::new(),
            style,
        }
    }

    fn push(&mut self, text: &str, style: Style) {
        if style != self.style {
            self.flush();
            self.style = style;
        }
        self.buf.push_str(text);
    }

    fn flush(&mut self) {
        if !self.buf.is_empty() {
            self.spans.push(Span::styled(mem::take(&mut self.buf), self.style));
        }
    }

    fn finish(mut self) -> Vec<Span<'static>> {
        self.flush();
        self.spans
    }
}
