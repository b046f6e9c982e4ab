// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{
    char_index_at_column, column_of_char_index, demo_backend, draw, expand_tabs,
    footer_context_line, help_lines, menu_item_at, menu_rect, osc52_sequence, App, Focus,
    HintMode, TuiTheme, DEMO_FILE,
};
use crate::backend::memory::Request;
use crate::backend::MemoryBackend;
use crate::config::PRODUCT_TITLE;
use crate::controller::{OutputLine, OutputStatus, Pointer, ERROR_MESSAGE};
use crate::model::{Location, Mode, NavTarget, Span};
use crate::session::Session;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, layout::Rect, Terminal};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn text_to_string(text: &ratatui::text::Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn line_to_string(line: &ratatui::text::Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect::<String>()
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

fn app_with(rt: &Runtime, backend: MemoryBackend) -> App<MemoryBackend> {
    let session = Session::new(Arc::new(backend), rt.handle().clone(), PRODUCT_TITLE);
    App::new(session, TuiTheme::default())
}

fn demo_app(rt: &Runtime) -> App<MemoryBackend> {
    let mut app = app_with(rt, demo_backend());
    app.session.mount(DEMO_FILE, 1);
    settle(rt, &mut app);
    app
}

fn settle(rt: &Runtime, app: &mut App<MemoryBackend>) {
    let events = rt.block_on(app.session.settle());
    app.apply_events(events);
}

fn screen(app: &mut App<MemoryBackend>) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn last_query(app: &App<MemoryBackend>) -> (Mode, String) {
    let requests = app.session.backend().requests();
    match requests.last() {
        Some(Request::Query(query)) => (query.mode, query.pos.as_str().to_owned()),
        other => panic!("expected a query, got {other:?}"),
    }
}

/// Runs `mode` on a collapsed selection at the cursor.
fn run_query(rt: &Runtime, app: &mut App<MemoryBackend>, mode: Mode) {
    app.handle_key_code(KeyCode::Enter);
    assert!(app.session.controller().menu().is_visible());
    app.handle_key_code(KeyCode::Char(char::from(b'1' + mode.index() as u8)));
    settle(rt, app);
}

#[test]
fn mount_renders_heading_gutter_and_location() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    assert_eq!(app.cursor, 0);
    assert_eq!(app.session.engine().url().as_deref(), Some("source?file=main.go#L1"));

    let rows = screen(&mut app);
    assert!(rows[0].contains("Source file main.go"), "header: {}", rows[0]);
    assert!(rows.iter().any(|row| row.contains(" 1 package main")));
    assert!(rows.iter().any(|row| row.contains("Select source text to query the oracle.")));
    assert!(rows[29].trim_end().ends_with("pythia"), "footer: {}", rows[29]);
}

#[test]
fn source_text_expands_tabs_after_the_gutter() {
    let rt = runtime();
    let app = demo_app(&rt);

    let text = text_to_string(&app.source_text(5, 2));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], " 1 package main");
    assert_eq!(lines[3], " 4     \"fmt\"");
}

#[test]
fn missing_initial_file_reports_failure() {
    let rt = runtime();
    let mut app = app_with(&rt, demo_backend());
    app.session.mount("missing.go", 1);
    settle(&rt, &mut app);

    assert!(app.session.engine().buffer().is_none());
    let toast = app.toast.as_ref().map(|toast| toast.message.clone()).unwrap_or_default();
    assert!(toast.starts_with("Cannot open missing.go"), "toast: {toast}");
    assert_eq!(
        app.session.controller().output().lines(),
        [OutputLine::Verbatim(ERROR_MESSAGE.to_owned())]
    );
}

#[test]
fn keyboard_selection_opens_menu_and_runs_query() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    app.handle_key_code(KeyCode::Char('v'));
    for _ in 0..3 {
        app.handle_key_code(KeyCode::Char('l'));
    }
    app.handle_key_code(KeyCode::Enter);

    let controller = app.session.controller();
    assert!(controller.menu().is_visible());
    let bound = controller.bound_selection().expect("bound selection");
    assert_eq!(bound.position().as_str(), "main.go:#0,#3");

    app.handle_key_code(KeyCode::Char('2'));
    assert!(!app.session.controller().menu().is_visible());
    assert_eq!(app.session.controller().output().status(), OutputStatus::Working);

    settle(&rt, &mut app);
    assert_eq!(last_query(&app), (Mode::Callees, "main.go:#0,#3".to_owned()));
    assert_eq!(app.session.controller().output().status(), OutputStatus::Ready);
    assert_eq!(app.output_cursor, Some(0));
}

#[test]
fn cursor_moves_by_line_and_clamps_column() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    app.handle_key_code(KeyCode::Char('$'));
    assert_eq!(app.cursor_line_col(), Some((1, 12)));
    app.handle_key_code(KeyCode::Char('j'));
    assert_eq!(app.cursor_line_col(), Some((2, 0)));
    app.handle_key_code(KeyCode::Char('j'));
    app.handle_key_code(KeyCode::End);
    assert_eq!(app.cursor_line_col(), Some((3, 8)));
    app.handle_key_code(KeyCode::Char('l'));
    assert_eq!(app.cursor_line_col(), Some((4, 0)));
    app.handle_key_code(KeyCode::Char('G'));
    assert_eq!(app.cursor_line_col().map(|(line, _)| line), Some(16));
    app.handle_key_code(KeyCode::Char('g'));
    assert_eq!(app.cursor, 0);
    app.handle_key_code(KeyCode::Char('h'));
    assert_eq!(app.cursor, 0);
}

#[test]
fn menu_keys_wrap_and_choose_highlighted_mode() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    app.handle_key_code(KeyCode::Enter);
    assert_eq!(app.session.controller().menu().highlighted(), Mode::Describe);
    app.handle_key_code(KeyCode::Char('k'));
    assert_eq!(app.session.controller().menu().highlighted(), Mode::Referrers);

    let context = line_to_string(&footer_context_line(&app));
    assert!(context.contains(Mode::Referrers.description()));

    app.handle_key_code(KeyCode::Enter);
    settle(&rt, &mut app);
    assert_eq!(last_query(&app), (Mode::Referrers, "main.go:#0".to_owned()));
    assert_eq!(app.session.controller().output().link_indices().count(), 3);
}

#[test]
fn escape_closes_menu_before_clearing_selection() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    app.handle_key_code(KeyCode::Char('v'));
    app.handle_key_code(KeyCode::Char('l'));
    app.handle_key_code(KeyCode::Enter);
    assert!(app.session.controller().menu().is_visible());

    app.handle_key_code(KeyCode::Esc);
    assert!(!app.session.controller().menu().is_visible());
    assert_eq!(app.mark, Some(0));

    app.handle_key_code(KeyCode::Esc);
    assert_eq!(app.mark, None);
}

#[test]
fn mouse_drag_selects_source_and_menu_click_queries() {
    let rt = runtime();
    let mut app = demo_app(&rt);
    screen(&mut app);

    let row = app.geometry.source.y;
    let x = app.geometry.text_x;
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x + 8, row));
    app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x + 10, row));
    assert_eq!(app.cursor, 10);
    app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x + 12, row));

    let controller = app.session.controller();
    assert!(controller.menu().is_visible());
    assert_eq!(controller.menu().position(), Pointer { x: x + 12, y: row });
    assert_eq!(
        controller.bound_selection().map(|sel| sel.position().into_string()),
        Some("main.go:#8,#12".to_owned())
    );

    screen(&mut app);
    let menu = app.geometry.menu.expect("menu drawn");
    app.handle_mouse(mouse(
        MouseEventKind::Down(MouseButton::Left),
        menu.x + 2,
        menu.y + 1 + Mode::Callstack.index() as u16,
    ));
    settle(&rt, &mut app);
    assert_eq!(last_query(&app), (Mode::Callstack, "main.go:#8,#12".to_owned()));
}

#[test]
fn selection_ending_in_gutter_is_ignored() {
    let rt = runtime();
    let mut app = demo_app(&rt);
    screen(&mut app);

    let row = app.geometry.source.y;
    let x = app.geometry.text_x;
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x + 4, row));
    app.handle_mouse(mouse(
        MouseEventKind::Up(MouseButton::Left),
        app.geometry.source.x,
        row + 1,
    ));

    assert!(!app.session.controller().menu().is_visible());
    assert_eq!(app.mark, None);
}

#[test]
fn clicking_output_reference_navigates_and_history_replays() {
    let rt = runtime();
    let mut app = demo_app(&rt);
    run_query(&rt, &mut app, Mode::Describe);
    screen(&mut app);

    let output = app.geometry.output;
    app.handle_mouse(mouse(
        MouseEventKind::Down(MouseButton::Left),
        output.x + 2,
        output.y + 1,
    ));
    assert_eq!(app.focus, Focus::Output);
    settle(&rt, &mut app);

    let state = app.session.engine().state().cloned().expect("state");
    assert_eq!((state.current_file.as_str(), state.current_line), ("greet.go", 16));
    assert_eq!(app.cursor_line_col(), Some((16, 0)));
    assert_eq!(app.session.engine().history().len(), 2);

    app.handle_key_code(KeyCode::Char('['));
    settle(&rt, &mut app);
    assert_eq!(app.session.engine().current_file(), Some("main.go"));

    app.handle_key_code(KeyCode::Char(']'));
    settle(&rt, &mut app);
    assert_eq!(app.session.engine().current_file(), Some("greet.go"));
    assert_eq!(app.session.engine().history().len(), 2);
}

#[test]
fn history_edges_toast_instead_of_loading() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    app.handle_key_code(KeyCode::Char('['));
    assert_eq!(
        app.toast.as_ref().map(|toast| toast.message.as_str()),
        Some("No previous location")
    );
    app.handle_key_code(KeyCode::Char(']'));
    assert_eq!(
        app.toast.as_ref().map(|toast| toast.message.as_str()),
        Some("No next location")
    );
    assert!(!app.session.is_busy());
}

#[test]
fn output_keys_walk_links_and_follow() {
    let rt = runtime();
    let mut app = demo_app(&rt);
    run_query(&rt, &mut app, Mode::Callgraph);

    app.handle_key_code(KeyCode::Tab);
    assert_eq!(app.focus, Focus::Output);
    assert_eq!(app.output_cursor, Some(2));

    app.handle_key_code(KeyCode::Char('n'));
    assert_eq!(app.output_cursor, Some(3));
    app.handle_key_code(KeyCode::Char('N'));
    assert_eq!(app.output_cursor, Some(2));

    app.handle_key_code(KeyCode::Char('k'));
    app.handle_key_code(KeyCode::Enter);
    assert_eq!(
        app.toast.as_ref().map(|toast| toast.message.as_str()),
        Some("Not a reference")
    );

    app.handle_key_code(KeyCode::End);
    app.handle_key_code(KeyCode::Enter);
    settle(&rt, &mut app);
    assert_eq!(
        app.session.engine().state().map(|state| state.current_line),
        Some(12)
    );
}

#[test]
fn hint_labels_follow_references() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    app.handle_key_code(KeyCode::Char('f'));
    assert!(matches!(app.hint_mode, HintMode::Inactive));
    assert_eq!(
        app.toast.as_ref().map(|toast| toast.message.as_str()),
        Some("No references to follow")
    );

    run_query(&rt, &mut app, Mode::Describe);
    app.handle_key_code(KeyCode::Char('f'));
    let labels = app.hint_labels();
    assert_eq!(labels.get(&0), Some(&"a"));
    assert_eq!(labels.get(&1), Some(&"s"));

    let rows = screen(&mut app);
    assert!(rows.iter().any(|row| row.contains("s ▶ defined here")));

    app.handle_key_code(KeyCode::Char('s'));
    assert!(matches!(app.hint_mode, HintMode::Inactive));
    settle(&rt, &mut app);
    assert_eq!(app.session.engine().current_file(), Some("greet.go"));
}

#[test]
fn hint_mode_cancels_on_unknown_label_and_escape() {
    let rt = runtime();
    let mut app = demo_app(&rt);
    run_query(&rt, &mut app, Mode::Describe);

    app.handle_key_code(KeyCode::Char('f'));
    app.handle_key_code(KeyCode::Char('z'));
    assert!(matches!(app.hint_mode, HintMode::Inactive));

    app.handle_key_code(KeyCode::Char('f'));
    app.handle_key_code(KeyCode::Esc);
    assert!(matches!(app.hint_mode, HintMode::Inactive));
    assert_eq!(app.session.engine().current_file(), Some("main.go"));
}

#[test]
fn failed_query_shows_error_message() {
    let rt = runtime();
    let backend = MemoryBackend::new().with_file("main.go", "package main\n");
    let mut app = app_with(&rt, backend);
    app.session.mount("main.go", 1);
    settle(&rt, &mut app);

    run_query(&rt, &mut app, Mode::Peers);
    let output = app.session.controller().output();
    assert_eq!(output.status(), OutputStatus::Failed);
    assert_eq!(output.lines(), [OutputLine::Verbatim(ERROR_MESSAGE.to_owned())]);
    assert_eq!(
        app.toast.as_ref().map(|toast| toast.message.as_str()),
        Some("Query failed: no response for mode peers")
    );

    let rows = screen(&mut app);
    assert!(rows.iter().any(|row| row.contains(ERROR_MESSAGE)));
    assert!(rows.iter().any(|row| row.contains("Output (error)")));
}

#[test]
fn help_toggles_and_lists_query_modes() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    assert!(!app.handle_key_code(KeyCode::Char('?')));
    assert!(app.show_help);
    assert!(!app.handle_key_code(KeyCode::Char('j')));
    assert_eq!(app.help_scroll, 1);
    assert!(!app.handle_key_code(KeyCode::Esc));
    assert!(!app.show_help);

    let lines: Vec<String> = help_lines(&TuiTheme::default()).iter().map(line_to_string).collect();
    for (idx, mode) in Mode::ALL.iter().enumerate() {
        let key = format!("{} {}", idx + 1, mode.name());
        assert!(
            lines.iter().any(|line| line.contains(&key) && line.contains(mode.description())),
            "missing {key}"
        );
    }

    app.handle_key_code(KeyCode::Char('?'));
    assert!(app.handle_key_code(KeyCode::Char('q')));
}

#[test]
fn selection_descriptor_covers_mark_and_cursor() {
    let rt = runtime();
    let mut app = demo_app(&rt);

    assert_eq!(app.selection_descriptor().map(|pos| pos.into_string()), Some("main.go:#0".to_owned()));
    app.handle_key_code(KeyCode::Char('l'));
    app.handle_key_code(KeyCode::Char('l'));
    app.handle_key_code(KeyCode::Char('v'));
    app.handle_key_code(KeyCode::Char('h'));
    assert_eq!(
        app.selection_descriptor().map(|pos| pos.into_string()),
        Some("main.go:#1,#2".to_owned())
    );
}

#[test]
fn column_helpers_respect_tab_stops() {
    assert_eq!(column_of_char_index("\tgo x", 0), 0);
    assert_eq!(column_of_char_index("\tgo x", 1), 4);
    assert_eq!(column_of_char_index("ab\tc", 3), 4);
    assert_eq!(char_index_at_column("\tgo", 2), 0);
    assert_eq!(char_index_at_column("\tgo", 4), 1);
    assert_eq!(char_index_at_column("\tgo", 40), 3);
    assert_eq!(expand_tabs("a\tb"), "a   b");
    assert_eq!(expand_tabs("\t\tx"), "        x");
}

#[test]
fn menu_rect_stays_inside_the_frame() {
    let area = Rect::new(0, 0, 80, 24);

    let below = menu_rect(Pointer { x: 2, y: 2 }, area);
    assert_eq!((below.x, below.y), (2, 3));
    assert_eq!(below.height, Mode::ALL.len() as u16 + 2);

    let flipped = menu_rect(Pointer { x: 75, y: 20 }, area);
    assert_eq!(flipped.x + flipped.width, 80);
    assert_eq!(flipped.y, 20 - flipped.height);

    assert_eq!(menu_item_at(below, below.y), None);
    assert_eq!(menu_item_at(below, below.y + 1), Some(Mode::Describe));
    assert_eq!(menu_item_at(below, below.y + 9), Some(Mode::Referrers));
    assert_eq!(menu_item_at(below, below.y + 10), None);
}

#[test]
fn osc52_sequence_encodes_payload_and_terminates_with_st() {
    let seq = osc52_sequence("main.go:#8,#12");
    assert!(seq.starts_with("\u{1b}]52;c;"));
    assert!(seq.ends_with("\u{1b}\\"));
    assert!(seq.contains("bWFpbi5nbzojOCwjMTI="));
}

#[test]
fn range_highlight_counts_columns_in_bytes() {
    let rt = runtime();
    let backend = MemoryBackend::new().with_file("u.go", "s := \"h\u{e9}llo\" + tail\n");
    let mut app = app_with(&rt, backend);
    app.session.navigate(NavTarget {
        file: "u.go".to_owned(),
        line: 1,
        span: Some(Span {
            from: Location::new(1, 17),
            to: Location::new(1, 21),
        }),
    });
    settle(&rt, &mut app);

    let span_bg = app.theme.span_style().bg;
    let text = app.source_text(1, 1);
    let highlighted: String = text.lines[0]
        .spans
        .iter()
        .filter(|span| span.style.bg == span_bg)
        .map(|span| span.content.as_ref())
        .collect();
    assert_eq!(highlighted, "tail");
}
