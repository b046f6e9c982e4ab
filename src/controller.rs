// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interaction controller: selection → mode menu → query → linkified output.
//!
//! This is terminal-agnostic. The TUI maps mouse and key events onto these operations; the
//! session runs the queries the controller hands out.

use std::collections::VecDeque;

use crate::backend::{BackendError, Query};
use crate::format::parse_response;
use crate::model::{Mode, NavTarget, ResponseLine, Selection};

pub const WAIT_MESSAGE: &str = "Consulting the oracle ...";
pub const ERROR_MESSAGE: &str = "An error occurred.";
pub const LINK_MARKER: &str = "▶ ";
const MESSAGE_INDENT: &str = "  ";

/// Screen cell where the pointer was when a selection finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pointer {
    pub x: u16,
    pub y: u16,
}

/// Where one end of a selection landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEnd {
    /// Character offset into the displayed source.
    Source(usize),
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Link {
        label: String,
        tooltip: String,
        target: NavTarget,
    },
    Indented(String),
    Verbatim(String),
}

impl OutputLine {
    fn render(raw: &str, parsed: ResponseLine) -> Self {
        if let Some(target) = parsed.target() {
            return Self::Link {
                label: format!("{LINK_MARKER}{}", parsed.message()),
                tooltip: raw.to_owned(),
                target,
            };
        }
        match parsed {
            ResponseLine::Message { message } => Self::Indented(format!("{MESSAGE_INDENT}{message}")),
            _ => Self::Verbatim(raw.to_owned()),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Link { label, .. } => label,
            Self::Indented(text) | Self::Verbatim(text) => text,
        }
    }

    pub fn target(&self) -> Option<&NavTarget> {
        match self {
            Self::Link { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn tooltip(&self) -> Option<&str> {
        match self {
            Self::Link { tooltip, .. } => Some(tooltip),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    Empty,
    Working,
    Ready,
    Failed,
}

/// Content of the output panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    status: OutputStatus,
    lines: Vec<OutputLine>,
}

impl Output {
    fn empty() -> Self {
        Self {
            status: OutputStatus::Empty,
            lines: Vec::new(),
        }
    }

    pub fn status(&self) -> OutputStatus {
        self.status
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn link_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.target().is_some())
            .map(|(idx, _)| idx)
    }
}

/// The mode popup. Lists [`Mode::ALL`] in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModeMenu {
    visible: bool,
    at: Pointer,
    highlighted: usize,
}

impl ModeMenu {
    pub fn items(&self) -> &'static [Mode] {
        &Mode::ALL
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Pointer {
        self.at
    }

    pub fn highlighted(&self) -> Mode {
        Mode::ALL[self.highlighted.min(Mode::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    seq: u64,
    query: Query,
}

impl QueryTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Rendered { lines: usize, links: usize },
    /// The output shows the fixed error message; `error` is the cause, for logging.
    Failed { error: String },
    Stale,
}

/// Signals raised for the host to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Escape pressed while no menu was open.
    Esc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    MenuHidden,
    Signalled,
}

#[derive(Debug)]
pub struct InteractionController {
    menu: ModeMenu,
    bound: Option<Selection>,
    output: Output,
    next_seq: u64,
    latest_query: Option<u64>,
    signals: VecDeque<Signal>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            menu: ModeMenu::default(),
            bound: None,
            output: Output::empty(),
            next_seq: 0,
            latest_query: None,
            signals: VecDeque::new(),
        }
    }

    pub fn menu(&self) -> &ModeMenu {
        &self.menu
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// The selection the menu will query for.
    pub fn bound_selection(&self) -> Option<&Selection> {
        self.bound.as_ref()
    }

    /// Handles the end of a selection gesture.
    ///
    /// Opens the menu at `at` only when a file is displayed and both ends lie inside the source
    /// region; anything else is ignored. Returns whether the menu opened.
    pub fn finish_selection(
        &mut self,
        file: Option<&str>,
        anchor: SelectionEnd,
        head: SelectionEnd,
        at: Pointer,
    ) -> bool {
        let (Some(file), SelectionEnd::Source(anchor), SelectionEnd::Source(head)) =
            (file, anchor, head)
        else {
            return false;
        };

        self.bound = Some(Selection::new(file, anchor, head));
        self.menu.visible = true;
        self.menu.at = at;
        true
    }

    pub fn hide_menu(&mut self) {
        self.menu.visible = false;
    }

    pub fn menu_move(&mut self, delta: isize) {
        let len = Mode::ALL.len() as isize;
        let next = (self.menu.highlighted as isize + delta).rem_euclid(len);
        self.menu.highlighted = next as usize;
    }

    pub fn menu_highlight(&mut self, mode: Mode) {
        self.menu.highlighted = mode.index();
    }

    /// A click landed outside the source region.
    pub fn click_outside_source(&mut self) {
        self.hide_menu();
    }

    pub fn escape(&mut self) -> EscapeOutcome {
        if self.menu.visible {
            self.hide_menu();
            return EscapeOutcome::MenuHidden;
        }
        self.signals.push_back(Signal::Esc);
        EscapeOutcome::Signalled
    }

    pub fn take_signal(&mut self) -> Option<Signal> {
        self.signals.pop_front()
    }

    pub fn choose_highlighted(&mut self) -> Option<QueryTicket> {
        self.choose_mode(self.menu.highlighted())
    }

    /// Starts a `mode` query for the bound selection.
    ///
    /// Hides the menu and shows the working message. Returns `None` when nothing is bound.
    pub fn choose_mode(&mut self, mode: Mode) -> Option<QueryTicket> {
        self.hide_menu();
        let selection = self.bound.as_ref()?;
        let query = Query::plain(mode, selection.position());

        self.next_seq += 1;
        self.latest_query = Some(self.next_seq);
        self.show_message(OutputStatus::Working, WAIT_MESSAGE);
        Some(QueryTicket {
            seq: self.next_seq,
            query,
        })
    }

    /// Renders the result of `ticket`, unless a newer query was started meanwhile.
    pub fn complete_query(
        &mut self,
        ticket: QueryTicket,
        result: Result<String, BackendError>,
    ) -> QueryOutcome {
        if self.latest_query != Some(ticket.seq) {
            return QueryOutcome::Stale;
        }
        self.latest_query = None;

        match result {
            Ok(text) => {
                self.write_output(&text);
                QueryOutcome::Rendered {
                    lines: self.output.lines.len(),
                    links: self.output.link_indices().count(),
                }
            }
            Err(err) => {
                self.show_error();
                QueryOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    /// Replaces the output panel with linkified `text`.
    pub fn write_output(&mut self, text: &str) {
        let lines = parse_response(text)
            .with_raw()
            .map(|(raw, parsed)| OutputLine::render(raw, parsed))
            .collect();
        self.output = Output {
            status: OutputStatus::Ready,
            lines,
        };
    }

    pub fn show_error(&mut self) {
        self.show_message(OutputStatus::Failed, ERROR_MESSAGE);
    }

    fn show_message(&mut self, status: OutputStatus, message: &str) {
        self.output = Output {
            status,
            lines: vec![OutputLine::Verbatim(message.to_owned())],
        };
    }

    /// Target of output line `index`, if it is a link.
    pub fn activate(&self, index: usize) -> Option<NavTarget> {
        self.output.lines.get(index)?.target().cloned()
    }

    pub fn next_link(&self, from: Option<usize>) -> Option<usize> {
        let mut links = self.output.link_indices();
        match from {
            Some(from) => links.find(|idx| *idx > from),
            None => links.next(),
        }
    }

    pub fn prev_link(&self, from: Option<usize>) -> Option<usize> {
        let links: Vec<usize> = self.output.link_indices().collect();
        match from {
            Some(from) => links.into_iter().rev().find(|idx| *idx < from),
            None => links.last().copied(),
        }
    }
}
