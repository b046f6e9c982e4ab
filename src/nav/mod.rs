// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigation engine: which file and line is displayed, and how we got there.
//!
//! A navigation is split in two steps so the fetch can run asynchronously: a `navigate_to`,
//! `replay`, `back` or `forward` call hands out a [`LoadTicket`] and enters `Loading`; the fetch
//! result is then fed to [`NavigationEngine::complete`]. Only the most recent ticket is honored.

use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendError};
use crate::model::{NavTarget, Span};

pub mod buffer;
pub mod history;

pub use buffer::{line_anchor, GutterEntry, SourceBuffer};
pub use history::{History, HistoryEntry};

/// The file and line currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub current_file: String,
    pub current_line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Displayed,
}

/// Why a load was started. Decides what happens to the history on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOrigin {
    /// Followed a reference: push a history entry.
    User,
    /// Back/forward traversal: history already points at the entry.
    Replay,
    /// First load of a session: becomes the current entry without growing the history.
    Initial,
}

/// A started load, to be passed back with the fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    target: NavTarget,
    origin: NavOrigin,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn file(&self) -> &str {
        &self.target.file
    }

    pub fn line(&self) -> u32 {
        self.target.line
    }

    pub fn origin(&self) -> NavOrigin {
        self.origin
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Displayed { file: String, line: u32, scrolled: bool },
    Failed { file: String, error: String },
    /// A newer load was started meanwhile; the result was dropped.
    Stale,
}

// State and buffer live in one value so they can only be replaced together.
#[derive(Debug)]
struct View {
    state: NavState,
    buffer: SourceBuffer,
    highlight: Option<Span>,
}

#[derive(Debug)]
pub struct NavigationEngine {
    product_title: String,
    view: Option<View>,
    pending: Option<LoadTicket>,
    history: History,
    next_seq: u64,
    scroll_top: usize,
}

impl NavigationEngine {
    pub fn new(product_title: impl Into<String>) -> Self {
        Self {
            product_title: product_title.into(),
            view: None,
            pending: None,
            history: History::new(),
            next_seq: 0,
            scroll_top: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Loading
        } else if self.view.is_some() {
            Phase::Displayed
        } else {
            Phase::Idle
        }
    }

    pub fn state(&self) -> Option<&NavState> {
        self.view.as_ref().map(|view| &view.state)
    }

    pub fn current_file(&self) -> Option<&str> {
        self.state().map(|state| state.current_file.as_str())
    }

    pub fn buffer(&self) -> Option<&SourceBuffer> {
        self.view.as_ref().map(|view| &view.buffer)
    }

    /// Region of the referenced range, when the last navigation came from one.
    pub fn highlight(&self) -> Option<Span> {
        self.view.as_ref().and_then(|view| view.highlight)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn pending(&self) -> Option<&LoadTicket> {
        self.pending.as_ref()
    }

    /// Window title: `<path> - <product title>`.
    pub fn title(&self) -> String {
        match self.current_file() {
            Some(file) => format!("{file} - {}", self.product_title),
            None => self.product_title.clone(),
        }
    }

    pub fn heading(&self) -> Option<String> {
        self.current_file().map(|file| format!("Source file {file}"))
    }

    /// Location of the displayed state, e.g. `source?file=a.go#L3`.
    pub fn url(&self) -> Option<String> {
        self.state()
            .map(|state| HistoryEntry::new(state.current_file.clone(), state.current_line).url())
    }

    /// Index of the first visible line (0-based).
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn navigate_to(&mut self, target: NavTarget) -> LoadTicket {
        self.begin(target, NavOrigin::User)
    }

    pub fn open_initial(&mut self, file: impl Into<String>, line: u32) -> LoadTicket {
        self.begin(NavTarget::new(file, line), NavOrigin::Initial)
    }

    /// Re-enters `Loading` for a history entry without recording a new one.
    pub fn replay(&mut self, entry: HistoryEntry) -> LoadTicket {
        self.begin(NavTarget::new(entry.file, entry.line), NavOrigin::Replay)
    }

    pub fn back(&mut self) -> Option<LoadTicket> {
        let entry = self.history.back()?.clone();
        Some(self.replay(entry))
    }

    pub fn forward(&mut self) -> Option<LoadTicket> {
        let entry = self.history.forward()?.clone();
        Some(self.replay(entry))
    }

    fn begin(&mut self, target: NavTarget, origin: NavOrigin) -> LoadTicket {
        self.next_seq += 1;
        let ticket = LoadTicket {
            seq: self.next_seq,
            target,
            origin,
        };
        debug!(seq = ticket.seq, file = %ticket.target.file, line = ticket.target.line, ?origin, "load started");
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Applies the fetch result of `ticket`.
    ///
    /// On failure the displayed buffer and state stay as they were.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, BackendError>,
    ) -> NavOutcome {
        if self.pending.as_ref().map(LoadTicket::seq) != Some(ticket.seq) {
            debug!(seq = ticket.seq, file = %ticket.target.file, "dropping stale load");
            return NavOutcome::Stale;
        }
        self.pending = None;

        let LoadTicket { target, origin, .. } = ticket;
        let text = match result {
            Ok(text) => text,
            Err(err) => {
                warn!(file = %target.file, error = %err, "load failed");
                return NavOutcome::Failed {
                    file: target.file,
                    error: err.to_string(),
                };
            }
        };

        self.view = Some(View {
            state: NavState {
                current_file: target.file.clone(),
                current_line: target.line,
            },
            buffer: SourceBuffer::new(text),
            highlight: target.span,
        });
        let scrolled = self.scroll_to_line(target.line);
        if !scrolled {
            self.scroll_top = 0;
        }

        let entry = HistoryEntry::new(target.file.clone(), target.line);
        match origin {
            NavOrigin::User => self.history.push(entry),
            NavOrigin::Initial => self.history.replace_current(entry),
            NavOrigin::Replay => {}
        }

        info!(file = %target.file, line = target.line, "displayed");
        NavOutcome::Displayed {
            file: target.file,
            line: target.line,
            scrolled,
        }
    }

    /// Fetches `ticket` through `backend` and applies the result.
    pub async fn load<B: Backend>(&mut self, backend: &B, ticket: LoadTicket) -> NavOutcome {
        let result = backend.fetch_source(ticket.file()).await;
        self.complete(ticket, result)
    }

    /// Puts `line` (1-based) at the top of the view. Lines that do not exist are ignored.
    pub fn scroll_to_line(&mut self, line: u32) -> bool {
        let Some(buffer) = self.buffer() else {
            return false;
        };
        let line = line as usize;
        if line == 0 || line > buffer.line_count() {
            return false;
        }
        self.scroll_top = line - 1;
        true
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.max_scroll_top();
        self.scroll_top = self.scroll_top.saturating_add_signed(delta).min(max);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_top = self.max_scroll_top();
    }

    fn max_scroll_top(&self) -> usize {
        self.buffer().map_or(0, |buffer| buffer.line_count().saturating_sub(1))
    }
}
