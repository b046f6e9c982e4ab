// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One client session: navigation engine, interaction controller and the backend they share.
//!
//! Requests run as tasks on a tokio runtime. Their results come back over a channel and are
//! applied on the UI side by [`Session::pump`] (non-blocking) or [`Session::settle`].

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendError};
use crate::controller::{InteractionController, QueryOutcome, QueryTicket, Signal};
use crate::model::{Mode, NavTarget};
use crate::nav::{LoadTicket, NavOutcome, NavigationEngine};

enum Completion {
    Load(LoadTicket, Result<String, BackendError>),
    Query(QueryTicket, Result<String, BackendError>),
}

/// What applying a finished request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Navigated(NavOutcome),
    Queried(QueryOutcome),
}

pub struct Session<B: Backend> {
    backend: Arc<B>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    engine: NavigationEngine,
    controller: InteractionController,
    tasks: Vec<AbortHandle>,
    in_flight: usize,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: Arc<B>, runtime: Handle, product_title: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            runtime,
            tx,
            rx,
            engine: NavigationEngine::new(product_title),
            controller: InteractionController::new(),
            tasks: Vec::new(),
            in_flight: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut NavigationEngine {
        &mut self.engine
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Whether any request is still running.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Opens the first file of the session.
    pub fn mount(&mut self, file: impl Into<String>, line: u32) {
        let ticket = self.engine.open_initial(file, line);
        self.spawn_load(ticket);
    }

    pub fn navigate(&mut self, target: NavTarget) {
        let ticket = self.engine.navigate_to(target);
        self.spawn_load(ticket);
    }

    /// Follows output line `index` when it is a link.
    pub fn follow_link(&mut self, index: usize) -> bool {
        let Some(target) = self.controller.activate(index) else {
            return false;
        };
        self.navigate(target);
        true
    }

    pub fn go_back(&mut self) -> bool {
        match self.engine.back() {
            Some(ticket) => {
                self.spawn_load(ticket);
                true
            }
            None => false,
        }
    }

    pub fn go_forward(&mut self) -> bool {
        match self.engine.forward() {
            Some(ticket) => {
                self.spawn_load(ticket);
                true
            }
            None => false,
        }
    }

    /// Queries `mode` for the selection bound to the menu.
    pub fn select_mode(&mut self, mode: Mode) -> bool {
        match self.controller.choose_mode(mode) {
            Some(ticket) => {
                self.spawn_query(ticket);
                true
            }
            None => false,
        }
    }

    pub fn select_highlighted(&mut self) -> bool {
        self.select_mode(self.controller.menu().highlighted())
    }

    pub fn take_signal(&mut self) -> Option<Signal> {
        self.controller.take_signal()
    }

    /// Applies every completion that is already available.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            events.push(self.apply(completion));
        }
        events
    }

    /// Waits until every running request has been applied.
    pub async fn settle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(completion) => events.push(self.apply(completion)),
                None => break,
            }
        }
        events
    }

    fn apply(&mut self, completion: Completion) -> SessionEvent {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Load(ticket, result) => {
                let outcome = self.engine.complete(ticket, result);
                if matches!(outcome, NavOutcome::Failed { .. }) {
                    self.controller.show_error();
                }
                SessionEvent::Navigated(outcome)
            }
            Completion::Query(ticket, result) => {
                let mode = ticket.query().mode;
                let outcome = self.controller.complete_query(ticket, result);
                match &outcome {
                    QueryOutcome::Rendered { lines, links } => {
                        info!(%mode, lines, links, "query answered")
                    }
                    QueryOutcome::Failed { error } => warn!(%mode, %error, "query failed"),
                    QueryOutcome::Stale => debug!(%mode, "dropping stale query result"),
                }
                SessionEvent::Queried(outcome)
            }
        }
    }

    fn spawn_load(&mut self, ticket: LoadTicket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.track(self.runtime.spawn(async move {
            let result = backend.fetch_source(ticket.file()).await;
            let _ = tx.send(Completion::Load(ticket, result));
        }));
    }

    fn spawn_query(&mut self, ticket: QueryTicket) {
        debug!(command = %ticket.query().command_line(), "query started");
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.track(self.runtime.spawn(async move {
            let result = backend.query(ticket.query()).await;
            let _ = tx.send(Completion::Query(ticket, result));
        }));
    }

    fn track(&mut self, handle: tokio::task::JoinHandle<()>) {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(handle.abort_handle());
        self.in_flight += 1;
    }
}

impl<B: Backend> Drop for Session<B> {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}
