// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{Backend, BackendError, Query};
use crate::model::Mode;

/// In-memory oracle with fixed files and canned answers per mode.
///
/// Used by the built-in demo and by tests. Every request is recorded.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: BTreeMap<String, String>,
    responses: BTreeMap<Mode, String>,
    log: Mutex<Vec<Request>>,
}

/// A request seen by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Query(Query),
    Source(String),
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn with_response(mut self, mode: Mode, body: impl Into<String>) -> Self {
        self.responses.insert(mode, body.into());
        self
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.lock_log().clone()
    }

    fn lock_log(&self) -> MutexGuard<'_, Vec<Request>> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Backend for MemoryBackend {
    async fn query(&self, query: &Query) -> Result<String, BackendError> {
        self.lock_log().push(Request::Query(query.clone()));
        self.responses
            .get(&query.mode)
            .cloned()
            .ok_or(BackendError::NoResponse { mode: query.mode })
    }

    async fn fetch_source(&self, file: &str) -> Result<String, BackendError> {
        self.lock_log().push(Request::Source(file.to_owned()));
        self.files.get(file).cloned().ok_or_else(|| BackendError::NotFound {
            file: file.to_owned(),
        })
    }
}
