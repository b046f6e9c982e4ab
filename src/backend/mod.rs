// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Access to the oracle server.
//!
//! The server exposes two read-only endpoints: `query` (mode + position + format) and `source`
//! (raw file content). [`Backend`] abstracts both so the session can run against HTTP or an
//! in-memory fixture.

use std::fmt;
use std::future::Future;

use crate::model::{Mode, PositionDescriptor};

pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::MemoryBackend;

/// Response format requested from the `query` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryFormat {
    #[default]
    Plain,
    Json,
}

impl QueryFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for QueryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub mode: Mode,
    pub pos: PositionDescriptor,
    pub format: QueryFormat,
}

impl Query {
    pub fn plain(mode: Mode, pos: PositionDescriptor) -> Self {
        Self {
            mode,
            pos,
            format: QueryFormat::Plain,
        }
    }

    pub fn json(mode: Mode, pos: PositionDescriptor) -> Self {
        Self {
            mode,
            pos,
            format: QueryFormat::Json,
        }
    }

    /// The equivalent oracle command line, used for logging.
    pub fn command_line(&self) -> String {
        format!("oracle -format={} -pos={} {}", self.format, self.pos, self.mode)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid server url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("file not found: {file}")]
    NotFound { file: String },
    #[error("no response for mode {mode}")]
    NoResponse { mode: Mode },
    #[error("invalid json response: {0}")]
    Json(#[from] serde_json::Error),
}

/// The two endpoints of an oracle server.
///
/// Futures must be `Send` so the session can run them as tasks.
pub trait Backend: Send + Sync + 'static {
    /// Runs `query` and returns the response body as text.
    fn query(&self, query: &Query) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Fetches the raw content of `file`.
    fn fetch_source(&self, file: &str)
        -> impl Future<Output = Result<String, BackendError>> + Send;
}

/// Decodes a `json` format response.
pub fn decode_json(body: &str) -> Result<serde_json::Value, BackendError> {
    Ok(serde_json::from_str(body)?)
}
