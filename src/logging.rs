// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagnostics setup.
//!
//! Logging stays off unless `PYTHIA_LOG` holds a filter (e.g. `pythia=debug`). The TUI owns the
//! terminal, so in that mode events go to a file instead of stderr.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PYTHIA_LOG";
pub const LOG_FILE_ENV: &str = "PYTHIA_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// File named by `PYTHIA_LOG_FILE`, or `pythia.log` in the temp dir.
    pub fn file_from_env() -> Self {
        let path = env::var_os(LOG_FILE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("pythia.log"));
        Self::File(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid {LOG_ENV} filter: {0}")]
    Filter(#[from] ParseError),
    #[error("cannot open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("logging already initialized: {0}")]
    Install(String),
}

/// Installs the global subscriber when `PYTHIA_LOG` is set. Returns whether one was installed.
pub fn init(target: LogTarget) -> Result<bool, LoggingError> {
    let Some(directives) = filter_directives(env::var(LOG_ENV).ok()) else {
        return Ok(false);
    };
    let filter = EnvFilter::try_new(directives)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))?;
    Ok(true)
}

fn filter_directives(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })
}
