// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;

use crate::backend::{BackendError, HttpBackend};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080/";
pub const SERVER_ENV: &str = "PYTHIA_SERVER";
pub const PRODUCT_TITLE: &str = "Go source code oracle";

/// Client settings: which oracle server to talk to and how to title the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server: String,
    pub product_title: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_owned(),
            product_title: PRODUCT_TITLE.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Resolves the server from the `--server` flag, then `PYTHIA_SERVER`, then the default.
    pub fn resolve(server_flag: Option<String>) -> Self {
        Self::resolve_with(server_flag, env::var(SERVER_ENV).ok())
    }

    fn resolve_with(server_flag: Option<String>, server_env: Option<String>) -> Self {
        let server = server_flag
            .into_iter()
            .chain(server_env)
            .map(|value| value.trim().to_owned())
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER.to_owned());

        Self {
            server,
            ..Self::default()
        }
    }

    pub fn http_backend(&self) -> Result<HttpBackend, BackendError> {
        HttpBackend::new(&self.server)
    }
}
