// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use reqwest::{Client, Url};
use tracing::{debug, warn};

use super::{Backend, BackendError, Query};

/// Oracle server reached over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// Creates a backend for the server rooted at `server`, e.g. `http://127.0.0.1:8080/`.
    pub fn new(server: &str) -> Result<Self, BackendError> {
        let invalid = |reason: String| BackendError::InvalidUrl {
            url: server.to_owned(),
            reason,
        };

        let mut base = Url::parse(server).map_err(|err| invalid(err.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) base url".to_owned()));
        }
        // `join` replaces the last path segment unless the base ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);

        let client = Client::builder()
            .user_agent(concat!("pythia/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, name: &str) -> Result<Url, BackendError> {
        self.base.join(name).map_err(|err| BackendError::InvalidUrl {
            url: format!("{}{name}", self.base),
            reason: err.to_string(),
        })
    }

    async fn get_text(&self, url: Url, params: &[(&str, &str)]) -> Result<String, BackendError> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        let url = response.url().to_string();
        debug!(%url, status = status.as_u16(), "oracle response");

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "oracle request rejected");
            return Err(BackendError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}

impl Backend for HttpBackend {
    async fn query(&self, query: &Query) -> Result<String, BackendError> {
        let url = self.endpoint("query")?;
        debug!(command = %query.command_line(), "dispatching query");
        let params = [
            ("mode", query.mode.id()),
            ("pos", query.pos.as_str()),
            ("format", query.format.as_str()),
        ];
        self.get_text(url, &params).await
    }

    async fn fetch_source(&self, file: &str) -> Result<String, BackendError> {
        let url = self.endpoint("source")?;
        debug!(file, "fetching raw source");
        self.get_text(url, &[("file", file), ("format", "raw")]).await
    }
}
