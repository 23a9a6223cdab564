/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! The repository-importer seam and its orchestrator.
//!
//! Concrete importer backends (which host serves a given URL, how its API is
//! spoken) live outside this crate behind [`RepositoryImporter`]. The
//! [`ImportOrchestrator`] owns everything the wizard needs on top of a
//! backend: canonical URL normalization and a hard timeout so a dead remote
//! surfaces as an error instead of a hung request.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::models::addon::{Addon, AddonVersion};

/// Errors from talking to an external repository source.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The remote endpoint could not be reached (or took too long).
    #[error("repository source could not be reached: {0}")]
    SourceUnreachable(String),

    /// The remote exists but does not resemble a supported repository.
    #[error("source does not look like a supported repository: {0}")]
    InvalidFormat(String),
}

/// A backend that reads project metadata and releases from an external
/// source-code repository.
#[async_trait]
pub trait RepositoryImporter: Send + Sync {
    /// Fetches project metadata and returns a populated aggregate with no
    /// versions.
    async fn import_addon(&self, source: &Url) -> Result<Addon, ImportError>;

    /// Enumerates published release tags at the source, with dependencies
    /// resolved from the project's manifest at each revision.
    ///
    /// Source ordering must be preserved; callers do not re-sort. Individual
    /// malformed tags are skipped, but an unlistable source fails the whole
    /// call with [`ImportError::SourceUnreachable`].
    async fn import_versions(&self, repository: &Url) -> Result<Vec<AddonVersion>, ImportError>;
}

/// Brings a user-supplied repository URL into canonical form.
///
/// Enforces an http(s) scheme, drops query strings, fragments and trailing
/// `/` or `.git` suffixes, and lowercases the host, so that duplicate checks
/// and zipball URL construction see one spelling per repository.
pub fn normalize_repository_url(raw: &str) -> Result<Url, ImportError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed)
        .map_err(|e| ImportError::InvalidFormat(format!("'{}' is not a valid URL: {}", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ImportError::InvalidFormat(format!(
                "unsupported URL scheme '{}'",
                other
            )));
        }
    }
    if url.host_str().is_none() {
        return Err(ImportError::InvalidFormat(format!(
            "'{}' has no host",
            trimmed
        )));
    }

    url.set_query(None);
    url.set_fragment(None);

    let path = url
        .path()
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .trim_end_matches('/')
        .to_string();
    url.set_path(&path);

    Ok(url)
}

/// Drives calls to a repository importer on behalf of the wizard.
pub struct ImportOrchestrator<I> {
    importer: I,
    timeout: Duration,
}

impl<I: RepositoryImporter> ImportOrchestrator<I> {
    pub fn new(importer: I, timeout: Duration) -> Self {
        Self { importer, timeout }
    }

    /// Imports addon metadata from a user-supplied repository URL.
    ///
    /// The returned aggregate always carries a repository URL: if the backend
    /// did not set one, the normalized input URL is used, so later duplicate
    /// checks and zipball construction behave consistently.
    pub async fn import_addon(&self, source_url: &str) -> Result<Addon, ImportError> {
        let url = normalize_repository_url(source_url)?;

        let mut addon = self.bounded(self.importer.import_addon(&url), &url).await?;
        if addon.repository_url.is_none() {
            addon.repository_url = Some(url.to_string());
        }
        tracing::info!(repository = %url, addon = %addon.name, "Imported addon metadata");
        Ok(addon)
    }

    /// Imports the version list for a draft's linked repository.
    pub async fn import_versions(
        &self,
        repository_url: &str,
    ) -> Result<Vec<AddonVersion>, ImportError> {
        let url = normalize_repository_url(repository_url)?;

        let versions = self
            .bounded(self.importer.import_versions(&url), &url)
            .await?;
        tracing::info!(repository = %url, count = versions.len(), "Imported versions");
        Ok(versions)
    }

    /// Applies the orchestrator timeout to one importer round-trip.
    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, ImportError>>,
        url: &Url,
    ) -> Result<T, ImportError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ImportError::SourceUnreachable(format!(
                "{} did not answer within {:?}",
                url, self.timeout
            ))),
        }
    }
}
