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

//! The addon aggregate: an addon plus its pending versions and dependencies,
//! independent of how (or whether) it is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::UserId;
use crate::error::ValidationError;

/// Identifier of a persisted catalog addon.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AddonId(pub i64);

impl fmt::Display for AddonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label attachable to persisted addons, many-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A dependency declared by an imported version's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonDependency {
    pub package_name: String,
    pub version_constraint: String,
}

/// One release of an addon.
///
/// `filename` is set only for manually uploaded artifacts; `dependencies`
/// are populated only by repository imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonVersion {
    pub version: String,
    pub license: Option<String>,
    pub filename: Option<String>,
    pub dependencies: Vec<AddonDependency>,
}

impl AddonVersion {
    pub fn from_fields(fields: &VersionFields) -> Self {
        Self {
            version: fields.version.clone(),
            license: fields.license.clone(),
            filename: fields.filename.clone(),
            dependencies: Vec::new(),
        }
    }
}

/// The addon aggregate.
///
/// `repository_url` presence marks the addon as repository-linked: its
/// versions come from an external repository importer rather than manual
/// entry, and duplicate names are treated more leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub demo_url: Option<String>,
    pub repository_url: Option<String>,
    /// Canonical package identifier, derived from `name` unless an import
    /// set it explicitly.
    pub composer_name: Option<String>,
    /// The authenticated user building this addon; set by wizard transitions.
    pub owner: Option<UserId>,
    /// Append-only within a draft.
    pub versions: Vec<AddonVersion>,
    /// Set only after commit.
    pub persisted_id: Option<AddonId>,
}

impl Addon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_description: String::new(),
            description: String::new(),
            demo_url: None,
            repository_url: None,
            composer_name: None,
            owner: None,
            versions: Vec::new(),
            persisted_id: None,
        }
    }

    pub fn is_repository_linked(&self) -> bool {
        self.repository_url.is_some()
    }

    /// Derives the download URL for one of this addon's versions.
    ///
    /// Repository-linked addons serve `<repository>/zipball/<version>`;
    /// manual addons serve the uploaded artifact below `upload_base_url`.
    /// Returns `None` for a manual version without an uploaded file.
    ///
    /// This is a pure derivation, recomputed on every request; the URL is
    /// never stored.
    pub fn zip_url(&self, version: &AddonVersion, upload_base_url: &str) -> Option<String> {
        if let Some(repository) = &self.repository_url {
            Some(format!("{}/zipball/{}", repository, version.version))
        } else {
            version
                .filename
                .as_ref()
                .map(|filename| format!("{}/{}", upload_base_url.trim_end_matches('/'), filename))
        }
    }
}

/// Derives the canonical composer name from an addon's display name.
///
/// Lowercase ASCII slug: alphanumeric runs survive, everything between them
/// collapses to a single dash. The derivation is deterministic so that
/// duplicate checks on the composer name are stable across submissions.
pub fn derive_composer_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Validated basic-info form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfoFields {
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub demo_url: Option<String>,
}

impl BasicInfoFields {
    /// The form layer validates first; this is the engine's own backstop for
    /// the non-empty-name invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        Ok(())
    }

    pub fn apply_to(&self, addon: &mut Addon) {
        addon.name = self.name.clone();
        addon.short_description = self.short_description.clone();
        addon.description = self.description.clone();
        addon.demo_url = self.demo_url.clone();
    }
}

/// Validated manual-version form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFields {
    pub version: String,
    pub license: Option<String>,
    pub filename: Option<String>,
}

impl VersionFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "version" });
        }
        Ok(())
    }
}
