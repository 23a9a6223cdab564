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

//! The commit phase: one draft becomes one catalog entry, atomically.
//!
//! The addon row and every staged version and dependency are written in a
//! single transaction; there is no per-step persistence anywhere earlier in
//! the wizard, so nothing observes a half-created addon. The caller deletes
//! the draft only after this succeeds.

use thiserror::Error;

use crate::auth::UserId;
use crate::dal::Dal;
use crate::database::StorageError;
use crate::models::addon::{derive_composer_name, Addon, AddonId};

/// Errors from the commit phase.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The draft has no staged versions; an addon with nothing to download
    /// has no place in the catalog.
    #[error("an addon needs at least one version before it can be published")]
    NoVersions,

    /// Storage rejected or lost the transaction. The draft must be kept so
    /// the user can retry without re-entering data.
    #[error(transparent)]
    Persistence(#[from] StorageError),
}

/// Persists the aggregate and all staged versions as one unit.
pub(crate) async fn commit_draft(
    dal: &Dal,
    addon: &Addon,
    owner: UserId,
) -> Result<AddonId, CommitError> {
    if addon.versions.is_empty() {
        return Err(CommitError::NoVersions);
    }

    // Imported aggregates may arrive without a composer name; the derivation
    // is deterministic, so deriving here matches what any earlier duplicate
    // check saw.
    let composer_name = match &addon.composer_name {
        Some(name) => name.clone(),
        None => derive_composer_name(&addon.name),
    };

    let addon_id = dal
        .addons()
        .insert_with_versions(addon, &composer_name, owner)
        .await?;

    Ok(addon_id)
}
