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

//! Duplicate detection on the canonical composer name.
//!
//! Name reuse from unrelated manual submissions is rejected outright, but a
//! repository-linked candidate colliding with an existing entry is presumed
//! to mean "import a different version of an existing project" and gets a
//! softer retry path toward the import entry point.

use crate::dal::Dal;
use crate::database::StorageError;
use crate::models::addon::AddonId;

/// Outcome of a duplicate check. Not an error: the wizard branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateCheck {
    /// No persisted addon claims this composer name.
    Unique,
    /// Collision on a manual submission; the wizard must not advance.
    Blocking { existing: AddonId },
    /// Collision on a repository-linked candidate; warn and redirect to the
    /// import entry instead of continuing with basic-info entry.
    RepositoryAllowed { existing: AddonId },
}

/// Decides what a composer-name collision means for a candidate addon.
pub struct DuplicateResolver<'a> {
    dal: &'a Dal,
}

impl<'a> DuplicateResolver<'a> {
    pub fn new(dal: &'a Dal) -> Self {
        Self { dal }
    }

    /// Checks the candidate's composer name against the persisted catalog.
    ///
    /// Callers derive the composer name before checking; drafts are never
    /// persisted, so a candidate cannot collide with itself.
    pub async fn check(
        &self,
        composer_name: &str,
        repository_linked: bool,
    ) -> Result<DuplicateCheck, StorageError> {
        let existing = self
            .dal
            .addons()
            .find_by_composer_name(composer_name)
            .await?;

        let Some(existing) = existing else {
            return Ok(DuplicateCheck::Unique);
        };
        let Some(existing_id) = existing.persisted_id else {
            return Ok(DuplicateCheck::Unique);
        };

        if repository_linked {
            tracing::debug!(
                composer_name,
                existing = %existing_id,
                "Composer name taken; steering repository-linked candidate to import"
            );
            Ok(DuplicateCheck::RepositoryAllowed {
                existing: existing_id,
            })
        } else {
            tracing::debug!(
                composer_name,
                existing = %existing_id,
                "Composer name taken; blocking manual submission"
            );
            Ok(DuplicateCheck::Blocking {
                existing: existing_id,
            })
        }
    }
}
