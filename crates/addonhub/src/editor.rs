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

//! Single-step editing of already-persisted addons.
//!
//! Deliberately not part of the wizard: the addon is loaded by id, the form
//! writes through immediately, and the draft store is never involved. Field
//! validation matches the creation flow's basic-info step; renaming into a
//! collision is left to the schema's uniqueness constraint.

use tracing::info;

use crate::auth::{CurrentUser, UserId};
use crate::dal::Dal;
use crate::error::WizardError;
use crate::models::addon::{Addon, AddonId, BasicInfoFields};

/// Write-through editor for persisted addons.
pub struct AddonEditor<U> {
    dal: Dal,
    auth: U,
}

impl<U: CurrentUser> AddonEditor<U> {
    pub fn new(dal: Dal, auth: U) -> Self {
        Self { dal, auth }
    }

    fn require_user(&self) -> Result<UserId, WizardError> {
        self.auth
            .current_user()
            .ok_or(WizardError::AuthorizationRequired)
    }

    /// Loads the addon to pre-fill the edit form.
    pub async fn load(&self, id: AddonId) -> Result<Addon, WizardError> {
        self.require_user()?;
        self.dal
            .addons()
            .find_by_id(id)
            .await?
            .ok_or(WizardError::AddonNotFound { id })
    }

    /// Revalidates and writes the basic-info fields through to storage.
    pub async fn update(&self, id: AddonId, fields: &BasicInfoFields) -> Result<(), WizardError> {
        self.require_user()?;
        fields.validate()?;

        let updated = self.dal.addons().update_basic_info(id, fields).await?;
        if !updated {
            return Err(WizardError::AddonNotFound { id });
        }

        info!(addon_id = %id, "Addon updated");
        Ok(())
    }
}
