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

//! The addon-creation wizard.
//!
//! Every user-facing action is a transition request: the machine reloads the
//! draft from the store, validates the step it expects to be in, consults the
//! duplicate resolver and/or the import orchestrator, mutates the aggregate,
//! writes it back, and answers with the next step.
//!
//! ## Transitions
//!
//! | Stored step | Trigger | Next |
//! |---|---|---|
//! | — | `submit_basic_info` (manual) | `BasicInfoSet`, or a duplicate outcome |
//! | — | `submit_import_url` | `BasicInfoSet` (confirm imported info) |
//! | `BasicInfoSet` | `submit_version` (manual branch) | `VersionsReady` |
//! | `BasicInfoSet` | `import_versions` (repository branch) | `VersionsReady` |
//! | `VersionsReady` | `finish` | committed, draft deleted |
//!
//! A transition that needs a draft and finds none routes back to the
//! creation entry point instead of failing: lost or expired sessions are a
//! normal part of a multi-request flow, not an error.

pub mod commit;

pub use commit::CommitError;

use tracing::{debug, info};

use crate::auth::{CurrentUser, UserId};
use crate::dal::Dal;
use crate::draft_store::DraftStore;
use crate::duplicate::{DuplicateCheck, DuplicateResolver};
use crate::error::{ValidationError, WizardError};
use crate::importer::{ImportOrchestrator, RepositoryImporter};
use crate::models::addon::{
    derive_composer_name, Addon, AddonId, AddonVersion, BasicInfoFields, VersionFields,
};
use crate::models::draft::{AddonDraft, DraftStep, DraftToken};

/// Which form the caller should render next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// The basic-info form (pre-filled from the draft).
    BasicInfo,
    /// The manual version form.
    VersionCreate,
    /// The version-import confirmation.
    VersionImport,
    /// The finish confirmation.
    Finish,
}

/// Result of a wizard transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// The draft was stored; continue at `next` with the same token.
    Advanced { token: DraftToken, next: NextStep },
    /// Manual submission collided with an existing addon. Surfaced as a form
    /// error; nothing was stored.
    DuplicateName { existing: AddonId },
    /// Repository-linked submission collided with an existing addon. The
    /// caller should warn and redirect to the import entry; the draft was
    /// unset.
    DuplicateRepository { existing: AddonId },
    /// The draft was committed to the catalog and removed from the store.
    Committed { addon_id: AddonId },
    /// No usable draft for this transition; restart at the creation entry.
    RestartAtBasicInfo,
}

/// The wizard state machine.
///
/// Holds the draft store, the catalog DAL, the import orchestrator and the
/// identity seam. One instance serves all tokens; per-session state lives
/// exclusively in the draft store.
pub struct AddonWizard<S, I, U> {
    dal: Dal,
    drafts: S,
    importer: ImportOrchestrator<I>,
    auth: U,
}

impl<S, I, U> AddonWizard<S, I, U>
where
    S: DraftStore,
    I: RepositoryImporter,
    U: CurrentUser,
{
    pub fn new(dal: Dal, drafts: S, importer: ImportOrchestrator<I>, auth: U) -> Self {
        Self {
            dal,
            drafts,
            importer,
            auth,
        }
    }

    /// The wizard's draft store, e.g. for eviction sweeps.
    pub fn drafts(&self) -> &S {
        &self.drafts
    }

    fn require_user(&self) -> Result<UserId, WizardError> {
        self.auth
            .current_user()
            .ok_or(WizardError::AuthorizationRequired)
    }

    fn resolver(&self) -> DuplicateResolver<'_> {
        DuplicateResolver::new(&self.dal)
    }

    /// Basic-info submission: the manual entry point, and the confirmation
    /// step after an import.
    ///
    /// Without a token (or stored draft) a fresh aggregate is built; with a
    /// draft at `BasicInfoSet` its fields are refreshed in place. The
    /// composer name is derived from the display name on first submission and
    /// then pinned, so the duplicate check is stable across re-edits.
    pub async fn submit_basic_info(
        &self,
        token: Option<DraftToken>,
        fields: &BasicInfoFields,
    ) -> Result<WizardOutcome, WizardError> {
        let user = self.require_user()?;
        fields.validate()?;

        let token = token.unwrap_or_else(DraftToken::generate);
        let mut addon = match self.drafts.get(&token).await? {
            Some(draft) if draft.step == DraftStep::BasicInfoSet => draft.addon,
            Some(draft) => {
                debug!(token = %token, step = %draft.step, "Basic info submitted in wrong step");
                return Ok(WizardOutcome::RestartAtBasicInfo);
            }
            None => Addon::new(fields.name.clone()),
        };

        fields.apply_to(&mut addon);
        addon.owner = Some(user);
        let composer_name = match &addon.composer_name {
            Some(name) => name.clone(),
            None => {
                let derived = derive_composer_name(&addon.name);
                addon.composer_name = Some(derived.clone());
                derived
            }
        };

        match self
            .resolver()
            .check(&composer_name, addon.is_repository_linked())
            .await?
        {
            DuplicateCheck::Unique => {}
            DuplicateCheck::Blocking { existing } => {
                return Ok(WizardOutcome::DuplicateName { existing });
            }
            DuplicateCheck::RepositoryAllowed { existing } => {
                // The user meant to import another version of an existing
                // project; drop the half-built draft and send them there.
                self.drafts.delete(&token).await?;
                return Ok(WizardOutcome::DuplicateRepository { existing });
            }
        }

        let next = if addon.is_repository_linked() {
            NextStep::VersionImport
        } else {
            NextStep::VersionCreate
        };
        self.drafts
            .put(&token, &AddonDraft::new(addon, DraftStep::BasicInfoSet))
            .await?;
        info!(token = %token, "Basic info accepted");

        Ok(WizardOutcome::Advanced { token, next })
    }

    /// Import entry point: fetch project metadata from a repository URL and
    /// stage it as a draft for the user to confirm.
    ///
    /// On import failure nothing is stored; the user retries with another
    /// URL.
    pub async fn submit_import_url(
        &self,
        token: Option<DraftToken>,
        source_url: &str,
    ) -> Result<WizardOutcome, WizardError> {
        let user = self.require_user()?;

        let mut addon = self.importer.import_addon(source_url).await?;
        addon.owner = Some(user);

        let token = token.unwrap_or_else(DraftToken::generate);
        self.drafts
            .put(&token, &AddonDraft::new(addon, DraftStep::BasicInfoSet))
            .await?;
        info!(token = %token, "Imported addon staged");

        Ok(WizardOutcome::Advanced {
            token,
            next: NextStep::BasicInfo,
        })
    }

    /// Manual branch: append one version to the draft.
    ///
    /// Versions are append-only within a draft, so this transition also
    /// accepts a draft that is already at `VersionsReady`.
    pub async fn submit_version(
        &self,
        token: &DraftToken,
        fields: &VersionFields,
    ) -> Result<WizardOutcome, WizardError> {
        self.require_user()?;
        fields.validate()?;

        let Some(mut draft) = self.drafts.get(token).await? else {
            debug!(token = %token, "Version submitted with no stored draft");
            return Ok(WizardOutcome::RestartAtBasicInfo);
        };

        draft.addon.versions.push(AddonVersion::from_fields(fields));
        draft.step = DraftStep::VersionsReady;
        self.drafts.put(token, &draft).await?;
        info!(token = %token, version = %fields.version, "Version staged");

        Ok(WizardOutcome::Advanced {
            token: token.clone(),
            next: NextStep::Finish,
        })
    }

    /// Repository branch: replace the draft's versions with the list
    /// enumerated at its linked repository.
    ///
    /// On import failure the stored draft is left exactly as it was, so the
    /// user can retry.
    pub async fn import_versions(&self, token: &DraftToken) -> Result<WizardOutcome, WizardError> {
        self.require_user()?;

        let Some(mut draft) = self.drafts.get(token).await? else {
            debug!(token = %token, "Version import with no stored draft");
            return Ok(WizardOutcome::RestartAtBasicInfo);
        };
        let repository = draft
            .addon
            .repository_url
            .clone()
            .ok_or(ValidationError::MissingRepository)?;

        let versions = self.importer.import_versions(&repository).await?;
        draft.addon.versions = versions;
        draft.step = DraftStep::VersionsReady;
        self.drafts.put(token, &draft).await?;
        info!(token = %token, count = draft.addon.versions.len(), "Imported versions staged");

        Ok(WizardOutcome::Advanced {
            token: token.clone(),
            next: NextStep::Finish,
        })
    }

    /// Commits the draft to the catalog and clears it from the store.
    ///
    /// Re-entering `finish` after the draft is gone (double submit, stale
    /// tab) routes back to the creation entry instead of erroring. A draft
    /// that is not at `VersionsReady` yet is pointed at the step it still
    /// needs. On a persistence failure the draft survives untouched.
    pub async fn finish(&self, token: &DraftToken) -> Result<WizardOutcome, WizardError> {
        let user = self.require_user()?;

        let Some(draft) = self.drafts.get(token).await? else {
            debug!(token = %token, "Finish with no stored draft");
            return Ok(WizardOutcome::RestartAtBasicInfo);
        };

        if draft.step != DraftStep::VersionsReady {
            let next = if draft.addon.is_repository_linked() {
                NextStep::VersionImport
            } else {
                NextStep::VersionCreate
            };
            debug!(token = %token, step = %draft.step, "Finish before versions were staged");
            return Ok(WizardOutcome::Advanced {
                token: token.clone(),
                next,
            });
        }

        let addon_id = commit::commit_draft(&self.dal, &draft.addon, user).await?;
        self.drafts.delete(token).await?;
        info!(token = %token, addon_id = %addon_id, "Addon committed");

        Ok(WizardOutcome::Committed { addon_id })
    }
}
