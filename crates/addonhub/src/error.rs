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

//! Error taxonomy for the wizard and edit flows.
//!
//! Duplicate-name outcomes are deliberately *not* errors: the wizard branches
//! on [`crate::duplicate::DuplicateCheck`] and reports them through
//! [`crate::wizard::WizardOutcome`]. Only failures travel this channel.

use thiserror::Error;

use crate::database::StorageError;
use crate::draft_store::DraftStoreError;
use crate::importer::ImportError;
use crate::models::addon::AddonId;
use crate::wizard::CommitError;

/// Field-level validation failures.
///
/// The form layer is expected to reject malformed input before the workflow
/// engine is invoked; these variants are the engine's own line of defense for
/// the invariants it cannot live without.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty or whitespace-only.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// Version import was requested for a draft without a linked repository.
    #[error("draft has no linked repository to import versions from")]
    MissingRepository,
}

/// Errors surfaced by wizard transitions and the edit flow.
#[derive(Debug, Error)]
pub enum WizardError {
    /// No authenticated user; the caller should redirect to sign-in.
    #[error("sign in to manage addons")]
    AuthorizationRequired,

    /// Field-level failure; surfaced inline on the form, no state change.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Import failure; the stored draft is left exactly as it was.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Commit failure; the draft is preserved so the user can retry.
    #[error(transparent)]
    Commit(#[from] CommitError),

    /// Edit flow only: the addon identifier does not resolve.
    #[error("addon {id} does not exist")]
    AddonNotFound { id: AddonId },

    /// Draft store failure (serialization or backend).
    #[error(transparent)]
    DraftStore(#[from] DraftStoreError),

    /// Catalog storage failure outside of commit (lookups, edit writes).
    #[error(transparent)]
    Storage(#[from] StorageError),
}
