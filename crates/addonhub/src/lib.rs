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

//! # AddonHub
//!
//! Backend of an addon-catalog site: contributors register addons (name,
//! description, demo link) and attach one or more versions, entered manually
//! or imported from an external source-code repository.
//!
//! The heart of the crate is the **addon-draft wizard**: a resumable,
//! multi-step flow that builds up an addon entry across several requests
//! before committing it to the catalog in a single transaction.
//!
//! ## Architecture
//!
//! - [`models`]: the addon aggregate, versions, dependencies and the draft
//!   record with its explicit step tag.
//! - [`draft_store`]: token-scoped persistence of in-progress drafts.
//! - [`duplicate`]: collision detection on the canonical composer name, with
//!   different outcomes for manual and repository-linked submissions.
//! - [`importer`]: the repository-importer seam plus the orchestrator that
//!   adds URL normalization and timeouts.
//! - [`wizard`]: the state machine sequencing the five creation transitions,
//!   and the transactional commit phase.
//! - [`editor`]: the single-step write-through flow for already-persisted
//!   addons.
//! - [`dal`] / [`database`]: catalog persistence over a pooled SQLite
//!   connection.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use addonhub::{
//!     AddonWizard, BasicInfoFields, Dal, Database, ImportOrchestrator,
//!     MemoryDraftStore, SessionUser, UserId,
//! };
//!
//! # async fn example(importer: impl addonhub::RepositoryImporter) -> Result<(), Box<dyn std::error::Error>> {
//! let database = Database::new("addonhub.db");
//! database.run_migrations().await?;
//!
//! let wizard = AddonWizard::new(
//!     Dal::new(database),
//!     MemoryDraftStore::new(),
//!     ImportOrchestrator::new(importer, Duration::from_secs(30)),
//!     SessionUser(Some(UserId(1))),
//! );
//!
//! let fields = BasicInfoFields {
//!     name: "Live Form Validation".into(),
//!     short_description: "Client-side validation for forms".into(),
//!     description: "Validates forms as the user types.".into(),
//!     demo_url: None,
//! };
//! let outcome = wizard.submit_basic_info(None, &fields).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod dal;
pub mod database;
pub mod draft_store;
pub mod duplicate;
pub mod editor;
pub mod error;
pub mod importer;
pub mod models;
pub mod wizard;

// Re-export commonly used types
pub use auth::{CurrentUser, SessionUser, UserId};
pub use config::{ConfigError, PortalConfig};
pub use dal::Dal;
pub use database::{Database, StorageError};
pub use draft_store::{DraftStore, DraftStoreError, MemoryDraftStore};
pub use duplicate::{DuplicateCheck, DuplicateResolver};
pub use editor::AddonEditor;
pub use error::{ValidationError, WizardError};
pub use importer::{ImportError, ImportOrchestrator, RepositoryImporter};
pub use models::addon::{
    Addon, AddonDependency, AddonId, AddonVersion, BasicInfoFields, Tag, VersionFields,
};
pub use models::draft::{AddonDraft, DraftStep, DraftToken};
pub use wizard::{AddonWizard, CommitError, NextStep, WizardOutcome};
