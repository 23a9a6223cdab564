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

//! Token-scoped persistence of in-progress drafts.
//!
//! The store owns a draft for the lifetime of its token; the wizard borrows
//! it per request and writes it back at the end of the request. Concurrent
//! requests with the same token are last-write-wins; a creation wizard does
//! not warrant locking.
//!
//! A missing token on read means "no draft yet", never an error — the wizard
//! relies on that to route expired sessions back to the entry point.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::draft::{AddonDraft, DraftToken};

/// Errors raised by draft store implementations.
#[derive(Debug, Error)]
pub enum DraftStoreError {
    /// The draft record could not be serialized or deserialized.
    #[error("draft serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store failed.
    #[error("draft store backend error: {0}")]
    Backend(String),
}

/// Key/value persistence of drafts, scoped to a session token.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Returns the draft stored under `token`, or `None` if there is none.
    async fn get(&self, token: &DraftToken) -> Result<Option<AddonDraft>, DraftStoreError>;

    /// Stores `draft` under `token`, replacing any previous record.
    async fn put(&self, token: &DraftToken, draft: &AddonDraft) -> Result<(), DraftStoreError>;

    /// Removes the draft stored under `token`. Removing an absent draft is
    /// not an error.
    async fn delete(&self, token: &DraftToken) -> Result<(), DraftStoreError>;
}

struct StoredDraft {
    /// Explicitly serialized draft record.
    payload: String,
    stored_at: DateTime<Utc>,
}

/// In-memory draft store.
///
/// Drafts are kept as JSON payloads rather than live objects, so a record
/// survives exactly what its schema says and nothing else. Abandoned drafts
/// stay until [`MemoryDraftStore::evict_older_than`] reclaims them.
#[derive(Default)]
pub struct MemoryDraftStore {
    entries: RwLock<HashMap<String, StoredDraft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes drafts stored longer ago than `ttl`; returns how many went.
    pub fn evict_older_than(&self, ttl: Duration) -> usize {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            // A TTL too large for the calendar expires nothing.
            return 0;
        };
        let cutoff = Utc::now() - ttl;
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, stored| stored.stored_at > cutoff);
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted expired drafts");
        }
        evicted
    }

    /// Number of drafts currently held.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn get(&self, token: &DraftToken) -> Result<Option<AddonDraft>, DraftStoreError> {
        let entries = self.entries.read();
        match entries.get(token.as_str()) {
            Some(stored) => Ok(Some(serde_json::from_str(&stored.payload)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, token: &DraftToken, draft: &AddonDraft) -> Result<(), DraftStoreError> {
        let payload = serde_json::to_string(draft)?;
        self.entries.write().insert(
            token.as_str().to_string(),
            StoredDraft {
                payload,
                stored_at: Utc::now(),
            },
        );
        tracing::debug!(token = %token, step = %draft.step, "Draft stored");
        Ok(())
    }

    async fn delete(&self, token: &DraftToken) -> Result<(), DraftStoreError> {
        self.entries.write().remove(token.as_str());
        Ok(())
    }
}
