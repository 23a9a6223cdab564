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

//! The draft record and its session token.
//!
//! A draft is an addon-in-progress keyed by an opaque token. The wizard's
//! position in the flow is an explicit [`DraftStep`] tag stored alongside the
//! aggregate, validated on every transition; the "no draft yet" and
//! "committed" positions are represented by the record's absence from the
//! store.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::addon::Addon;

/// Token entropy in bytes. 16 bytes = 128 bits, comfortably past the point
/// where collisions between wizard sessions are a practical concern.
const TOKEN_BYTES: usize = 16;

/// Opaque, URL-safe identifier of one wizard session.
///
/// Generated once on the first wizard interaction and carried by the caller
/// (e.g. as a route parameter) across requests until the draft is committed
/// or abandoned.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct DraftToken(String);

impl DraftToken {
    /// Generates a fresh token from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A string did not look like a generated draft token.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a valid draft token: {0:?}")]
pub struct InvalidDraftToken(pub String);

impl FromStr for DraftToken {
    type Err = InvalidDraftToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| InvalidDraftToken(s.to_string()))?;
        if decoded.len() != TOKEN_BYTES {
            return Err(InvalidDraftToken(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

/// Where a stored draft stands in the creation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftStep {
    /// Basic info is in place (entered manually or imported); no versions yet.
    BasicInfoSet,
    /// At least one version is staged; the draft is ready to finish.
    VersionsReady,
}

impl DraftStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStep::BasicInfoSet => "BasicInfoSet",
            DraftStep::VersionsReady => "VersionsReady",
        }
    }
}

impl fmt::Display for DraftStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An addon-in-progress, serialized explicitly into the draft store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonDraft {
    pub addon: Addon,
    pub step: DraftStep,
}

impl AddonDraft {
    pub fn new(addon: Addon, step: DraftStep) -> Self {
        Self { addon, step }
    }
}
