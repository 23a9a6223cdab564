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

//! Identity seam for the workflow engine.
//!
//! Authentication itself (sessions, cookies, sign-in) lives outside this
//! crate; the wizard only asks "who is acting right now?" and refuses to
//! start or continue any transition without an answer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an authenticated catalog user.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves the user behind the current request.
pub trait CurrentUser: Send + Sync {
    /// Returns the authenticated user, or `None` for anonymous requests.
    fn current_user(&self) -> Option<UserId>;
}

/// The straightforward provider: whatever the session layer resolved.
#[derive(Debug, Clone, Copy)]
pub struct SessionUser(pub Option<UserId>);

impl CurrentUser for SessionUser {
    fn current_user(&self) -> Option<UserId> {
        self.0
    }
}
