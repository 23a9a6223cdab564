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

//! Data Access Layer for the catalog database.
//!
//! Row models use SQLite-compatible types (RFC3339 text timestamps) and are
//! converted to domain types at this boundary.

pub mod addons;
pub mod models;

use crate::database::Database;

/// Entry point to the catalog's data access operations.
#[derive(Clone, Debug)]
pub struct Dal {
    /// Database connection pool shared by all accessors.
    pub database: Database,
}

impl Dal {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Addon table operations.
    pub fn addons(&self) -> addons::AddonsDal<'_> {
        addons::AddonsDal { dal: self }
    }
}
