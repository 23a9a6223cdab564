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

//! SQLite row models for the catalog tables.

use diesel::prelude::*;

use crate::auth::UserId;
use crate::database::schema::{addon_dependencies, addon_versions, addons, tags};
use crate::models::addon::{Addon, AddonDependency, AddonId, AddonVersion, Tag};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = addons)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AddonRow {
    pub id: i64,
    pub name: String,
    pub composer_name: String,
    pub short_description: String,
    pub description: String,
    pub demo_url: Option<String>,
    pub repository_url: Option<String>,
    pub owner_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl AddonRow {
    /// Converts to the domain aggregate. Versions are loaded separately via
    /// [`super::addons::AddonsDal::versions_of`].
    pub fn into_addon(self) -> Addon {
        Addon {
            name: self.name,
            short_description: self.short_description,
            description: self.description,
            demo_url: self.demo_url,
            repository_url: self.repository_url,
            composer_name: Some(self.composer_name),
            owner: Some(UserId(self.owner_id)),
            versions: Vec::new(),
            persisted_id: Some(AddonId(self.id)),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = addon_versions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AddonVersionRow {
    pub id: i64,
    pub addon_id: i64,
    pub version: String,
    pub license: Option<String>,
    pub filename: Option<String>,
    pub created_at: String,
}

impl AddonVersionRow {
    pub fn into_version(self, dependencies: Vec<DependencyRow>) -> AddonVersion {
        AddonVersion {
            version: self.version,
            license: self.license,
            filename: self.filename,
            dependencies: dependencies
                .into_iter()
                .map(DependencyRow::into_dependency)
                .collect(),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = addon_dependencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DependencyRow {
    pub id: i64,
    pub version_id: i64,
    pub package_name: String,
    pub version_constraint: String,
}

impl DependencyRow {
    pub fn into_dependency(self) -> AddonDependency {
        AddonDependency {
            package_name: self.package_name,
            version_constraint: self.version_constraint,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TagRow {
    pub id: i64,
    pub name: String,
}

impl TagRow {
    pub fn into_tag(self) -> Tag {
        Tag {
            id: self.id,
            name: self.name,
        }
    }
}
