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

//! Addon table operations.
//!
//! The one write that matters is [`AddonsDal::insert_with_versions`]: an
//! addon and all of its staged versions and dependencies land in a single
//! transaction, or none of them do.

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::auth::UserId;
use crate::dal::models::{AddonRow, AddonVersionRow, DependencyRow, TagRow};
use crate::dal::Dal;
use crate::database::schema::{addon_dependencies, addon_tags, addon_versions, addons, tags};
use crate::database::StorageError;
use crate::models::addon::{
    Addon, AddonDependency, AddonId, AddonVersion, BasicInfoFields, Tag,
};

/// Addon table operations.
pub struct AddonsDal<'a> {
    /// Reference to the main DAL instance
    pub dal: &'a Dal,
}

impl<'a> AddonsDal<'a> {
    /// Looks up a persisted addon by its canonical composer name.
    pub async fn find_by_composer_name(
        &self,
        composer_name: &str,
    ) -> Result<Option<Addon>, StorageError> {
        let conn = self.dal.database.conn().await?;
        let composer_name = composer_name.to_string();

        let row: Option<AddonRow> = conn
            .interact(move |conn| {
                addons::table
                    .filter(addons::composer_name.eq(&composer_name))
                    .select(AddonRow::as_select())
                    .first::<AddonRow>(conn)
                    .optional()
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(row.map(AddonRow::into_addon))
    }

    /// Looks up a persisted addon by id. Versions are not loaded; use
    /// [`Self::versions_of`] when they are needed.
    pub async fn find_by_id(&self, id: AddonId) -> Result<Option<Addon>, StorageError> {
        let conn = self.dal.database.conn().await?;

        let row: Option<AddonRow> = conn
            .interact(move |conn| {
                addons::table
                    .find(id.0)
                    .select(AddonRow::as_select())
                    .first::<AddonRow>(conn)
                    .optional()
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(row.map(AddonRow::into_addon))
    }

    /// Persists an addon together with its staged versions and their
    /// dependencies in one transaction.
    ///
    /// If any insert fails, the whole unit rolls back: no addon row without
    /// versions, no version rows without a parent.
    pub async fn insert_with_versions(
        &self,
        addon: &Addon,
        composer_name: &str,
        owner: UserId,
    ) -> Result<AddonId, StorageError> {
        let conn = self.dal.database.conn().await?;
        let addon = addon.clone();
        let composer_name = composer_name.to_string();
        let composer_name_for_error = composer_name.clone();

        let addon_id = conn
            .interact(move |conn| {
                conn.transaction::<i64, diesel::result::Error, _>(|conn| {
                    let now = Utc::now().to_rfc3339();

                    let addon_id: i64 = diesel::insert_into(addons::table)
                        .values((
                            addons::name.eq(&addon.name),
                            addons::composer_name.eq(&composer_name),
                            addons::short_description.eq(&addon.short_description),
                            addons::description.eq(&addon.description),
                            addons::demo_url.eq(addon.demo_url.as_deref()),
                            addons::repository_url.eq(addon.repository_url.as_deref()),
                            addons::owner_id.eq(owner.0),
                            addons::created_at.eq(&now),
                            addons::updated_at.eq(&now),
                        ))
                        .returning(addons::id)
                        .get_result(conn)?;

                    for version in &addon.versions {
                        let version_id: i64 = diesel::insert_into(addon_versions::table)
                            .values((
                                addon_versions::addon_id.eq(addon_id),
                                addon_versions::version.eq(&version.version),
                                addon_versions::license.eq(version.license.as_deref()),
                                addon_versions::filename.eq(version.filename.as_deref()),
                                addon_versions::created_at.eq(&now),
                            ))
                            .returning(addon_versions::id)
                            .get_result(conn)?;

                        for dependency in &version.dependencies {
                            diesel::insert_into(addon_dependencies::table)
                                .values((
                                    addon_dependencies::version_id.eq(version_id),
                                    addon_dependencies::package_name.eq(&dependency.package_name),
                                    addon_dependencies::version_constraint
                                        .eq(&dependency.version_constraint),
                                ))
                                .execute(conn)?;
                        }
                    }

                    Ok(addon_id)
                })
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))?
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _info) => {
                    StorageError::ComposerNameTaken(composer_name_for_error)
                }
                other => StorageError::Query(other),
            })?;

        tracing::info!(addon_id, "Addon persisted with staged versions");
        Ok(AddonId(addon_id))
    }

    /// Rewrites the basic-info fields of a persisted addon (edit flow).
    ///
    /// Returns `false` when the id does not resolve to a row.
    pub async fn update_basic_info(
        &self,
        id: AddonId,
        fields: &BasicInfoFields,
    ) -> Result<bool, StorageError> {
        let conn = self.dal.database.conn().await?;
        let fields = fields.clone();

        let affected = conn
            .interact(move |conn| {
                diesel::update(addons::table.find(id.0))
                    .set((
                        addons::name.eq(&fields.name),
                        addons::short_description.eq(&fields.short_description),
                        addons::description.eq(&fields.description),
                        addons::demo_url.eq(fields.demo_url.as_deref()),
                        addons::updated_at.eq(Utc::now().to_rfc3339()),
                    ))
                    .execute(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(affected > 0)
    }

    /// Persisted addons carrying the given tag.
    pub async fn filter_by_tag(&self, tag_id: i64) -> Result<Vec<Addon>, StorageError> {
        let conn = self.dal.database.conn().await?;

        let rows: Vec<AddonRow> = conn
            .interact(move |conn| {
                let tagged = addon_tags::table
                    .filter(addon_tags::tag_id.eq(tag_id))
                    .select(addon_tags::addon_id);
                addons::table
                    .filter(addons::id.eq_any(tagged))
                    .order(addons::name.asc())
                    .select(AddonRow::as_select())
                    .load::<AddonRow>(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(rows.into_iter().map(AddonRow::into_addon).collect())
    }

    /// Substring search over addon names and short descriptions.
    pub async fn search(&self, needle: &str) -> Result<Vec<Addon>, StorageError> {
        let conn = self.dal.database.conn().await?;
        let pattern = format!("%{}%", needle);

        let rows: Vec<AddonRow> = conn
            .interact(move |conn| {
                addons::table
                    .filter(
                        addons::name
                            .like(&pattern)
                            .or(addons::short_description.like(&pattern)),
                    )
                    .order(addons::name.asc())
                    .select(AddonRow::as_select())
                    .load::<AddonRow>(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(rows.into_iter().map(AddonRow::into_addon).collect())
    }

    /// Versions of a persisted addon in insertion order, with dependencies.
    pub async fn versions_of(&self, id: AddonId) -> Result<Vec<AddonVersion>, StorageError> {
        let conn = self.dal.database.conn().await?;

        let versions = conn
            .interact(move |conn| -> Result<Vec<AddonVersion>, diesel::result::Error> {
                let version_rows: Vec<AddonVersionRow> = addon_versions::table
                    .filter(addon_versions::addon_id.eq(id.0))
                    .order(addon_versions::id.asc())
                    .select(AddonVersionRow::as_select())
                    .load::<AddonVersionRow>(conn)?;

                let mut versions = Vec::with_capacity(version_rows.len());
                for row in version_rows {
                    let dependencies: Vec<DependencyRow> = addon_dependencies::table
                        .filter(addon_dependencies::version_id.eq(row.id))
                        .order(addon_dependencies::id.asc())
                        .select(DependencyRow::as_select())
                        .load::<DependencyRow>(conn)?;
                    versions.push(row.into_version(dependencies));
                }
                Ok(versions)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(versions)
    }

    /// Dependencies of one persisted version, in declaration order.
    pub async fn dependencies_of(
        &self,
        version_id: i64,
    ) -> Result<Vec<AddonDependency>, StorageError> {
        let conn = self.dal.database.conn().await?;

        let rows: Vec<DependencyRow> = conn
            .interact(move |conn| {
                addon_dependencies::table
                    .filter(addon_dependencies::version_id.eq(version_id))
                    .order(addon_dependencies::id.asc())
                    .select(DependencyRow::as_select())
                    .load::<DependencyRow>(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(rows.into_iter().map(DependencyRow::into_dependency).collect())
    }

    /// Tags attached to a persisted addon.
    pub async fn tags_of(&self, id: AddonId) -> Result<Vec<Tag>, StorageError> {
        let conn = self.dal.database.conn().await?;

        let rows: Vec<TagRow> = conn
            .interact(move |conn| {
                tags::table
                    .inner_join(addon_tags::table)
                    .filter(addon_tags::addon_id.eq(id.0))
                    .order(tags::name.asc())
                    .select(TagRow::as_select())
                    .load::<TagRow>(conn)
            })
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        Ok(rows.into_iter().map(TagRow::into_tag).collect())
    }
}
