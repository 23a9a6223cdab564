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

//! Catalog browsing surface: search, tag filtering, version/dependency
//! lookups and download-URL derivation over persisted addons.

use diesel::prelude::*;

use crate::fixtures::{seed_addon, test_context, TestContext, TEST_USER};
use addonhub::database::schema::{addon_tags, addon_versions, tags};
use addonhub::models::addon::derive_composer_name;
use addonhub::{Addon, AddonDependency, AddonId, AddonVersion};

async fn create_tag(ctx: &TestContext, name: &str) -> i64 {
    let conn = ctx.database.conn().await.unwrap();
    let name = name.to_string();
    conn.interact(move |conn| {
        diesel::insert_into(tags::table)
            .values(tags::name.eq(&name))
            .returning(tags::id)
            .get_result::<i64>(conn)
    })
    .await
    .unwrap()
    .unwrap()
}

async fn tag_addon(ctx: &TestContext, addon_id: AddonId, tag_id: i64) {
    let conn = ctx.database.conn().await.unwrap();
    conn.interact(move |conn| {
        diesel::insert_into(addon_tags::table)
            .values((
                addon_tags::addon_id.eq(addon_id.0),
                addon_tags::tag_id.eq(tag_id),
            ))
            .execute(conn)
    })
    .await
    .unwrap()
    .unwrap();
}

#[tokio::test]
async fn search_matches_names_and_short_descriptions() {
    let ctx = test_context("search_matches_names_and_short_descriptions").await;
    seed_addon(&ctx, "Menu Control", None, &["1.0"]).await;
    seed_addon(&ctx, "Data Grid", None, &["1.0"]).await;

    let hits = ctx.dal.addons().search("Menu").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Menu Control");

    // The fixture writes "<name> seeded" as the short description.
    let hits = ctx.dal.addons().search("seeded").await.unwrap();
    assert_eq!(hits.len(), 2);

    assert!(ctx.dal.addons().search("zzz").await.unwrap().is_empty());
}

#[tokio::test]
async fn tag_filtering_and_lookup() {
    let ctx = test_context("tag_filtering_and_lookup").await;
    let tagged = seed_addon(&ctx, "Forms Helper", None, &["1.0"]).await;
    seed_addon(&ctx, "Unrelated", None, &["1.0"]).await;

    let forms = create_tag(&ctx, "forms").await;
    tag_addon(&ctx, tagged, forms).await;

    let hits = ctx.dal.addons().filter_by_tag(forms).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].persisted_id, Some(tagged));

    let tags = ctx.dal.addons().tags_of(tagged).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "forms");
}

#[tokio::test]
async fn versions_carry_their_dependencies_in_order() {
    let ctx = test_context("versions_carry_their_dependencies_in_order").await;

    let mut addon = Addon::new("Depends");
    addon.short_description = "has dependencies".to_string();
    addon.description = "long".to_string();
    addon.versions = vec![AddonVersion {
        version: "1.0".to_string(),
        license: Some("MIT".to_string()),
        filename: None,
        dependencies: vec![
            AddonDependency {
                package_name: "vendor/base".to_string(),
                version_constraint: ">=2.0".to_string(),
            },
            AddonDependency {
                package_name: "vendor/util".to_string(),
                version_constraint: "~1.1".to_string(),
            },
        ],
    }];

    let id = ctx
        .dal
        .addons()
        .insert_with_versions(&addon, &derive_composer_name(&addon.name), TEST_USER)
        .await
        .unwrap();

    let versions = ctx.dal.addons().versions_of(id).await.unwrap();
    assert_eq!(versions.len(), 1);
    let names: Vec<&str> = versions[0]
        .dependencies
        .iter()
        .map(|d| d.package_name.as_str())
        .collect();
    assert_eq!(names, ["vendor/base", "vendor/util"]);

    // The same list is reachable by version id.
    let conn = ctx.database.conn().await.unwrap();
    let version_id: i64 = conn
        .interact(move |conn| {
            addon_versions::table
                .filter(addon_versions::addon_id.eq(id.0))
                .select(addon_versions::id)
                .first(conn)
        })
        .await
        .unwrap()
        .unwrap();
    // The pool holds a single connection; release it before dependencies_of
    // checks one out, or the size-1 pool would deadlock.
    drop(conn);
    let deps = ctx.dal.addons().dependencies_of(version_id).await.unwrap();
    assert_eq!(deps, versions[0].dependencies);
}

#[tokio::test]
async fn download_urls_derive_per_branch() {
    let ctx = test_context("download_urls_derive_per_branch").await;
    let upload_base = "https://cdn.example/files";

    let linked = seed_addon(&ctx, "Proj", Some("https://git.example/proj"), &["2.0"]).await;
    let linked_addon = ctx.dal.addons().find_by_id(linked).await.unwrap().unwrap();
    let linked_versions = ctx.dal.addons().versions_of(linked).await.unwrap();
    assert_eq!(
        linked_addon.zip_url(&linked_versions[0], upload_base),
        Some("https://git.example/proj/zipball/2.0".to_string())
    );

    let mut manual = Addon::new("Uploads");
    manual.short_description = "manual".to_string();
    manual.description = "manual".to_string();
    manual.versions = vec![AddonVersion {
        version: "2.0".to_string(),
        license: None,
        filename: Some("proj-2.0.zip".to_string()),
        dependencies: Vec::new(),
    }];
    let manual_id = ctx
        .dal
        .addons()
        .insert_with_versions(&manual, &derive_composer_name(&manual.name), TEST_USER)
        .await
        .unwrap();

    let manual_addon = ctx
        .dal
        .addons()
        .find_by_id(manual_id)
        .await
        .unwrap()
        .unwrap();
    let manual_versions = ctx.dal.addons().versions_of(manual_id).await.unwrap();
    assert_eq!(
        manual_addon.zip_url(&manual_versions[0], upload_base),
        Some("https://cdn.example/files/proj-2.0.zip".to_string())
    );
}
