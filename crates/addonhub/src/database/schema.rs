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

//! Diesel table definitions for the catalog schema.

diesel::table! {
    addons (id) {
        id -> BigInt,
        name -> Text,
        composer_name -> Text,
        short_description -> Text,
        description -> Text,
        demo_url -> Nullable<Text>,
        repository_url -> Nullable<Text>,
        owner_id -> BigInt,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    addon_versions (id) {
        id -> BigInt,
        addon_id -> BigInt,
        version -> Text,
        license -> Nullable<Text>,
        filename -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    addon_dependencies (id) {
        id -> BigInt,
        version_id -> BigInt,
        package_name -> Text,
        version_constraint -> Text,
    }
}

diesel::table! {
    tags (id) {
        id -> BigInt,
        name -> Text,
    }
}

diesel::table! {
    addon_tags (id) {
        id -> BigInt,
        addon_id -> BigInt,
        tag_id -> BigInt,
    }
}

diesel::joinable!(addon_versions -> addons (addon_id));
diesel::joinable!(addon_dependencies -> addon_versions (version_id));
diesel::joinable!(addon_tags -> addons (addon_id));
diesel::joinable!(addon_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(
    addons,
    addon_versions,
    addon_dependencies,
    tags,
    addon_tags,
);
