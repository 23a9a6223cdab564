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

//! End-to-end coverage of the wizard transitions: both creation branches,
//! duplicate handling, re-entry guards and the edit flow.

use crate::fixtures::{
    anonymous, basic_info, imported_addon, release, seed_addon, test_context, version_fields,
    wizard, wizard_as, FakeImporter,
};
use addonhub::{
    AddonEditor, AddonId, DraftStep, DraftStore, DraftToken, DuplicateCheck, DuplicateResolver,
    NextStep, WizardError, WizardOutcome,
};

fn advanced(outcome: WizardOutcome) -> (DraftToken, NextStep) {
    match outcome {
        WizardOutcome::Advanced { token, next } => (token, next),
        other => panic!("expected Advanced, got {:?}", other),
    }
}

#[tokio::test]
async fn manual_branch_creates_an_addon() {
    let ctx = test_context("manual_branch_creates_an_addon").await;
    let wizard = wizard(&ctx, FakeImporter::default());

    let (token, next) = advanced(
        wizard
            .submit_basic_info(None, &basic_info("Live Form Validation"))
            .await
            .unwrap(),
    );
    assert_eq!(next, NextStep::VersionCreate);

    let (_, next) = advanced(
        wizard
            .submit_version(&token, &version_fields("1.0"))
            .await
            .unwrap(),
    );
    assert_eq!(next, NextStep::Finish);

    let addon_id = match wizard.finish(&token).await.unwrap() {
        WizardOutcome::Committed { addon_id } => addon_id,
        other => panic!("expected Committed, got {:?}", other),
    };

    let persisted = ctx
        .dal
        .addons()
        .find_by_composer_name("live-form-validation")
        .await
        .unwrap()
        .expect("addon should be persisted");
    assert_eq!(persisted.persisted_id, Some(addon_id));
    assert_eq!(persisted.name, "Live Form Validation");
    assert!(!persisted.is_repository_linked());

    let versions = ctx.dal.addons().versions_of(addon_id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, "1.0");
    assert_eq!(versions[0].filename.as_deref(), Some("pkg-1.0.zip"));

    // The committed draft is gone from the store.
    assert!(wizard.drafts().is_empty());
}

#[tokio::test]
async fn repository_branch_imports_and_creates_an_addon() {
    let ctx = test_context("repository_branch_imports_and_creates_an_addon").await;
    let importer = FakeImporter {
        addon: Some(imported_addon("Nette Menu")),
        versions: Some(vec![release("v1.0"), release("v1.1"), release("v0.9")]),
    };
    let wizard = wizard(&ctx, importer);

    let (token, next) = advanced(
        wizard
            .submit_import_url(None, "https://git.example/vendor/nette-menu.git")
            .await
            .unwrap(),
    );
    assert_eq!(next, NextStep::BasicInfo);

    // The user confirms the imported basic info; the branch now steers to
    // version import.
    let (token, next) = advanced(
        wizard
            .submit_basic_info(Some(token), &basic_info("Nette Menu"))
            .await
            .unwrap(),
    );
    assert_eq!(next, NextStep::VersionImport);

    let (token, next) = advanced(wizard.import_versions(&token).await.unwrap());
    assert_eq!(next, NextStep::Finish);

    let addon_id = match wizard.finish(&token).await.unwrap() {
        WizardOutcome::Committed { addon_id } => addon_id,
        other => panic!("expected Committed, got {:?}", other),
    };

    let persisted = ctx
        .dal
        .addons()
        .find_by_id(addon_id)
        .await
        .unwrap()
        .expect("addon should be persisted");
    assert_eq!(
        persisted.repository_url.as_deref(),
        Some("https://git.example/vendor/nette-menu")
    );

    // Source ordering is preserved: no re-sorting happened anywhere.
    let versions = ctx.dal.addons().versions_of(addon_id).await.unwrap();
    let version_strings: Vec<&str> = versions.iter().map(|v| v.version.as_str()).collect();
    assert_eq!(version_strings, ["v1.0", "v1.1", "v0.9"]);
}

#[tokio::test]
async fn resolver_distinguishes_manual_from_repository_candidates() {
    let ctx = test_context("resolver_distinguishes_manual_from_repository_candidates").await;
    let existing = seed_addon(&ctx, "Nette Menu", None, &["1.0"]).await;
    let resolver = DuplicateResolver::new(&ctx.dal);

    assert_eq!(
        resolver.check("nette-menu", false).await.unwrap(),
        DuplicateCheck::Blocking { existing }
    );
    assert_eq!(
        resolver.check("nette-menu", true).await.unwrap(),
        DuplicateCheck::RepositoryAllowed { existing }
    );
    assert_eq!(
        resolver.check("something-else", false).await.unwrap(),
        DuplicateCheck::Unique
    );
}

#[tokio::test]
async fn duplicate_name_blocks_manual_submission() {
    let ctx = test_context("duplicate_name_blocks_manual_submission").await;
    let existing = seed_addon(&ctx, "Nette Menu", None, &["1.0"]).await;

    let wizard = wizard(&ctx, FakeImporter::default());
    let outcome = wizard
        .submit_basic_info(None, &basic_info("Nette Menu"))
        .await
        .unwrap();

    assert_eq!(outcome, WizardOutcome::DuplicateName { existing });
    // Nothing was stored for this token.
    assert!(wizard.drafts().is_empty());
}

#[tokio::test]
async fn duplicate_of_repository_candidate_redirects_to_import() {
    let ctx = test_context("duplicate_of_repository_candidate_redirects_to_import").await;
    let existing = seed_addon(&ctx, "Nette Menu", None, &["1.0"]).await;

    let importer = FakeImporter {
        addon: Some(imported_addon("Nette Menu")),
        versions: None,
    };
    let wizard = wizard(&ctx, importer);

    let (token, _) = advanced(
        wizard
            .submit_import_url(None, "https://git.example/vendor/nette-menu")
            .await
            .unwrap(),
    );

    let outcome = wizard
        .submit_basic_info(Some(token.clone()), &basic_info("Nette Menu"))
        .await
        .unwrap();

    assert_eq!(outcome, WizardOutcome::DuplicateRepository { existing });
    // The soft-allow path leaves no draft behind.
    assert!(wizard.drafts().get(&token).await.unwrap().is_none());
    assert!(wizard.drafts().is_empty());
}

#[tokio::test]
async fn finish_twice_is_idempotent() {
    let ctx = test_context("finish_twice_is_idempotent").await;
    let wizard = wizard(&ctx, FakeImporter::default());

    let (token, _) = advanced(
        wizard
            .submit_basic_info(None, &basic_info("Twice"))
            .await
            .unwrap(),
    );
    advanced(
        wizard
            .submit_version(&token, &version_fields("1.0"))
            .await
            .unwrap(),
    );
    assert!(matches!(
        wizard.finish(&token).await.unwrap(),
        WizardOutcome::Committed { .. }
    ));

    // The second finish finds no draft and routes back to the entry point.
    assert_eq!(
        wizard.finish(&token).await.unwrap(),
        WizardOutcome::RestartAtBasicInfo
    );
}

#[tokio::test]
async fn transitions_without_a_draft_restart_the_flow() {
    let ctx = test_context("transitions_without_a_draft_restart_the_flow").await;
    let wizard = wizard(&ctx, FakeImporter::default());
    let stale = DraftToken::generate();

    assert_eq!(
        wizard.finish(&stale).await.unwrap(),
        WizardOutcome::RestartAtBasicInfo
    );
    assert_eq!(
        wizard
            .submit_version(&stale, &version_fields("1.0"))
            .await
            .unwrap(),
        WizardOutcome::RestartAtBasicInfo
    );
    assert_eq!(
        wizard.import_versions(&stale).await.unwrap(),
        WizardOutcome::RestartAtBasicInfo
    );
}

#[tokio::test]
async fn failed_version_import_leaves_the_draft_untouched() {
    let ctx = test_context("failed_version_import_leaves_the_draft_untouched").await;
    let importer = FakeImporter {
        addon: Some(imported_addon("Nette Menu")),
        versions: None, // the source dies after the metadata import
    };
    let wizard = wizard(&ctx, importer);

    let (token, _) = advanced(
        wizard
            .submit_import_url(None, "https://git.example/vendor/nette-menu")
            .await
            .unwrap(),
    );
    let (token, _) = advanced(
        wizard
            .submit_basic_info(Some(token), &basic_info("Nette Menu"))
            .await
            .unwrap(),
    );

    let before = wizard.drafts().get(&token).await.unwrap().unwrap();
    let before_json = serde_json::to_string(&before).unwrap();

    let result = wizard.import_versions(&token).await;
    assert!(matches!(result, Err(WizardError::Import(_))));

    let after = wizard.drafts().get(&token).await.unwrap().unwrap();
    assert_eq!(after, before);
    assert_eq!(serde_json::to_string(&after).unwrap(), before_json);
    assert_eq!(after.step, DraftStep::BasicInfoSet);
}

#[tokio::test]
async fn failed_addon_import_stores_nothing() {
    let ctx = test_context("failed_addon_import_stores_nothing").await;
    let wizard = wizard(&ctx, FakeImporter::default()); // unreachable source

    let result = wizard
        .submit_import_url(None, "https://git.example/vendor/gone")
        .await;
    assert!(matches!(result, Err(WizardError::Import(_))));
    assert!(wizard.drafts().is_empty());
}

#[tokio::test]
async fn version_import_needs_a_linked_repository() {
    let ctx = test_context("version_import_needs_a_linked_repository").await;
    let wizard = wizard(&ctx, FakeImporter::default());

    let (token, _) = advanced(
        wizard
            .submit_basic_info(None, &basic_info("Manual Only"))
            .await
            .unwrap(),
    );

    let result = wizard.import_versions(&token).await;
    assert!(matches!(result, Err(WizardError::Validation(_))));
}

#[tokio::test]
async fn finish_before_versions_points_at_the_missing_step() {
    let ctx = test_context("finish_before_versions_points_at_the_missing_step").await;
    let wizard = wizard(&ctx, FakeImporter::default());

    let (token, _) = advanced(
        wizard
            .submit_basic_info(None, &basic_info("Eager"))
            .await
            .unwrap(),
    );

    let (_, next) = advanced(wizard.finish(&token).await.unwrap());
    assert_eq!(next, NextStep::VersionCreate);
}

#[tokio::test]
async fn anonymous_requests_are_refused() {
    let ctx = test_context("anonymous_requests_are_refused").await;
    let wizard = wizard_as(&ctx, FakeImporter::default(), anonymous());

    let result = wizard.submit_basic_info(None, &basic_info("Nope")).await;
    assert!(matches!(result, Err(WizardError::AuthorizationRequired)));

    let result = wizard.finish(&DraftToken::generate()).await;
    assert!(matches!(result, Err(WizardError::AuthorizationRequired)));
    assert!(wizard.drafts().is_empty());
}

#[tokio::test]
async fn editing_a_persisted_addon_writes_through() {
    let ctx = test_context("editing_a_persisted_addon_writes_through").await;
    let id = seed_addon(&ctx, "Old Name", None, &["1.0"]).await;

    let editor = AddonEditor::new(ctx.dal.clone(), crate::fixtures::signed_in_user());
    let loaded = editor.load(id).await.unwrap();
    assert_eq!(loaded.name, "Old Name");

    editor.update(id, &basic_info("New Name")).await.unwrap();

    let reloaded = editor.load(id).await.unwrap();
    assert_eq!(reloaded.name, "New Name");
    // The composer name is untouched by edits.
    assert_eq!(reloaded.composer_name.as_deref(), Some("old-name"));
}

#[tokio::test]
async fn editing_an_unknown_addon_fails() {
    let ctx = test_context("editing_an_unknown_addon_fails").await;
    let editor = AddonEditor::new(ctx.dal.clone(), crate::fixtures::signed_in_user());

    let missing = AddonId(4242);
    assert!(matches!(
        editor.load(missing).await,
        Err(WizardError::AddonNotFound { id }) if id == missing
    ));
    assert!(matches!(
        editor.update(missing, &basic_info("Whatever")).await,
        Err(WizardError::AddonNotFound { id }) if id == missing
    ));
}

#[tokio::test]
async fn edit_revalidates_like_the_creation_form() {
    let ctx = test_context("edit_revalidates_like_the_creation_form").await;
    let id = seed_addon(&ctx, "Valid", None, &["1.0"]).await;

    let editor = AddonEditor::new(ctx.dal.clone(), crate::fixtures::signed_in_user());
    let mut fields = basic_info("Valid");
    fields.name = "   ".to_string();

    assert!(matches!(
        editor.update(id, &fields).await,
        Err(WizardError::Validation(_))
    ));
}
