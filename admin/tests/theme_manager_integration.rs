mod common;

use admin::api::{ApiFailure, ThemeApi};
use admin::config::UploadConfig;
use admin::model::{DocumentKind, DocumentRef, TemplateDescriptor, Theme};
use admin::notify::{CollectingNotifier, Notifier};
use admin::pipeline::{ActivationResult, DeletionResult, UploadResult, UploadState};
use admin::theme_manager::{ThemeCommand, ThemeManager, ThemeResponse};
use claims::{assert_matches, assert_none, assert_some};
use common::{FakeThemeApi, seeded_themes, zip_archive};
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn manager_with(api: Arc<FakeThemeApi>) -> (ThemeManager, Arc<CollectingNotifier>) {
    let notifier = Arc::new(CollectingNotifier::new());
    let dyn_api: Arc<dyn ThemeApi> = api;
    let dyn_notifier: Arc<dyn Notifier> = notifier.clone();
    (
        ThemeManager::new(dyn_api, dyn_notifier, UploadConfig::default()),
        notifier,
    )
}

#[tokio::test]
async fn test_list_labels_disambiguates_packages() {
    let api = Arc::new(FakeThemeApi::with_themes(vec![
        Theme::new("daring", "Daring"),
        Theme::new("daring-0.1.5", "Daring"),
        Theme::new("casper", "Casper").activated(),
        Theme::new("another", "Casper"),
        Theme::new("mine", "Casper"),
        Theme::new("foo", "foo"),
    ]));
    let (manager, _) = manager_with(api);

    match manager.execute_command(ThemeCommand::ListLabels).await {
        ThemeResponse::Labels { labels } => {
            let names: Vec<_> = labels.iter().map(|l| l.label.as_str()).collect();
            assert_eq!(
                names,
                vec![
                    "Casper (another)",
                    "Casper (default)",
                    "Casper (mine)",
                    "Daring (daring)",
                    "Daring (daring-0.1.5)",
                    "foo"
                ]
            );
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_templates_follow_active_theme() {
    let api = Arc::new(FakeThemeApi::with_themes(vec![
        Theme::new("casper", "casper").activated().with_templates(vec![
            TemplateDescriptor::new("post-one", "One", [DocumentKind::Post]).restricted_to("one"),
        ]),
    ]));
    let (manager, _) = manager_with(api);

    let response = manager
        .execute_command(ThemeCommand::ResolveTemplates {
            document: DocumentRef::post("one"),
        })
        .await;

    match response {
        ThemeResponse::Templates { selection } => {
            let selection = assert_some!(selection);
            assert_eq!(assert_some!(selection.locked).filename, "post-one");
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_templates_hidden_without_active_theme() {
    let api = Arc::new(FakeThemeApi::with_themes(vec![Theme::new("casper", "casper")]));
    let (manager, _) = manager_with(api);

    let response = manager
        .execute_command(ThemeCommand::ResolveTemplates {
            document: DocumentRef::page("about"),
        })
        .await;

    assert_matches!(response, ThemeResponse::Templates { selection: None });
}

#[tokio::test]
async fn test_upload_over_existing_theme_needs_confirmation() {
    let api = Arc::new(FakeThemeApi::with_themes(seeded_themes()));
    let (manager, _) = manager_with(api.clone());

    let first = manager
        .execute_command(ThemeCommand::Upload {
            archive: zip_archive("test-1.zip", b"pk"),
            overwrite: false,
            activate: false,
        })
        .await;
    assert_matches!(first, ThemeResponse::OverwriteConfirmationRequired { .. });
    assert_eq!(api.upload_calls.load(Ordering::SeqCst), 0);

    let second = manager
        .execute_command(ThemeCommand::Upload {
            archive: zip_archive("test-1.zip", b"pk"),
            overwrite: true,
            activate: false,
        })
        .await;
    assert_matches!(
        second,
        ThemeResponse::Uploaded {
            result: UploadResult::Success { .. },
            activation: None
        }
    );
    assert_eq!(manager.upload_pipeline().state().await, UploadState::Idle);
}

#[tokio::test]
async fn test_upload_and_activate_in_one_command() {
    let api = Arc::new(FakeThemeApi::with_themes(seeded_themes()));
    let (manager, _) = manager_with(api);

    let response = manager
        .execute_command(ThemeCommand::Upload {
            archive: zip_archive("theme-1.zip", b"pk"),
            overwrite: false,
            activate: true,
        })
        .await;

    assert_matches!(
        response,
        ThemeResponse::Uploaded {
            activation: Some(ActivationResult::Success { .. }),
            ..
        }
    );
    assert_eq!(manager.registry().active().await.unwrap().id, "theme-1");
    assert_none!(manager.get_last_error().await);
}

#[tokio::test]
async fn test_failed_upload_is_remembered_and_pipeline_reset() {
    let api = Arc::new(FakeThemeApi::with_themes(seeded_themes()));
    api.fail_uploads(ApiFailure::message(Some(500), "Disk full"));
    let (manager, notifier) = manager_with(api);

    let response = manager
        .execute_command(ThemeCommand::Upload {
            archive: zip_archive("theme-1.zip", b"pk"),
            overwrite: false,
            activate: true,
        })
        .await;

    assert!(response.is_error());
    assert_eq!(manager.get_last_error().await.as_deref(), Some("Disk full"));
    assert_eq!(notifier.drain().len(), 1);
    assert_eq!(manager.upload_pipeline().state().await, UploadState::Idle);
}

#[tokio::test]
async fn test_delete_refuses_active_theme_before_listing_was_read() {
    let api = Arc::new(FakeThemeApi::with_themes(seeded_themes()));
    let (manager, _) = manager_with(api.clone());

    let response = manager
        .execute_command(ThemeCommand::Delete {
            id: "casper".to_string(),
        })
        .await;

    assert_matches!(
        response,
        ThemeResponse::Deleted {
            result: DeletionResult::Failed { .. }
        }
    );
    assert_eq!(api.delete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_listing_failure_is_error_response() {
    let api = Arc::new(FakeThemeApi::default());
    api.fail_listing(ApiFailure::Network {
        reason: "offline".to_string(),
    });
    let (manager, _) = manager_with(api);

    let response = manager.execute_command(ThemeCommand::RefreshThemes).await;

    assert_matches!(response, ThemeResponse::Error { .. });
    assert_some!(manager.get_last_error().await);
}

#[tokio::test]
async fn test_delete_is_refused_when_listing_fails() {
    let api = Arc::new(FakeThemeApi::with_themes(vec![
        Theme::new("casper", "Casper"),
        Theme::new("test-1", "theme-test").activated(),
    ]));
    api.fail_listing(ApiFailure::Network {
        reason: "offline".to_string(),
    });
    let (manager, _) = manager_with(api.clone());

    let response = manager
        .execute_command(ThemeCommand::Delete {
            id: "test-1".to_string(),
        })
        .await;

    assert_matches!(
        response,
        ThemeResponse::Deleted {
            result: DeletionResult::Failed { .. }
        }
    );
    assert_eq!(api.delete_calls.load(Ordering::SeqCst), 0);
    assert_eq!(api.installed_ids(), vec!["casper", "test-1"]);
    assert_some!(manager.get_last_error().await);
}
