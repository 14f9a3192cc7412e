// tests/version_options.rs
mod support;

use chrono::Duration;
use quire_core::application::commands::articles::VersionInput;
use quire_core::application::error::ErrorKind;
use quire_core::domain::article::WorkflowSettings;
use quire_core::domain::signature::SignatureLevelRef;
use support::{TestApp, content, create, fixed_now, input, localized, two_levels};

async fn rejected_with(app: &TestApp, input: VersionInput) -> (ErrorKind, String) {
    let err = app.commands().create(create(input)).await.unwrap_err();
    (err.kind(), err.message())
}

#[tokio::test]
async fn submitted_excludes_signature_level() {
    let app = TestApp::drafting(two_levels());
    let (kind, _) = rejected_with(
        &app,
        VersionInput {
            submitted: true,
            signature_level: Some(SignatureLevelRef::name("L1")),
            ..input("v1")
        },
    )
    .await;
    assert_eq!(kind, ErrorKind::Validation);
    assert_eq!(app.store.transactions(), 0);
}

#[tokio::test]
async fn release_date_needs_the_final_level() {
    let app = TestApp::drafting(two_levels());
    let (kind, message) = rejected_with(
        &app,
        VersionInput {
            released_at: Some(fixed_now() + Duration::days(1)),
            signature_level: Some(SignatureLevelRef::name("L1")),
            ..input("v1")
        },
    )
    .await;
    assert_eq!(kind, ErrorKind::Validation);
    assert!(message.contains("final"));
}

#[tokio::test]
async fn contents_must_be_single_or_localized() {
    let app = TestApp::drafting(vec![]);

    let (kind, _) = rejected_with(
        &app,
        VersionInput {
            contents: vec![content("a", "b"), content("c", "d")],
            ..VersionInput::default()
        },
    )
    .await;
    assert_eq!(kind, ErrorKind::Validation);

    let (kind, message) = rejected_with(
        &app,
        VersionInput {
            contents: vec![localized("en", "a", "b"), localized("EN", "c", "d")],
            ..VersionInput::default()
        },
    )
    .await;
    assert_eq!(kind, ErrorKind::Validation);
    assert_eq!(message, "duplicate content language: en");

    let (kind, _) = rejected_with(
        &app,
        VersionInput {
            contents: vec![localized("x", "a", "b")],
            ..VersionInput::default()
        },
    )
    .await;
    assert_eq!(kind, ErrorKind::Validation);
}

#[tokio::test]
async fn titles_cannot_be_blank() {
    let app = TestApp::drafting(vec![]);
    let (kind, message) = rejected_with(&app, input("   ")).await;
    assert_eq!(kind, ErrorKind::Validation);
    assert_eq!(message, "title cannot be empty");
}

#[tokio::test]
async fn submitting_without_levels_is_disabled() {
    let app = TestApp::drafting(vec![]);
    let (kind, message) = rejected_with(
        &app,
        VersionInput {
            submitted: true,
            ..input("v1")
        },
    )
    .await;
    assert_eq!(kind, ErrorKind::ModeDisabled);
    assert_eq!(message, "signature is disabled");
}

#[tokio::test]
async fn tags_are_normalized() {
    let app = TestApp::new(
        WorkflowSettings {
            draft_mode: false,
            auto_release_after_approved: false,
        },
        vec![],
    );
    let article = app
        .commands()
        .create(create(VersionInput {
            tags: vec![" news ".into(), "news".into(), "".into(), "tech".into()],
            ..input("tagged")
        }))
        .await
        .unwrap();
    assert_eq!(article.tags, vec!["news", "tech"]);
}
