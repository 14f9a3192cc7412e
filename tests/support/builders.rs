// tests/support/builders.rs
use chrono::{DateTime, Utc};

use quire_core::application::commands::articles::{
    AddVersionCommand, ContentCommand, CreateArticleCommand, SignatureCommand, VersionInput,
};
use quire_core::domain::signature::SignatureLevelRef;

use super::mocks::level;
use quire_core::domain::signature::SignatureLevel;

/// L1 (required) then L2 (final, required).
pub fn two_levels() -> Vec<SignatureLevel> {
    vec![level(1, "L1", 10, true), level(2, "L2", 20, true)]
}

pub fn content(title: &str, body: &str) -> ContentCommand {
    ContentCommand {
        language: None,
        title: title.into(),
        description: None,
        body: body.into(),
    }
}

pub fn localized(language: &str, title: &str, body: &str) -> ContentCommand {
    ContentCommand {
        language: Some(language.into()),
        ..content(title, body)
    }
}

pub fn input(title: &str) -> VersionInput {
    VersionInput {
        contents: vec![content(title, "body")],
        ..VersionInput::default()
    }
}

pub fn dated(title: &str, released_at: DateTime<Utc>) -> VersionInput {
    VersionInput {
        released_at: Some(released_at),
        ..input(title)
    }
}

pub fn create(input: VersionInput) -> CreateArticleCommand {
    CreateArticleCommand {
        user_id: Some(7),
        categories: Vec::new(),
        input,
    }
}

pub fn add_version(id: i64, input: VersionInput) -> AddVersionCommand {
    AddVersionCommand {
        id,
        user_id: Some(7),
        categories: None,
        input,
    }
}

pub fn sign(id: i64, version: i32, level: &str) -> SignatureCommand {
    SignatureCommand {
        id,
        version,
        signature_level: Some(SignatureLevelRef::name(level)),
        signer_id: Some(11),
        reject_reason: None,
    }
}
