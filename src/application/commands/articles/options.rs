// src/application/commands/articles/options.rs
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        stage_context::StageContext,
    },
    domain::{
        article::{ArticleTitle, LanguageCode, NewArticleContent, Stage, StageInput},
        signature::SignatureLevelRef,
    },
};

#[derive(Debug, Clone, Default)]
pub struct ContentCommand {
    pub language: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub body: String,
}

/// Caller-supplied description of a new version.
#[derive(Debug, Clone, Default)]
pub struct VersionInput {
    pub tags: Vec<String>,
    pub contents: Vec<ContentCommand>,
    pub submitted: bool,
    pub signature_level: Option<SignatureLevelRef>,
    pub released_at: Option<DateTime<Utc>>,
}

/// A validated `VersionInput` with every default applied.
#[derive(Debug, Clone)]
pub(super) struct VersionPlan {
    pub target: Stage,
    /// Stages whose current occupant the new version displaces.
    pub displaces: Vec<Stage>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub released_at: Option<DateTime<Utc>>,
    /// Level to approve the new version at, inside the same transaction.
    pub sign_at: Option<usize>,
    pub tags: Vec<String>,
    pub contents: Vec<NewArticleContent>,
}

impl VersionInput {
    pub(super) fn plan(&self, ctx: &StageContext, now: DateTime<Utc>) -> ApplicationResult<VersionPlan> {
        if self.submitted && self.signature_level.is_some() {
            return Err(ApplicationError::validation(
                "submitted cannot be combined with signatureLevel",
            ));
        }

        let explicit_level = self
            .signature_level
            .as_ref()
            .map(|reference| ctx.levels.resolve(Some(reference)))
            .transpose()?;

        if self.released_at.is_some()
            && explicit_level.is_some_and(|index| !ctx.levels.is_final(index))
        {
            return Err(ApplicationError::validation(
                "releasedAt can only be combined with the final signatureLevel",
            ));
        }

        let level_name = explicit_level
            .and_then(|index| ctx.levels.get(index))
            .map(|level| level.name.as_str());
        let target = ctx.resolver().resolve(
            StageInput {
                submitted: self.submitted,
                released_at: self.released_at,
                signature_level: level_name,
            },
            now,
        );
        ctx.resolver().ensure_enabled(target)?;

        let sign_at = sign_level_rule(explicit_level, self.released_at, ctx);
        let submitted_at = submitted_at_rule(self, now);
        let released_at = released_at_rule(self.released_at, target, now);

        let mut displaces = vec![target];
        displaces.extend(displaced_by_release(released_at, now));
        let auto_release = sign_at.is_some_and(|index| ctx.levels.is_final(index))
            && ctx.settings.draft_mode
            && ctx.settings.auto_release_after_approved
            && released_at.is_none();
        if auto_release {
            displaces.push(Stage::Released);
        }
        let mut seen = HashSet::new();
        displaces.retain(|stage| seen.insert(*stage));

        Ok(VersionPlan {
            target,
            displaces,
            submitted_at,
            released_at,
            sign_at,
            tags: normalize_tags(&self.tags),
            contents: build_contents(&self.contents)?,
        })
    }
}

/// Level to sign at, by priority: the caller's level, then the final level
/// when a release date was given and signing is enabled.
fn sign_level_rule(
    explicit: Option<usize>,
    released_at: Option<DateTime<Utc>>,
    ctx: &StageContext,
) -> Option<usize> {
    match (explicit, released_at) {
        (Some(index), _) => Some(index),
        (None, Some(_)) if ctx.signature_enabled() => ctx.levels.len().checked_sub(1),
        _ => None,
    }
}

/// `submittedAt` is stamped when the caller submits, names a level or sets a
/// release date.
fn submitted_at_rule(input: &VersionInput, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match (input.submitted, &input.signature_level, input.released_at) {
        (true, _, _) | (_, Some(_), _) | (_, _, Some(_)) => Some(now),
        _ => None,
    }
}

/// `releasedAt` is the caller's date, else now when the version lands in
/// RELEASED directly.
fn released_at_rule(
    requested: Option<DateTime<Utc>>,
    target: Stage,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (requested, target) {
        (Some(at), _) => Some(at),
        (None, Stage::Released) => Some(now),
        _ => None,
    }
}

/// A dated version takes over the public stages. A future date retires the
/// scheduled and the released occupant alike.
fn displaced_by_release(released_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Vec<Stage> {
    match released_at {
        Some(at) if at > now => vec![Stage::Scheduled, Stage::Released],
        Some(_) => vec![Stage::Released],
        None => Vec::new(),
    }
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_string()))
        .map(str::to_string)
        .collect()
}

/// Either a single untranslated content or one content per distinct
/// language.
fn build_contents(contents: &[ContentCommand]) -> ApplicationResult<Vec<NewArticleContent>> {
    let localized = contents.iter().filter(|c| c.language.is_some()).count();
    if localized > 0 && localized != contents.len() {
        return Err(ApplicationError::validation(
            "either every content or none must declare a language",
        ));
    }
    if localized == 0 && contents.len() > 1 {
        return Err(ApplicationError::validation(
            "multiple contents require a language each",
        ));
    }

    let mut languages = HashSet::new();
    contents
        .iter()
        .map(|content| {
            let language = content.language.clone().map(LanguageCode::new).transpose()?;
            if let Some(language) = &language {
                if !languages.insert(language.clone()) {
                    return Err(ApplicationError::validation(format!(
                        "duplicate content language: {language}"
                    )));
                }
            }
            Ok(NewArticleContent {
                language,
                title: ArticleTitle::new(content.title.clone())?,
                description: content
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string),
                body: content.body.clone(),
            })
        })
        .collect()
}
