// src/application/commands/articles/signature.rs
use chrono::{DateTime, Utc};

use super::{
    ArticleCommandService,
    placement::retire,
    transaction::finish,
};
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
        stage_context::StageContext,
        stage_hints::StageHints,
    },
    domain::{
        article::{
            ArticleId, ArticleTransaction, Stage, StageInput, Stamp, VersionKey, VersionNumber,
            VersionStateUpdate,
        },
        errors::DomainError,
        signature::{NewSignature, SignatureLevelRef, SignatureResult, plan_signature},
        user::UserId,
    },
};

#[derive(Debug, Clone, Default)]
pub struct SignatureCommand {
    pub id: i64,
    pub version: i32,
    pub signature_level: Option<SignatureLevelRef>,
    pub signer_id: Option<i64>,
    pub reject_reason: Option<String>,
}

/// A resolved signing attempt.
#[derive(Debug, Clone)]
pub(super) struct SigningRequest {
    pub key: VersionKey,
    pub level_index: usize,
    pub result: SignatureResult,
    pub signer: Option<UserId>,
    pub reject_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SigningOutcome {
    pub auto_released: bool,
}

impl ArticleCommandService {
    pub async fn approve_version(
        &self,
        command: SignatureCommand,
        hints: &mut StageHints,
    ) -> ApplicationResult<ArticleDto> {
        self.signature(SignatureResult::Approved, command, hints).await
    }

    pub async fn reject_version(
        &self,
        command: SignatureCommand,
        hints: &mut StageHints,
    ) -> ApplicationResult<ArticleDto> {
        self.signature(SignatureResult::Rejected, command, hints).await
    }

    async fn signature(
        &self,
        result: SignatureResult,
        command: SignatureCommand,
        hints: &mut StageHints,
    ) -> ApplicationResult<ArticleDto> {
        let ctx = self.stage_context().await?;
        if !ctx.signature_enabled() {
            return Err(DomainError::signature_disabled().into());
        }

        let id = ArticleId::new(command.id)?;
        let key = VersionKey::new(id, VersionNumber::new(command.version)?);
        let level_index = ctx.levels.resolve(command.signature_level.as_ref())?;
        let now = self.clock.now();

        let produced = produced_stage(&ctx, result, level_index, now);
        let mut displaced: Vec<_> = self
            .probe_placed(&ctx, id, produced, Some(level_index), now)
            .await
            .into_iter()
            .collect();
        let may_auto_release = result == SignatureResult::Approved
            && ctx.levels.is_final(level_index)
            && ctx.settings.draft_mode
            && ctx.settings.auto_release_after_approved;
        let released = if may_auto_release {
            self.probe_placed(&ctx, id, Stage::Released, None, now).await
        } else {
            None
        };

        let request = SigningRequest {
            key,
            level_index,
            result,
            signer: command.signer_id.map(UserId::new).transpose()?,
            reject_reason: command.reject_reason,
        };

        let mut tx = self.store.begin().await?;
        let outcome = async {
            let outcome = sign_in_transaction(tx.as_mut(), &ctx, &request, now).await?;
            if outcome.auto_released {
                displaced.extend(released);
            }
            retire(tx.as_mut(), &displaced, Some(key), now).await?;
            Ok::<_, ApplicationError>(outcome)
        }
        .await;
        let outcome = finish(tx, outcome).await?;

        tracing::info!(
            article_id = %id,
            version = %key.version,
            result = %result,
            auto_released = outcome.auto_released,
            "version signed"
        );

        let record = self.queries.load_record(key, now).await?;
        let stage = ctx.stage_of(&record.version, &record.signatures, now);
        hints.record(key, stage);
        Ok(ArticleDto::from_record(record, stage))
    }
}

/// Stage the signed version will occupy, used to find the version it
/// displaces.
fn produced_stage(
    ctx: &StageContext,
    result: SignatureResult,
    level_index: usize,
    now: DateTime<Utc>,
) -> Stage {
    match result {
        SignatureResult::Approved => {
            let name = ctx.levels.get(level_index).map(|level| level.name.as_str());
            ctx.resolver().resolve(
                StageInput {
                    signature_level: name,
                    ..StageInput::default()
                },
                now,
            )
        }
        SignatureResult::Rejected => Stage::Draft,
    }
}

/// Locks the version's signatures, checks the chain and records the new
/// signature. Does not commit; the caller owns `tx`.
pub(super) async fn sign_in_transaction(
    tx: &mut dyn ArticleTransaction,
    ctx: &StageContext,
    request: &SigningRequest,
    now: DateTime<Utc>,
) -> ApplicationResult<SigningOutcome> {
    let version = tx
        .lock_version(request.key)
        .await?
        .ok_or_else(|| DomainError::Conflict("Invalid article version".into()))?;

    let signatures = tx.lock_signatures(request.key).await?;
    let plan = plan_signature(&ctx.levels, request.level_index, &signatures)?;

    if let Some(superseded) = plan.supersede {
        tx.soft_delete_signature(superseded, now).await?;
    }

    let reject_reason = match request.result {
        SignatureResult::Rejected => request
            .reject_reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .map(str::to_string),
        SignatureResult::Approved => None,
    };

    tx.insert_signature(NewSignature {
        key: request.key,
        level_id: plan.level_id,
        result: request.result,
        signer_id: request.signer,
        reject_reason,
        signed_at: now,
    })
    .await?;

    let mut update = VersionStateUpdate::new(request.key);
    if ctx.settings.draft_mode && request.result == SignatureResult::Rejected {
        update = update.with_submission(None);
    }
    let auto_released = ctx.settings.draft_mode
        && ctx.settings.auto_release_after_approved
        && request.result == SignatureResult::Approved
        && plan.is_final
        && version.released_at.is_none();
    if auto_released {
        update = update.with_release(Some(Stamp::new(now, request.signer)));
    }
    if !update.is_empty() {
        tx.update_version_state(update).await?;
    }

    Ok(SigningOutcome { auto_released })
}
