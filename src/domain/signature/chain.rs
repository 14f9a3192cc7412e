// src/domain/signature/chain.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::signature::entity::{Signature, SignatureId, SignatureLevelId, SignatureResult};
use crate::domain::signature::levels::SignatureLevels;

/// What a signing attempt will do once the version's signatures are locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningPlan {
    pub level_index: usize,
    pub level_id: SignatureLevelId,
    /// A rejected signature at the same level that the new one replaces.
    pub supersede: Option<SignatureId>,
    pub is_final: bool,
}

/// Checks a signing attempt at `level_index` against the live signatures of
/// the version.
pub fn plan_signature(
    levels: &SignatureLevels,
    level_index: usize,
    signatures: &[Signature],
) -> DomainResult<SigningPlan> {
    let level = levels
        .get(level_index)
        .ok_or_else(|| DomainError::Validation("Invalid signature level".into()))?;

    let occupant = signatures
        .iter()
        .find(|signature| signature.is_live() && signature.level_id == Some(level.id));

    let supersede = match occupant {
        Some(existing) if existing.result == SignatureResult::Rejected => Some(existing.id),
        Some(_) => return Err(DomainError::Conflict("Already signed".into())),
        None => None,
    };

    if let Some(previous) = levels.nearest_required_before(level_index) {
        let previous_id = levels
            .get(previous)
            .map(|previous| previous.id)
            .ok_or_else(|| DomainError::Validation("Invalid signature level".into()))?;
        let approved = signatures
            .iter()
            .any(|signature| signature.is_live_approval_at(previous_id));
        if !approved {
            return Err(DomainError::InvalidState(
                "Previous valid signature not found".into(),
            ));
        }
    }

    Ok(SigningPlan {
        level_index,
        level_id: level.id,
        supersede,
        is_final: levels.is_final(level_index),
    })
}
