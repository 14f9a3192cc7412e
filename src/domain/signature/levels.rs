// src/domain/signature/levels.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::signature::entity::{Signature, SignatureLevel, SignatureLevelId, SignatureResult};

/// A level reference as supplied by a caller: by id or by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureLevelRef {
    Id(SignatureLevelId),
    Name(String),
}

impl SignatureLevelRef {
    pub fn name(value: impl Into<String>) -> Self {
        Self::Name(value.into())
    }
}

/// The configured approval chain, ordered by sequence then id. The last
/// entry is the final level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureLevels {
    levels: Vec<SignatureLevel>,
}

impl SignatureLevels {
    pub fn new(mut levels: Vec<SignatureLevel>) -> Self {
        levels.sort_by_key(|level| (level.sequence, i64::from(level.id)));
        Self { levels }
    }

    pub fn is_enabled(&self) -> bool {
        !self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SignatureLevel> {
        self.levels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignatureLevel> {
        self.levels.iter()
    }

    pub fn final_level(&self) -> Option<&SignatureLevel> {
        self.levels.last()
    }

    pub fn final_level_name(&self) -> Option<&str> {
        self.final_level().map(|level| level.name.as_str())
    }

    pub fn is_final(&self, index: usize) -> bool {
        index + 1 == self.levels.len()
    }

    pub fn index_of(&self, id: SignatureLevelId) -> Option<usize> {
        self.levels.iter().position(|level| level.id == id)
    }

    /// Turns a caller's reference into an index into the chain. Without a
    /// reference the single configured level is implied.
    pub fn resolve(&self, reference: Option<&SignatureLevelRef>) -> DomainResult<usize> {
        if !self.is_enabled() {
            return Err(DomainError::signature_disabled());
        }
        let found = match reference {
            None if self.levels.len() == 1 => Some(0),
            None => {
                return Err(DomainError::Validation(
                    "Signature level is required".into(),
                ));
            }
            Some(SignatureLevelRef::Id(id)) => self.index_of(*id),
            Some(SignatureLevelRef::Name(name)) => {
                self.levels.iter().position(|level| level.name == *name)
            }
        };
        found.ok_or_else(|| DomainError::Validation("Invalid signature level".into()))
    }

    /// Index of the closest required level strictly before `index`.
    pub fn nearest_required_before(&self, index: usize) -> Option<usize> {
        self.levels[..index.min(self.levels.len())]
            .iter()
            .rposition(|level| level.required)
    }

    /// The level a version counts as approved at: the final level when it
    /// holds a live approval, otherwise the furthest approved level.
    pub fn effective_level<'a>(&'a self, signatures: &[Signature]) -> Option<&'a SignatureLevel> {
        self.levels.iter().rev().find(|level| {
            signatures.iter().any(|signature| {
                signature.is_live()
                    && signature.result == SignatureResult::Approved
                    && signature.level_id == Some(level.id)
            })
        })
    }
}
