// src/application/dto/signature_levels.rs
use crate::domain::signature::SignatureLevels;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignatureLevelDto {
    pub id: i64,
    pub name: String,
    pub sequence: i32,
    pub required: bool,
    pub is_final: bool,
}

impl SignatureLevelDto {
    pub fn list(levels: &SignatureLevels) -> Vec<Self> {
        levels
            .iter()
            .enumerate()
            .map(|(index, level)| Self {
                id: level.id.into(),
                name: level.name.clone(),
                sequence: level.sequence,
                required: level.required,
                is_final: levels.is_final(index),
            })
            .collect()
    }
}
