// src/domain/signature/mod.rs
pub mod chain;
pub mod entity;
pub mod levels;
pub mod repository;

pub use chain::{SigningPlan, plan_signature};
pub use entity::{
    NewSignature, Signature, SignatureId, SignatureLevel, SignatureLevelId, SignatureResult,
};
pub use levels::{SignatureLevelRef, SignatureLevels};
pub use repository::SignatureLevelRepository;
