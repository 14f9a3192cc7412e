// src/domain/signature/repository.rs
use crate::domain::errors::DomainResult;
use crate::domain::signature::entity::SignatureLevel;
use async_trait::async_trait;

#[async_trait]
pub trait SignatureLevelRepository: Send + Sync {
    /// All configured levels, in chain order.
    async fn list_ordered(&self) -> DomainResult<Vec<SignatureLevel>>;
}
