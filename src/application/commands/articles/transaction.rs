// src/application/commands/articles/transaction.rs
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::article::ArticleTransaction,
};

/// Commits on success and rolls back on failure, normalising the error the
/// caller sees.
pub(super) async fn finish<T>(
    tx: Box<dyn ArticleTransaction>,
    outcome: ApplicationResult<T>,
) -> ApplicationResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|err| ApplicationError::from_transaction(err.into()))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(ApplicationError::from_transaction(err))
        }
    }
}
