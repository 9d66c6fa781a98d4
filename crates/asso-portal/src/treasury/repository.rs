use super::domain::{Transaction, TransactionId};
use crate::members::MemberId;

/// Storage abstraction so the service can be exercised in isolation.
pub trait TransactionRepository: Send + Sync {
    fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError>;
    /// Removes the transaction and hands it back; `NotFound` when the id is unknown.
    fn delete(&self, id: &TransactionId) -> Result<Transaction, RepositoryError>;
    fn list(&self) -> Result<Vec<Transaction>, RepositoryError>;
    fn for_member(&self, member_id: &MemberId) -> Result<Vec<Transaction>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("transaction already exists")]
    Conflict,
    #[error("transaction not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
