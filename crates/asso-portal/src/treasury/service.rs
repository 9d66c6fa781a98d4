use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{Transaction, TransactionId, TransactionSubmission};
use super::policy::TreasuryPolicy;
use super::repository::{RepositoryError, TransactionRepository};
use super::rules::{RuleContext, RuleDefaults, TransactionRuleTable};
use super::status::{MemberStatusEvaluator, MemberStatusReport};
use super::summary::{BalanceAggregator, TreasurySummary};
use super::validation::{SubmissionValidator, ValidationError};
use crate::members::{DirectoryError, Member, MemberDirectory, MemberId};

const MAX_ID_ATTEMPTS: usize = 64;

/// Service composing validation, storage, the members directory and the derived views.
pub struct TreasuryService<R, M> {
    validator: SubmissionValidator,
    repository: Arc<R>,
    members: Arc<M>,
    aggregator: BalanceAggregator,
    evaluator: MemberStatusEvaluator,
    sequence: AtomicU64,
}

impl<R, M> TreasuryService<R, M>
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    pub fn new(repository: Arc<R>, members: Arc<M>, policy: TreasuryPolicy) -> Self {
        Self {
            validator: SubmissionValidator,
            repository,
            members,
            aggregator: BalanceAggregator::new(policy.withdrawal_sign),
            evaluator: MemberStatusEvaluator::new(policy.social_contribution_target),
            sequence: AtomicU64::new(1),
        }
    }

    fn next_transaction_id(&self) -> TransactionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        TransactionId(format!("txn-{id:06}"))
    }

    /// Full ledger ordered by date, then id.
    pub fn transactions(&self) -> Result<Vec<Transaction>, TreasuryServiceError> {
        let mut transactions = self.repository.list()?;
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(transactions)
    }

    /// Validate a submission and append it to the ledger.
    pub fn record(
        &self,
        submission: TransactionSubmission,
    ) -> Result<Transaction, TreasuryServiceError> {
        let draft = self.validator.validate(submission)?;

        if self.members.fetch(&draft.member_id)?.is_none() {
            return Err(TreasuryServiceError::UnknownMember(draft.member_id));
        }

        for _ in 0..MAX_ID_ATTEMPTS {
            let transaction = draft.clone().into_transaction(self.next_transaction_id());
            match self.repository.insert(transaction) {
                Ok(stored) => {
                    info!(
                        transaction_id = %stored.id,
                        member_id = %stored.member_id,
                        transaction_type = %stored.transaction_type(),
                        amount = stored.amount,
                        caisse = %stored.caisse,
                        "treasury transaction recorded"
                    );
                    return Ok(stored);
                }
                Err(RepositoryError::Conflict) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Err(RepositoryError::Conflict.into())
    }

    /// Load already-identified transactions, e.g. from a ledger export.
    pub fn import(&self, transactions: Vec<Transaction>) -> Result<usize, TreasuryServiceError> {
        let mut imported = 0;
        for transaction in transactions {
            match self.repository.insert(transaction) {
                Ok(stored) => {
                    debug!(transaction_id = %stored.id, "ledger transaction imported");
                    imported += 1;
                }
                Err(RepositoryError::Conflict) => {
                    warn!("duplicate ledger transaction skipped");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(imported)
    }

    pub fn delete(&self, id: &TransactionId) -> Result<Transaction, TreasuryServiceError> {
        let removed = self.repository.delete(id)?;
        info!(
            transaction_id = %removed.id,
            amount = removed.amount,
            caisse = %removed.caisse,
            "treasury transaction deleted"
        );
        Ok(removed)
    }

    /// Balances and correlations recomputed from the current ledger.
    pub fn summary(&self) -> Result<TreasurySummary, TreasuryServiceError> {
        let transactions = self.repository.list()?;
        Ok(self.aggregator.compute_summary(&transactions))
    }

    pub fn member_status(
        &self,
        member_id: &MemberId,
        current_year: i32,
    ) -> Result<MemberStatusReport, TreasuryServiceError> {
        if self.members.fetch(member_id)?.is_none() {
            return Err(TreasuryServiceError::UnknownMember(member_id.clone()));
        }

        let transactions = self.repository.for_member(member_id)?;
        Ok(self.evaluator.evaluate(&transactions, current_year))
    }

    pub fn members(&self) -> Result<Vec<Member>, TreasuryServiceError> {
        Ok(self.members.list()?)
    }

    /// Form pre-fill for a raw transaction type key.
    pub fn defaults(&self, transaction_type: &str, context: &RuleContext) -> RuleDefaults {
        TransactionRuleTable::resolve_key(transaction_type, context)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TreasuryServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unknown member '{0}'")]
    UnknownMember(MemberId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
