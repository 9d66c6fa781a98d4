//! Treasury ledger: transaction rules, balances and member compliance.
//!
//! Aggregates are never stored; every summary and member status is
//! recomputed from the current transaction list.

pub mod domain;
pub mod ledger;
mod policy;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;
pub mod status;
pub mod summary;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AgAbsenceReason, Caisse, DisciplineReason, TontineShares, Tranche, Transaction,
    TransactionDetails, TransactionDraft, TransactionId, TransactionKind, TransactionSubmission,
    TransactionType, TransactionView,
};
pub use ledger::{LedgerCsv, LedgerError};
pub use policy::{TreasuryPolicy, WithdrawalSign};
pub use repository::{RepositoryError, TransactionRepository};
pub use router::treasury_router;
pub use rules::{RequiredField, RuleContext, RuleDefaults, TransactionRuleTable};
pub use service::{TreasuryService, TreasuryServiceError};
pub use status::{
    member_transactions, MemberAlert, MemberFinancialStatus, MemberStatusEvaluator,
    MemberStatusReport, MemberStatusView, SOCIAL_CONTRIBUTION_TARGET,
};
pub use summary::{compute_summary, AccountBalances, BalanceAggregator, TreasurySummary};
pub use validation::{SubmissionValidator, ValidationError, MAX_TRANSACTION_AMOUNT};
