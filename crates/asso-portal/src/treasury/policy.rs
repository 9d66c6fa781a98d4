use super::domain::Transaction;
use super::status::SOCIAL_CONTRIBUTION_TARGET;

/// How outflow-type amounts (`retrait_social`, `autre_depense`) affect their caisse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WithdrawalSign {
    /// Every amount is added to its caisse, matching the ledgers kept so far.
    #[default]
    AsRecorded,
    /// Outflow amounts are subtracted from their caisse.
    Debit,
}

impl WithdrawalSign {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "as_recorded" | "as-recorded" | "credit" => Some(Self::AsRecorded),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }

    pub fn signed_amount(self, transaction: &Transaction) -> i64 {
        let amount = i64::try_from(transaction.amount).unwrap_or(i64::MAX);
        match self {
            Self::Debit if transaction.transaction_type().is_outflow() => -amount,
            _ => amount,
        }
    }
}

/// Association-level dials for the treasury computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreasuryPolicy {
    pub withdrawal_sign: WithdrawalSign,
    pub social_contribution_target: u64,
}

impl Default for TreasuryPolicy {
    fn default() -> Self {
        Self {
            withdrawal_sign: WithdrawalSign::default(),
            social_contribution_target: SOCIAL_CONTRIBUTION_TARGET,
        }
    }
}
