use super::domain::{Caisse, Transaction};
use super::policy::WithdrawalSign;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalances {
    pub association_budget: i64,
    pub social_contribution_account: i64,
    pub tontine_account: i64,
}

impl AccountBalances {
    pub fn get(&self, caisse: Caisse) -> i64 {
        match caisse {
            Caisse::AssociationBudget => self.association_budget,
            Caisse::SocialContributionAccount => self.social_contribution_account,
            Caisse::TontineAccount => self.tontine_account,
        }
    }

    fn slot_mut(&mut self, caisse: Caisse) -> &mut i64 {
        match caisse {
            Caisse::AssociationBudget => &mut self.association_budget,
            Caisse::SocialContributionAccount => &mut self.social_contribution_account,
            Caisse::TontineAccount => &mut self.tontine_account,
        }
    }

    pub fn total(&self) -> i64 {
        Caisse::ordered()
            .into_iter()
            .fold(0i64, |total, caisse| total.saturating_add(self.get(caisse)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreasurySummary {
    pub balance: AccountBalances,
    pub correlations: BTreeMap<String, f64>,
}

/// Account pairs reported as `numerator / denominator` ratios.
const RATIO_PAIRS: [(&str, Caisse, Caisse); 3] = [
    (
        "socialContributionToBudget",
        Caisse::SocialContributionAccount,
        Caisse::AssociationBudget,
    ),
    (
        "tontineToBudget",
        Caisse::TontineAccount,
        Caisse::AssociationBudget,
    ),
    (
        "tontineToSocialContribution",
        Caisse::TontineAccount,
        Caisse::SocialContributionAccount,
    ),
];

/// Folds the full transaction list into balances; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAggregator {
    withdrawal_sign: WithdrawalSign,
}

impl BalanceAggregator {
    pub fn new(withdrawal_sign: WithdrawalSign) -> Self {
        Self { withdrawal_sign }
    }

    pub fn balances<'a, I>(&self, transactions: I) -> AccountBalances
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut balance = AccountBalances::default();
        for transaction in transactions {
            let slot = balance.slot_mut(transaction.caisse);
            *slot = slot.saturating_add(self.withdrawal_sign.signed_amount(transaction));
        }
        balance
    }

    pub fn compute_summary<'a, I>(&self, transactions: I) -> TreasurySummary
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let balance = self.balances(transactions);
        let correlations = correlations(&balance);
        TreasurySummary {
            balance,
            correlations,
        }
    }
}

/// Summary under the default withdrawal policy.
pub fn compute_summary(transactions: &[Transaction]) -> TreasurySummary {
    BalanceAggregator::default().compute_summary(transactions)
}

fn correlations(balance: &AccountBalances) -> BTreeMap<String, f64> {
    let mut correlations = BTreeMap::new();

    for (label, numerator, denominator) in RATIO_PAIRS {
        let denominator = balance.get(denominator);
        if denominator != 0 {
            correlations.insert(
                label.to_string(),
                balance.get(numerator) as f64 / denominator as f64,
            );
        }
    }

    let total = balance.total();
    if total != 0 {
        for caisse in Caisse::ordered() {
            correlations.insert(
                format!("{}Share", caisse.key()),
                balance.get(caisse) as f64 / total as f64,
            );
        }
    }

    correlations
}
