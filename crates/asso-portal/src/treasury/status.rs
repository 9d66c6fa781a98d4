use super::domain::{Transaction, TransactionKind};
use crate::members::MemberId;
use serde::Serialize;
use std::fmt;

pub const SOCIAL_CONTRIBUTION_TARGET: u64 = 50_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFinancialStatus {
    pub social_contribution_paid_this_year: u64,
    pub tontine_shares_total: u32,
    pub adhesion_paid: bool,
    pub ag_absence_count: u32,
    pub current_year_inscription_up_to_date: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberAlert {
    /// No inscription at all, or the latest one predates the current year.
    InscriptionOutdated { last_year: Option<i32> },
    AdhesionUnpaid,
    SocialContributionIncomplete { paid: u64, target: u64 },
}

impl fmt::Display for MemberAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberAlert::InscriptionOutdated { .. } => f.write_str("inscription annuelle non à jour"),
            MemberAlert::AdhesionUnpaid => f.write_str("droit d'adhésion non payé"),
            MemberAlert::SocialContributionIncomplete { paid, target } => {
                write!(f, "cotisation sociale incomplète : {paid} / {target}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStatusReport {
    pub status: MemberFinancialStatus,
    pub alerts: Vec<MemberAlert>,
}

impl MemberStatusReport {
    pub fn is_compliant(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn to_view(&self, member_id: &MemberId) -> MemberStatusView {
        MemberStatusView {
            member_id: member_id.clone(),
            status: self.status.clone(),
            alerts: self.alerts.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatusView {
    pub member_id: MemberId,
    #[serde(flatten)]
    pub status: MemberFinancialStatus,
    pub alerts: Vec<String>,
}

/// Derives one member's compliance flags for a given year.
#[derive(Debug, Clone, Copy)]
pub struct MemberStatusEvaluator {
    social_contribution_target: u64,
}

impl Default for MemberStatusEvaluator {
    fn default() -> Self {
        Self::new(SOCIAL_CONTRIBUTION_TARGET)
    }
}

impl MemberStatusEvaluator {
    pub fn new(social_contribution_target: u64) -> Self {
        Self {
            social_contribution_target,
        }
    }

    /// Expects only the member's own transactions; the order does not matter.
    pub fn evaluate<'a, I>(&self, member_transactions: I, current_year: i32) -> MemberStatusReport
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut status = MemberFinancialStatus::default();
        let mut last_inscription_year: Option<i32> = None;

        for transaction in member_transactions {
            if transaction.transaction_type().is_inscription() {
                let year = transaction.year();
                last_inscription_year = Some(last_inscription_year.map_or(year, |y| y.max(year)));
            }

            match &transaction.kind {
                TransactionKind::DroitAdhesion => status.adhesion_paid = true,
                TransactionKind::CotisationSociale { .. } if transaction.year() == current_year => {
                    status.social_contribution_paid_this_year = status
                        .social_contribution_paid_this_year
                        .saturating_add(transaction.amount);
                }
                TransactionKind::Tontine { shares } => {
                    status.tontine_shares_total += shares.get();
                }
                TransactionKind::AbsenceAg { .. } => status.ag_absence_count += 1,
                _ => {}
            }
        }

        status.current_year_inscription_up_to_date =
            matches!(last_inscription_year, Some(year) if year >= current_year);

        let mut alerts = Vec::new();
        if !status.current_year_inscription_up_to_date {
            alerts.push(MemberAlert::InscriptionOutdated {
                last_year: last_inscription_year,
            });
        }
        if !status.adhesion_paid {
            alerts.push(MemberAlert::AdhesionUnpaid);
        }
        if status.social_contribution_paid_this_year < self.social_contribution_target {
            alerts.push(MemberAlert::SocialContributionIncomplete {
                paid: status.social_contribution_paid_this_year,
                target: self.social_contribution_target,
            });
        }

        MemberStatusReport { status, alerts }
    }
}

/// Transactions of `member_id` out of the full ledger.
pub fn member_transactions<'a>(
    transactions: &'a [Transaction],
    member_id: &'a MemberId,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions
        .iter()
        .filter(move |transaction| &transaction.member_id == member_id)
}
