//! Defaulting rules applied when a treasurer picks a transaction type.
//!
//! The table answers three questions for a type: which amount to pre-fill,
//! which caisse receives the money, and which sub-field the form must ask
//! for. Nothing here fails; an unresolvable input simply yields no default.

use super::domain::{
    AgAbsenceReason, Caisse, DisciplineReason, TontineShares, Tranche, TransactionDetails,
    TransactionType,
};
use serde::Serialize;
use std::fmt;

pub const INSCRIPTION_NOUVEAU_FEE: u64 = 5_000;
pub const INSCRIPTION_ANCIEN_FEE: u64 = 2_500;
pub const DROIT_ADHESION_FEE: u64 = 2_500;
pub const TONTINE_SHARE_PRICE: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    TrancheNumber,
    TontineShares,
    WithdrawalReason,
    DisciplineReason,
    AgAbsenceReason,
}

impl RequiredField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::TrancheNumber => "trancheNumber",
            Self::TontineShares => "tontineShares",
            Self::WithdrawalReason => "withdrawalReason",
            Self::DisciplineReason => "disciplineReason",
            Self::AgAbsenceReason => "agAbsenceReason",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Sub-field values available when the defaults are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleContext {
    pub tranche: Option<String>,
    pub shares: Option<u32>,
    pub discipline_reason: Option<String>,
    pub ag_absence_reason: Option<String>,
}

impl From<&TransactionDetails> for RuleContext {
    fn from(details: &TransactionDetails) -> Self {
        Self {
            tranche: details.tranche_number.clone(),
            shares: details.tontine_shares,
            discipline_reason: details.discipline_reason.clone(),
            ag_absence_reason: details.ag_absence_reason.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefaults {
    pub amount: Option<u64>,
    pub caisse: Option<Caisse>,
    pub required_fields: Vec<RequiredField>,
}

pub struct TransactionRuleTable;

impl TransactionRuleTable {
    pub fn resolve_defaults(transaction_type: TransactionType, context: &RuleContext) -> RuleDefaults {
        let amount = match transaction_type {
            TransactionType::InscriptionNouveau => Some(INSCRIPTION_NOUVEAU_FEE),
            TransactionType::InscriptionAncien => Some(INSCRIPTION_ANCIEN_FEE),
            TransactionType::DroitAdhesion => Some(DROIT_ADHESION_FEE),
            TransactionType::CotisationSociale => context
                .tranche
                .as_deref()
                .and_then(Tranche::parse)
                .map(Self::tranche_amount),
            TransactionType::Tontine => context.shares.and_then(Self::tontine_amount),
            TransactionType::Discipline => context
                .discipline_reason
                .as_deref()
                .and_then(DisciplineReason::parse)
                .map(Self::discipline_amount),
            TransactionType::AbsenceAg => context
                .ag_absence_reason
                .as_deref()
                .and_then(AgAbsenceReason::parse)
                .map(Self::ag_absence_amount),
            TransactionType::RetraitSocial
            | TransactionType::AutreDepense
            | TransactionType::AutreRevenu => None,
        };

        RuleDefaults {
            amount,
            caisse: Self::caisse_for(transaction_type),
            required_fields: Self::required_fields(transaction_type).to_vec(),
        }
    }

    /// Same as [`Self::resolve_defaults`] for a raw form key; unknown keys resolve to nothing.
    pub fn resolve_key(key: &str, context: &RuleContext) -> RuleDefaults {
        TransactionType::parse(key)
            .map(|transaction_type| Self::resolve_defaults(transaction_type, context))
            .unwrap_or_default()
    }

    /// Fixed caisse for a type, `None` when the treasurer chooses it.
    pub const fn caisse_for(transaction_type: TransactionType) -> Option<Caisse> {
        match transaction_type {
            TransactionType::InscriptionNouveau
            | TransactionType::InscriptionAncien
            | TransactionType::DroitAdhesion
            | TransactionType::Discipline
            | TransactionType::AbsenceAg => Some(Caisse::AssociationBudget),
            TransactionType::CotisationSociale | TransactionType::RetraitSocial => {
                Some(Caisse::SocialContributionAccount)
            }
            TransactionType::Tontine => Some(Caisse::TontineAccount),
            TransactionType::AutreDepense | TransactionType::AutreRevenu => None,
        }
    }

    pub const fn required_fields(transaction_type: TransactionType) -> &'static [RequiredField] {
        match transaction_type {
            TransactionType::CotisationSociale => &[RequiredField::TrancheNumber],
            TransactionType::Tontine => &[RequiredField::TontineShares],
            TransactionType::RetraitSocial => &[RequiredField::WithdrawalReason],
            TransactionType::Discipline => &[RequiredField::DisciplineReason],
            TransactionType::AbsenceAg => &[RequiredField::AgAbsenceReason],
            TransactionType::InscriptionNouveau
            | TransactionType::InscriptionAncien
            | TransactionType::DroitAdhesion
            | TransactionType::AutreDepense
            | TransactionType::AutreRevenu => &[],
        }
    }

    pub const fn tranche_amount(tranche: Tranche) -> u64 {
        match tranche {
            Tranche::First => 20_000,
            Tranche::Second | Tranche::Third => 15_000,
        }
    }

    /// Price of a tontine contribution; out-of-range share counts leave the amount to the user.
    pub fn tontine_amount(shares: u32) -> Option<u64> {
        TontineShares::new(shares).map(|shares| u64::from(shares.get()) * TONTINE_SHARE_PRICE)
    }

    pub const fn discipline_amount(reason: DisciplineReason) -> u64 {
        match reason {
            DisciplineReason::Retard | DisciplineReason::Blame => 1_000,
        }
    }

    pub const fn ag_absence_amount(reason: AgAbsenceReason) -> u64 {
        match reason {
            AgAbsenceReason::First => 15_000,
            AgAbsenceReason::Second => 25_000,
        }
    }
}
