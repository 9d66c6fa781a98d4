use crate::dates::{deserialize_date, empty_string_as_none};
use crate::members::MemberId;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the three accounts a transaction lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Caisse {
    AssociationBudget,
    SocialContributionAccount,
    TontineAccount,
}

impl Caisse {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::AssociationBudget,
            Self::SocialContributionAccount,
            Self::TontineAccount,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::AssociationBudget => "associationBudget",
            Self::SocialContributionAccount => "socialContributionAccount",
            Self::TontineAccount => "tontineAccount",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AssociationBudget => "Budget de l'association",
            Self::SocialContributionAccount => "Caisse sociale",
            Self::TontineAccount => "Caisse tontine",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|caisse| caisse.key().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Caisse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    InscriptionNouveau,
    InscriptionAncien,
    DroitAdhesion,
    CotisationSociale,
    Tontine,
    RetraitSocial,
    Discipline,
    AbsenceAg,
    AutreDepense,
    AutreRevenu,
}

impl TransactionType {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::InscriptionNouveau,
            Self::InscriptionAncien,
            Self::DroitAdhesion,
            Self::CotisationSociale,
            Self::Tontine,
            Self::RetraitSocial,
            Self::Discipline,
            Self::AbsenceAg,
            Self::AutreDepense,
            Self::AutreRevenu,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::InscriptionNouveau => "inscription_nouveau",
            Self::InscriptionAncien => "inscription_ancien",
            Self::DroitAdhesion => "droit_adhesion",
            Self::CotisationSociale => "cotisation_sociale",
            Self::Tontine => "tontine",
            Self::RetraitSocial => "retrait_social",
            Self::Discipline => "discipline",
            Self::AbsenceAg => "absence_ag",
            Self::AutreDepense => "autre_depense",
            Self::AutreRevenu => "autre_revenu",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InscriptionNouveau => "Inscription (nouveau membre)",
            Self::InscriptionAncien => "Inscription (ancien membre)",
            Self::DroitAdhesion => "Droit d'adhésion",
            Self::CotisationSociale => "Cotisation sociale",
            Self::Tontine => "Tontine",
            Self::RetraitSocial => "Retrait social",
            Self::Discipline => "Discipline",
            Self::AbsenceAg => "Absence AG",
            Self::AutreDepense => "Autre dépense",
            Self::AutreRevenu => "Autre revenu",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(raw))
    }

    pub fn is_inscription(self) -> bool {
        self.key().starts_with("inscription_")
    }

    /// Types that move money out of a caisse.
    pub const fn is_outflow(self) -> bool {
        matches!(self, Self::RetraitSocial | Self::AutreDepense)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Installment of the annual social contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tranche {
    First,
    Second,
    Third,
}

impl Tranche {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::First),
            "2" => Some(Self::Second),
            "3" => Some(Self::Third),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisciplineReason {
    Retard,
    Blame,
}

impl DisciplineReason {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "retard" => Some(Self::Retard),
            "blame" | "blâme" => Some(Self::Blame),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Retard => "retard",
            Self::Blame => "blame",
        }
    }
}

/// First or second recorded absence from a general assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgAbsenceReason {
    First,
    Second,
}

impl AgAbsenceReason {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "1ère" | "1ere" | "1re" | "1" | "première" | "premiere" => Some(Self::First),
            "2ème" | "2eme" | "2e" | "2" | "deuxième" | "deuxieme" => Some(Self::Second),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::First => "1ère",
            Self::Second => "2ème",
        }
    }
}

/// Number of tontine shares held in one contribution, always within 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TontineShares(u8);

impl TontineShares {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 3;

    pub fn new(shares: u32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&shares) {
            Some(Self(shares as u8))
        } else {
            None
        }
    }

    pub const fn get(self) -> u32 {
        self.0 as u32
    }
}

/// Transaction type together with the sub-fields that type carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    InscriptionNouveau,
    InscriptionAncien,
    DroitAdhesion,
    CotisationSociale { tranche: Tranche },
    Tontine { shares: TontineShares },
    RetraitSocial { reason: String },
    Discipline { reason: DisciplineReason },
    AbsenceAg { reason: AgAbsenceReason },
    AutreDepense,
    AutreRevenu,
}

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::InscriptionNouveau => TransactionType::InscriptionNouveau,
            Self::InscriptionAncien => TransactionType::InscriptionAncien,
            Self::DroitAdhesion => TransactionType::DroitAdhesion,
            Self::CotisationSociale { .. } => TransactionType::CotisationSociale,
            Self::Tontine { .. } => TransactionType::Tontine,
            Self::RetraitSocial { .. } => TransactionType::RetraitSocial,
            Self::Discipline { .. } => TransactionType::Discipline,
            Self::AbsenceAg { .. } => TransactionType::AbsenceAg,
            Self::AutreDepense => TransactionType::AutreDepense,
            Self::AutreRevenu => TransactionType::AutreRevenu,
        }
    }

    pub fn details(&self) -> TransactionDetails {
        let mut details = TransactionDetails::default();
        match self {
            Self::CotisationSociale { tranche } => {
                details.tranche_number = Some(tranche.number().to_string());
            }
            Self::Tontine { shares } => details.tontine_shares = Some(shares.get()),
            Self::RetraitSocial { reason } => details.withdrawal_reason = Some(reason.clone()),
            Self::Discipline { reason } => {
                details.discipline_reason = Some(reason.key().to_string());
            }
            Self::AbsenceAg { reason } => {
                details.ag_absence_reason = Some(reason.key().to_string());
            }
            Self::InscriptionNouveau
            | Self::InscriptionAncien
            | Self::DroitAdhesion
            | Self::AutreDepense
            | Self::AutreRevenu => {}
        }
        details
    }
}

/// Loose wire shape of the type-specific sub-fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tranche_number: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub withdrawal_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tontine_shares: Option<u32>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub discipline_reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub ag_absence_reason: Option<String>,
}

/// Immutable ledger entry; removed only by deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub member_id: MemberId,
    pub kind: TransactionKind,
    pub amount: u64,
    pub caisse: Caisse,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn to_view(&self) -> TransactionView {
        TransactionView {
            id: self.id.clone(),
            member_id: self.member_id.clone(),
            transaction_type: self.transaction_type(),
            amount: self.amount,
            caisse: self.caisse,
            date: self.date,
            details: self.kind.details(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: TransactionId,
    pub member_id: MemberId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: u64,
    pub caisse: Caisse,
    pub date: NaiveDate,
    pub details: TransactionDetails,
}

/// Inbound form payload before the rule table and validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSubmission {
    pub member_id: MemberId,
    #[serde(rename = "type")]
    pub transaction_type: String,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub caisse: Option<Caisse>,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub details: TransactionDetails,
}

/// Validated transaction still waiting for an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub member_id: MemberId,
    pub kind: TransactionKind,
    pub amount: u64,
    pub caisse: Caisse,
    pub date: NaiveDate,
}

impl TransactionDraft {
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            member_id: self.member_id,
            kind: self.kind,
            amount: self.amount,
            caisse: self.caisse,
            date: self.date,
        }
    }
}
