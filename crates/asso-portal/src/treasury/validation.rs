use super::domain::{
    AgAbsenceReason, Caisse, DisciplineReason, TontineShares, Tranche, TransactionDetails,
    TransactionDraft, TransactionKind, TransactionSubmission, TransactionType,
};
use super::rules::{RequiredField, RuleContext, TransactionRuleTable};

/// Largest amount one transaction may carry. Keeps every caisse sum exact in an `i64`.
pub const MAX_TRANSACTION_AMOUNT: u64 = 1_000_000_000_000;

/// Form errors raised before anything reaches the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("member id is required")]
    MissingMember,
    #[error("unknown transaction type '{0}'")]
    UnknownType(String),
    #[error("{field} is required for {transaction_type} transactions")]
    MissingField {
        transaction_type: TransactionType,
        field: RequiredField,
    },
    #[error("tranche '{0}' must be 1, 2 or 3")]
    InvalidTranche(String),
    #[error("tontine shares must be between 1 and 3 (found {0})")]
    TontineSharesOutOfRange(u32),
    #[error("discipline reason '{0}' must be 'retard' or 'blame'")]
    InvalidDisciplineReason(String),
    #[error("AG absence reason '{0}' must be '1ère' or '2ème'")]
    InvalidAgAbsenceReason(String),
    #[error("amount is required for {0} transactions")]
    MissingAmount(TransactionType),
    #[error("amount {amount} exceeds the per-transaction ceiling of {max}")]
    AmountOutOfRange { amount: u64, max: u64 },
    #[error("a caisse must be selected for {0} transactions")]
    MissingCaisse(TransactionType),
    #[error("{transaction_type} transactions go to {expected}, not {found}")]
    CaisseMismatch {
        transaction_type: TransactionType,
        expected: Caisse,
        found: Caisse,
    },
}

/// Turns a loose submission into a typed draft, filling rule-table defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionValidator;

impl SubmissionValidator {
    pub fn validate(
        &self,
        submission: TransactionSubmission,
    ) -> Result<TransactionDraft, ValidationError> {
        if submission.member_id.0.trim().is_empty() {
            return Err(ValidationError::MissingMember);
        }

        let transaction_type = TransactionType::parse(&submission.transaction_type)
            .ok_or_else(|| ValidationError::UnknownType(submission.transaction_type.clone()))?;

        let kind = kind_from_details(transaction_type, &submission.details)?;
        let defaults =
            TransactionRuleTable::resolve_defaults(transaction_type, &RuleContext::from(&submission.details));

        let caisse = match (defaults.caisse, submission.caisse) {
            (Some(expected), Some(found)) if expected != found => {
                return Err(ValidationError::CaisseMismatch {
                    transaction_type,
                    expected,
                    found,
                })
            }
            (Some(expected), _) => expected,
            (None, Some(found)) => found,
            (None, None) => return Err(ValidationError::MissingCaisse(transaction_type)),
        };

        let amount = submission
            .amount
            .or(defaults.amount)
            .ok_or(ValidationError::MissingAmount(transaction_type))?;
        if amount > MAX_TRANSACTION_AMOUNT {
            return Err(ValidationError::AmountOutOfRange {
                amount,
                max: MAX_TRANSACTION_AMOUNT,
            });
        }

        Ok(TransactionDraft {
            member_id: submission.member_id,
            kind,
            amount,
            caisse,
            date: submission.date,
        })
    }
}

fn kind_from_details(
    transaction_type: TransactionType,
    details: &TransactionDetails,
) -> Result<TransactionKind, ValidationError> {
    let missing = |field| ValidationError::MissingField {
        transaction_type,
        field,
    };

    let kind = match transaction_type {
        TransactionType::InscriptionNouveau => TransactionKind::InscriptionNouveau,
        TransactionType::InscriptionAncien => TransactionKind::InscriptionAncien,
        TransactionType::DroitAdhesion => TransactionKind::DroitAdhesion,
        TransactionType::CotisationSociale => {
            let raw = details
                .tranche_number
                .as_deref()
                .ok_or_else(|| missing(RequiredField::TrancheNumber))?;
            let tranche =
                Tranche::parse(raw).ok_or_else(|| ValidationError::InvalidTranche(raw.to_string()))?;
            TransactionKind::CotisationSociale { tranche }
        }
        TransactionType::Tontine => {
            let raw = details
                .tontine_shares
                .ok_or_else(|| missing(RequiredField::TontineShares))?;
            let shares =
                TontineShares::new(raw).ok_or(ValidationError::TontineSharesOutOfRange(raw))?;
            TransactionKind::Tontine { shares }
        }
        TransactionType::RetraitSocial => {
            let reason = details
                .withdrawal_reason
                .as_deref()
                .map(str::trim)
                .filter(|reason| !reason.is_empty())
                .ok_or_else(|| missing(RequiredField::WithdrawalReason))?;
            TransactionKind::RetraitSocial {
                reason: reason.to_string(),
            }
        }
        TransactionType::Discipline => {
            let raw = details
                .discipline_reason
                .as_deref()
                .ok_or_else(|| missing(RequiredField::DisciplineReason))?;
            let reason = DisciplineReason::parse(raw)
                .ok_or_else(|| ValidationError::InvalidDisciplineReason(raw.to_string()))?;
            TransactionKind::Discipline { reason }
        }
        TransactionType::AbsenceAg => {
            let raw = details
                .ag_absence_reason
                .as_deref()
                .ok_or_else(|| missing(RequiredField::AgAbsenceReason))?;
            let reason = AgAbsenceReason::parse(raw)
                .ok_or_else(|| ValidationError::InvalidAgAbsenceReason(raw.to_string()))?;
            TransactionKind::AbsenceAg { reason }
        }
        TransactionType::AutreDepense => TransactionKind::AutreDepense,
        TransactionType::AutreRevenu => TransactionKind::AutreRevenu,
    };

    Ok(kind)
}
