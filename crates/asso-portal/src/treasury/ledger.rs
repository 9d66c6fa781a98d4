use super::domain::{
    Caisse, Transaction, TransactionDetails, TransactionId, TransactionSubmission,
};
use super::validation::{SubmissionValidator, ValidationError};
use crate::dates::{empty_string_as_none, parse_date};
use crate::members::MemberId;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug)]
pub enum LedgerError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidDate { line: u64, message: String },
    InvalidCaisse { line: u64, value: String },
    InvalidNumber { line: u64, column: &'static str, value: String },
    InvalidRow { line: u64, source: ValidationError },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Io(err) => write!(f, "failed to access ledger file: {}", err),
            LedgerError::Csv(err) => write!(f, "invalid ledger CSV data: {}", err),
            LedgerError::InvalidDate { line, message } => write!(f, "line {}: {}", line, message),
            LedgerError::InvalidCaisse { line, value } => {
                write!(f, "line {}: unknown caisse '{}'", line, value)
            }
            LedgerError::InvalidNumber {
                line,
                column,
                value,
            } => write!(f, "line {}: {} '{}' is not a whole number", line, column, value),
            LedgerError::InvalidRow { line, source } => write!(f, "line {}: {}", line, source),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Io(err) => Some(err),
            LedgerError::Csv(err) => Some(err),
            LedgerError::InvalidRow { source, .. } => Some(source),
            LedgerError::InvalidDate { .. }
            | LedgerError::InvalidCaisse { .. }
            | LedgerError::InvalidNumber { .. } => None,
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Flat CSV form of a ledger line.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    member_id: String,
    #[serde(rename = "type")]
    transaction_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    caisse: Option<String>,
    date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tranche_number: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    withdrawal_reason: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tontine_shares: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    discipline_reason: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ag_absence_reason: Option<String>,
}

impl LedgerRow {
    fn from_transaction(transaction: &Transaction) -> Self {
        let details = transaction.kind.details();
        Self {
            id: Some(transaction.id.0.clone()),
            member_id: transaction.member_id.0.clone(),
            transaction_type: transaction.transaction_type().key().to_string(),
            amount: Some(transaction.amount.to_string()),
            caisse: Some(transaction.caisse.key().to_string()),
            date: transaction.date.format("%Y-%m-%d").to_string(),
            tranche_number: details.tranche_number,
            withdrawal_reason: details.withdrawal_reason,
            tontine_shares: details.tontine_shares.map(|shares| shares.to_string()),
            discipline_reason: details.discipline_reason,
            ag_absence_reason: details.ag_absence_reason,
        }
    }

    fn into_transaction(
        self,
        line: u64,
        validator: &SubmissionValidator,
    ) -> Result<Transaction, LedgerError> {
        let date = parse_date(&self.date)
            .map_err(|message| LedgerError::InvalidDate { line, message })?;
        let caisse = match self.caisse {
            Some(raw) => Some(
                Caisse::parse(&raw).ok_or(LedgerError::InvalidCaisse { line, value: raw })?,
            ),
            None => None,
        };
        let amount = parse_number::<u64>(self.amount.as_deref(), line, "amount")?;
        let tontine_shares =
            parse_number::<u32>(self.tontine_shares.as_deref(), line, "tontine_shares")?;

        let submission = TransactionSubmission {
            member_id: MemberId(self.member_id),
            transaction_type: self.transaction_type,
            amount,
            caisse,
            date,
            details: TransactionDetails {
                tranche_number: self.tranche_number,
                withdrawal_reason: self.withdrawal_reason,
                tontine_shares,
                discipline_reason: self.discipline_reason,
                ag_absence_reason: self.ag_absence_reason,
            },
        };

        let draft = validator
            .validate(submission)
            .map_err(|source| LedgerError::InvalidRow { line, source })?;
        let id = self.id.unwrap_or_else(|| format!("ledger-{line:06}"));
        Ok(draft.into_transaction(TransactionId(id)))
    }
}

fn parse_number<T: std::str::FromStr>(
    raw: Option<&str>,
    line: u64,
    column: &'static str,
) -> Result<Option<T>, LedgerError> {
    raw.map(|value| {
        value.parse::<T>().map_err(|_| LedgerError::InvalidNumber {
            line,
            column,
            value: value.to_string(),
        })
    })
    .transpose()
}

/// Reads and writes the treasury ledger as CSV.
pub struct LedgerCsv;

impl LedgerCsv {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>, LedgerError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Every row goes through the same validation as a form submission.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Transaction>, LedgerError> {
        let validator = SubmissionValidator;
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut transactions = Vec::new();

        for (index, record) in csv_reader.deserialize::<LedgerRow>().enumerate() {
            let row = record?;
            let line = index as u64 + 2;
            transactions.push(row.into_transaction(line, &validator)?);
        }

        Ok(transactions)
    }

    pub fn write<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), LedgerError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for transaction in transactions {
            csv_writer.serialize(LedgerRow::from_transaction(transaction))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
