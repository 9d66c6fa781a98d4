use super::common::{date, sample_ledger, YEAR};
use crate::treasury::domain::{Caisse, Tranche, TransactionId, TransactionKind};
use crate::treasury::ledger::{LedgerCsv, LedgerError};
use crate::treasury::validation::ValidationError;
use crate::treasury::TransactionType;
use std::io::Cursor;

const HEADER: &str = "id,member_id,type,amount,caisse,date,tranche_number,withdrawal_reason,tontine_shares,discipline_reason,ag_absence_reason\n";

fn ledger(rows: &str) -> String {
    format!("{HEADER}{rows}")
}

#[test]
fn rows_are_validated_and_defaulted() {
    let csv = ledger(concat!(
        "t-1,m-01,inscription_nouveau,,,2026-01-10,,,,,\n",
        "t-2,m-01,cotisation_sociale,, ,2026-02-01,1,,,,\n",
        "t-3,m-02,retrait_social,12000,socialContributionAccount,2026-03-05,,décès,,,\n",
        ",m-02,autre_revenu,4000,tontineAccount,2026-03-06,,,,,\n",
    ));

    let transactions = LedgerCsv::from_reader(Cursor::new(csv)).expect("ledger parses");

    assert_eq!(transactions.len(), 4);
    assert_eq!(transactions[0].amount, 5_000);
    assert_eq!(transactions[0].caisse, Caisse::AssociationBudget);
    assert_eq!(
        transactions[1].kind,
        TransactionKind::CotisationSociale {
            tranche: Tranche::First
        }
    );
    assert_eq!(transactions[1].amount, 20_000);
    assert_eq!(
        transactions[2].kind,
        TransactionKind::RetraitSocial {
            reason: "décès".to_string()
        }
    );
    assert_eq!(transactions[3].id, TransactionId("ledger-000005".to_string()));
    assert_eq!(transactions[3].caisse, Caisse::TontineAccount);
    assert_eq!(transactions[3].date, date(YEAR, 3, 6));
}

#[test]
fn invalid_date_reports_line() {
    let csv = ledger(concat!(
        "t-1,m-01,droit_adhesion,,,2026-01-10,,,,,\n",
        "t-2,m-01,droit_adhesion,,,10/01/2026,,,,,\n",
    ));

    match LedgerCsv::from_reader(Cursor::new(csv)) {
        Err(LedgerError::InvalidDate { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("10/01/2026"));
        }
        other => panic!("expected invalid date, got {other:?}"),
    }
}

#[test]
fn unknown_caisse_reports_line() {
    let csv = ledger("t-1,m-01,autre_revenu,500,coffre,2026-01-10,,,,,\n");

    match LedgerCsv::from_reader(Cursor::new(csv)) {
        Err(LedgerError::InvalidCaisse { line, value }) => {
            assert_eq!(line, 2);
            assert_eq!(value, "coffre");
        }
        other => panic!("expected invalid caisse, got {other:?}"),
    }
}

#[test]
fn non_numeric_amount_reports_column() {
    let csv = ledger("t-1,m-01,autre_revenu,cinq,associationBudget,2026-01-10,,,,,\n");

    match LedgerCsv::from_reader(Cursor::new(csv)) {
        Err(LedgerError::InvalidNumber { line, column, value }) => {
            assert_eq!(line, 2);
            assert_eq!(column, "amount");
            assert_eq!(value, "cinq");
        }
        other => panic!("expected invalid number, got {other:?}"),
    }
}

#[test]
fn rule_violations_are_reported_with_line() {
    let csv = ledger(concat!(
        "t-1,m-01,droit_adhesion,,,2026-01-10,,,,,\n",
        "t-2,m-01,tontine,,,2026-01-11,,,7,,\n",
    ));

    match LedgerCsv::from_reader(Cursor::new(csv)) {
        Err(LedgerError::InvalidRow { line, source }) => {
            assert_eq!(line, 3);
            assert_eq!(source, ValidationError::TontineSharesOutOfRange(7));
        }
        other => panic!("expected invalid row, got {other:?}"),
    }
}

#[test]
fn unknown_type_is_rejected() {
    let csv = ledger("t-1,m-01,loterie,100,associationBudget,2026-01-10,,,,,\n");

    let err = LedgerCsv::from_reader(Cursor::new(csv)).expect_err("unknown type rejected");
    assert!(err.to_string().contains("line 2"));
    assert!(err.to_string().contains("loterie"));
}

#[test]
fn written_ledger_reads_back_identically() {
    let transactions = sample_ledger();
    let mut buffer = Vec::new();
    LedgerCsv::write(&mut buffer, &transactions).expect("ledger writes");

    let text = String::from_utf8(buffer.clone()).expect("utf8 output");
    assert!(text.starts_with(HEADER));
    assert!(text.contains("t-4,m-02,tontine,20000,tontineAccount,2026-02-15,,,2,,"));

    let reread = LedgerCsv::from_reader(Cursor::new(buffer)).expect("ledger re-reads");
    assert_eq!(reread, transactions);
    assert_eq!(reread[2].transaction_type(), TransactionType::CotisationSociale);
}

#[test]
fn oversized_amount_is_reported_with_line() {
    let csv = ledger("t-1,m-01,autre_revenu,18446744073709551615,associationBudget,2026-01-10,,,,,\n");

    match LedgerCsv::from_reader(Cursor::new(csv)) {
        Err(LedgerError::InvalidRow { line, source }) => {
            assert_eq!(line, 2);
            assert!(matches!(source, ValidationError::AmountOutOfRange { .. }));
        }
        other => panic!("expected invalid row, got {other:?}"),
    }
}
