use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::members::{DirectoryError, Member, MemberDirectory, MemberId, MemberRole};
use crate::treasury::domain::{
    Caisse, TontineShares, Tranche, Transaction, TransactionDetails, TransactionId,
    TransactionKind, TransactionSubmission,
};
use crate::treasury::repository::{RepositoryError, TransactionRepository};
use crate::treasury::{TreasuryPolicy, TreasuryService};

pub(super) const YEAR: i32 = 2026;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn member_id(raw: &str) -> MemberId {
    MemberId(raw.to_string())
}

pub(super) fn transaction(
    id: &str,
    member: &str,
    kind: TransactionKind,
    amount: u64,
    caisse: Caisse,
    on: NaiveDate,
) -> Transaction {
    Transaction {
        id: TransactionId(id.to_string()),
        member_id: member_id(member),
        kind,
        amount,
        caisse,
        date: on,
    }
}

pub(super) fn cotisation(
    id: &str,
    member: &str,
    tranche: Tranche,
    amount: u64,
    on: NaiveDate,
) -> Transaction {
    transaction(
        id,
        member,
        TransactionKind::CotisationSociale { tranche },
        amount,
        Caisse::SocialContributionAccount,
        on,
    )
}

pub(super) fn tontine(id: &str, member: &str, shares: u32, on: NaiveDate) -> Transaction {
    let shares = TontineShares::new(shares).expect("shares within range");
    transaction(
        id,
        member,
        TransactionKind::Tontine { shares },
        u64::from(shares.get()) * 10_000,
        Caisse::TontineAccount,
        on,
    )
}

/// A small mixed ledger over two members and all three caisses.
pub(super) fn sample_ledger() -> Vec<Transaction> {
    vec![
        transaction(
            "t-1",
            "m-01",
            TransactionKind::InscriptionNouveau,
            5_000,
            Caisse::AssociationBudget,
            date(YEAR, 1, 10),
        ),
        transaction(
            "t-2",
            "m-01",
            TransactionKind::DroitAdhesion,
            2_500,
            Caisse::AssociationBudget,
            date(YEAR, 1, 10),
        ),
        cotisation("t-3", "m-01", Tranche::First, 20_000, date(YEAR, 2, 1)),
        tontine("t-4", "m-02", 2, date(YEAR, 2, 15)),
        cotisation("t-5", "m-02", Tranche::Second, 15_000, date(YEAR, 3, 1)),
        transaction(
            "t-6",
            "m-02",
            TransactionKind::AutreRevenu,
            7_500,
            Caisse::AssociationBudget,
            date(YEAR, 3, 20),
        ),
    ]
}

pub(super) fn submission(kind: &str, details: TransactionDetails) -> TransactionSubmission {
    TransactionSubmission {
        member_id: member_id("m-01"),
        transaction_type: kind.to_string(),
        amount: None,
        caisse: None,
        date: date(YEAR, 4, 2),
        details,
    }
}

pub(super) fn directory_members() -> Vec<Member> {
    vec![
        Member {
            id: member_id("m-01"),
            first_name: "Awa".to_string(),
            last_name: "Ndiaye".to_string(),
            role: MemberRole::Treasurer,
        },
        Member {
            id: member_id("m-02"),
            first_name: "Paul".to_string(),
            last_name: "Mbarga".to_string(),
            role: MemberRole::Member,
        },
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<TransactionId, Transaction>>>,
}

impl TransactionRepository for MemoryRepository {
    fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&transaction.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    fn delete(&self, id: &TransactionId) -> Result<Transaction, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Transaction>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn for_member(&self, member_id: &MemberId) -> Result<Vec<Transaction>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|transaction| &transaction.member_id == member_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl TransactionRepository for UnavailableRepository {
    fn insert(&self, _transaction: Transaction) -> Result<Transaction, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &TransactionId) -> Result<Transaction, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Transaction>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_member(&self, _member_id: &MemberId) -> Result<Vec<Transaction>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Clone)]
pub(super) struct MemoryDirectory {
    members: Vec<Member>,
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self {
            members: directory_members(),
        }
    }
}

impl MemberDirectory for MemoryDirectory {
    fn list(&self) -> Result<Vec<Member>, DirectoryError> {
        Ok(self.members.clone())
    }

    fn fetch(&self, id: &MemberId) -> Result<Option<Member>, DirectoryError> {
        Ok(self.members.iter().find(|member| &member.id == id).cloned())
    }
}

pub(super) fn build_service() -> (
    TreasuryService<MemoryRepository, MemoryDirectory>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let directory = Arc::new(MemoryDirectory::default());
    let service = TreasuryService::new(repository.clone(), directory, TreasuryPolicy::default());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
