use asso_portal::config::TreasuryConfig;
use asso_portal::error::AppError;
use asso_portal::members::{DirectoryError, Member, MemberDirectory, MemberId, MemberImporter};
use asso_portal::treasury::{
    LedgerCsv, RepositoryError, Transaction, TransactionId, TransactionRepository, TreasuryService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type PortalService =
    TreasuryService<InMemoryTransactionRepository, InMemoryMemberDirectory>;

#[derive(Default, Clone)]
pub(crate) struct InMemoryTransactionRepository {
    records: Arc<Mutex<HashMap<TransactionId, Transaction>>>,
}

impl InMemoryTransactionRepository {
    fn guard(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<TransactionId, Transaction>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("transaction store poisoned".to_string()))
    }
}

impl TransactionRepository for InMemoryTransactionRepository {
    fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&transaction.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    fn delete(&self, id: &TransactionId) -> Result<Transaction, RepositoryError> {
        self.guard()?.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Transaction>, RepositoryError> {
        Ok(self.guard()?.values().cloned().collect())
    }

    fn for_member(&self, member_id: &MemberId) -> Result<Vec<Transaction>, RepositoryError> {
        Ok(self
            .guard()?
            .values()
            .filter(|transaction| &transaction.member_id == member_id)
            .cloned()
            .collect())
    }
}

/// Directory loaded once at start-up; the portal never edits members.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMemberDirectory {
    members: Arc<Vec<Member>>,
}

impl InMemoryMemberDirectory {
    pub(crate) fn new(members: Vec<Member>) -> Self {
        Self {
            members: Arc::new(members),
        }
    }
}

impl MemberDirectory for InMemoryMemberDirectory {
    fn list(&self) -> Result<Vec<Member>, DirectoryError> {
        Ok(self.members.as_ref().clone())
    }

    fn fetch(&self, id: &MemberId) -> Result<Option<Member>, DirectoryError> {
        Ok(self.members.iter().find(|member| &member.id == id).cloned())
    }
}

/// Builds the service over the in-memory stores, seeding them from the configured CSV files.
pub(crate) fn build_service(config: &TreasuryConfig) -> Result<Arc<PortalService>, AppError> {
    let members = match &config.members_csv {
        Some(path) => {
            let members = MemberImporter::from_path(path)?;
            info!(path = %path.display(), count = members.len(), "members directory loaded");
            members
        }
        None => {
            warn!("TREASURY_MEMBERS_CSV not set; members directory is empty");
            Vec::new()
        }
    };

    let service = Arc::new(TreasuryService::new(
        Arc::new(InMemoryTransactionRepository::default()),
        Arc::new(InMemoryMemberDirectory::new(members)),
        config.policy,
    ));

    if let Some(path) = &config.ledger_csv {
        let transactions = LedgerCsv::from_path(path)?;
        let imported = service.import(transactions)?;
        info!(path = %path.display(), imported, "treasury ledger seeded");
    }

    Ok(service)
}
