use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{TransactionId, TransactionSubmission, TransactionView};
use super::repository::{RepositoryError, TransactionRepository};
use super::rules::RuleContext;
use super::service::{TreasuryService, TreasuryServiceError};
use crate::members::{MemberDirectory, MemberId};

/// Router builder exposing the treasury and members endpoints.
pub fn treasury_router<R, M>(service: Arc<TreasuryService<R, M>>) -> Router
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    Router::new()
        .route(
            "/treasury/transactions",
            get(list_handler::<R, M>).post(create_handler::<R, M>),
        )
        .route(
            "/treasury/transactions/:transaction_id",
            delete(delete_handler::<R, M>),
        )
        .route("/treasury/summary", get(summary_handler::<R, M>))
        .route(
            "/treasury/member-status/:member_id",
            get(member_status_handler::<R, M>),
        )
        .route("/treasury/defaults", get(defaults_handler::<R, M>))
        .route("/members", get(members_handler::<R, M>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusQuery {
    #[serde(default)]
    pub(crate) year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DefaultsQuery {
    #[serde(rename = "type")]
    pub(crate) transaction_type: String,
    #[serde(default)]
    pub(crate) tranche: Option<String>,
    #[serde(default)]
    pub(crate) shares: Option<u32>,
    #[serde(default)]
    pub(crate) discipline_reason: Option<String>,
    #[serde(default)]
    pub(crate) ag_absence_reason: Option<String>,
}

impl DefaultsQuery {
    fn context(&self) -> RuleContext {
        RuleContext {
            tranche: self.tranche.clone(),
            shares: self.shares,
            discipline_reason: self.discipline_reason.clone(),
            ag_absence_reason: self.ag_absence_reason.clone(),
        }
    }
}

pub(crate) async fn list_handler<R, M>(
    State(service): State<Arc<TreasuryService<R, M>>>,
) -> Response
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    match service.transactions() {
        Ok(transactions) => {
            let views: Vec<TransactionView> =
                transactions.iter().map(|transaction| transaction.to_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R, M>(
    State(service): State<Arc<TreasuryService<R, M>>>,
    Json(submission): Json<TransactionSubmission>,
) -> Response
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    match service.record(submission) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction.to_view())).into_response(),
        Err(err @ TreasuryServiceError::UnknownMember(_)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R, M>(
    State(service): State<Arc<TreasuryService<R, M>>>,
    Path(transaction_id): Path<String>,
) -> Response
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    match service.delete(&TransactionId(transaction_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn summary_handler<R, M>(
    State(service): State<Arc<TreasuryService<R, M>>>,
) -> Response
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn member_status_handler<R, M>(
    State(service): State<Arc<TreasuryService<R, M>>>,
    Path(member_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Response
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    let member_id = MemberId(member_id);
    let year = query.year.unwrap_or_else(|| Local::now().year());
    match service.member_status(&member_id, year) {
        Ok(report) => (StatusCode::OK, Json(report.to_view(&member_id))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn defaults_handler<R, M>(
    State(service): State<Arc<TreasuryService<R, M>>>,
    Query(query): Query<DefaultsQuery>,
) -> Response
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    let defaults = service.defaults(&query.transaction_type, &query.context());
    (StatusCode::OK, Json(defaults)).into_response()
}

pub(crate) async fn members_handler<R, M>(
    State(service): State<Arc<TreasuryService<R, M>>>,
) -> Response
where
    R: TransactionRepository + 'static,
    M: MemberDirectory + 'static,
{
    match service.members() {
        Ok(members) => (StatusCode::OK, Json(members)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: TreasuryServiceError) -> Response {
    let status = match &err {
        TreasuryServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TreasuryServiceError::UnknownMember(_)
        | TreasuryServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TreasuryServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        TreasuryServiceError::Repository(RepositoryError::Unavailable(_))
        | TreasuryServiceError::Directory(_) => {
            warn!(error = %err, "treasury backend failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
