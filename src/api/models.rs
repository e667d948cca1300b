use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::BalanceError;
use crate::core::models::{
    GroupBalance, NetBalances, PairStatistics, ParticipantSummary, ScopedBalances, TrendPoint,
};
use crate::core::money::round_cents;
use crate::core::services::ResolvedSettlement;

#[derive(Deserialize, ToSchema)]
pub struct CreateParticipantRequest {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    /// Number of days in the window, ending at `end`
    pub days: Option<u32>,
    /// Last day of the window (YYYY-MM-DD), defaults to today
    #[param(value_type = Option<String>)]
    pub end: Option<NaiveDate>,
}

/// Net balances and settlement plan, amounts rounded to cents.
#[derive(Serialize, ToSchema)]
pub struct BalancesResponse {
    #[schema(value_type = Object)]
    pub balances: NetBalances,
    pub settlements: Vec<ResolvedSettlement>,
}

impl BalancesResponse {
    pub fn new(scope: &ScopedBalances, settlements: Vec<ResolvedSettlement>) -> Self {
        BalancesResponse {
            balances: scope
                .balances
                .iter()
                .map(|(id, balance)| (id.clone(), round_cents(*balance)))
                .collect(),
            settlements: settlements
                .into_iter()
                .map(|s| ResolvedSettlement {
                    amount: round_cents(s.amount),
                    ..s
                })
                .collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PairwiseResponse {
    pub balances: BalancesResponse,
    pub statistics: PairStatistics,
}

impl PairwiseResponse {
    pub fn new(balances: BalancesResponse, statistics: PairStatistics) -> Self {
        PairwiseResponse {
            balances,
            statistics: PairStatistics {
                total_volume: round_cents(statistics.total_volume),
                ..statistics
            },
        }
    }
}

pub fn rounded_summary(summary: ParticipantSummary) -> ParticipantSummary {
    ParticipantSummary {
        owed_to: round_cents(summary.owed_to),
        owes: round_cents(summary.owes),
        net: round_cents(summary.net),
        ..summary
    }
}

pub fn rounded_trend(points: Vec<TrendPoint>) -> Vec<TrendPoint> {
    points
        .into_iter()
        .map(|p| TrendPoint {
            net_balance: round_cents(p.net_balance),
            ..p
        })
        .collect()
}

pub fn rounded_breakdown(groups: Vec<GroupBalance>) -> Vec<GroupBalance> {
    groups
        .into_iter()
        .map(|g| GroupBalance {
            net_balance: round_cents(g.net_balance),
            ..g
        })
        .collect()
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for BalanceError to implement IntoResponse
pub struct ApiError(pub BalanceError);

impl From<BalanceError> for ApiError {
    fn from(err: BalanceError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            BalanceError::MalformedExpense { .. } | BalanceError::InvalidInput(..) => StatusCode::BAD_REQUEST,
            BalanceError::ParticipantNotFound(_) | BalanceError::ExpenseNotFound(_) => StatusCode::NOT_FOUND,
            BalanceError::ParticipantAlreadyExists(_) => StatusCode::CONFLICT,
            BalanceError::UnknownParticipant(_) | BalanceError::AmountOverflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BalanceError::BalanceInvariantViolated(_)
            | BalanceError::StorageError(_)
            | BalanceError::LoggingError(_)
            | BalanceError::CacheError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
