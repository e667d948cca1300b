use crate::{
    api::models::*,
    core::{
        errors::BalanceError,
        models::{AppLog, Expense, GroupBalance, Participant, ParticipantSummary, ScopedBalances, TrendPoint},
        services::{BalanceService, NewExpense},
    },
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

pub type SharedService = Arc<BalanceService<InMemoryLogging, InMemoryStorage, InMemoryCache>>;

// Define API routes
pub fn api_routes(service: SharedService) -> Router {
    Router::new()
        .route("/participants", post(register_participant).get(list_participants))
        .route(
            "/participants/{participant_id}",
            get(get_participant).delete(remove_participant),
        )
        .route("/participants/{participant_id}/summary", get(participant_summary))
        .route("/participants/{participant_id}/groups", get(group_breakdown))
        .route("/participants/{participant_id}/trend", get(trend))
        .route("/expenses", post(record_expense).get(list_expenses))
        .route("/expenses/{expense_id}", axum::routing::delete(delete_expense))
        .route("/balances", get(global_balances))
        .route("/groups/{group_id}/balances", get(group_balances))
        .route("/pairs/{first_id}/{second_id}/balances", get(pairwise_balances))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

async fn balances_response(service: &SharedService, scope: &ScopedBalances) -> Result<BalancesResponse, ApiError> {
    let settlements = service.resolve_settlements(&scope.settlements).await?;
    Ok(BalancesResponse::new(scope, settlements))
}

#[utoipa::path(
    post,
    path = "/api/participants",
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "Participant registered", body = Participant),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 409, description = "Participant already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn register_participant(
    State(service): State<SharedService>,
    Json(req): Json<CreateParticipantRequest>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let participant = service
        .register_participant(Participant {
            id: req.id,
            name: req.name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

#[utoipa::path(
    get,
    path = "/api/participants",
    responses(
        (status = 200, description = "Registered participants", body = Vec<Participant>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn list_participants(State(service): State<SharedService>) -> Result<Json<Vec<Participant>>, ApiError> {
    Ok(Json(service.list_participants().await?))
}

#[utoipa::path(
    get,
    path = "/api/participants/{participant_id}",
    params(
        ("participant_id" = String, Path, description = "ID of the participant to retrieve")
    ),
    responses(
        (status = 200, description = "Participant retrieved successfully", body = Participant),
        (status = 404, description = "Participant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_participant(
    State(service): State<SharedService>,
    Path(participant_id): Path<String>,
) -> Result<Json<Participant>, ApiError> {
    let participant = service
        .get_participant(&participant_id)
        .await?
        .ok_or_else(|| BalanceError::ParticipantNotFound(participant_id))?;
    Ok(Json(participant))
}

#[utoipa::path(
    delete,
    path = "/api/participants/{participant_id}",
    params(
        ("participant_id" = String, Path, description = "ID of the participant to remove")
    ),
    responses(
        (status = 200, description = "Participant removed", body = Participant),
        (status = 404, description = "Participant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn remove_participant(
    State(service): State<SharedService>,
    Path(participant_id): Path<String>,
) -> Result<Json<Participant>, ApiError> {
    Ok(Json(service.remove_participant(&participant_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = NewExpense,
    responses(
        (status = 201, description = "Expense recorded", body = Expense),
        (status = 400, description = "Malformed expense", body = ErrorResponse),
        (status = 422, description = "Expense references an unknown participant", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn record_expense(
    State(service): State<SharedService>,
    Json(req): Json<NewExpense>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = service.record_expense(req).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/expenses",
    responses(
        (status = 200, description = "Current expense snapshot", body = Vec<Expense>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn list_expenses(State(service): State<SharedService>) -> Result<Json<Vec<Expense>>, ApiError> {
    Ok(Json(service.list_expenses().await?))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    params(
        ("expense_id" = String, Path, description = "ID of the expense to delete")
    ),
    responses(
        (status = 200, description = "Expense deleted", body = Expense),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn delete_expense(
    State(service): State<SharedService>,
    Path(expense_id): Path<String>,
) -> Result<Json<Expense>, ApiError> {
    Ok(Json(service.delete_expense(&expense_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/balances",
    responses(
        (status = 200, description = "Balances and settlements over every expense", body = BalancesResponse),
        (status = 422, description = "Snapshot references an unknown participant", body = ErrorResponse),
        (status = 500, description = "Balance invariant violated", body = ErrorResponse)
    )
)]
async fn global_balances(State(service): State<SharedService>) -> Result<Json<BalancesResponse>, ApiError> {
    let scope = service.global_view().await?;
    Ok(Json(balances_response(&service, &scope).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(
        ("group_id" = String, Path, description = "Group to compute balances for")
    ),
    responses(
        (status = 200, description = "Balances and settlements within the group", body = BalancesResponse),
        (status = 422, description = "Snapshot references an unknown participant", body = ErrorResponse),
        (status = 500, description = "Balance invariant violated", body = ErrorResponse)
    )
)]
async fn group_balances(
    State(service): State<SharedService>,
    Path(group_id): Path<String>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let scope = service.group_view(&group_id).await?;
    Ok(Json(balances_response(&service, &scope).await?))
}

#[utoipa::path(
    get,
    path = "/api/pairs/{first_id}/{second_id}/balances",
    params(
        ("first_id" = String, Path, description = "First participant of the pair"),
        ("second_id" = String, Path, description = "Second participant of the pair")
    ),
    responses(
        (status = 200, description = "Balances and statistics for the pair", body = PairwiseResponse),
        (status = 400, description = "Invalid pair", body = ErrorResponse),
        (status = 404, description = "Participant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn pairwise_balances(
    State(service): State<SharedService>,
    Path((first_id, second_id)): Path<(String, String)>,
) -> Result<Json<PairwiseResponse>, ApiError> {
    let pair = service.pairwise_view(&first_id, &second_id).await?;
    let balances = balances_response(&service, &pair.scope).await?;
    Ok(Json(PairwiseResponse::new(balances, pair.statistics)))
}

#[utoipa::path(
    get,
    path = "/api/participants/{participant_id}/trend",
    params(
        ("participant_id" = String, Path, description = "Participant whose balance is charted"),
        TrendQuery
    ),
    responses(
        (status = 200, description = "Daily net balance series", body = Vec<TrendPoint>),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 404, description = "Participant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn trend(
    State(service): State<SharedService>,
    Path(participant_id): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<TrendPoint>>, ApiError> {
    let points = service.trend(&participant_id, query.end, query.days).await?;
    Ok(Json(rounded_trend(points)))
}

#[utoipa::path(
    get,
    path = "/api/participants/{participant_id}/summary",
    params(
        ("participant_id" = String, Path, description = "Participant to summarise")
    ),
    responses(
        (status = 200, description = "Owed-to and owes totals", body = ParticipantSummary),
        (status = 404, description = "Participant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn participant_summary(
    State(service): State<SharedService>,
    Path(participant_id): Path<String>,
) -> Result<Json<ParticipantSummary>, ApiError> {
    let summary = service.participant_summary(&participant_id).await?;
    Ok(Json(rounded_summary(summary)))
}

#[utoipa::path(
    get,
    path = "/api/participants/{participant_id}/groups",
    params(
        ("participant_id" = String, Path, description = "Participant to break down by group")
    ),
    responses(
        (status = 200, description = "Net balance per group", body = Vec<GroupBalance>),
        (status = 404, description = "Participant not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn group_breakdown(
    State(service): State<SharedService>,
    Path(participant_id): Path<String>,
) -> Result<Json<Vec<GroupBalance>>, ApiError> {
    let groups = service.group_breakdown(&participant_id).await?;
    Ok(Json(rounded_breakdown(groups)))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Audit log", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_app_logs(State(service): State<SharedService>) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs().await?))
}
