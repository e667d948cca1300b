use utoipa::OpenApi;

use crate::{
    api::models::{BalancesResponse, CreateParticipantRequest, ErrorResponse, PairwiseResponse},
    core::{
        models::{
            AppLog, Expense, GroupBalance, PairStatistics, Participant, ParticipantSummary, Settlement, SplitPolicy,
            TrendPoint,
        },
        services::{NewExpense, ResolvedSettlement},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::register_participant,
        super::handlers::list_participants,
        super::handlers::get_participant,
        super::handlers::remove_participant,
        super::handlers::record_expense,
        super::handlers::list_expenses,
        super::handlers::delete_expense,
        super::handlers::global_balances,
        super::handlers::group_balances,
        super::handlers::pairwise_balances,
        super::handlers::trend,
        super::handlers::participant_summary,
        super::handlers::group_breakdown,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateParticipantRequest,
        NewExpense,
        ErrorResponse,
        BalancesResponse,
        PairwiseResponse,
        ResolvedSettlement,
        Participant,
        Expense,
        SplitPolicy,
        Settlement,
        PairStatistics,
        ParticipantSummary,
        TrendPoint,
        GroupBalance,
        AppLog
    )),
    info(
        title = "Splitnet API",
        description = "Net balances and settlement plans for shared expenses",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
