use super::{create_test_service, day};
use crate::constants::{
    BALANCES_QUERIED, EXPENSE_DELETED, EXPENSE_RECORDED, MAX_AMOUNT, PARTICIPANT_REGISTERED, PARTICIPANT_REMOVED,
};
use crate::core::errors::BalanceError;
use crate::core::models::{Participant, SplitPolicy};
use crate::core::services::{BalanceService, NewExpense};
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

type TestService = BalanceService<InMemoryLogging, InMemoryStorage, InMemoryCache>;

fn participant(id: &str, name: &str) -> Participant {
    Participant {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn split_equally(amount: Decimal, payer: &str, participants: &[&str]) -> NewExpense {
    NewExpense {
        amount,
        payer_id: payer.to_string(),
        split: SplitPolicy::equal(participants.iter().copied()),
        group_id: None,
        date: Some(day(2024, 6, 1)),
        settled_at: None,
    }
}

async fn service_with_friends() -> TestService {
    let service = create_test_service();
    for (id, name) in [("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")] {
        service.register_participant(participant(id, name)).await.unwrap();
    }
    service
}

#[tokio::test]
async fn test_register_participant() {
    let _ = env_logger::try_init();
    let service = create_test_service();

    let alice = service.register_participant(participant("alice", "Alice")).await.unwrap();

    assert_eq!(alice.name, "Alice");
    assert_eq!(service.get_participant("alice").await.unwrap(), Some(alice));
    assert_eq!(service.list_participants().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_duplicate_participant() {
    let service = service_with_friends().await;

    let result = service.register_participant(participant("alice", "Alice Again")).await;

    assert_eq!(result, Err(BalanceError::ParticipantAlreadyExists("alice".to_string())));
}

#[tokio::test]
async fn test_register_rejects_bad_names() {
    let service = create_test_service();

    let empty = service.register_participant(participant("dave", "  ")).await;
    assert!(matches!(empty, Err(BalanceError::InvalidInput(ref field, _)) if field == "name"));

    let markup = service.register_participant(participant("dave", "<b>Dave</b>")).await;
    assert!(matches!(markup, Err(BalanceError::InvalidInput(..))));

    let long = service.register_participant(participant(&"x".repeat(65), "Dave")).await;
    assert!(matches!(long, Err(BalanceError::InvalidInput(ref field, _)) if field == "id"));
}

#[tokio::test]
async fn test_record_expense_and_settle() {
    let _ = env_logger::try_init();
    let service = service_with_friends().await;

    let expense = service
        .record_expense(split_equally(dec!(100), "alice", &["alice", "bob"]))
        .await
        .unwrap();
    assert!(!expense.id.is_empty());
    assert_eq!(service.list_expenses().await.unwrap(), vec![expense]);

    let scope = service.global_view().await.unwrap();
    assert_eq!(scope.balance_of("alice"), dec!(50));
    assert_eq!(scope.balance_of("bob"), dec!(-50));

    let resolved = service.resolve_settlements(&scope.settlements).await.unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].from.name, "Bob");
    assert_eq!(resolved[0].to.name, "Alice");
    assert_eq!(resolved[0].amount, dec!(50));
}

#[tokio::test]
async fn test_record_expense_defaults_date_to_now() {
    let service = service_with_friends().await;
    let mut new_expense = split_equally(dec!(10), "alice", &["bob"]);
    new_expense.date = None;

    let before = chrono::Utc::now();
    let expense = service.record_expense(new_expense).await.unwrap();

    assert!(expense.date >= before);
}

#[tokio::test]
async fn test_record_expense_with_unregistered_participant() {
    let _ = env_logger::try_init();
    let service = service_with_friends().await;

    let result = service
        .record_expense(split_equally(dec!(30), "alice", &["bob", "mallory"]))
        .await;

    assert_eq!(result, Err(BalanceError::UnknownParticipant("mallory".to_string())));
    assert!(service.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_record_malformed_expense() {
    let service = service_with_friends().await;

    let empty_split = service.record_expense(split_equally(dec!(30), "alice", &[])).await;
    assert!(matches!(empty_split, Err(BalanceError::MalformedExpense { .. })));

    let mut negative_share = split_equally(dec!(30), "alice", &[]);
    negative_share.split = SplitPolicy::unequal([("bob", dec!(-10)), ("carol", dec!(40))]);
    let result = service.record_expense(negative_share).await;
    assert!(matches!(result, Err(BalanceError::MalformedExpense { .. })));

    let fractional_cents = service
        .record_expense(split_equally(dec!(10.005), "alice", &["bob"]))
        .await;
    assert!(matches!(fractional_cents, Err(BalanceError::InvalidInput(ref field, _)) if field == "amount"));

    assert!(service.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_views_reflect_writes_after_caching() {
    let _ = env_logger::try_init();
    let service = service_with_friends().await;
    service
        .record_expense(split_equally(dec!(100), "alice", &["alice", "bob"]))
        .await
        .unwrap();
    assert_eq!(service.global_view().await.unwrap().balance_of("bob"), dec!(-50));

    let second = service
        .record_expense(split_equally(dec!(40), "bob", &["alice"]))
        .await
        .unwrap();
    assert_eq!(service.global_view().await.unwrap().balance_of("bob"), dec!(-10));

    service.delete_expense(&second.id).await.unwrap();
    assert_eq!(service.global_view().await.unwrap().balance_of("bob"), dec!(-50));
}

#[tokio::test]
async fn test_group_view() {
    let service = service_with_friends().await;
    let mut trip = split_equally(dec!(90), "carol", &["alice", "bob", "carol"]);
    trip.group_id = Some("trip".to_string());
    service.record_expense(trip).await.unwrap();
    service
        .record_expense(split_equally(dec!(20), "alice", &["bob"]))
        .await
        .unwrap();

    let scope = service.group_view("trip").await.unwrap();

    assert_eq!(scope.balance_of("carol"), dec!(60));
    assert_eq!(scope.balance_of("alice"), dec!(-30));
    assert_eq!(scope.total_owed_to("carol"), dec!(60));
}

#[tokio::test]
async fn test_removed_participant_surfaces_as_unknown() {
    let _ = env_logger::try_init();
    let service = service_with_friends().await;
    let expense = service
        .record_expense(split_equally(dec!(100), "alice", &["alice", "bob"]))
        .await
        .unwrap();
    service.global_view().await.unwrap();

    service.remove_participant("bob").await.unwrap();

    assert_eq!(
        service.global_view().await,
        Err(BalanceError::UnknownParticipant("bob".to_string()))
    );

    service.delete_expense(&expense.id).await.unwrap();
    assert!(service.global_view().await.unwrap().settlements.is_empty());
}

#[tokio::test]
async fn test_resolve_settlement_for_unknown_participant() {
    let service = service_with_friends().await;
    let settlements = vec![crate::core::models::Settlement {
        from: "ghost".to_string(),
        to: "alice".to_string(),
        amount: dec!(5),
    }];

    let result = service.resolve_settlements(&settlements).await;

    assert_eq!(result, Err(BalanceError::UnknownParticipant("ghost".to_string())));
}

#[tokio::test]
async fn test_missing_records() {
    let service = service_with_friends().await;

    assert_eq!(
        service.delete_expense("nope").await,
        Err(BalanceError::ExpenseNotFound("nope".to_string()))
    );
    assert_eq!(
        service.remove_participant("nope").await,
        Err(BalanceError::ParticipantNotFound("nope".to_string()))
    );
    assert!(matches!(
        service.pairwise_view("alice", "nope").await,
        Err(BalanceError::ParticipantNotFound(_))
    ));
    assert!(matches!(
        service.participant_summary("nope").await,
        Err(BalanceError::ParticipantNotFound(_))
    ));
}

#[tokio::test]
async fn test_pairwise_view() {
    let service = service_with_friends().await;
    service
        .record_expense(split_equally(dec!(60), "alice", &["alice", "bob", "carol"]))
        .await
        .unwrap();
    service
        .record_expense(split_equally(dec!(10), "carol", &["alice"]))
        .await
        .unwrap();

    let pair = service.pairwise_view("alice", "bob").await.unwrap();

    assert_eq!(pair.statistics.expense_count, 1);
    assert_eq!(pair.scope.balance_of("alice"), dec!(40));

    let same = service.pairwise_view("alice", "alice").await;
    assert!(matches!(same, Err(BalanceError::InvalidInput(..))));
}

#[tokio::test]
async fn test_trend_window_defaults_and_limits() {
    let _ = env_logger::try_init();
    let service = service_with_friends().await;
    service
        .record_expense(split_equally(dec!(20), "alice", &["bob"]))
        .await
        .unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();

    let points = service.trend("bob", Some(end), None).await.unwrap();
    assert_eq!(points.len(), 30);
    assert_eq!(points.last().map(|p| p.net_balance), Some(dec!(-20)));
    assert_eq!(points[0].net_balance, dec!(0));

    let too_long = service.trend("bob", Some(end), Some(366)).await;
    assert!(matches!(too_long, Err(BalanceError::InvalidInput(ref field, _)) if field == "days"));

    let unknown = service.trend("nope", Some(end), Some(3)).await;
    assert_eq!(unknown, Err(BalanceError::ParticipantNotFound("nope".to_string())));
}

#[tokio::test]
async fn test_summary_and_breakdown() {
    let service = service_with_friends().await;
    let mut trip = split_equally(dec!(30), "alice", &["bob", "carol"]);
    trip.group_id = Some("trip".to_string());
    service.record_expense(trip).await.unwrap();
    service
        .record_expense(split_equally(dec!(12), "bob", &["alice"]))
        .await
        .unwrap();

    let summary = service.participant_summary("alice").await.unwrap();
    assert_eq!(summary.net, dec!(18));
    assert_eq!(summary.owed_to, dec!(18));
    assert_eq!(summary.owes, dec!(0));

    let breakdown = service.group_breakdown("alice").await.unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].group_id.as_deref(), Some("trip"));
    assert_eq!(breakdown[0].net_balance, dec!(30));
    assert_eq!(breakdown[1].group_id, None);
    assert_eq!(breakdown[1].net_balance, dec!(-12));
}

#[tokio::test]
async fn test_actions_are_logged() {
    let _ = env_logger::try_init();
    let service = service_with_friends().await;
    let expense = service
        .record_expense(split_equally(dec!(10), "alice", &["bob"]))
        .await
        .unwrap();
    service.global_view().await.unwrap();
    service.delete_expense(&expense.id).await.unwrap();
    service.remove_participant("carol").await.unwrap();

    let actions: Vec<String> = service
        .get_app_logs()
        .await
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect();

    assert_eq!(
        actions,
        vec![
            PARTICIPANT_REGISTERED,
            PARTICIPANT_REGISTERED,
            PARTICIPANT_REGISTERED,
            EXPENSE_RECORDED,
            BALANCES_QUERIED,
            EXPENSE_DELETED,
            PARTICIPANT_REMOVED,
        ]
    );
}

#[tokio::test]
async fn test_record_expense_requires_exact_shares() {
    let _ = env_logger::try_init();
    let service = service_with_friends().await;

    for _ in 0..2 {
        let mut drifted = split_equally(dec!(10), "alice", &[]);
        drifted.split = SplitPolicy::unequal([("alice", dec!(4.99)), ("bob", dec!(5.00))]);
        let result = service.record_expense(drifted).await;
        assert!(matches!(result, Err(BalanceError::InvalidInput(ref field, _)) if field == "shares"));
    }

    let mut fractional = split_equally(dec!(10), "alice", &[]);
    fractional.split = SplitPolicy::unequal([("alice", dec!(4.995)), ("bob", dec!(5.005))]);
    let result = service.record_expense(fractional).await;
    assert!(matches!(result, Err(BalanceError::InvalidInput(ref field, _)) if field == "shares"));

    let mut exact = split_equally(dec!(10), "alice", &[]);
    exact.split = SplitPolicy::unequal([("alice", dec!(4.99)), ("bob", dec!(5.01))]);
    service.record_expense(exact).await.unwrap();

    let scope = service.global_view().await.unwrap();
    assert_eq!(scope.balance_of("bob"), dec!(-5.01));
}

#[tokio::test]
async fn test_record_expense_rejects_huge_amounts() {
    let service = service_with_friends().await;

    let result = service
        .record_expense(split_equally(Decimal::MAX, "alice", &["bob"]))
        .await;
    assert!(matches!(result, Err(BalanceError::InvalidInput(ref field, _)) if field == "amount"));

    let mut huge_share = split_equally(dec!(10), "alice", &[]);
    huge_share.split = SplitPolicy::unequal([("alice", Decimal::MAX), ("bob", dec!(10))]);
    let result = service.record_expense(huge_share).await;
    assert!(matches!(result, Err(BalanceError::InvalidInput(ref field, _)) if field == "shares"));

    service
        .record_expense(split_equally(MAX_AMOUNT, "alice", &["bob"]))
        .await
        .unwrap();
    assert!(service.list_expenses().await.unwrap().len() == 1);
    assert_eq!(service.global_view().await.unwrap().balance_of("bob"), -MAX_AMOUNT);
}
