pub mod audit;
pub mod balance;
pub mod expense;
pub mod participant;
pub mod settlement;

pub use audit::AppLog;
pub use balance::{
    GroupBalance, NetBalances, PairStatistics, PairwiseBalances, ParticipantSummary, ScopedBalances, TrendPoint,
};
pub use expense::{Expense, SplitPolicy};
pub use participant::{GroupId, Participant, ParticipantId};
pub use settlement::Settlement;
