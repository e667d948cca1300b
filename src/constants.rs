use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const PARTICIPANT_REGISTERED: &str = "PARTICIPANT_REGISTERED";
pub const PARTICIPANT_REMOVED: &str = "PARTICIPANT_REMOVED";
pub const EXPENSE_RECORDED: &str = "EXPENSE_RECORDED";
pub const EXPENSE_DELETED: &str = "EXPENSE_DELETED";
pub const BALANCES_QUERIED: &str = "BALANCES_QUERIED";
pub const TREND_QUERIED: &str = "TREND_QUERIED";

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_ID_LENGTH: usize = 64;
pub const MAX_AMOUNT: Decimal = dec!(1000000);
