use super::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `from` pays `to` the given amount.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,
}

impl Settlement {
    pub fn touches(&self, participant_id: &str) -> bool {
        self.from == participant_id || self.to == participant_id
    }
}
