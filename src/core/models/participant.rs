use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type ParticipantId = String;
pub type GroupId = String;

/// Profile record owned by the external user directory. Balances only ever use `id`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}
