use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    /// Cumulative winnings ledger, in integer cents. Only ever increases.
    pub total_winnings_cents: i64,
    pub created_at: String, // ISO 8601 string for simplicity
}
