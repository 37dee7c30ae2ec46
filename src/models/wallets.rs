use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Wallet {
    pub chat_id: String,
    pub balance_in_cents: i64,
    pub pending_in_cents: i64,
    pub currency: String,
    pub created_at: chrono::NaiveDateTime,
}
