use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: String,
    pub chat_id: String,
    pub kind: String,
    pub amount_in_cents: i64,
    pub description: String,
    pub status: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: chrono::NaiveDateTime,
}
