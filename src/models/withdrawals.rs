use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Withdrawal {
    pub id: String,
    pub chat_id: String,
    pub amount_in_cents: i64,
    pub fee_in_cents: i64,
    pub net_in_cents: i64,
    pub vpa: String,
    pub status: String,
    pub initiated_at: chrono::NaiveDateTime,
    pub completed_at: Option<chrono::NaiveDateTime>,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewWithdrawal {
    pub chat_id: Option<String>,
    pub amount: Option<f64>,
    pub vpa: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SettleWithdrawal {
    pub status: Option<String>,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
}
