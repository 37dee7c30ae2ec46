use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct UpiLink {
    pub chat_id: String,
    pub vpa: Option<String>,
    pub bank_name: Option<String>,
    pub is_verified: bool,
    pub linked_at: Option<chrono::NaiveDateTime>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LinkUpiRequest {
    pub chat_id: Option<String>,
    pub vpa: Option<String>,
    pub bank_name: Option<String>,
}
