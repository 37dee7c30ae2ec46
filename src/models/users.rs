use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct User {
    pub chat_id: String,
    pub username: String,
    pub avatar: String,
    pub status: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IdentifyRequest {
    pub chat_id: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BotIdentifyRequest {
    pub chat_id: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "ref")]
    pub invite_code: Option<String>,
}
