use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Referral {
    pub chat_id: String,
    pub referral_code: String,
    pub total_earned_in_cents: i64,
    pub pending_earned_in_cents: i64,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct ReferredUser {
    pub user_id: String,
    pub inviter_chat_id: String,
    pub username: String,
    pub earned_in_cents: i64,
    pub is_active: bool,
    pub joined_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReferralSummary {
    pub referral_code: String,
    pub link: String,
    pub total_referrals: i64,
    pub successful_referrals: i64,
    pub total_earned_in_cents: i64,
    pub pending_earned_in_cents: i64,
    pub commission_in_cents: i64,
}
