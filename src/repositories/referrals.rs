use crate::models::referrals;

use sqlx::PgPool;

#[derive(Clone)]
pub struct ReferralRepository {
    conn: PgPool,
}

impl ReferralRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    /// Appends the invitee under the inviter's record. The primary key on
    /// `referred_users.user_id` makes the append at-most-once per invitee;
    /// returns whether a new entry was written.
    pub async fn link_invitee(
        &self,
        inviter_chat_id: &str,
        inviter_code: &str,
        invitee_id: &str,
        invitee_username: &str,
    ) -> Result<bool, anyhow::Error> {
        let mut tx = self.conn.begin().await?;

        sqlx::query(
            "INSERT INTO referrals (chat_id, referral_code) VALUES ($1, $2) ON CONFLICT (chat_id) DO NOTHING",
        )
        .bind(inviter_chat_id)
        .bind(inviter_code)
        .execute(&mut *tx)
        .await?;

        let inserted = sqlx::query(
            "INSERT INTO referred_users (user_id, inviter_chat_id, username) VALUES ($1, $2, $3) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(invitee_id)
        .bind(inviter_chat_id)
        .bind(invitee_username)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(inserted.rows_affected() == 1)
    }

    pub async fn get_referral(
        &self,
        chat_id: &str,
    ) -> Result<Option<referrals::Referral>, anyhow::Error> {
        let referral =
            sqlx::query_as::<_, referrals::Referral>("SELECT * FROM referrals WHERE chat_id = $1")
                .bind(chat_id)
                .fetch_optional(&self.conn)
                .await?;

        Ok(referral)
    }

    pub async fn count_referred(&self, chat_id: &str) -> Result<(i64, i64), anyhow::Error> {
        let counts: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(1), COUNT(1) FILTER (WHERE is_active) FROM referred_users WHERE inviter_chat_id = $1",
        )
        .bind(chat_id)
        .fetch_one(&self.conn)
        .await?;

        Ok(counts)
    }

    pub async fn list_referred(
        &self,
        chat_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<referrals::ReferredUser>, i64), anyhow::Error> {
        let referred = sqlx::query_as::<_, referrals::ReferredUser>(
            "SELECT * FROM referred_users WHERE inviter_chat_id = $1 ORDER BY joined_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.conn)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM referred_users WHERE inviter_chat_id = $1")
                .bind(chat_id)
                .fetch_one(&self.conn)
                .await?;

        Ok((referred, total))
    }
}
