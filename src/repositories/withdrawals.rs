use crate::models::withdrawals;

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct WithdrawalRepository {
    conn: PgPool,
}

impl WithdrawalRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    pub async fn initiate(
        &self,
        chat_id: &str,
        amount_in_cents: i64,
        fee_in_cents: i64,
        net_in_cents: i64,
        vpa: &str,
    ) -> Result<withdrawals::Withdrawal, anyhow::Error> {
        let withdrawal_id = Uuid::new_v4().hyphenated().to_string();

        let withdrawal = sqlx::query_as::<_, withdrawals::Withdrawal>(
            r#"
            INSERT INTO withdrawals (id, chat_id, amount_in_cents, fee_in_cents, net_in_cents, vpa, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING *
            "#,
        )
        .bind(&withdrawal_id)
        .bind(chat_id)
        .bind(amount_in_cents)
        .bind(fee_in_cents)
        .bind(net_in_cents)
        .bind(vpa)
        .fetch_one(&self.conn)
        .await?;

        Ok(withdrawal)
    }

    pub async fn list(
        &self,
        chat_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<withdrawals::Withdrawal>, i64), anyhow::Error> {
        let withdrawals = sqlx::query_as::<_, withdrawals::Withdrawal>(
            "SELECT * FROM withdrawals WHERE chat_id = $1 ORDER BY initiated_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.conn)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM withdrawals WHERE chat_id = $1")
            .bind(chat_id)
            .fetch_one(&self.conn)
            .await?;

        Ok((withdrawals, total))
    }

    /// Guarded transition out of `pending`; terminal rows are left untouched
    /// and reported as None.
    pub async fn settle(
        &self,
        id: &str,
        status: &str,
        transaction_id: Option<&str>,
        failure_reason: Option<&str>,
    ) -> Result<Option<withdrawals::Withdrawal>, anyhow::Error> {
        let withdrawal = sqlx::query_as::<_, withdrawals::Withdrawal>(
            r#"
            UPDATE withdrawals
            SET status = $2,
                completed_at = CURRENT_TIMESTAMP,
                transaction_id = COALESCE($3, transaction_id),
                failure_reason = COALESCE($4, failure_reason)
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(transaction_id)
        .bind(failure_reason)
        .fetch_optional(&self.conn)
        .await?;

        Ok(withdrawal)
    }
}
