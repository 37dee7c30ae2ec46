use crate::models::transactions;

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TransactionRepository {
    conn: PgPool,
}

impl TransactionRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    pub async fn record(
        &self,
        chat_id: &str,
        kind: &str,
        amount_in_cents: i64,
        description: &str,
        status: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<transactions::Transaction, anyhow::Error> {
        let transaction_id = Uuid::new_v4().hyphenated().to_string();

        let transaction = sqlx::query_as::<_, transactions::Transaction>(
            r#"
            INSERT INTO transactions (id, chat_id, kind, amount_in_cents, description, status, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&transaction_id)
        .bind(chat_id)
        .bind(kind)
        .bind(amount_in_cents)
        .bind(description)
        .bind(status)
        .bind(metadata)
        .fetch_one(&self.conn)
        .await?;

        Ok(transaction)
    }

    pub async fn list(
        &self,
        chat_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<transactions::Transaction>, i64), anyhow::Error> {
        let transactions = sqlx::query_as::<_, transactions::Transaction>(
            "SELECT * FROM transactions WHERE chat_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.conn)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM transactions WHERE chat_id = $1")
            .bind(chat_id)
            .fetch_one(&self.conn)
            .await?;

        Ok((transactions, total))
    }
}
