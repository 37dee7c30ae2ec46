use crate::models::{transactions, wallets};

use anyhow::bail;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct WalletRepository {
    conn: PgPool,
}

impl WalletRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    pub async fn get_or_create(&self, chat_id: &str) -> Result<wallets::Wallet, anyhow::Error> {
        sqlx::query("INSERT INTO wallets (chat_id) VALUES ($1) ON CONFLICT (chat_id) DO NOTHING")
            .bind(chat_id)
            .execute(&self.conn)
            .await?;

        let wallet =
            sqlx::query_as::<_, wallets::Wallet>("SELECT * FROM wallets WHERE chat_id = $1")
                .bind(chat_id)
                .fetch_one(&self.conn)
                .await?;

        Ok(wallet)
    }

    // Balance decrement and history row commit together; the balance guard
    // keeps the wallet non-negative.
    pub async fn debit(
        &self,
        chat_id: &str,
        amount_in_cents: i64,
        description: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<transactions::Transaction, anyhow::Error> {
        let mut tx = self.conn.begin().await?;

        let updated = sqlx::query(
            "UPDATE wallets SET balance_in_cents = balance_in_cents - $2 WHERE chat_id = $1 AND balance_in_cents >= $2",
        )
        .bind(chat_id)
        .bind(amount_in_cents)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            bail!("Insufficient balance for {}", chat_id)
        }

        let transaction_id = Uuid::new_v4().hyphenated().to_string();
        let transaction = sqlx::query_as::<_, transactions::Transaction>(
            r#"
            INSERT INTO transactions (id, chat_id, kind, amount_in_cents, description, status, metadata)
            VALUES ($1, $2, 'debit', $3, $4, 'success', $5)
            RETURNING *
            "#,
        )
        .bind(&transaction_id)
        .bind(chat_id)
        .bind(amount_in_cents)
        .bind(description)
        .bind(metadata)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }
}
