use crate::models::upi;

use sqlx::PgPool;

#[derive(Clone)]
pub struct UpiRepository {
    conn: PgPool,
}

impl UpiRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    // Merge-update upsert: only supplied fields overwrite, and a supplied vpa
    // re-verifies the link and refreshes linked_at even when unchanged.
    pub async fn upsert(
        &self,
        chat_id: &str,
        vpa: Option<&str>,
        bank_name: Option<&str>,
    ) -> Result<upi::UpiLink, anyhow::Error> {
        let link = sqlx::query_as::<_, upi::UpiLink>(
            r#"
            INSERT INTO upi_links (chat_id, vpa, bank_name, is_verified, linked_at)
            VALUES ($1, $2, $3, $2 IS NOT NULL,
                    CASE WHEN $2 IS NOT NULL THEN CURRENT_TIMESTAMP END)
            ON CONFLICT (chat_id) DO UPDATE
            SET vpa = COALESCE(EXCLUDED.vpa, upi_links.vpa),
                bank_name = COALESCE(EXCLUDED.bank_name, upi_links.bank_name),
                is_verified = upi_links.is_verified OR EXCLUDED.vpa IS NOT NULL,
                linked_at = CASE WHEN EXCLUDED.vpa IS NOT NULL THEN CURRENT_TIMESTAMP
                            ELSE upi_links.linked_at END
            RETURNING *
            "#,
        )
        .bind(chat_id)
        .bind(vpa)
        .bind(bank_name)
        .fetch_one(&self.conn)
        .await?;

        Ok(link)
    }
}
