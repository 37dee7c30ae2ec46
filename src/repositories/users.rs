use crate::models::users;
use crate::utils;

use anyhow::bail;
use sqlx::PgPool;

const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct UserRepository {
    conn: PgPool,
}

impl UserRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    pub async fn get_user(&self, chat_id: &str) -> Result<Option<users::User>, anyhow::Error> {
        let user = sqlx::query_as::<_, users::User>("SELECT * FROM users WHERE chat_id = $1")
            .bind(chat_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_referral_code(
        &self,
        code: &str,
    ) -> Result<Option<users::User>, anyhow::Error> {
        let user = sqlx::query_as::<_, users::User>("SELECT * FROM users WHERE referral_code = $1")
            .bind(code)
            .fetch_optional(&self.conn)
            .await?;

        Ok(user)
    }

    /// Creates the user if absent, otherwise merges non-empty profile fields
    /// onto the stored row. `referred_by` is written only on creation; the
    /// returned flag reports whether this call created the row.
    pub async fn resolve_or_create(
        &self,
        chat_id: &str,
        username: &str,
        avatar: &str,
        referred_by: Option<&str>,
    ) -> Result<(users::User, bool), anyhow::Error> {
        if self.get_user(chat_id).await?.is_some() {
            let user = self.update_profile(chat_id, username, avatar).await?;
            return Ok((user, false));
        }

        match self
            .insert_user(chat_id, username, avatar, referred_by)
            .await?
        {
            Some(user) => Ok((user, true)),
            // lost the creation race, merge onto the winner instead
            None => Ok((self.update_profile(chat_id, username, avatar).await?, false)),
        }
    }

    // Allocates the referral code against the unique constraint; a taken code
    // retries with a fresh draw, a taken chat_id yields None for the caller
    // to re-read.
    async fn insert_user(
        &self,
        chat_id: &str,
        username: &str,
        avatar: &str,
        referred_by: Option<&str>,
    ) -> Result<Option<users::User>, anyhow::Error> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = utils::generate_referral_code();

            let inserted = sqlx::query_as::<_, users::User>(
                r#"
                INSERT INTO users (chat_id, username, avatar, referral_code, referred_by)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (chat_id) DO NOTHING
                RETURNING *
                "#,
            )
            .bind(chat_id)
            .bind(username)
            .bind(avatar)
            .bind(&code)
            .bind(referred_by)
            .fetch_optional(&self.conn)
            .await;

            match inserted {
                Ok(Some(user)) => return Ok(Some(user)),
                Ok(None) => return Ok(None),
                Err(sqlx::Error::Database(e))
                    if e.constraint() == Some("users_referral_code_key") =>
                {
                    continue
                }
                Err(e) => return Err(e.into()),
            }
        }

        bail!("Could not allocate a referral code for {}", chat_id)
    }

    async fn update_profile(
        &self,
        chat_id: &str,
        username: &str,
        avatar: &str,
    ) -> Result<users::User, anyhow::Error> {
        let user = sqlx::query_as::<_, users::User>(
            r#"
            UPDATE users
            SET username = COALESCE(NULLIF($2, ''), username),
                avatar = COALESCE(NULLIF($3, ''), avatar)
            WHERE chat_id = $1
            RETURNING *
            "#,
        )
        .bind(chat_id)
        .bind(username)
        .bind(avatar)
        .fetch_one(&self.conn)
        .await?;

        Ok(user)
    }
}
