use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::session::{Session, SessionUser};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

const SESSION_COLUMNS: &str = "id, user_id, token, created_at, expires_at";

impl PostgresRepository {
    /// Opaque session token: 32 random bytes, hex-encoded. Carries no
    /// decodable meaning.
    pub fn generate_session_token() -> String {
        let mut rng = rand::thread_rng();
        let token_bytes: [u8; 32] = rng.gen();
        hex::encode(token_bytes)
    }

    /// Issue a fresh session for a user. Any prior sessions are removed in
    /// the same transaction, so there is no window with either zero or two
    /// valid tokens observable after commit.
    pub async fn create_session(&self, user_id: &Uuid, ttl: Duration, now: DateTime<Utc>) -> Result<Session, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(Self::generate_session_token())
        .bind(now)
        .bind(now + ttl)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(session)
    }

    /// Resolve a bearer token to its user. Only strictly-unexpired sessions
    /// resolve; a token presented exactly at its expiry instant does not.
    pub async fn get_active_session_user(&self, token: &str, now: DateTime<Utc>) -> Result<Option<SessionUser>, AppError> {
        let user = sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT u.id, u.email, u.name
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1
              AND s.expires_at > $2
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Opportunistic cleanup after a failed lookup.
    pub async fn delete_session_if_expired(&self, token: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1 AND expires_at <= $2")
            .bind(token)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_session_by_token(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Rotate a session: the old token dies and a fresh full-TTL token is
    /// issued for the same user in one transaction. Expired tokens are
    /// removed and rejected rather than extended.
    pub async fn refresh_session(&self, token: &str, ttl: Duration, now: DateTime<Utc>) -> Result<Session, AppError> {
        let existing = sqlx::query_as::<_, Session>(&format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE token = $1"))
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        let existing = existing.ok_or(AppError::Unauthorized)?;

        if !existing.is_active(now) {
            self.delete_session_by_token(token).await?;
            return Err(AppError::Unauthorized);
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(existing.user_id)
            .execute(&mut *tx)
            .await?;

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token, created_at, expires_at
            "#,
        )
        .bind(existing.user_id)
        .bind(Self::generate_session_token())
        .bind(now)
        .bind(now + ttl)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(session)
    }

    /// Expiry sweep: drop every session at or past its expiry instant.
    pub async fn cleanup_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
