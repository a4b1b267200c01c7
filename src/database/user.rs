use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::User;
use argon2::Argon2;
use chrono::{DateTime, Utc};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString};
use std::sync::LazyLock;
use uuid::Uuid;

/// A real Argon2 hash generated once at startup, used as a timing decoy
/// so that login requests for non-existent users take the same time as
/// requests for existing users.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"dummy-never-matches", Salt::from(&salt))
        .expect("failed to generate dummy hash")
        .to_string()
});

const USER_COLUMNS: &str = "id, email, name, picture, password_hash, verified, verified_at, created_at";

impl PostgresRepository {
    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        let password_hash = hash_password(password)?;

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, picture, password_hash, verified, verified_at, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // Two concurrent signups can both pass the pre-check; the unique
            // index on email is the authoritative guard.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(AppError::UserAlreadyExists(email.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn verify_password(&self, user: &User, password: &str) -> Result<(), AppError> {
        let password_hash = PasswordHash::new(&user.password_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &password_hash)
            .map_err(|_| AppError::InvalidCredentials)?;

        Ok(())
    }

    /// Perform a throwaway Argon2 verification to equalize response timing
    /// regardless of whether the target account exists.
    pub fn dummy_verify(password: &str) {
        let hash = PasswordHash::new(&DUMMY_HASH).expect("invalid dummy hash");
        let _ = Argon2::default().verify_password(password.as_bytes(), &hash);
    }

    pub async fn mark_user_verified(&self, id: &Uuid, verified_at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET verified = TRUE, verified_at = $1 WHERE id = $2")
            .bind(verified_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }
}

/// Argon2 PHC string with an embedded random salt. Verification stays
/// compatible with digests produced under earlier cost parameters because
/// the parameters travel inside the string.
pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt_string = SaltString::generate(&mut OsRng);
    let salt = Salt::from(&salt_string);
    let password_hash = PasswordHash::generate(Argon2::default(), password.as_bytes(), salt)?;

    Ok(password_hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::hash_password;
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    #[test]
    fn hash_is_salted_phc_string() {
        let first = hash_password("correct horse battery staple").unwrap();
        let second = hash_password("correct horse battery staple").unwrap();

        assert!(first.starts_with("$argon2"));
        // Fresh salt per call: same password, different digests.
        assert_ne!(first, second);
    }

    #[test]
    fn hash_verifies_the_original_password_only() {
        let digest = hash_password("swordfish").unwrap();
        let parsed = PasswordHash::new(&digest).unwrap();

        assert!(Argon2::default().verify_password(b"swordfish", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"Swordfish", &parsed).is_err());
    }
}
