use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::profile::{Profile, ProfileSetupRequest, ProfileUpdateRequest};
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "user_id, full_name, contact_number, city, is_freelancer, is_business, has_completed_profile, created_at, updated_at";

impl PostgresRepository {
    /// Empty profile row created at signup; display fields arrive later via
    /// the setup flow.
    pub async fn create_empty_profile(&self, user_id: &Uuid) -> Result<(), AppError> {
        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_profile(&self, user_id: &Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    pub async fn setup_profile(&self, user_id: &Uuid, payload: &ProfileSetupRequest) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (user_id, full_name, contact_number, city, is_freelancer, is_business, has_completed_profile)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            ON CONFLICT (user_id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                contact_number = EXCLUDED.contact_number,
                city = EXCLUDED.city,
                is_freelancer = EXCLUDED.is_freelancer,
                is_business = EXCLUDED.is_business,
                has_completed_profile = TRUE,
                updated_at = now()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&payload.full_name)
        .bind(&payload.contact_number)
        .bind(&payload.city)
        .bind(payload.is_freelancer)
        .bind(payload.is_business)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn update_profile(&self, user_id: &Uuid, payload: &ProfileUpdateRequest) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($1, full_name),
                contact_number = COALESCE($2, contact_number),
                city = COALESCE($3, city),
                is_freelancer = COALESCE($4, is_freelancer),
                is_business = COALESCE($5, is_business),
                updated_at = now()
            WHERE user_id = $6
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(&payload.full_name)
        .bind(&payload.contact_number)
        .bind(&payload.city)
        .bind(payload.is_freelancer)
        .bind(payload.is_business)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }
}
