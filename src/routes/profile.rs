use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::profile::{ProfileResponse, ProfileSetupRequest, ProfileUpdateRequest};
use rocket::serde::json::Json;
use rocket::{routes, State};
use sqlx::PgPool;
use validator::Validate;

#[rocket::get("/")]
pub async fn get_profile(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<ProfileResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let response = match repo.get_profile(&user.id).await? {
        Some(profile) => ProfileResponse::from(&profile),
        // The profile row is created lazily; answer with an empty shape
        // until setup has run.
        None => ProfileResponse::empty_for(user.id, &user.name),
    };

    Ok(Json(response))
}

#[rocket::post("/setup", data = "<payload>")]
pub async fn setup_profile(pool: &State<PgPool>, user: CurrentUser, payload: Json<ProfileSetupRequest>) -> Result<Json<ProfileResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let profile = repo.setup_profile(&user.id, &payload).await?;

    Ok(Json(ProfileResponse::from(&profile)))
}

#[rocket::put("/", data = "<payload>")]
pub async fn update_profile(pool: &State<PgPool>, user: CurrentUser, payload: Json<ProfileUpdateRequest>) -> Result<Json<ProfileResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let profile = repo.update_profile(&user.id, &payload).await?;

    Ok(Json(ProfileResponse::from(&profile)))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![get_profile, setup_profile, update_profile]
}

#[cfg(test)]
mod tests {
    use crate::models::profile::{ProfileSetupRequest, ProfileUpdateRequest};
    use validator::Validate;

    #[test]
    fn setup_payload_rejects_empty_fields() {
        let payload = ProfileSetupRequest {
            full_name: String::new(),
            contact_number: "555-0101".to_string(),
            city: "Pune".to_string(),
            is_freelancer: true,
            is_business: false,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_payload_allows_partial_input() {
        let payload = ProfileUpdateRequest {
            full_name: None,
            contact_number: None,
            city: Some("Mumbai".to_string()),
            is_freelancer: None,
            is_business: None,
        };
        assert!(payload.validate().is_ok());
    }
}
