use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::verification::{StartVerificationResponse, VerificationCallbackResponse};
use crate::service::verification::{PendingStore, VerificationClient};
use chrono::Utc;
use rocket::response::{Redirect, Responder};
use rocket::serde::json::Json;
use rocket::{routes, State};
use sqlx::PgPool;
use tracing::info;

#[derive(Responder)]
pub enum CallbackOutcome {
    Redirect(Redirect),
    Json(Json<VerificationCallbackResponse>),
}

#[rocket::get("/start")]
pub async fn start_verification(
    user: CurrentUser,
    client: &State<VerificationClient>,
    pending: &State<PendingStore>,
) -> Result<Json<StartVerificationResponse>, AppError> {
    let auth_url = client.generate_auth_link(user.id, pending).await?;

    Ok(Json(StartVerificationResponse { auth_url }))
}

/// Provider redirect target. The `state` value ties the callback to the
/// pending entry created by `start_verification`; each state is usable once.
#[rocket::get("/callback?<state>")]
pub async fn verification_callback(
    pool: &State<PgPool>,
    client: &State<VerificationClient>,
    pending: &State<PendingStore>,
    state: &str,
) -> Result<CallbackOutcome, AppError> {
    let now = Utc::now();

    let claim = pending
        .take(state, now)
        .ok_or_else(|| AppError::BadRequest("unknown or expired verification state".to_string()))?;

    let document = client.retrieve_document(&claim.client_token, state).await?;

    if !document.is_verified() {
        return Ok(CallbackOutcome::Json(Json(VerificationCallbackResponse {
            status: "failed".to_string(),
        })));
    }

    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.mark_user_verified(&claim.user_id, now).await?;

    info!(user_id = %claim.user_id, "identity verification completed");

    match client.success_url() {
        Some(url) => Ok(CallbackOutcome::Redirect(Redirect::to(url.to_string()))),
        None => Ok(CallbackOutcome::Json(Json(VerificationCallbackResponse {
            status: "verified".to_string(),
        }))),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![start_verification, verification_callback]
}
