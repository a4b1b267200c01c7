use crate::auth::{BearerToken, CurrentUser};
use crate::config::Config;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{AuthResponse, LoginRequest, MeResponse, SignupRequest};
use chrono::{Duration, Utc};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{routes, State};
use sqlx::PgPool;
use validator::Validate;

fn session_ttl(config: &Config) -> Duration {
    Duration::hours(config.session.ttl_hours)
}

#[rocket::post("/signup", data = "<payload>")]
pub async fn signup(pool: &State<PgPool>, config: &State<Config>, payload: Json<SignupRequest>) -> Result<(Status, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };

    // Early duplicate check for a friendly error; the unique index on email
    // still decides races.
    if repo.get_user_by_email(&payload.email).await?.is_some() {
        return Err(AppError::UserAlreadyExists(payload.email.clone()));
    }

    let user = repo.create_user(&payload.name, &payload.email, &payload.password).await?;
    repo.create_empty_profile(&user.id).await?;

    let session = repo.create_session(&user.id, session_ttl(config), Utc::now()).await?;

    Ok((
        Status::Created,
        Json(AuthResponse {
            access_token: session.token,
            expires_at: session.expires_at,
        }),
    ))
}

#[rocket::post("/login", data = "<payload>")]
pub async fn login(pool: &State<PgPool>, config: &State<Config>, payload: Json<LoginRequest>) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };

    let user = match repo.get_user_by_email(&payload.email).await? {
        Some(user) => user,
        None => {
            // Burn a verification anyway so unknown emails are not
            // distinguishable by response time.
            PostgresRepository::dummy_verify(&payload.password);
            return Err(AppError::InvalidCredentials);
        }
    };

    repo.verify_password(&user, &payload.password).await?;

    let session = repo.create_session(&user.id, session_ttl(config), Utc::now()).await?;

    Ok(Json(AuthResponse {
        access_token: session.token,
        expires_at: session.expires_at,
    }))
}

#[rocket::post("/refresh")]
pub async fn refresh(pool: &State<PgPool>, config: &State<Config>, token: BearerToken) -> Result<Json<AuthResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let session = repo.refresh_session(&token.0, session_ttl(config), Utc::now()).await?;

    Ok(Json(AuthResponse {
        access_token: session.token,
        expires_at: session.expires_at,
    }))
}

#[rocket::post("/logout")]
pub async fn logout(pool: &State<PgPool>, token: BearerToken) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.delete_session_by_token(&token.0).await?;

    Ok(Status::NoContent)
}

#[rocket::get("/me")]
pub async fn me(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<MeResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let user = repo.get_user_by_id(&user.id).await?.ok_or(AppError::UserNotFound)?;

    Ok(Json(MeResponse::from(&user)))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![signup, login, refresh, logout, me]
}

#[cfg(test)]
mod tests {
    use crate::models::user::{AuthResponse, LoginRequest, SignupRequest};
    use validator::Validate;

    #[test]
    fn signup_payload_rejects_short_passwords() {
        let payload = SignupRequest {
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            password: "short".to_string(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn signup_payload_rejects_malformed_emails() {
        let payload = SignupRequest {
            email: "not-an-email".to_string(),
            name: "Ana".to_string(),
            password: "long enough password".to_string(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn login_payload_requires_a_password() {
        let payload = LoginRequest {
            email: "ana@example.com".to_string(),
            password: String::new(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn auth_response_serializes_token_and_expiry() {
        let response = AuthResponse {
            access_token: "ab".repeat(32),
            expires_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("access_token").is_some());
        assert!(json.get("expires_at").is_some());
    }

    mod end_to_end {
        use crate::models::user::AuthResponse;
        use crate::{build_rocket, Config};
        use rocket::http::{Header, Status};
        use rocket::local::asynchronous::Client;
        use uuid::Uuid;

        fn bearer(token: &str) -> Header<'static> {
            Header::new("Authorization", format!("Bearer {token}"))
        }

        #[rocket::async_test]
        #[ignore = "requires database"]
        async fn signup_login_and_me_round_trip() {
            let config = Config::load().expect("valid configuration");
            let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");

            let email = format!("user-{}@example.com", Uuid::new_v4());
            let signup = client
                .post("/api/auth/signup")
                .json(&serde_json::json!({
                    "email": email,
                    "name": "Test User",
                    "password": "correct horse battery staple",
                }))
                .dispatch()
                .await;
            assert_eq!(signup.status(), Status::Created);
            let first: AuthResponse = signup.into_json().await.expect("auth response");

            // A second login replaces the session; the first token dies.
            let login = client
                .post("/api/auth/login")
                .json(&serde_json::json!({
                    "email": email,
                    "password": "correct horse battery staple",
                }))
                .dispatch()
                .await;
            assert_eq!(login.status(), Status::Ok);
            let second: AuthResponse = login.into_json().await.expect("auth response");
            assert_ne!(first.access_token, second.access_token);

            let me = client.get("/api/auth/me").header(bearer(&second.access_token)).dispatch().await;
            assert_eq!(me.status(), Status::Ok);

            let stale = client.get("/api/auth/me").header(bearer(&first.access_token)).dispatch().await;
            assert_eq!(stale.status(), Status::Unauthorized);
        }

        #[rocket::async_test]
        #[ignore = "requires database"]
        async fn duplicate_email_signup_conflicts_and_keeps_one_account() {
            let config = Config::load().expect("valid configuration");
            let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");

            let email = format!("user-{}@example.com", Uuid::new_v4());
            let first = client
                .post("/api/auth/signup")
                .json(&serde_json::json!({
                    "email": email,
                    "name": "First",
                    "password": "correct horse battery staple",
                }))
                .dispatch()
                .await;
            assert_eq!(first.status(), Status::Created);

            let duplicate = client
                .post("/api/auth/signup")
                .json(&serde_json::json!({
                    "email": email,
                    "name": "Second",
                    "password": "a completely different password",
                }))
                .dispatch()
                .await;
            assert_eq!(duplicate.status(), Status::Conflict);

            // The original account is untouched: its password still logs in
            // and resolves to the original name.
            let login = client
                .post("/api/auth/login")
                .json(&serde_json::json!({ "email": email, "password": "correct horse battery staple" }))
                .dispatch()
                .await;
            assert_eq!(login.status(), Status::Ok);
            let auth: AuthResponse = login.into_json().await.expect("auth response");

            let me = client.get("/api/auth/me").header(bearer(&auth.access_token)).dispatch().await;
            assert_eq!(me.status(), Status::Ok);
            let me: serde_json::Value = me.into_json().await.expect("me response");
            assert_eq!(me["name"], "First");
        }

        #[rocket::async_test]
        #[ignore = "requires database"]
        async fn wrong_password_and_unknown_email_are_indistinguishable() {
            let config = Config::load().expect("valid configuration");
            let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");

            let email = format!("user-{}@example.com", Uuid::new_v4());
            let signup = client
                .post("/api/auth/signup")
                .json(&serde_json::json!({
                    "email": email,
                    "name": "Test User",
                    "password": "correct horse battery staple",
                }))
                .dispatch()
                .await;
            assert_eq!(signup.status(), Status::Created);

            let wrong_password = client
                .post("/api/auth/login")
                .json(&serde_json::json!({ "email": email, "password": "wrong password here" }))
                .dispatch()
                .await;
            let unknown_email = client
                .post("/api/auth/login")
                .json(&serde_json::json!({
                    "email": format!("nobody-{}@example.com", Uuid::new_v4()),
                    "password": "wrong password here",
                }))
                .dispatch()
                .await;

            assert_eq!(wrong_password.status(), Status::Unauthorized);
            assert_eq!(unknown_email.status(), Status::Unauthorized);
        }
    }
}
