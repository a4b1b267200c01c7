use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use chrono::Utc;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

pub(crate) fn parse_bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

async fn resolve_token(req: &Request<'_>, token: &str) -> RequestOutcome<CurrentUser, AppError> {
    let pool = match req.rocket().state::<PgPool>() {
        Some(pool) => pool,
        None => return Outcome::Error((Status::InternalServerError, AppError::Unauthorized)),
    };

    let repo = PostgresRepository { pool: pool.clone() };
    let now = Utc::now();

    match repo.get_active_session_user(token, now).await {
        Ok(Some(user)) => {
            let current_user = CurrentUser {
                id: user.id,
                email: user.email,
                name: user.name,
            };
            req.local_cache(|| Some(current_user.clone()));
            Outcome::Success(current_user)
        }
        Ok(None) => {
            let _ = repo.delete_session_if_expired(token, now).await;
            Outcome::Error((Status::Unauthorized, AppError::InvalidCredentials))
        }
        // Fail closed: a datastore error never authenticates.
        Err(err) => Outcome::Error((Status::InternalServerError, err)),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let token = req.headers().get_one("Authorization").and_then(parse_bearer_token);

        match token {
            Some(token) => resolve_token(req, token).await,
            None => Outcome::Error((Status::Unauthorized, AppError::InvalidCredentials)),
        }
    }
}

/// Raw bearer token, for the endpoints that operate on the session itself
/// rather than on the user behind it.
pub struct BearerToken(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let token = req.headers().get_one("Authorization").and_then(parse_bearer_token);

        match token {
            Some(token) => Outcome::Success(BearerToken(token.to_string())),
            None => Outcome::Error((Status::Unauthorized, AppError::InvalidCredentials)),
        }
    }
}

/// Optional authentication for endpoints that also serve guests. A missing
/// Authorization header resolves to a guest; a header that is present but
/// does not resolve to an active session is still a hard 401.
pub struct MaybeUser(pub Option<CurrentUser>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for MaybeUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let header = match req.headers().get_one("Authorization") {
            Some(header) => header,
            None => return Outcome::Success(MaybeUser(None)),
        };

        let token = match parse_bearer_token(header) {
            Some(token) => token,
            None => return Outcome::Error((Status::Unauthorized, AppError::InvalidCredentials)),
        };

        match resolve_token(req, token).await {
            Outcome::Success(user) => Outcome::Success(MaybeUser(Some(user))),
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(f) => Outcome::Forward(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_bearer_token;

    #[test]
    fn parses_bearer_header() {
        assert_eq!(parse_bearer_token("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn trims_extra_whitespace_after_scheme() {
        assert_eq!(parse_bearer_token("Bearer   abc123  "), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(parse_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer_token("bearer abc123"), None);
    }

    #[test]
    fn rejects_empty_tokens() {
        assert_eq!(parse_bearer_token("Bearer "), None);
        assert_eq!(parse_bearer_token("Bearer"), None);
    }
}
