use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::notification::{NotificationResponse, UnreadCountResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{routes, State};
use sqlx::PgPool;
use uuid::Uuid;

#[rocket::get("/")]
pub async fn list_notifications(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let notifications = repo.list_notifications(&user.id).await?;

    Ok(Json(notifications.iter().map(NotificationResponse::from).collect()))
}

#[rocket::get("/unread-count")]
pub async fn unread_count(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<UnreadCountResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let unread_count = repo.unread_notification_count(&user.id).await?;

    Ok(Json(UnreadCountResponse { unread_count }))
}

#[rocket::put("/read")]
pub async fn mark_all_read(pool: &State<PgPool>, user: CurrentUser) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.mark_all_notifications_read(&user.id).await?;

    Ok(Status::NoContent)
}

#[rocket::put("/<id>/read")]
pub async fn mark_read(pool: &State<PgPool>, user: CurrentUser, id: Uuid) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.mark_notification_read(&id, &user.id).await?;

    Ok(Status::NoContent)
}

#[rocket::delete("/<id>")]
pub async fn delete_notification(pool: &State<PgPool>, user: CurrentUser, id: Uuid) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.delete_notification(&id, &user.id).await?;

    Ok(Status::NoContent)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_notifications, unread_count, mark_all_read, mark_read, delete_notification]
}
