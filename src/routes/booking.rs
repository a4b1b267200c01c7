use crate::auth::{CurrentUser, MaybeUser};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::booking::{BookingResponse, CreateBookingRequest};
use crate::models::booking_request::{BookingRequestResponse, CreateBookingRequestPayload, RequestDecisionResponse, RequestStatus};
use crate::service::booking_rules::is_rental_request;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{routes, State};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::post("/", data = "<payload>")]
pub async fn create_booking(pool: &State<PgPool>, user: CurrentUser, payload: Json<CreateBookingRequest>) -> Result<(Status, Json<BookingResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let booking = repo.create_booking(&user.id, &payload).await?;

    Ok((Status::Created, Json(BookingResponse::from(&booking))))
}

#[rocket::get("/")]
pub async fn list_bookings(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let bookings = repo.list_bookings_for_user(&user.id).await?;

    Ok(Json(bookings.iter().map(BookingResponse::from).collect()))
}

#[rocket::get("/mine")]
pub async fn list_my_bookings(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let bookings = repo.list_bookings_as_client(&user.id).await?;

    Ok(Json(bookings.iter().map(BookingResponse::from).collect()))
}

pub fn booking_routes() -> Vec<rocket::Route> {
    routes![create_booking, list_bookings, list_my_bookings]
}

#[rocket::post("/", data = "<payload>")]
pub async fn create_request(pool: &State<PgPool>, user: MaybeUser, payload: Json<CreateBookingRequestPayload>) -> Result<(Status, Json<BookingRequestResponse>), AppError> {
    payload.validate()?;

    let client_id = match &user.0 {
        Some(user) => Some(user.id),
        None => {
            // Guests must identify themselves in the payload, and rental
            // requests always need an account behind them because the
            // rental guards are evaluated against the requester's profile.
            if is_rental_request(&payload.service_type) {
                return Err(AppError::rule("equipment rental requests require an account"));
            }
            if payload.client_name.is_none() || payload.client_email.is_none() {
                return Err(AppError::BadRequest("guest requests must include client_name and client_email".to_string()));
            }
            None
        }
    };

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let request = repo.create_booking_request(client_id, &payload).await?;

    Ok((Status::Created, Json(BookingRequestResponse::from(&request))))
}

#[rocket::get("/")]
pub async fn list_requests(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<Vec<BookingRequestResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let requests = repo.list_booking_requests_for_provider(&user.id).await?;

    Ok(Json(requests.iter().map(BookingRequestResponse::from).collect()))
}

#[rocket::put("/<id>/accept")]
pub async fn accept_request(pool: &State<PgPool>, user: CurrentUser, id: Uuid) -> Result<Json<BookingResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let booking = repo.accept_booking_request(&id, &user.id).await?;

    Ok(Json(BookingResponse::from(&booking)))
}

#[rocket::put("/<id>/reject")]
pub async fn reject_request(pool: &State<PgPool>, user: CurrentUser, id: Uuid) -> Result<Json<RequestDecisionResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.reject_booking_request(&id, &user.id).await?;

    Ok(Json(RequestDecisionResponse {
        status: RequestStatus::Rejected,
    }))
}

#[rocket::delete("/<id>")]
pub async fn delete_request(pool: &State<PgPool>, user: CurrentUser, id: Uuid) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.delete_booking_request(&id, &user.id).await?;

    Ok(Status::NoContent)
}

pub fn request_routes() -> Vec<rocket::Route> {
    routes![create_request, list_requests, accept_request, reject_request, delete_request]
}
