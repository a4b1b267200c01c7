use crate::database::notification::insert_notification;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::booking::{is_due, Booking, CreateBookingRequest};
use crate::models::notification::{categories, NewNotification};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

const BOOKING_COLUMNS: &str =
    "id, provider_id, client_id, service_type, event_date, event_time, duration, budget, special_requirements, status, created_at, updated_at";

#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionSweepResult {
    pub examined: u64,
    pub completed: u64,
}

impl PostgresRepository {
    /// Direct booking creation. The provider notification lands in the same
    /// transaction as the booking row.
    pub async fn create_booking(&self, client_id: &Uuid, payload: &CreateBookingRequest) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (provider_id, client_id, service_type, event_date, event_time, duration, budget, special_requirements, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(payload.provider_id)
        .bind(client_id)
        .bind(&payload.service_type)
        .bind(&payload.event_date)
        .bind(&payload.event_time)
        .bind(&payload.duration)
        .bind(payload.budget)
        .bind(&payload.special_requirements)
        .fetch_one(&mut *tx)
        .await?;

        insert_notification(
            &mut tx,
            &NewNotification {
                user_id: payload.provider_id,
                category: categories::BOOKING.to_string(),
                title: "New Booking".to_string(),
                message: format!("You have a new booking request for {}", payload.service_type),
                data: Some(serde_json::json!({ "booking_id": booking.id })),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(booking)
    }

    /// All bookings where the user appears as client or provider.
    pub async fn list_bookings_for_user(&self, user_id: &Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE client_id = $1 OR provider_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn list_bookings_as_client(&self, client_id: &Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE client_id = $1 ORDER BY created_at DESC"))
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }

    /// Completion sweep: confirmed bookings whose event date is on or before
    /// `today` move to completed, with one provider notification each.
    ///
    /// The status guard on the UPDATE makes the sweep idempotent: a booking
    /// that a concurrent run (or a previous tick) already completed matches
    /// zero rows, so its notification is never duplicated. Per-booking
    /// failures are logged and skipped; the datastore retry is simply the
    /// next scheduled tick.
    pub async fn complete_due_bookings(&self, today: NaiveDate) -> Result<CompletionSweepResult, AppError> {
        let candidates = sqlx::query_as::<_, Booking>(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = 'confirmed'"))
            .fetch_all(&self.pool)
            .await?;

        let mut result = CompletionSweepResult::default();

        for booking in candidates {
            result.examined += 1;

            if !is_due(booking.event_date.as_deref(), today) {
                continue;
            }

            match self.complete_booking(&booking).await {
                Ok(true) => result.completed += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(booking_id = %booking.id, error = ?e, "failed to complete booking, will retry next sweep");
                }
            }
        }

        info!(examined = result.examined, completed = result.completed, "booking completion sweep finished");

        Ok(result)
    }

    async fn complete_booking(&self, booking: &Booking) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE bookings SET status = 'completed', updated_at = now() WHERE id = $1 AND status = 'confirmed'")
            .bind(booking.id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            // Already completed by an earlier run; nothing to notify.
            return Ok(false);
        }

        insert_notification(
            &mut tx,
            &NewNotification {
                user_id: booking.provider_id,
                category: categories::BOOKING_COMPLETED.to_string(),
                title: "Booking Completed".to_string(),
                message: format!("Booking {} completed.", booking.id),
                data: Some(serde_json::json!({ "booking_id": booking.id })),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    pub async fn get_booking(&self, id: &Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }
}
