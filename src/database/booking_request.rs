use crate::database::notification::insert_notification;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::booking::Booking;
use crate::models::booking_request::{BookingRequest, CreateBookingRequestPayload, RequestStatus};
use crate::models::inventory::InventoryItem;
use crate::models::notification::{categories, NewNotification};
use crate::models::profile::Profile;
use crate::service::booking_rules::{check_rental_exclusivity, check_rental_quantities, is_rental_request, requester_is_constrained};
use sqlx::types::Json;
use sqlx::PgConnection;
use uuid::Uuid;

const REQUEST_COLUMNS: &str = "id, provider_id, client_id, client_name, client_email, client_phone, service_type, event_date, event_time, duration_hours, message, inventory_items, status, created_at, updated_at";

const BOOKING_COLUMNS: &str =
    "id, provider_id, client_id, service_type, event_date, event_time, duration, budget, special_requirements, status, created_at, updated_at";

impl PostgresRepository {
    pub async fn create_booking_request(&self, client_id: Option<Uuid>, payload: &CreateBookingRequestPayload) -> Result<BookingRequest, AppError> {
        let request = sqlx::query_as::<_, BookingRequest>(&format!(
            r#"
            INSERT INTO booking_requests
                (provider_id, client_id, client_name, client_email, client_phone,
                 service_type, event_date, event_time, duration_hours, message, inventory_items, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending')
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(payload.provider_id)
        .bind(client_id)
        .bind(&payload.client_name)
        .bind(&payload.client_email)
        .bind(&payload.client_phone)
        .bind(&payload.service_type)
        .bind(&payload.event_date)
        .bind(&payload.event_time)
        .bind(payload.duration_hours)
        .bind(&payload.message)
        .bind(payload.inventory_items.clone().map(Json))
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Provider inbox, newest first.
    pub async fn list_booking_requests_for_provider(&self, provider_id: &Uuid) -> Result<Vec<BookingRequest>, AppError> {
        let requests = sqlx::query_as::<_, BookingRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM booking_requests WHERE provider_id = $1 ORDER BY created_at DESC"
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// pending -> accepted, with the rental guards, the promoted booking and
    /// the requester notification all inside one transaction. A guard
    /// failure or a mid-sequence error rolls everything back, so a request
    /// can never end up accepted without its booking.
    pub async fn accept_booking_request(&self, request_id: &Uuid, provider_id: &Uuid) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock against a concurrent decision on the same request; the
        // rental guards below take their own lock on the requester.
        let request = sqlx::query_as::<_, BookingRequest>(&format!("SELECT {REQUEST_COLUMNS} FROM booking_requests WHERE id = $1 FOR UPDATE"))
            .bind(request_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking request not found".to_string()))?;

        if request.provider_id != *provider_id {
            return Err(AppError::Forbidden);
        }
        if request.status != RequestStatus::Pending {
            return Err(AppError::rule("booking request is already resolved"));
        }

        self.check_rental_rules(&mut tx, &request).await?;

        sqlx::query("UPDATE booking_requests SET status = 'accepted', updated_at = now() WHERE id = $1")
            .bind(request.id)
            .execute(&mut *tx)
            .await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (provider_id, client_id, service_type, event_date, event_time, duration, budget, special_requirements, status)
            VALUES ($1, $2, $3, $4, $5, $6, NULL, $7, 'confirmed')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(request.provider_id)
        .bind(request.client_id)
        .bind(&request.service_type)
        .bind(&request.event_date)
        .bind(&request.event_time)
        .bind(request.duration_hours.map(|h| format!("{h}h")))
        .bind(&request.message)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(client_id) = request.client_id {
            insert_notification(
                &mut tx,
                &NewNotification {
                    user_id: client_id,
                    category: categories::BOOKING_REQUEST.to_string(),
                    title: "Request Accepted".to_string(),
                    message: format!("Your {} request was accepted", request.service_type),
                    data: Some(serde_json::json!({ "request_id": request.id, "booking_id": booking.id })),
                },
            )
            .await?;
        }

        tx.commit().await?;

        Ok(booking)
    }

    /// Rental guards for freelancer requesters, evaluated on the open
    /// acceptance transaction so the exclusivity check cannot race a
    /// concurrent acceptance.
    async fn check_rental_rules(&self, tx: &mut PgConnection, request: &BookingRequest) -> Result<(), AppError> {
        if !is_rental_request(&request.service_type) {
            return Ok(());
        }

        let client_id = match request.client_id {
            Some(client_id) => client_id,
            // Guest rental requests are rejected at creation; a legacy row
            // without a requester has nobody to constrain.
            None => return Ok(()),
        };

        // Lock the requester's profile row so acceptances of two different
        // requests from the same requester serialize here. Without a common
        // lock, both transactions could count zero accepted rentals and both
        // commit, defeating the exclusivity rule.
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT user_id, full_name, contact_number, city, is_freelancer, is_business, has_completed_profile, created_at, updated_at FROM profiles WHERE user_id = $1 FOR UPDATE",
        )
        .bind(client_id)
        .fetch_optional(&mut *tx)
        .await?;

        let constrained = profile.as_ref().map(requester_is_constrained).unwrap_or(false);
        if !constrained {
            return Ok(());
        }

        let item_ids = request.inventory_item_ids();
        if !item_ids.is_empty() {
            let items = sqlx::query_as::<_, InventoryItem>(
                "SELECT id, owner_id, equipment_type, brand, model, serial_number, purchase_date, condition_status, availability_status, rental_price_6h, rental_price_8h, rental_price_12h, rental_price_24h, maintenance_notes, created_at, updated_at FROM inventory_items WHERE id = ANY($1)",
            )
            .bind(item_ids.to_vec())
            .fetch_all(&mut *tx)
            .await?;

            check_rental_quantities(items.iter().map(|item| item.equipment_type.as_str()))?;
        }

        let accepted: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM booking_requests WHERE client_id = $1 AND service_type = $2 AND status = 'accepted' AND id <> $3",
        )
        .bind(client_id)
        .bind(&request.service_type)
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await?;

        check_rental_exclusivity(accepted.0)
    }

    /// pending -> rejected. No booking is synthesized; the requester still
    /// hears about the decision.
    pub async fn reject_booking_request(&self, request_id: &Uuid, provider_id: &Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, BookingRequest>(&format!("SELECT {REQUEST_COLUMNS} FROM booking_requests WHERE id = $1 FOR UPDATE"))
            .bind(request_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking request not found".to_string()))?;

        if request.provider_id != *provider_id {
            return Err(AppError::Forbidden);
        }
        if request.status != RequestStatus::Pending {
            return Err(AppError::rule("booking request is already resolved"));
        }

        sqlx::query("UPDATE booking_requests SET status = 'rejected', updated_at = now() WHERE id = $1")
            .bind(request.id)
            .execute(&mut *tx)
            .await?;

        if let Some(client_id) = request.client_id {
            insert_notification(
                &mut tx,
                &NewNotification {
                    user_id: client_id,
                    category: categories::BOOKING_REQUEST.to_string(),
                    title: "Request Rejected".to_string(),
                    message: format!("Your {} request was rejected", request.service_type),
                    data: Some(serde_json::json!({ "request_id": request.id })),
                },
            )
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Providers may delete their requests in any state. Bookings already
    /// promoted from the request are untouched.
    pub async fn delete_booking_request(&self, request_id: &Uuid, provider_id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM booking_requests WHERE id = $1 AND provider_id = $2")
            .bind(request_id)
            .bind(provider_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Booking request not found".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::database::postgres_repository::PostgresRepository;
    use crate::db::init_pool;
    use crate::models::booking_request::CreateBookingRequestPayload;
    use crate::models::inventory::InventoryItemRequest;
    use crate::models::profile::ProfileSetupRequest;
    use crate::Config;
    use uuid::Uuid;

    async fn test_repo() -> PostgresRepository {
        let config = Config::load().expect("valid configuration");
        let pool = init_pool(&config.database).await.expect("database pool");
        PostgresRepository { pool }
    }

    async fn signup_freelancer(repo: &PostgresRepository) -> Uuid {
        let email = format!("freelancer-{}@example.com", Uuid::new_v4());
        let user = repo.create_user("Freelancer", &email, "correct horse battery staple").await.unwrap();
        repo.setup_profile(
            &user.id,
            &ProfileSetupRequest {
                full_name: "Freelance Renter".to_string(),
                contact_number: "555-0101".to_string(),
                city: "Pune".to_string(),
                is_freelancer: true,
                is_business: false,
            },
        )
        .await
        .unwrap();
        user.id
    }

    fn camera(serial: &str) -> InventoryItemRequest {
        InventoryItemRequest {
            equipment_type: "Camera".to_string(),
            brand: "Canon".to_string(),
            model: "R6".to_string(),
            serial_number: serial.to_string(),
            purchase_date: None,
            condition_status: None,
            rental_price_6h: None,
            rental_price_8h: None,
            rental_price_12h: None,
            rental_price_24h: Some(120.0),
            maintenance_notes: None,
        }
    }

    fn rental_payload(provider_id: Uuid, item: Uuid) -> CreateBookingRequestPayload {
        CreateBookingRequestPayload {
            provider_id,
            service_type: "camera_rental".to_string(),
            client_name: None,
            client_email: None,
            client_phone: None,
            event_date: Some("2026-09-12".to_string()),
            event_time: None,
            duration_hours: Some(8),
            message: None,
            inventory_items: Some(vec![item]),
        }
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn concurrent_acceptances_for_one_freelancer_yield_a_single_rental() {
        let repo = test_repo().await;

        let provider_email = format!("provider-{}@example.com", Uuid::new_v4());
        let provider = repo.create_user("Provider", &provider_email, "correct horse battery staple").await.unwrap();
        let renter_id = signup_freelancer(&repo).await;

        let cam_a = repo.create_inventory_item(&provider.id, &camera("SN-A")).await.unwrap();
        let cam_b = repo.create_inventory_item(&provider.id, &camera("SN-B")).await.unwrap();

        let first = repo
            .create_booking_request(Some(renter_id), &rental_payload(provider.id, cam_a.id))
            .await
            .unwrap();
        let second = repo
            .create_booking_request(Some(renter_id), &rental_payload(provider.id, cam_b.id))
            .await
            .unwrap();

        // Both acceptances race on the same requester. The profile row lock
        // forces them to serialize, so exactly one may win.
        let (a, b) = tokio::join!(
            repo.accept_booking_request(&first.id, &provider.id),
            repo.accept_booking_request(&second.id, &provider.id),
        );

        assert!(
            a.is_ok() != b.is_ok(),
            "expected exactly one acceptance to succeed, got a={:?} b={:?}",
            a.as_ref().map(|booking| booking.id),
            b.as_ref().map(|booking| booking.id),
        );
    }
}
