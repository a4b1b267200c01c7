use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

/// Requests move pending -> accepted | rejected and stay there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// An unconfirmed ask for a service or equipment rental, addressed to a
/// provider. `client_id` is absent for guest requests.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRequest {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub service_type: String,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub duration_hours: Option<i32>,
    pub message: Option<String>,
    pub inventory_items: Option<Json<Vec<Uuid>>>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookingRequest {
    pub fn inventory_item_ids(&self) -> &[Uuid] {
        self.inventory_items.as_ref().map(|items| items.0.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequestPayload {
    pub provider_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub service_type: String,
    #[validate(length(min = 1, max = 120))]
    pub client_name: Option<String>,
    #[validate(email)]
    pub client_email: Option<String>,
    #[validate(length(max = 32))]
    pub client_phone: Option<String>,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    #[validate(range(min = 1, max = 24))]
    pub duration_hours: Option<i32>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    pub inventory_items: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize)]
pub struct BookingRequestResponse {
    pub request_id: Uuid,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub service_type: String,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub duration_hours: Option<i32>,
    pub message: Option<String>,
    pub inventory_items: Vec<Uuid>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&BookingRequest> for BookingRequestResponse {
    fn from(r: &BookingRequest) -> Self {
        Self {
            request_id: r.id,
            client_name: r.client_name.clone(),
            client_email: r.client_email.clone(),
            client_phone: r.client_phone.clone(),
            service_type: r.service_type.clone(),
            event_date: r.event_date.clone(),
            event_time: r.event_time.clone(),
            duration_hours: r.duration_hours,
            message: r.message.clone(),
            inventory_items: r.inventory_item_ids().to_vec(),
            status: r.status,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestDecisionResponse {
    pub status: RequestStatus,
}
