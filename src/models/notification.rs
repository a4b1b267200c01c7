use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Fire-and-forget record addressed to a user, produced by booking, request
/// and message events; recipients can only toggle the read flag.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub data: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for a notification insert, owned by the emitting flow.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub category: String,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

pub mod categories {
    pub const BOOKING: &str = "booking";
    pub const BOOKING_REQUEST: &str = "booking_request";
    pub const BOOKING_COMPLETED: &str = "booking_completed";
    pub const INVENTORY: &str = "inventory";
    pub const MESSAGE: &str = "message";
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub category: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub data: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            category: n.category.clone(),
            title: n.title.clone(),
            message: n.message.clone(),
            data: n.data.clone(),
            read: n.read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}
