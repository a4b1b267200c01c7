use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One direct message between two users.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// One row per conversation partner, carrying the newest message.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Conversation {
    pub user_id: Uuid,
    pub name: String,
    pub picture: Option<String>,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub unread: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub user_id: Uuid,
    pub name: String,
    pub picture: Option<String>,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub unread: bool,
}

impl From<&Conversation> for ConversationResponse {
    fn from(c: &Conversation) -> Self {
        Self {
            user_id: c.user_id,
            name: c.name.clone(),
            picture: c.picture.clone(),
            last_message: c.last_message.clone(),
            last_message_at: c.last_message_at,
            unread: c.unread,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub is_mine: bool,
}

impl MessageResponse {
    pub fn for_viewer(message: &Message, viewer_id: Uuid) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            message: message.message.clone(),
            read: message.read,
            created_at: message.created_at,
            is_mine: message.sender_id == viewer_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn is_mine_follows_the_viewer() {
        let sender = Uuid::new_v4();
        let recipient = Uuid::new_v4();
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: sender,
            recipient_id: recipient,
            message: "hello".to_string(),
            read: false,
            created_at: Utc::now(),
        };

        assert!(MessageResponse::for_viewer(&message, sender).is_mine);
        assert!(!MessageResponse::for_viewer(&message, recipient).is_mine);
    }

    #[test]
    fn send_payload_rejects_empty_messages() {
        let payload = SendMessageRequest {
            recipient_id: Uuid::new_v4(),
            message: String::new(),
        };
        assert!(payload.validate().is_err());
    }
}
