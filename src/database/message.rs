use crate::database::notification::insert_notification;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::message::{Conversation, Message};
use crate::models::notification::{categories, NewNotification};
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, message, read, created_at";

impl PostgresRepository {
    /// Send a direct message. The recipient notification lands in the same
    /// transaction as the message row.
    pub async fn send_message(&self, sender_id: &Uuid, sender_name: &str, recipient_id: &Uuid, body: &str) -> Result<Message, AppError> {
        let recipient_exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(recipient_id)
            .fetch_one(&self.pool)
            .await?;
        if !recipient_exists.0 {
            return Err(AppError::NotFound("Recipient not found".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (sender_id, recipient_id, message)
            VALUES ($1, $2, $3)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(sender_id)
        .bind(recipient_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        insert_notification(
            &mut tx,
            &NewNotification {
                user_id: *recipient_id,
                category: categories::MESSAGE.to_string(),
                title: "New Message".to_string(),
                message: format!("You have a new message from {sender_name}"),
                data: Some(serde_json::json!({ "sender_id": sender_id })),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(message)
    }

    /// One row per conversation partner, newest exchange first. `unread` is
    /// true when the latest message is an unread one addressed to `user_id`.
    pub async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<Conversation>, AppError> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT t.partner_id AS user_id,
                   u.name,
                   u.picture,
                   t.message AS last_message,
                   t.created_at AS last_message_at,
                   (NOT t.read AND t.recipient_id = $1) AS unread
            FROM (
                SELECT DISTINCT ON (CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END)
                       CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END AS partner_id,
                       message, read, recipient_id, created_at
                FROM messages
                WHERE sender_id = $1 OR recipient_id = $1
                ORDER BY CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END, created_at DESC
            ) t
            JOIN users u ON u.id = t.partner_id
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(conversations)
    }

    /// Full thread between two users, oldest first. Reading the thread marks
    /// the incoming side as read.
    pub async fn list_thread(&self, user_id: &Uuid, partner_id: &Uuid) -> Result<Vec<Message>, AppError> {
        let mut tx = self.pool.begin().await?;

        let messages = sqlx::query_as::<_, Message>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC
            "#
        ))
        .bind(user_id)
        .bind(partner_id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("UPDATE messages SET read = TRUE WHERE sender_id = $1 AND recipient_id = $2 AND read = FALSE")
            .bind(partner_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(messages)
    }
}
