use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::notification::{NewNotification, Notification};
use sqlx::PgConnection;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str = "id, user_id, category, title, message, data, read, created_at";

/// Insert a notification on an open connection so the emitting flow can
/// bundle it into its own transaction.
pub(crate) async fn insert_notification(conn: &mut PgConnection, notification: &NewNotification) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications (user_id, category, title, message, data)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(notification.user_id)
    .bind(&notification.category)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(&notification.data)
    .execute(conn)
    .await?;

    Ok(())
}

impl PostgresRepository {
    pub async fn create_notification(&self, notification: &NewNotification) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        insert_notification(&mut conn, notification).await?;

        Ok(())
    }

    pub async fn list_notifications(&self, user_id: &Uuid) -> Result<Vec<Notification>, AppError> {
        let notifications =
            sqlx::query_as::<_, Notification>(&format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(notifications)
    }

    pub async fn unread_notification_count(&self, user_id: &Uuid) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    pub async fn mark_all_notifications_read(&self, user_id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn mark_notification_read(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }

    pub async fn delete_notification(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
