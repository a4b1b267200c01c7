use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Identity joined through an active session row.
#[derive(Debug, sqlx::FromRow)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl Session {
    /// A session is active strictly before its expiry instant. A token
    /// presented exactly at `expires_at` is already dead.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn session_expiring_at(expires_at: chrono::DateTime<chrono::Utc>) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "0".repeat(64),
            created_at: expires_at - Duration::hours(24),
            expires_at,
        }
    }

    #[test]
    fn active_before_expiry() {
        let now = Utc::now();
        let session = session_expiring_at(now + Duration::seconds(1));
        assert!(session.is_active(now));
    }

    #[test]
    fn inactive_exactly_at_expiry() {
        let now = Utc::now();
        let session = session_expiring_at(now);
        assert!(!session.is_active(now));
    }

    #[test]
    fn inactive_after_expiry() {
        let now = Utc::now();
        let session = session_expiring_at(now - Duration::seconds(1));
        assert!(!session.is_active(now));
    }
}
