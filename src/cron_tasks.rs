use crate::database::postgres_repository::PostgresRepository;
use crate::db::init_pool;
use crate::Config;
use chrono::Utc;

#[derive(Debug, Clone, Copy)]
pub struct CleanupSessionsResult {
    pub sessions_removed: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct CompleteBookingsResult {
    pub bookings_examined: u64,
    pub bookings_completed: u64,
}

/// Expiry sweep for the session table. Active sessions are untouched.
pub async fn cleanup_sessions(config: &Config) -> Result<CleanupSessionsResult, String> {
    let pool = init_pool(&config.database)
        .await
        .map_err(|err| format!("Failed to initialize database pool: {err}"))?;

    let repo = PostgresRepository { pool: pool.clone() };
    let sessions_removed = repo
        .cleanup_expired_sessions(Utc::now())
        .await
        .map_err(|err| format!("Failed to clean up expired sessions: {err:?}"))?;

    pool.close().await;

    Ok(CleanupSessionsResult { sessions_removed })
}

/// Completion sweep for confirmed bookings whose event date has passed.
pub async fn complete_bookings(config: &Config) -> Result<CompleteBookingsResult, String> {
    let pool = init_pool(&config.database)
        .await
        .map_err(|err| format!("Failed to initialize database pool: {err}"))?;

    let repo = PostgresRepository { pool: pool.clone() };
    let result = repo
        .complete_due_bookings(Utc::now().date_naive())
        .await
        .map_err(|err| format!("Failed to complete due bookings: {err:?}"))?;

    pool.close().await;

    Ok(CompleteBookingsResult {
        bookings_examined: result.examined,
        bookings_completed: result.completed,
    })
}
