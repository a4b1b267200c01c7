use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Completed,
}

/// A confirmed engagement, either created directly or promoted from an
/// accepted booking request.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub client_id: Option<Uuid>,
    pub service_type: String,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub duration: Option<String>,
    pub budget: Option<f64>,
    pub special_requirements: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub provider_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub service_type: String,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub duration: Option<String>,
    pub budget: Option<f64>,
    pub special_requirements: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub provider_id: Uuid,
    pub client_id: Option<Uuid>,
    pub service_type: String,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub duration: Option<String>,
    pub budget: Option<f64>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for BookingResponse {
    fn from(b: &Booking) -> Self {
        Self {
            booking_id: b.id,
            provider_id: b.provider_id,
            client_id: b.client_id,
            service_type: b.service_type.clone(),
            event_date: b.event_date.clone(),
            event_time: b.event_time.clone(),
            duration: b.duration.clone(),
            budget: b.budget,
            status: b.status,
            created_at: b.created_at,
        }
    }
}

const EVENT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Parse a free-text event date. Bookings store whatever the client typed,
/// so the completion sweep has to tolerate several formats and give up
/// quietly on anything else.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    EVENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Whether a confirmed booking with this event date should be swept to
/// completed. Absent or unparseable dates never force completion.
pub fn is_due(event_date: Option<&str>, today: NaiveDate) -> bool {
    event_date
        .and_then(parse_event_date)
        .map(|date| date <= today)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_event_date("2026-08-24"), Some(date(2026, 8, 24)));
    }

    #[test]
    fn parses_day_first_dashed_date() {
        assert_eq!(parse_event_date("24-08-2026"), Some(date(2026, 8, 24)));
    }

    #[test]
    fn parses_day_first_slashed_date() {
        assert_eq!(parse_event_date("24/08/2026"), Some(date(2026, 8, 24)));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_event_date("  2026-08-24 "), Some(date(2026, 8, 24)));
    }

    #[test]
    fn rejects_garbage_and_empty_input() {
        assert_eq!(parse_event_date(""), None);
        assert_eq!(parse_event_date("   "), None);
        assert_eq!(parse_event_date("next tuesday"), None);
        assert_eq!(parse_event_date("2026-13-40"), None);
    }

    #[test]
    fn yesterday_is_due_tomorrow_is_not() {
        let today = date(2026, 8, 25);
        assert!(is_due(Some("2026-08-24"), today));
        assert!(is_due(Some("25/08/2026"), today));
        assert!(!is_due(Some("2026-08-26"), today));
    }

    #[test]
    fn unparseable_or_missing_dates_are_never_due() {
        let today = date(2026, 8, 25);
        assert!(!is_due(Some("soonish"), today));
        assert!(!is_due(None, today));
    }

    proptest! {
        #[test]
        fn arbitrary_input_never_panics(raw in ".*") {
            let _ = parse_event_date(&raw);
        }

        #[test]
        fn iso_dates_round_trip(y in 1970i32..2100, m in 1u32..=12, d in 1u32..=28) {
            let formatted = format!("{y:04}-{m:02}-{d:02}");
            prop_assert_eq!(parse_event_date(&formatted), NaiveDate::from_ymd_opt(y, m, d));
        }
    }
}
