use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One-to-one extension of a user, created lazily on setup or first access.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub contact_number: Option<String>,
    pub city: Option<String>,
    pub is_freelancer: bool,
    pub is_business: bool,
    pub has_completed_profile: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileSetupRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(length(min = 1, max = 32))]
    pub contact_number: String,
    #[validate(length(min = 1, max = 120))]
    pub city: String,
    #[serde(default)]
    pub is_freelancer: bool,
    #[serde(default)]
    pub is_business: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub contact_number: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub city: Option<String>,
    pub is_freelancer: Option<bool>,
    pub is_business: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub contact_number: Option<String>,
    pub city: Option<String>,
    pub is_freelancer: bool,
    pub is_business: bool,
    pub has_completed_profile: bool,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: profile.user_id,
            full_name: profile.full_name.clone(),
            contact_number: profile.contact_number.clone(),
            city: profile.city.clone(),
            is_freelancer: profile.is_freelancer,
            is_business: profile.is_business,
            has_completed_profile: profile.has_completed_profile,
        }
    }
}

impl ProfileResponse {
    /// Shape returned before the lazy profile row exists.
    pub fn empty_for(user_id: Uuid, display_name: &str) -> Self {
        Self {
            user_id,
            full_name: Some(display_name.to_string()),
            contact_number: None,
            city: None,
            is_freelancer: false,
            is_business: false,
            has_completed_profile: false,
        }
    }
}
