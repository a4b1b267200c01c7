//! Domain rules guarding the pending -> accepted transition of equipment
//! rental requests. Kept free of database access so the guards can be
//! exercised directly; the repository re-evaluates the exclusivity rule
//! inside the acceptance transaction.

use crate::error::app_error::AppError;
use crate::models::profile::Profile;

/// Service category that triggers the rental constraints.
pub const RENTAL_SERVICE_TYPE: &str = "camera_rental";

pub const EQUIPMENT_TYPE_CAMERA: &str = "Camera";
pub const EQUIPMENT_TYPE_LENS: &str = "Lens";

/// Per-request caps for freelancer renters. Business accounts are exempt.
pub const MAX_CAMERAS_PER_REQUEST: usize = 1;
pub const MAX_LENSES_PER_REQUEST: usize = 3;

pub fn is_rental_request(service_type: &str) -> bool {
    service_type == RENTAL_SERVICE_TYPE
}

/// Whether the requester's profile is subject to the rental constraints.
/// Business accounts (including freelancer+business hybrids) are exempt.
pub fn requester_is_constrained(profile: &Profile) -> bool {
    profile.is_freelancer && !profile.is_business
}

/// Enforce the per-request quantity caps given the equipment types of the
/// referenced inventory items. Types outside Camera/Lens are unconstrained.
pub fn check_rental_quantities<'a, I>(equipment_types: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut cameras = 0usize;
    let mut lenses = 0usize;

    for equipment_type in equipment_types {
        match equipment_type {
            EQUIPMENT_TYPE_CAMERA => cameras += 1,
            EQUIPMENT_TYPE_LENS => lenses += 1,
            _ => {}
        }
    }

    if cameras > MAX_CAMERAS_PER_REQUEST {
        return Err(AppError::rule(format!(
            "a freelancer may rent at most {MAX_CAMERAS_PER_REQUEST} camera per request"
        )));
    }
    if lenses > MAX_LENSES_PER_REQUEST {
        return Err(AppError::rule(format!(
            "a freelancer may rent at most {MAX_LENSES_PER_REQUEST} lenses per request"
        )));
    }

    Ok(())
}

/// Exclusivity: a freelancer with an already-accepted rental request must
/// return that equipment before another acceptance can go through.
pub fn check_rental_exclusivity(accepted_rental_requests: i64) -> Result<(), AppError> {
    if accepted_rental_requests > 0 {
        return Err(AppError::rule(
            "requester already has an accepted equipment rental; equipment must be returned first",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(is_freelancer: bool, is_business: bool) -> Profile {
        Profile {
            user_id: Uuid::new_v4(),
            full_name: None,
            contact_number: None,
            city: None,
            is_freelancer,
            is_business,
            has_completed_profile: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn two_cameras_are_rejected() {
        let result = check_rental_quantities(["Camera", "Camera"]);
        assert!(matches!(result, Err(AppError::RuleViolation(_))));
    }

    #[test]
    fn one_camera_and_three_lenses_are_accepted() {
        assert!(check_rental_quantities(["Camera", "Lens", "Lens", "Lens"]).is_ok());
    }

    #[test]
    fn one_camera_and_four_lenses_are_rejected() {
        let result = check_rental_quantities(["Camera", "Lens", "Lens", "Lens", "Lens"]);
        assert!(matches!(result, Err(AppError::RuleViolation(_))));
    }

    #[test]
    fn other_equipment_types_are_unconstrained() {
        let types = ["Camera", "Lighting", "Gimbal", "Tripod", "Drone", "Audio"];
        assert!(check_rental_quantities(types).is_ok());
    }

    #[test]
    fn empty_request_passes_the_quantity_guard() {
        assert!(check_rental_quantities([]).is_ok());
    }

    #[test]
    fn freelancers_are_constrained_but_business_accounts_are_not() {
        assert!(requester_is_constrained(&profile(true, false)));
        assert!(!requester_is_constrained(&profile(false, true)));
        assert!(!requester_is_constrained(&profile(true, true)));
        assert!(!requester_is_constrained(&profile(false, false)));
    }

    #[test]
    fn exclusivity_blocks_while_a_rental_is_out() {
        assert!(check_rental_exclusivity(0).is_ok());
        assert!(matches!(check_rental_exclusivity(1), Err(AppError::RuleViolation(_))));
        assert!(matches!(check_rental_exclusivity(3), Err(AppError::RuleViolation(_))));
    }

    #[test]
    fn only_the_rental_category_triggers_the_rules() {
        assert!(is_rental_request("camera_rental"));
        assert!(!is_rental_request("photographer"));
        assert!(!is_rental_request("videographer"));
    }
}
