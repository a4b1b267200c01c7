use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Rented,
    Maintenance,
    Unavailable,
}

/// A rentable physical asset owned by one business account. The
/// availability status only moves through the rent/return operations,
/// never through free-form updates.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub equipment_type: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub purchase_date: Option<String>,
    pub condition_status: String,
    pub availability_status: AvailabilityStatus,
    pub rental_price_6h: Option<f64>,
    pub rental_price_8h: Option<f64>,
    pub rental_price_12h: Option<f64>,
    pub rental_price_24h: Option<f64>,
    pub maintenance_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InventoryItemRequest {
    #[validate(length(min = 1, max = 64))]
    pub equipment_type: String,
    #[validate(length(min = 1, max = 64))]
    pub brand: String,
    #[validate(length(min = 1, max = 64))]
    pub model: String,
    #[validate(length(min = 1, max = 64))]
    pub serial_number: String,
    pub purchase_date: Option<String>,
    pub condition_status: Option<String>,
    pub rental_price_6h: Option<f64>,
    pub rental_price_8h: Option<f64>,
    pub rental_price_12h: Option<f64>,
    pub rental_price_24h: Option<f64>,
    #[validate(length(max = 2000))]
    pub maintenance_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RentRequest {
    #[validate(length(min = 1, max = 120))]
    pub renter_name: String,
    #[validate(length(max = 32))]
    pub renter_phone: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub rental_duration: String,
    pub rental_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryItemResponse {
    pub inventory_id: Uuid,
    pub equipment_type: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub purchase_date: Option<String>,
    pub condition_status: String,
    pub availability_status: AvailabilityStatus,
    pub rental_price_6h: Option<f64>,
    pub rental_price_8h: Option<f64>,
    pub rental_price_12h: Option<f64>,
    pub rental_price_24h: Option<f64>,
    pub maintenance_notes: Option<String>,
}

impl From<&InventoryItem> for InventoryItemResponse {
    fn from(item: &InventoryItem) -> Self {
        Self {
            inventory_id: item.id,
            equipment_type: item.equipment_type.clone(),
            brand: item.brand.clone(),
            model: item.model.clone(),
            serial_number: item.serial_number.clone(),
            purchase_date: item.purchase_date.clone(),
            condition_status: item.condition_status.clone(),
            availability_status: item.availability_status,
            rental_price_6h: item.rental_price_6h,
            rental_price_8h: item.rental_price_8h,
            rental_price_12h: item.rental_price_12h,
            rental_price_24h: item.rental_price_24h,
            maintenance_notes: item.maintenance_notes.clone(),
        }
    }
}
