use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::inventory::{InventoryItemRequest, InventoryItemResponse, RentRequest};
use crate::models::notification::{categories, NewNotification};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{routes, State};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::post("/", data = "<payload>")]
pub async fn create_item(pool: &State<PgPool>, user: CurrentUser, payload: Json<InventoryItemRequest>) -> Result<(Status, Json<InventoryItemResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let item = repo.create_inventory_item(&user.id, &payload).await?;

    Ok((Status::Created, Json(InventoryItemResponse::from(&item))))
}

#[rocket::get("/")]
pub async fn list_items(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<Vec<InventoryItemResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let items = repo.list_inventory_for_owner(&user.id).await?;

    Ok(Json(items.iter().map(InventoryItemResponse::from).collect()))
}

#[rocket::put("/<id>", data = "<payload>")]
pub async fn update_item(pool: &State<PgPool>, user: CurrentUser, id: Uuid, payload: Json<InventoryItemRequest>) -> Result<Json<InventoryItemResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let item = repo.update_inventory_item(&id, &user.id, &payload).await?;

    Ok(Json(InventoryItemResponse::from(&item)))
}

#[rocket::delete("/<id>")]
pub async fn delete_item(pool: &State<PgPool>, user: CurrentUser, id: Uuid) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.delete_inventory_item(&id, &user.id).await?;

    Ok(Status::NoContent)
}

/// Manual walk-in rental. The renter details are not a party in the system,
/// so they are kept as a notification on the owner's feed.
#[rocket::post("/<id>/rent", data = "<payload>")]
pub async fn rent_item(pool: &State<PgPool>, user: CurrentUser, id: Uuid, payload: Json<RentRequest>) -> Result<Json<InventoryItemResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let item = repo.rent_inventory_item(&id, &user.id).await?;

    repo.create_notification(&NewNotification {
        user_id: user.id,
        category: categories::INVENTORY.to_string(),
        title: "Item Rented".to_string(),
        message: format!("{} {} rented to {} for {}", item.brand, item.model, payload.renter_name, payload.rental_duration),
        data: Some(serde_json::json!({
            "inventory_id": item.id,
            "renter_name": payload.renter_name,
            "renter_phone": payload.renter_phone,
            "rental_duration": payload.rental_duration,
            "rental_date": payload.rental_date,
        })),
    })
    .await?;

    Ok(Json(InventoryItemResponse::from(&item)))
}

#[rocket::post("/<id>/return")]
pub async fn return_item(pool: &State<PgPool>, user: CurrentUser, id: Uuid) -> Result<Json<InventoryItemResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let item = repo.return_inventory_item(&id, &user.id).await?;

    Ok(Json(InventoryItemResponse::from(&item)))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create_item, list_items, update_item, delete_item, rent_item, return_item]
}

#[cfg(test)]
mod tests {
    use crate::models::inventory::{InventoryItemRequest, RentRequest};
    use validator::Validate;

    #[test]
    fn item_payload_requires_identifying_fields() {
        let payload = InventoryItemRequest {
            equipment_type: "Camera".to_string(),
            brand: "Canon".to_string(),
            model: "R6".to_string(),
            serial_number: String::new(),
            purchase_date: None,
            condition_status: None,
            rental_price_6h: Some(40.0),
            rental_price_8h: None,
            rental_price_12h: None,
            rental_price_24h: Some(120.0),
            maintenance_notes: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn rent_payload_requires_renter_and_duration() {
        let payload = RentRequest {
            renter_name: "Walk-in".to_string(),
            renter_phone: None,
            rental_duration: "8h".to_string(),
            rental_date: Some("2026-09-01".to_string()),
        };
        assert!(payload.validate().is_ok());

        let missing_name = RentRequest {
            renter_name: String::new(),
            renter_phone: None,
            rental_duration: "8h".to_string(),
            rental_date: None,
        };
        assert!(missing_name.validate().is_err());
    }
}
