use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::inventory::{AvailabilityStatus, InventoryItem, InventoryItemRequest};
use uuid::Uuid;

const INVENTORY_COLUMNS: &str = "id, owner_id, equipment_type, brand, model, serial_number, purchase_date, condition_status, availability_status, rental_price_6h, rental_price_8h, rental_price_12h, rental_price_24h, maintenance_notes, created_at, updated_at";

impl PostgresRepository {
    pub async fn create_inventory_item(&self, owner_id: &Uuid, payload: &InventoryItemRequest) -> Result<InventoryItem, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            INSERT INTO inventory_items
                (owner_id, equipment_type, brand, model, serial_number, purchase_date, condition_status,
                 availability_status, rental_price_6h, rental_price_8h, rental_price_12h, rental_price_24h, maintenance_notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'available', $8, $9, $10, $11, $12)
            RETURNING {INVENTORY_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&payload.equipment_type)
        .bind(&payload.brand)
        .bind(&payload.model)
        .bind(&payload.serial_number)
        .bind(&payload.purchase_date)
        .bind(payload.condition_status.as_deref().unwrap_or("excellent"))
        .bind(payload.rental_price_6h)
        .bind(payload.rental_price_8h)
        .bind(payload.rental_price_12h)
        .bind(payload.rental_price_24h)
        .bind(&payload.maintenance_notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn list_inventory_for_owner(&self, owner_id: &Uuid) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory_items WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Free-form edit of descriptive fields. Availability is deliberately
    /// excluded; it only moves through the rent/return operations.
    pub async fn update_inventory_item(&self, id: &Uuid, owner_id: &Uuid, payload: &InventoryItemRequest) -> Result<InventoryItem, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items SET
                equipment_type = $1,
                brand = $2,
                model = $3,
                serial_number = $4,
                purchase_date = $5,
                condition_status = COALESCE($6, condition_status),
                rental_price_6h = $7,
                rental_price_8h = $8,
                rental_price_12h = $9,
                rental_price_24h = $10,
                maintenance_notes = $11,
                updated_at = now()
            WHERE id = $12 AND owner_id = $13
            RETURNING {INVENTORY_COLUMNS}
            "#
        ))
        .bind(&payload.equipment_type)
        .bind(&payload.brand)
        .bind(&payload.model)
        .bind(&payload.serial_number)
        .bind(&payload.purchase_date)
        .bind(&payload.condition_status)
        .bind(payload.rental_price_6h)
        .bind(payload.rental_price_8h)
        .bind(payload.rental_price_12h)
        .bind(payload.rental_price_24h)
        .bind(&payload.maintenance_notes)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| AppError::NotFound("Inventory item not found".to_string()))
    }

    pub async fn delete_inventory_item(&self, id: &Uuid, owner_id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inventory item not found".to_string()));
        }

        Ok(())
    }

    /// available -> rented. The status guard in the WHERE clause makes two
    /// concurrent rent calls resolve to exactly one winner.
    pub async fn rent_inventory_item(&self, id: &Uuid, owner_id: &Uuid) -> Result<InventoryItem, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items SET availability_status = 'rented', updated_at = now()
            WHERE id = $1 AND owner_id = $2 AND availability_status = 'available'
            RETURNING {INVENTORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        match item {
            Some(item) => Ok(item),
            None => {
                // Distinguish a missing item from one that is simply not
                // rentable right now.
                match self.get_inventory_item(id, owner_id).await? {
                    Some(existing) => Err(AppError::rule(format!(
                        "inventory item is {} and cannot be rented",
                        availability_label(existing.availability_status)
                    ))),
                    None => Err(AppError::NotFound("Inventory item not found".to_string())),
                }
            }
        }
    }

    /// rented -> available.
    pub async fn return_inventory_item(&self, id: &Uuid, owner_id: &Uuid) -> Result<InventoryItem, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items SET availability_status = 'available', updated_at = now()
            WHERE id = $1 AND owner_id = $2 AND availability_status = 'rented'
            RETURNING {INVENTORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        match item {
            Some(item) => Ok(item),
            None => match self.get_inventory_item(id, owner_id).await? {
                Some(existing) => Err(AppError::rule(format!(
                    "inventory item is {} and cannot be returned",
                    availability_label(existing.availability_status)
                ))),
                None => Err(AppError::NotFound("Inventory item not found".to_string())),
            },
        }
    }

    pub async fn get_inventory_item(&self, id: &Uuid, owner_id: &Uuid) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!("SELECT {INVENTORY_COLUMNS} FROM inventory_items WHERE id = $1 AND owner_id = $2"))
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }
}

fn availability_label(status: AvailabilityStatus) -> &'static str {
    match status {
        AvailabilityStatus::Available => "available",
        AvailabilityStatus::Rented => "rented",
        AvailabilityStatus::Maintenance => "in maintenance",
        AvailabilityStatus::Unavailable => "unavailable",
    }
}
