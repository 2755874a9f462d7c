use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{VehicleFilters, VehicleStore};
use crate::models::{Location, NewVehicle, TransitionPlan, Vehicle, WarrantyDates};
use crate::utils::errors::{conflict_error, not_found_error, AppError};

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|e| e.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION)
}

#[async_trait]
impl VehicleStore for PgVehicleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn find_by_vin(&self, vin: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE vin = $1")
            .bind(vin)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE ($1::vehicle_location IS NULL OR location = $1)
              AND ($2::vehicle_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filters.location)
        .bind(filters.status)
        .bind(filters.limit())
        .bind(filters.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let now = Utc::now();
        let vin = vehicle.vin.clone();

        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, vin, brand, model, location, status, pdi_completed,
                vehicle_warranty_expiry, battery_warranty_expiry, dms_warranty_deadline,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'AVAILABLE', $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle.vin)
        .bind(vehicle.brand)
        .bind(vehicle.model)
        .bind(vehicle.location)
        .bind(vehicle.pdi_completed)
        .bind(vehicle.warranty.vehicle)
        .bind(vehicle.warranty.battery)
        .bind(vehicle.warranty.dms)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                conflict_error("Vehicle", "vin", &vin)
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(created)
    }

    async fn apply_transition(&self, plan: &TransitionPlan) -> Result<Vehicle, AppError> {
        let next = plan.next();
        debug!(
            "📝 UPDATE vehicle {}: {}/{} -> {}/{}",
            plan.vehicle_id(),
            plan.from_location(),
            plan.from_status(),
            next.location,
            next.status
        );

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET location = $2, status = $3, client_name = $4, client_id = $5,
                expected_price = $6, selling_price = $7, reservation_date = $8,
                invoice_id = $9, delivery_date = $10, work_order_id = $11,
                pdi_completed = $12, updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(plan.vehicle_id())
        .bind(next.location)
        .bind(next.status)
        .bind(&next.client_name)
        .bind(&next.client_id)
        .bind(next.expected_price)
        .bind(next.selling_price)
        .bind(next.reservation_date)
        .bind(&next.invoice_id)
        .bind(next.delivery_date)
        .bind(&next.work_order_id)
        .bind(next.pdi_completed)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        vehicle.ok_or_else(|| not_found_error("Vehicle", &plan.vehicle_id().to_string()))
    }

    async fn update_warranty(&self, id: Uuid, dates: &WarrantyDates) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vehicle_warranty_expiry = $2, battery_warranty_expiry = $3,
                dms_warranty_deadline = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dates.vehicle)
        .bind(dates.battery)
        .bind(dates.dms)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        vehicle.ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    async fn mark_received(&self, id: Uuid) -> Result<Vehicle, AppError> {
        let received = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET location = $2, updated_at = $3
            WHERE id = $1 AND location = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Location::CarInventory)
        .bind(Utc::now())
        .bind(Location::OrderedCars)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(vehicle) = received {
            return Ok(vehicle);
        }

        match self.find_by_id(id).await? {
            Some(vehicle) => Err(AppError::Conflict(format!(
                "Vehicle {} is at {}, only ORDERED_CARS can be received",
                id, vehicle.location
            ))),
            None => Err(not_found_error("Vehicle", &id.to_string())),
        }
    }
}
