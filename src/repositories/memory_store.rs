//! Almacén de vehículos en memoria
//!
//! Misma semántica que `PgVehicleRepository` para tests y desarrollo local.
//! `fail_writes` simula una caída del backend.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{VehicleFilters, VehicleStore};
use crate::models::{Location, NewVehicle, TransitionPlan, Vehicle, VehicleStatus, WarrantyDates};
use crate::utils::errors::{conflict_error, not_found_error, AppError};

#[derive(Default)]
pub struct MemoryVehicleStore {
    vehicles: RwLock<HashMap<Uuid, Vehicle>>,
    pub fail_writes: AtomicBool,
    pub read_calls: AtomicU64,
    pub write_calls: AtomicU64,
}

impl MemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: Uuid) -> Option<Vehicle> {
        self.vehicles.read().await.get(&id).cloned()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> u64 {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn read_count(&self) -> u64 {
        self.read_calls.load(Ordering::SeqCst)
    }

    fn begin_read(&self) {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn begin_write(&self) -> Result<(), AppError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Storage("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl VehicleStore for MemoryVehicleStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        self.begin_read();
        Ok(self.get(id).await)
    }

    async fn find_by_vin(&self, vin: &str) -> Result<Option<Vehicle>, AppError> {
        self.begin_read();
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.values().find(|v| v.vin == vin).cloned())
    }

    async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        self.begin_read();
        let vehicles = self.vehicles.read().await;
        let mut matching: Vec<Vehicle> = vehicles
            .values()
            .filter(|v| filters.matches(v))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(filters.offset() as usize)
            .take(filters.limit() as usize)
            .collect())
    }

    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        self.begin_write()?;
        let mut vehicles = self.vehicles.write().await;
        if vehicles.values().any(|v| v.vin == vehicle.vin) {
            return Err(conflict_error("Vehicle", "vin", &vehicle.vin));
        }

        let now = Utc::now();
        let created = Vehicle {
            id: Uuid::new_v4(),
            vin: vehicle.vin,
            brand: vehicle.brand,
            model: vehicle.model,
            location: vehicle.location,
            status: VehicleStatus::Available,
            client_name: None,
            client_id: None,
            expected_price: None,
            selling_price: None,
            reservation_date: None,
            invoice_id: None,
            delivery_date: None,
            work_order_id: None,
            pdi_completed: vehicle.pdi_completed,
            vehicle_warranty_expiry: vehicle.warranty.vehicle,
            battery_warranty_expiry: vehicle.warranty.battery,
            dms_warranty_deadline: vehicle.warranty.dms,
            created_at: now,
            updated_at: now,
        };
        vehicles.insert(created.id, created.clone());
        Ok(created)
    }

    async fn apply_transition(&self, plan: &TransitionPlan) -> Result<Vehicle, AppError> {
        self.begin_write()?;
        let mut vehicles = self.vehicles.write().await;
        let id = plan.vehicle_id();
        let stored = vehicles
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        // Mismas columnas que el UPDATE de PgVehicleRepository
        let next = plan.next();
        stored.location = next.location;
        stored.status = next.status;
        stored.client_name = next.client_name.clone();
        stored.client_id = next.client_id.clone();
        stored.expected_price = next.expected_price;
        stored.selling_price = next.selling_price;
        stored.reservation_date = next.reservation_date;
        stored.invoice_id = next.invoice_id.clone();
        stored.delivery_date = next.delivery_date;
        stored.work_order_id = next.work_order_id.clone();
        stored.pdi_completed = next.pdi_completed;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn update_warranty(&self, id: Uuid, dates: &WarrantyDates) -> Result<Vehicle, AppError> {
        self.begin_write()?;
        let mut vehicles = self.vehicles.write().await;
        let vehicle = vehicles
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        vehicle.vehicle_warranty_expiry = dates.vehicle;
        vehicle.battery_warranty_expiry = dates.battery;
        vehicle.dms_warranty_deadline = dates.dms;
        vehicle.updated_at = Utc::now();
        Ok(vehicle.clone())
    }

    async fn mark_received(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.begin_write()?;
        let mut vehicles = self.vehicles.write().await;
        let vehicle = vehicles
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if vehicle.location != Location::OrderedCars {
            return Err(AppError::Conflict(format!(
                "Vehicle {} is at {}, only ORDERED_CARS can be received",
                id, vehicle.location
            )));
        }

        vehicle.location = Location::CarInventory;
        vehicle.updated_at = Utc::now();
        Ok(vehicle.clone())
    }
}
