//! Servicio de vehículos
//!
//! Punto único por el que pasan todos los movimientos: valida con la máquina
//! de estados, hace una sola escritura y notifica a los observadores.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::vehicle_events::{VehicleEvent, VehicleEventBus};
use crate::models::{
    plan_transition, Location, NewVehicle, TransitionError, TransitionRequest, Vehicle,
    VehicleStatus, WarrantyDates, WarrantyReport,
};
use crate::repositories::{VehicleFilters, VehicleStore};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Movimientos disponibles para un vehículo en su estado actual
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowedMoves {
    pub locations: Vec<Location>,
    pub statuses: Vec<VehicleStatus>,
}

impl AllowedMoves {
    pub fn for_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            locations: vehicle
                .location
                .allowed_destinations()
                .into_iter()
                .filter(|l| *l != vehicle.location)
                .collect(),
            statuses: vehicle.status.allowed_next().to_vec(),
        }
    }
}

pub struct VehicleService {
    store: Arc<dyn VehicleStore>,
    events: VehicleEventBus,
}

impl VehicleService {
    pub fn new(store: Arc<dyn VehicleStore>, events: VehicleEventBus) -> Self {
        Self { store, events }
    }

    pub fn events(&self) -> &VehicleEventBus {
        &self.events
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Vehicle> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn get_by_vin(&self, vin: &str) -> AppResult<Vehicle> {
        self.store
            .find_by_vin(vin)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with VIN '{}' not found", vin)))
    }

    pub async fn list(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>> {
        self.store.list(filters).await
    }

    /// Registrar la llegada de un vehículo
    pub async fn register_arrival(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        if self.store.find_by_vin(&vehicle.vin).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Vehicle with VIN '{}' is already registered",
                vehicle.vin
            )));
        }

        let created = self.store.create(vehicle).await?;
        info!("🚗 Vehículo {} registrado en {}", created.vin, created.location);

        self.events.publish(VehicleEvent::Registered {
            vehicle_id: created.id,
            vin: created.vin.clone(),
            location: created.location,
        });
        Ok(created)
    }

    /// Intentar un movimiento de ubicación y/o estado.
    ///
    /// Los errores de validación se detectan antes de tocar el almacén. Si la
    /// escritura falla, el registro queda como estaba y no se reintenta.
    pub async fn attempt_transition(
        &self,
        vehicle: &Vehicle,
        request: &TransitionRequest,
    ) -> AppResult<Vehicle> {
        let plan = plan_transition(vehicle, request)?;
        if plan.is_noop() {
            return Ok(vehicle.clone());
        }

        let updated = self.store.apply_transition(&plan).await.map_err(|e| match e {
            AppError::NotFound(_) => e,
            other => {
                error!("❌ Error guardando transición de {}: {}", vehicle.vin, other);
                AppError::Transition(TransitionError::PersistenceFailure(other.to_string()))
            }
        })?;

        info!(
            "🔀 Vehículo {}: {}/{} -> {}/{}",
            updated.vin,
            plan.from_location(),
            plan.from_status(),
            updated.location,
            updated.status
        );

        self.events.publish(VehicleEvent::Moved {
            vehicle_id: updated.id,
            from_location: plan.from_location(),
            to_location: updated.location,
            from_status: plan.from_status(),
            to_status: updated.status,
            at: updated.updated_at,
        });
        Ok(updated)
    }

    /// Buscar el vehículo y aplicar la transición
    pub async fn transition_by_id(&self, id: Uuid, request: &TransitionRequest) -> AppResult<Vehicle> {
        let vehicle = self.get(id).await?;
        self.attempt_transition(&vehicle, request).await
    }

    /// Recepción de un coche pedido (ORDERED_CARS → CAR_INVENTORY)
    pub async fn receive_ordered(&self, id: Uuid) -> AppResult<Vehicle> {
        let received = self.store.mark_received(id).await?;
        info!("📦 Vehículo {} recibido en {}", received.vin, received.location);

        self.events.publish(VehicleEvent::Received { vehicle_id: id });
        Ok(received)
    }

    pub async fn update_warranty(&self, id: Uuid, dates: &WarrantyDates) -> AppResult<Vehicle> {
        let updated = self.store.update_warranty(id, dates).await?;
        info!("🛡️ Garantías actualizadas para {}", updated.vin);

        self.events.publish(VehicleEvent::WarrantyUpdated { vehicle_id: id });
        Ok(updated)
    }

    pub async fn warranty_report(&self, id: Uuid, today: NaiveDate) -> AppResult<(Vehicle, WarrantyReport)> {
        let vehicle = self.get(id).await?;
        let report = WarrantyReport::compute(&vehicle.warranty_dates(), today);
        Ok((vehicle, report))
    }

    pub async fn allowed_moves(&self, id: Uuid) -> AppResult<AllowedMoves> {
        let vehicle = self.get(id).await?;
        Ok(AllowedMoves::for_vehicle(&vehicle))
    }
}
