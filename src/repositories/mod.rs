//! Repositorios
//!
//! `VehicleStore` es la interfaz de persistencia que consume la lógica de
//! transiciones. La única escritura de ubicación/estado acepta un
//! `TransitionPlan`, que solo produce la máquina de estados.

pub mod memory_store;
pub mod vehicle_repository;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Location, NewVehicle, TransitionPlan, Vehicle, VehicleStatus, WarrantyDates};
use crate::utils::errors::AppError;

pub use memory_store::MemoryVehicleStore;
pub use vehicle_repository::PgVehicleRepository;

/// Filtros para listar vehículos
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleFilters {
    pub location: Option<Location>,
    pub status: Option<VehicleStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl VehicleFilters {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 500;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.location.map_or(true, |l| vehicle.location == l)
            && self.status.map_or(true, |s| vehicle.status == s)
    }
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError>;

    async fn find_by_vin(&self, vin: &str) -> Result<Option<Vehicle>, AppError>;

    async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError>;

    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError>;

    /// Escribe ubicación, estado y datos de la transición en una sola sentencia
    async fn apply_transition(&self, plan: &TransitionPlan) -> Result<Vehicle, AppError>;

    async fn update_warranty(&self, id: Uuid, dates: &WarrantyDates) -> Result<Vehicle, AppError>;

    /// Admisión ORDERED_CARS → CAR_INVENTORY
    async fn mark_received(&self, id: Uuid) -> Result<Vehicle, AppError>;
}
