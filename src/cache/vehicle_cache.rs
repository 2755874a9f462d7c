//! Cache de lectura para vehículos
//!
//! Envuelve cualquier `VehicleStore`. Las lecturas por id/VIN pasan primero
//! por el cache; cada escritura va al almacén y luego invalida las claves del
//! vehículo. Los listados nunca se cachean.
//!
//! Una lectura que coincide con una escritura no deja su copia en el cache:
//! cada escritura incrementa `generation` antes de invalidar, y la lectura
//! borra lo que acaba de guardar si la generación cambió mientras tanto.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::{get_json, set_json, CacheConfig, CacheOperations};
use crate::models::{NewVehicle, TransitionPlan, Vehicle, WarrantyDates};
use crate::repositories::{VehicleFilters, VehicleStore};
use crate::utils::errors::AppError;

pub struct CachedVehicleStore {
    inner: Arc<dyn VehicleStore>,
    cache: Arc<dyn CacheOperations>,
    config: CacheConfig,
    generation: AtomicU64,
}

impl CachedVehicleStore {
    pub fn new(inner: Arc<dyn VehicleStore>, cache: Arc<dyn CacheOperations>, config: CacheConfig) -> Self {
        Self {
            inner,
            cache,
            config,
            generation: AtomicU64::new(0),
        }
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    async fn cached(&self, key: &str) -> Option<Vehicle> {
        match get_json::<Vehicle>(self.cache.as_ref(), key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("⚠️ Cache no disponible para clave {}: {}", key, e);
                None
            }
        }
    }

    /// Guardar una lectura hecha en la generación `read_generation`
    async fn remember(&self, vehicle: &Vehicle, read_generation: u64) {
        if self.current_generation() != read_generation {
            debug!("⏭️ Escritura concurrente, no se cachea {}", vehicle.vin);
            return;
        }

        let ttl = self.config.default_ttl;
        for key in [
            self.config.vehicle_id_key(&vehicle.id),
            self.config.vehicle_vin_key(&vehicle.vin),
        ] {
            if let Err(e) = set_json(self.cache.as_ref(), &key, vehicle, ttl).await {
                warn!("⚠️ No se pudo cachear {}: {}", key, e);
            }
        }

        // La escritura pudo invalidar entre la comprobación y el SET
        if self.current_generation() != read_generation {
            self.evict(vehicle).await;
        }
    }

    /// Invalidar las claves de un vehículo después de escribirlo
    async fn invalidate(&self, vehicle: &Vehicle) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.evict(vehicle).await;
    }

    async fn evict(&self, vehicle: &Vehicle) {
        for key in [
            self.config.vehicle_id_key(&vehicle.id),
            self.config.vehicle_vin_key(&vehicle.vin),
        ] {
            match self.cache.delete(&key).await {
                Ok(()) => debug!("🧹 Cache invalidado: {}", key),
                Err(e) => error!("❌ No se pudo invalidar {} (expira por TTL): {}", key, e),
            }
        }
    }
}

#[async_trait]
impl VehicleStore for CachedVehicleStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        if let Some(vehicle) = self.cached(&self.config.vehicle_id_key(&id)).await {
            return Ok(Some(vehicle));
        }

        let read_generation = self.current_generation();
        let vehicle = self.inner.find_by_id(id).await?;
        if let Some(vehicle) = &vehicle {
            self.remember(vehicle, read_generation).await;
        }
        Ok(vehicle)
    }

    async fn find_by_vin(&self, vin: &str) -> Result<Option<Vehicle>, AppError> {
        if let Some(vehicle) = self.cached(&self.config.vehicle_vin_key(vin)).await {
            return Ok(Some(vehicle));
        }

        let read_generation = self.current_generation();
        let vehicle = self.inner.find_by_vin(vin).await?;
        if let Some(vehicle) = &vehicle {
            self.remember(vehicle, read_generation).await;
        }
        Ok(vehicle)
    }

    async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        self.inner.list(filters).await
    }

    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let created = self.inner.create(vehicle).await?;
        self.invalidate(&created).await;
        Ok(created)
    }

    async fn apply_transition(&self, plan: &TransitionPlan) -> Result<Vehicle, AppError> {
        let updated = self.inner.apply_transition(plan).await?;
        self.invalidate(&updated).await;
        Ok(updated)
    }

    async fn update_warranty(&self, id: Uuid, dates: &WarrantyDates) -> Result<Vehicle, AppError> {
        let updated = self.inner.update_warranty(id, dates).await?;
        self.invalidate(&updated).await;
        Ok(updated)
    }

    async fn mark_received(&self, id: Uuid) -> Result<Vehicle, AppError> {
        let updated = self.inner.mark_received(id).await?;
        self.invalidate(&updated).await;
        Ok(updated)
    }
}
