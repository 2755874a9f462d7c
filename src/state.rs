//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::VehicleStore;
use crate::services::{VehicleEventBus, VehicleService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicles: Arc<VehicleService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Arc<dyn VehicleStore>, events: VehicleEventBus) -> Self {
        Self {
            config,
            vehicles: Arc::new(VehicleService::new(store, events)),
        }
    }
}
