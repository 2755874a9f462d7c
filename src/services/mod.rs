//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los servicios
//! combinan la máquina de estados, el almacén y los observadores.

pub mod vehicle_events;
pub mod vehicle_service;

pub use vehicle_events::{VehicleEvent, VehicleEventBus};
pub use vehicle_service::{AllowedMoves, VehicleService};
