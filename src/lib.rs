//! Dealership vehicle backend
//!
//! Máquina de estados de ubicación/estado de vehículos, cálculo de garantías
//! y la API HTTP que los expone.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use models::{
    aggregate_warranty_status, allowed_destinations, classify_warranty, plan_transition,
    warranty_summary_text,
};
pub use routes::create_app;
pub use services::VehicleService;
pub use state::AppState;
