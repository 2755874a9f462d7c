//! Modelos del sistema
//!
//! Este módulo contiene el modelo Vehicle, las tablas de ubicaciones y
//! estados, la máquina de transiciones y el cálculo de garantías.

pub mod location;
pub mod status;
pub mod transition;
pub mod vehicle;
pub mod warranty;

pub use location::{allowed_destinations, Location};
pub use status::{RequiredField, VehicleStatus};
pub use transition::{plan_transition, TransitionError, TransitionPlan, TransitionRequest};
pub use vehicle::{NewVehicle, TransitionDetails, Vehicle};
pub use warranty::{
    aggregate_warranty_status, classify_warranty, warranty_summary_text, AggregateWarrantyStatus,
    BadgeVariant, WarrantyBadge, WarrantyDates, WarrantyReport, WarrantyStatus,
};
