use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    AggregateWarrantyStatus, BadgeVariant, Location, NewVehicle, Vehicle, WarrantyBadge,
    WarrantyDates, WarrantyReport,
};
use crate::utils::validation::normalize_vin;

// Request para registrar la llegada de un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "crate::utils::validation::validate_vin")]
    pub vin: String,

    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    pub location: Option<Location>,

    #[serde(default, alias = "pdiCompleted")]
    pub pdi_completed: bool,

    pub vehicle_warranty_expiry: Option<NaiveDate>,
    pub battery_warranty_expiry: Option<NaiveDate>,
    pub dms_warranty_deadline: Option<NaiveDate>,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(request: CreateVehicleRequest) -> Self {
        Self {
            vin: normalize_vin(&request.vin),
            brand: request.brand,
            model: request.model,
            location: request.location.unwrap_or(Location::CarInventory),
            pdi_completed: request.pdi_completed,
            warranty: WarrantyDates {
                vehicle: request.vehicle_warranty_expiry,
                battery: request.battery_warranty_expiry,
                dms: request.dms_warranty_deadline,
            },
        }
    }
}

// Request para editar las fechas de garantía (null borra la fecha)
#[derive(Debug, Deserialize)]
pub struct UpdateWarrantyRequest {
    pub vehicle_warranty_expiry: Option<NaiveDate>,
    pub battery_warranty_expiry: Option<NaiveDate>,
    pub dms_warranty_deadline: Option<NaiveDate>,
}

impl From<UpdateWarrantyRequest> for WarrantyDates {
    fn from(request: UpdateWarrantyRequest) -> Self {
        Self {
            vehicle: request.vehicle_warranty_expiry,
            battery: request.battery_warranty_expiry,
            dms: request.dms_warranty_deadline,
        }
    }
}

// Query de la vista de garantía
#[derive(Debug, Default, Deserialize)]
pub struct WarrantyQuery {
    pub today: Option<String>,
    pub variant: Option<BadgeVariant>,
}

// Response de vehículo con el resumen de garantía calculado al leer
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub warranty_status: AggregateWarrantyStatus,
    pub warranty_summary: String,
}

impl VehicleResponse {
    pub fn new(vehicle: Vehicle, today: NaiveDate) -> Self {
        let report = WarrantyReport::compute(&vehicle.warranty_dates(), today);
        Self {
            vehicle,
            warranty_status: report.status,
            warranty_summary: report.summary,
        }
    }
}

// Response de la vista de garantía
#[derive(Debug, Serialize)]
pub struct WarrantyResponse {
    pub vehicle_id: Uuid,
    pub vin: String,
    pub report: WarrantyReport,
    pub badge: WarrantyBadge,
}
