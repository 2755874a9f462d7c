use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateWarrantyRequest, VehicleResponse, WarrantyQuery, WarrantyResponse,
};
use crate::dto::ApiResponse;
use crate::models::warranty::local_today;
use crate::models::{TransitionDetails, TransitionRequest, WarrantyBadge, WarrantyDates};
use crate::repositories::VehicleFilters;
use crate::services::{AllowedMoves, VehicleService};
use crate::utils::errors::AppError;
use crate::utils::validation::{field_errors, normalize_vin, validate_date, validate_price, validate_vin};

pub struct VehicleController {
    service: Arc<VehicleService>,
}

/// Precios no negativos y textos no vacíos, antes de tocar la máquina de estados
fn check_details(details: &TransitionDetails) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    for (field, price) in [
        ("expected_price", details.expected_price),
        ("selling_price", details.selling_price),
    ] {
        if let Some(price) = price {
            if let Err(e) = validate_price(&price) {
                errors.add(field, e);
            }
        }
    }

    for field in details.blank_fields() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("field".into(), &field);
        errors.add(field, error);
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn resolve_today(today: Option<&str>) -> Result<NaiveDate, AppError> {
    match today {
        Some(value) => validate_date(value).map_err(|e| AppError::Validation(field_errors("today", e))),
        None => Ok(local_today()),
    }
}

impl VehicleController {
    pub fn new(service: Arc<VehicleService>) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self.service.register_arrival(request.into()).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::new(vehicle, local_today()),
            "Vehicle registered".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self.service.get(id).await?;
        Ok(VehicleResponse::new(vehicle, local_today()))
    }

    pub async fn get_by_vin(&self, vin: &str) -> Result<VehicleResponse, AppError> {
        validate_vin(vin).map_err(|e| AppError::Validation(field_errors("vin", e)))?;
        let vehicle = self.service.get_by_vin(&normalize_vin(vin)).await?;
        Ok(VehicleResponse::new(vehicle, local_today()))
    }

    pub async fn list(&self, filters: VehicleFilters) -> Result<Vec<VehicleResponse>, AppError> {
        let today = local_today();
        let vehicles = self.service.list(&filters).await?;
        Ok(vehicles
            .into_iter()
            .map(|v| VehicleResponse::new(v, today))
            .collect())
    }

    pub async fn allowed_moves(&self, id: Uuid) -> Result<AllowedMoves, AppError> {
        self.service.allowed_moves(id).await
    }

    pub async fn transition(
        &self,
        id: Uuid,
        request: TransitionRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        check_details(&request.details)?;

        let vehicle = self.service.transition_by_id(id, &request).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::new(vehicle, local_today()),
            "Vehicle updated".to_string(),
        ))
    }

    pub async fn receive(&self, id: Uuid) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let vehicle = self.service.receive_ordered(id).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::new(vehicle, local_today()),
            "Vehicle received into inventory".to_string(),
        ))
    }

    pub async fn update_warranty(
        &self,
        id: Uuid,
        request: UpdateWarrantyRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let dates: WarrantyDates = request.into();
        let vehicle = self.service.update_warranty(id, &dates).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::new(vehicle, local_today()),
            "Warranty updated".to_string(),
        ))
    }

    pub async fn warranty(&self, id: Uuid, query: WarrantyQuery) -> Result<WarrantyResponse, AppError> {
        let today = resolve_today(query.today.as_deref())?;
        let (vehicle, report) = self.service.warranty_report(id, today).await?;
        let badge = WarrantyBadge::render(&report, query.variant.unwrap_or_default());

        Ok(WarrantyResponse {
            vehicle_id: vehicle.id,
            vin: vehicle.vin,
            report,
            badge,
        })
    }
}
