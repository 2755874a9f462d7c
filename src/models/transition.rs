//! Máquina de estados de ubicación/estado
//!
//! `plan_transition` valida un movimiento contra el registro actual sin tocar
//! la base de datos. El resultado, `TransitionPlan`, es el único valor que el
//! repositorio acepta para escribir ubicación y estado.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::location::Location;
use super::status::{RequiredField, VehicleStatus};
use super::vehicle::{TransitionDetails, Vehicle};

/// Movimiento solicitado por la UI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionRequest {
    #[serde(default, alias = "targetLocation")]
    pub target_location: Option<Location>,
    #[serde(default, alias = "targetStatus")]
    pub target_status: Option<VehicleStatus>,
    #[serde(default)]
    pub details: TransitionDetails,
}

impl TransitionRequest {
    pub fn move_to(location: Location) -> Self {
        Self {
            target_location: Some(location),
            ..Default::default()
        }
    }

    pub fn status(status: VehicleStatus) -> Self {
        Self {
            target_status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_details(mut self, details: TransitionDetails) -> Self {
        self.details = details;
        self
    }
}

/// Errores de una transición
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("missing required fields for {status}: {}", join_fields(.fields))]
    MissingRequiredField {
        status: VehicleStatus,
        fields: Vec<RequiredField>,
    },

    #[error("status {status} requires a client")]
    MissingClient { status: VehicleStatus },

    #[error("a transition needs a target location or a target status")]
    EmptyRequest,

    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Transición validada, lista para una única escritura
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    vehicle_id: Uuid,
    from_location: Location,
    from_status: VehicleStatus,
    next: Vehicle,
}

impl TransitionPlan {
    pub fn vehicle_id(&self) -> Uuid {
        self.vehicle_id
    }

    pub fn from_location(&self) -> Location {
        self.from_location
    }

    pub fn from_status(&self) -> VehicleStatus {
        self.from_status
    }

    /// Registro resultante (ubicación, estado y datos de la transición)
    pub fn next(&self) -> &Vehicle {
        &self.next
    }

    pub fn changes_location(&self) -> bool {
        self.from_location != self.next.location
    }

    pub fn changes_status(&self) -> bool {
        self.from_status != self.next.status
    }

    pub fn is_noop(&self) -> bool {
        !self.changes_location() && !self.changes_status()
    }
}

/// Sin cambio de estado, los datos de la transición no pueden dejar al estado
/// actual sin un campo requerido o sin cliente que antes tenía.
fn check_details_keep_status(vehicle: &Vehicle, next: &Vehicle) -> Result<(), TransitionError> {
    let status = vehicle.status;
    let lost: Vec<RequiredField> = next
        .missing_fields(status)
        .into_iter()
        .filter(|field| vehicle.has_field(*field))
        .collect();
    if !lost.is_empty() {
        return Err(TransitionError::MissingRequiredField {
            status,
            fields: next.missing_fields(status),
        });
    }

    if status.requires_client() && vehicle.has_client() && !next.has_client() {
        return Err(TransitionError::MissingClient { status });
    }
    Ok(())
}

/// Valida `request` contra `vehicle` y devuelve el plan de escritura.
///
/// Un destino igual al valor actual se considera "sin cambio". Si no cambia
/// nada, la petición es un no-op y no se valida ningún campo.
pub fn plan_transition(
    vehicle: &Vehicle,
    request: &TransitionRequest,
) -> Result<TransitionPlan, TransitionError> {
    if request.target_location.is_none() && request.target_status.is_none() {
        return Err(TransitionError::EmptyRequest);
    }

    let target_location = request
        .target_location
        .filter(|location| *location != vehicle.location);
    let target_status = request
        .target_status
        .filter(|status| *status != vehicle.status);

    if target_location.is_none() && target_status.is_none() {
        return Ok(TransitionPlan {
            vehicle_id: vehicle.id,
            from_location: vehicle.location,
            from_status: vehicle.status,
            next: vehicle.clone(),
        });
    }

    if let Some(destination) = target_location {
        if !vehicle.location.can_move_to(destination) {
            return Err(TransitionError::InvalidTransition {
                from: vehicle.location.to_string(),
                to: destination.to_string(),
            });
        }
    }

    let mut next = vehicle.with_details(&request.details);

    if let Some(status) = target_status {
        if !vehicle.status.can_transition_to(status) {
            return Err(TransitionError::InvalidTransition {
                from: vehicle.status.to_string(),
                to: status.to_string(),
            });
        }

        let missing = next.missing_fields(status);
        if !missing.is_empty() {
            return Err(TransitionError::MissingRequiredField {
                status,
                fields: missing,
            });
        }

        if status.requires_client() && !next.has_client() {
            return Err(TransitionError::MissingClient { status });
        }

        next.status = status;
    } else if !request.details.is_empty() {
        check_details_keep_status(vehicle, &next)?;
    }

    if let Some(destination) = target_location {
        next.location = destination;
    }

    Ok(TransitionPlan {
        vehicle_id: vehicle.id,
        from_location: vehicle.location,
        from_status: vehicle.status,
        next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::fixtures::vehicle;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sold_details() -> TransitionDetails {
        TransitionDetails {
            client_name: Some("Jane Doe".to_string()),
            selling_price: Some(Decimal::new(50000, 0)),
            invoice_id: Some("INV-1".to_string()),
            delivery_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..Default::default()
        }
    }

    #[test]
    fn test_location_only_move() {
        let mut v = vehicle(Location::CarInventory, VehicleStatus::Available);
        v.pdi_completed = true;

        let plan = plan_transition(&v, &TransitionRequest::move_to(Location::Showroom1)).unwrap();
        assert!(plan.changes_location());
        assert!(!plan.changes_status());
        assert_eq!(plan.next().location, Location::Showroom1);
        assert_eq!(plan.next().status, VehicleStatus::Available);
    }

    #[test]
    fn test_location_move_does_not_validate_status_fields() {
        let v = vehicle(Location::GarageInventory, VehicleStatus::InService);
        let plan = plan_transition(&v, &TransitionRequest::move_to(Location::Schedule)).unwrap();
        assert_eq!(plan.next().location, Location::Schedule);
    }

    fn sold_vehicle() -> Vehicle {
        let v = vehicle(Location::Showroom1, VehicleStatus::Available);
        let request = TransitionRequest::status(VehicleStatus::Sold).with_details(sold_details());
        plan_transition(&v, &request).unwrap().next().clone()
    }

    #[test]
    fn test_location_move_cannot_clear_sold_fields() {
        let sold = sold_vehicle();
        let request = TransitionRequest::move_to(Location::Showroom2).with_details(TransitionDetails {
            invoice_id: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(
            plan_transition(&sold, &request).unwrap_err(),
            TransitionError::MissingRequiredField {
                status: VehicleStatus::Sold,
                fields: vec![RequiredField::InvoiceId],
            }
        );
    }

    #[test]
    fn test_location_move_cannot_drop_client() {
        let sold = sold_vehicle();
        let request = TransitionRequest::move_to(Location::Showroom2).with_details(TransitionDetails {
            client_name: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(
            plan_transition(&sold, &request).unwrap_err(),
            TransitionError::MissingClient {
                status: VehicleStatus::Sold
            }
        );
    }

    #[test]
    fn test_location_move_cannot_undo_pdi() {
        let mut v = vehicle(Location::CarInventory, VehicleStatus::Available);
        v.pdi_completed = true;
        let request = TransitionRequest::move_to(Location::Showroom1).with_details(TransitionDetails {
            pdi_completed: Some(false),
            ..Default::default()
        });
        assert_eq!(
            plan_transition(&v, &request).unwrap_err(),
            TransitionError::MissingRequiredField {
                status: VehicleStatus::Available,
                fields: vec![RequiredField::PdiCompleted],
            }
        );
    }

    #[test]
    fn test_location_move_with_details_keeps_incomplete_record_movable() {
        // Registrado sin PDI: los datos extra no bloquean el movimiento
        let v = vehicle(Location::CarInventory, VehicleStatus::Available);
        let request = TransitionRequest::move_to(Location::Showroom1).with_details(TransitionDetails {
            client_name: Some("Jane Doe".to_string()),
            ..Default::default()
        });
        let plan = plan_transition(&v, &request).unwrap();
        assert_eq!(plan.next().location, Location::Showroom1);
        assert_eq!(plan.next().client_name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_ordered_cars_cannot_move() {
        let v = vehicle(Location::OrderedCars, VehicleStatus::Available);
        let err = plan_transition(&v, &TransitionRequest::move_to(Location::CarInventory)).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: "ORDERED_CARS".to_string(),
                to: "CAR_INVENTORY".to_string(),
            }
        );
    }

    #[test]
    fn test_sold_is_terminal() {
        let v = vehicle(Location::Showroom1, VehicleStatus::Sold);
        for target in VehicleStatus::ALL {
            if target == VehicleStatus::Sold {
                continue;
            }
            let request = TransitionRequest::status(target).with_details(TransitionDetails {
                client_name: Some("Jane Doe".to_string()),
                pdi_completed: Some(true),
                work_order_id: Some("WO-9".to_string()),
                expected_price: Some(Decimal::new(1, 0)),
                reservation_date: NaiveDate::from_ymd_opt(2025, 1, 1),
                ..Default::default()
            });
            assert!(matches!(
                plan_transition(&v, &request),
                Err(TransitionError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_reserved_without_client_lists_every_missing_field() {
        let v = vehicle(Location::Showroom1, VehicleStatus::Available);
        let err = plan_transition(&v, &TransitionRequest::status(VehicleStatus::Reserved)).unwrap_err();
        match err {
            TransitionError::MissingRequiredField { status, fields } => {
                assert_eq!(status, VehicleStatus::Reserved);
                assert_eq!(
                    fields,
                    vec![
                        RequiredField::ClientName,
                        RequiredField::ExpectedPrice,
                        RequiredField::ReservationDate
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sold_with_fields_and_client() {
        let v = vehicle(Location::Showroom1, VehicleStatus::Available);
        let request = TransitionRequest::status(VehicleStatus::Sold).with_details(sold_details());
        let plan = plan_transition(&v, &request).unwrap();
        assert_eq!(plan.next().status, VehicleStatus::Sold);
        assert_eq!(plan.next().invoice_id.as_deref(), Some("INV-1"));
        assert_eq!(plan.next().location, Location::Showroom1);
    }

    #[test]
    fn test_sold_fields_without_client() {
        let v = vehicle(Location::Showroom1, VehicleStatus::Available);
        let mut details = sold_details();
        details.client_name = None;
        let err = plan_transition(&v, &TransitionRequest::status(VehicleStatus::Sold).with_details(details))
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::MissingClient {
                status: VehicleStatus::Sold
            }
        );
    }

    #[test]
    fn test_test_drive_requires_client_only() {
        let v = vehicle(Location::Showroom2, VehicleStatus::Available);
        assert_eq!(
            plan_transition(&v, &TransitionRequest::status(VehicleStatus::TestDrive)).unwrap_err(),
            TransitionError::MissingClient {
                status: VehicleStatus::TestDrive
            }
        );

        let request = TransitionRequest::status(VehicleStatus::TestDrive).with_details(TransitionDetails {
            client_id: Some("CRM-7".to_string()),
            ..Default::default()
        });
        assert!(plan_transition(&v, &request).is_ok());
    }

    #[test]
    fn test_available_requires_pdi() {
        let v = vehicle(Location::GarageInventory, VehicleStatus::InService);
        assert_eq!(
            plan_transition(&v, &TransitionRequest::status(VehicleStatus::Available)).unwrap_err(),
            TransitionError::MissingRequiredField {
                status: VehicleStatus::Available,
                fields: vec![RequiredField::PdiCompleted],
            }
        );
    }

    #[test]
    fn test_idempotent_request_skips_validation() {
        let v = vehicle(Location::Showroom1, VehicleStatus::Reserved);
        let request = TransitionRequest {
            target_location: Some(Location::Showroom1),
            target_status: Some(VehicleStatus::Reserved),
            details: TransitionDetails::default(),
        };
        let plan = plan_transition(&v, &request).unwrap();
        assert!(plan.is_noop());
        assert_eq!(plan.next(), &v);
    }

    #[test]
    fn test_empty_request_is_rejected() {
        let v = vehicle(Location::Showroom1, VehicleStatus::Available);
        assert_eq!(
            plan_transition(&v, &TransitionRequest::default()).unwrap_err(),
            TransitionError::EmptyRequest
        );
    }

    #[test]
    fn test_combined_move_checks_location_first() {
        let v = vehicle(Location::OrderedCars, VehicleStatus::Sold);
        let request = TransitionRequest {
            target_location: Some(Location::Showroom1),
            target_status: Some(VehicleStatus::Available),
            details: TransitionDetails::default(),
        };
        assert_eq!(
            plan_transition(&v, &request).unwrap_err(),
            TransitionError::InvalidTransition {
                from: "ORDERED_CARS".to_string(),
                to: "SHOWROOM_1".to_string(),
            }
        );
    }

    #[test]
    fn test_error_messages_name_everything() {
        let err = TransitionError::MissingRequiredField {
            status: VehicleStatus::Sold,
            fields: vec![RequiredField::SellingPrice, RequiredField::InvoiceId],
        };
        assert_eq!(
            err.to_string(),
            "missing required fields for SOLD: selling_price, invoice_id"
        );
    }
}
