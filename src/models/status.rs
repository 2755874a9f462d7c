//! Estados comerciales del vehículo
//!
//! Tabla de transiciones de estado, campos requeridos por estado destino y
//! la regla transversal de cliente.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "vehicle_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    Reserved,
    InService,
    Sold,
    TestDrive,
}

/// Campo que debe estar presente antes de confirmar una transición
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredField {
    #[serde(rename = "pdiCompleted")]
    PdiCompleted,
    #[serde(rename = "clientName")]
    ClientName,
    #[serde(rename = "expected_price")]
    ExpectedPrice,
    #[serde(rename = "reservation_date")]
    ReservationDate,
    #[serde(rename = "selling_price")]
    SellingPrice,
    #[serde(rename = "invoice_id")]
    InvoiceId,
    #[serde(rename = "delivery_date")]
    DeliveryDate,
    #[serde(rename = "work_order_id")]
    WorkOrderId,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::PdiCompleted => "pdiCompleted",
            RequiredField::ClientName => "clientName",
            RequiredField::ExpectedPrice => "expected_price",
            RequiredField::ReservationDate => "reservation_date",
            RequiredField::SellingPrice => "selling_price",
            RequiredField::InvoiceId => "invoice_id",
            RequiredField::DeliveryDate => "delivery_date",
            RequiredField::WorkOrderId => "work_order_id",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 5] = [
        VehicleStatus::Available,
        VehicleStatus::Reserved,
        VehicleStatus::InService,
        VehicleStatus::Sold,
        VehicleStatus::TestDrive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::Reserved => "RESERVED",
            VehicleStatus::InService => "IN_SERVICE",
            VehicleStatus::Sold => "SOLD",
            VehicleStatus::TestDrive => "TEST_DRIVE",
        }
    }

    /// SOLD no tiene salidas
    pub fn is_terminal(&self) -> bool {
        matches!(self, VehicleStatus::Sold)
    }

    /// Estados alcanzables en un solo paso
    pub fn allowed_next(&self) -> &'static [VehicleStatus] {
        use VehicleStatus::*;
        match self {
            Available => &[Reserved, InService, TestDrive, Sold],
            Reserved => &[Available, Sold, InService, TestDrive],
            InService => &[Available, Reserved, TestDrive],
            TestDrive => &[Available, Reserved, InService],
            Sold => &[],
        }
    }

    pub fn can_transition_to(&self, target: VehicleStatus) -> bool {
        self.allowed_next().contains(&target)
    }

    /// Campos que deben estar completos en el registro para entrar en este estado
    pub fn required_fields(&self) -> &'static [RequiredField] {
        use RequiredField::*;
        match self {
            VehicleStatus::Available => &[PdiCompleted],
            VehicleStatus::Reserved => &[ClientName, ExpectedPrice, ReservationDate],
            VehicleStatus::Sold => &[SellingPrice, InvoiceId, DeliveryDate],
            VehicleStatus::InService => &[WorkOrderId],
            VehicleStatus::TestDrive => &[],
        }
    }

    /// Estados que exigen además un cliente asociado
    pub fn requires_client(&self) -> bool {
        matches!(
            self,
            VehicleStatus::Reserved | VehicleStatus::Sold | VehicleStatus::TestDrive
        )
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(VehicleStatus::Available),
            "RESERVED" => Ok(VehicleStatus::Reserved),
            "IN_SERVICE" => Ok(VehicleStatus::InService),
            "SOLD" => Ok(VehicleStatus::Sold),
            "TEST_DRIVE" => Ok(VehicleStatus::TestDrive),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VehicleStatus::*;

    #[test]
    fn test_status_truth_table() {
        let allowed = [
            (Available, Reserved),
            (Available, InService),
            (Available, TestDrive),
            (Available, Sold),
            (Reserved, Available),
            (Reserved, Sold),
            (Reserved, InService),
            (Reserved, TestDrive),
            (InService, Available),
            (InService, Reserved),
            (InService, TestDrive),
            (TestDrive, Available),
            (TestDrive, Reserved),
            (TestDrive, InService),
        ];

        let mut pairs = 0;
        for from in VehicleStatus::ALL {
            for to in VehicleStatus::ALL {
                if from == to {
                    continue;
                }
                pairs += 1;
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
        assert_eq!(pairs, 20);
    }

    #[test]
    fn test_allowed_counts_per_row() {
        assert_eq!(Available.allowed_next().len(), 4);
        assert_eq!(Reserved.allowed_next().len(), 4);
        assert_eq!(InService.allowed_next().len(), 3);
        assert_eq!(TestDrive.allowed_next().len(), 3);
        assert!(Sold.allowed_next().is_empty());
        assert!(Sold.is_terminal());
    }

    #[test]
    fn test_required_fields_and_client_rule() {
        assert_eq!(Available.required_fields(), &[RequiredField::PdiCompleted]);
        assert_eq!(
            Sold.required_fields(),
            &[
                RequiredField::SellingPrice,
                RequiredField::InvoiceId,
                RequiredField::DeliveryDate
            ]
        );
        assert!(TestDrive.required_fields().is_empty());
        assert!(TestDrive.requires_client());
        assert!(!InService.requires_client());
        assert!(!Available.requires_client());
    }

    #[test]
    fn test_required_field_wire_names() {
        assert_eq!(
            serde_json::to_string(&RequiredField::ClientName).unwrap(),
            "\"clientName\""
        );
        assert_eq!(RequiredField::WorkOrderId.to_string(), "work_order_id");
    }
}
