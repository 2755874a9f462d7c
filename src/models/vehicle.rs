//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle tal como se guarda en la tabla
//! `vehicles`, y los datos auxiliares que acompañan a una transición.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::location::Location;
use super::status::{RequiredField, VehicleStatus};
use super::warranty::WarrantyDates;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub vin: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub location: Location,
    pub status: VehicleStatus,
    pub client_name: Option<String>,
    pub client_id: Option<String>,
    pub expected_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub reservation_date: Option<NaiveDate>,
    pub invoice_id: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub work_order_id: Option<String>,
    pub pdi_completed: bool,
    pub vehicle_warranty_expiry: Option<NaiveDate>,
    pub battery_warranty_expiry: Option<NaiveDate>,
    pub dms_warranty_deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para registrar la llegada de un vehículo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub vin: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub location: Location,
    pub pdi_completed: bool,
    pub warranty: WarrantyDates,
}

/// Datos capturados junto a una transición (diálogo de "Move")
///
/// Se aplican sobre el registro antes de validar los campos requeridos y se
/// guardan en la misma escritura.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionDetails {
    #[serde(default, alias = "clientName")]
    pub client_name: Option<String>,
    #[serde(default, alias = "clientId")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub expected_price: Option<Decimal>,
    #[serde(default)]
    pub selling_price: Option<Decimal>,
    #[serde(default)]
    pub reservation_date: Option<NaiveDate>,
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub work_order_id: Option<String>,
    #[serde(default, alias = "pdiCompleted")]
    pub pdi_completed: Option<bool>,
}

impl TransitionDetails {
    pub fn is_empty(&self) -> bool {
        self == &TransitionDetails::default()
    }

    /// Campos de texto enviados pero vacíos o solo con espacios
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("client_name", &self.client_name),
            ("client_id", &self.client_id),
            ("invoice_id", &self.invoice_id),
            ("work_order_id", &self.work_order_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(false, |v| v.trim().is_empty()))
        .map(|(field, _)| field)
        .collect()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl Vehicle {
    /// El vehículo tiene un cliente asociado (nombre o identificador)
    pub fn has_client(&self) -> bool {
        !is_blank(&self.client_name) || !is_blank(&self.client_id)
    }

    pub fn has_field(&self, field: RequiredField) -> bool {
        match field {
            RequiredField::PdiCompleted => self.pdi_completed,
            RequiredField::ClientName => !is_blank(&self.client_name),
            RequiredField::ExpectedPrice => self.expected_price.is_some(),
            RequiredField::ReservationDate => self.reservation_date.is_some(),
            RequiredField::SellingPrice => self.selling_price.is_some(),
            RequiredField::InvoiceId => !is_blank(&self.invoice_id),
            RequiredField::DeliveryDate => self.delivery_date.is_some(),
            RequiredField::WorkOrderId => !is_blank(&self.work_order_id),
        }
    }

    /// Todos los campos requeridos por `status` que faltan, en orden de tabla
    pub fn missing_fields(&self, status: VehicleStatus) -> Vec<RequiredField> {
        status
            .required_fields()
            .iter()
            .copied()
            .filter(|field| !self.has_field(*field))
            .collect()
    }

    /// Copia del registro con los datos de la transición aplicados
    pub fn with_details(&self, details: &TransitionDetails) -> Vehicle {
        let mut merged = self.clone();
        if let Some(name) = &details.client_name {
            merged.client_name = Some(name.trim().to_string());
        }
        if let Some(client_id) = &details.client_id {
            merged.client_id = Some(client_id.trim().to_string());
        }
        if details.expected_price.is_some() {
            merged.expected_price = details.expected_price;
        }
        if details.selling_price.is_some() {
            merged.selling_price = details.selling_price;
        }
        if details.reservation_date.is_some() {
            merged.reservation_date = details.reservation_date;
        }
        if let Some(invoice) = &details.invoice_id {
            merged.invoice_id = Some(invoice.trim().to_string());
        }
        if details.delivery_date.is_some() {
            merged.delivery_date = details.delivery_date;
        }
        if let Some(work_order) = &details.work_order_id {
            merged.work_order_id = Some(work_order.trim().to_string());
        }
        if let Some(pdi) = details.pdi_completed {
            merged.pdi_completed = pdi;
        }
        merged
    }

    pub fn warranty_dates(&self) -> WarrantyDates {
        WarrantyDates {
            vehicle: self.vehicle_warranty_expiry,
            battery: self.battery_warranty_expiry,
            dms: self.dms_warranty_deadline,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn vehicle(location: Location, status: VehicleStatus) -> Vehicle {
        let now = Utc::now();
        Vehicle {
            id: Uuid::new_v4(),
            vin: "WVWZZZ1JZXW000001".to_string(),
            brand: Some("Volkswagen".to_string()),
            model: Some("ID.4".to_string()),
            location,
            status,
            client_name: None,
            client_id: None,
            expected_price: None,
            selling_price: None,
            reservation_date: None,
            invoice_id: None,
            delivery_date: None,
            work_order_id: None,
            pdi_completed: false,
            vehicle_warranty_expiry: None,
            battery_warranty_expiry: None,
            dms_warranty_deadline: None,
            created_at: now,
            updated_at: now,
        }
    }
}
