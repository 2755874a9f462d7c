//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    /// 17 caracteres alfanuméricos, sin I, O ni Q
    static ref VIN_REGEX: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").expect("valid VIN regex");
}

/// Normalizar un VIN (espacios fuera, mayúsculas)
pub fn normalize_vin(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Validar formato de VIN
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    let normalized = normalize_vin(value);
    if !VIN_REGEX.is_match(&normalized) {
        let mut error = ValidationError::new("vin");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"17 characters, A-Z/0-9 without I, O, Q".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un precio no sea negativo
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Envolver un error de campo en `ValidationErrors`
pub fn field_errors(field: &'static str, error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vin() {
        assert!(validate_vin("WVWZZZ1JZXW000001").is_ok());
        assert!(validate_vin(" 1hgcm82633a004352 ").is_ok());

        // I, O y Q no están permitidos
        assert!(validate_vin("WVWZZZ1JZXW00000I").is_err());
        assert!(validate_vin("WVWZZZ1JZXW00000O").is_err());
        assert!(validate_vin("WVWZZZ1JZXW00000Q").is_err());

        assert!(validate_vin("WVWZZZ1JZXW00001").is_err());
        assert!(validate_vin("WVWZZZ1JZXW0000012").is_err());
        assert!(validate_vin("WVWZZZ1JZXW-00001").is_err());
    }

    #[test]
    fn test_normalize_vin() {
        assert_eq!(normalize_vin(" 1hgcm82633a004352\n"), "1HGCM82633A004352");
    }

    #[test]
    fn test_validate_date() {
        assert_eq!(
            validate_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(validate_date("2025/06/01").is_err());
        assert!(validate_date("2025-02-30").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(&Decimal::new(50000, 0)).is_ok());
        assert!(validate_price(&Decimal::ZERO).is_ok());
        assert!(validate_price(&Decimal::new(-1, 2)).is_err());
    }
}
