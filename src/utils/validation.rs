//! Utilidades de validación
//!
//! Funciones helper usadas por los DTOs (`#[validate(custom = ...)]`)
//! y por los servicios para validar datos de flota y clientes.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::utils::errors::{validation_error, AppResult};

lazy_static! {
    /// VIN ISO 3779: 17 caracteres, sin I, O ni Q
    static ref VIN_REGEX: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
    static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9 \-]{3,18}[A-Z0-9]$").unwrap();
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_empty"));
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 8 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let upper = value.trim().to_uppercase();
    let clean_plate = upper.replace([' ', '-'], "");
    if clean_plate.len() < 4 || clean_plate.len() > 12 || !PLATE_REGEX.is_match(&upper) {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar número de bastidor (VIN)
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    if !VIN_REGEX.is_match(&value.trim().to_uppercase()) {
        let mut error = ValidationError::new("vin");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"17 characters, no I/O/Q".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Importe estrictamente positivo (tarifas diarias)
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)
}

/// Importe positivo o cero (recargos, precios de opciones, costes)
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Normalizar matrícula para almacenamiento y búsquedas
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Normalizar email (trim + minúsculas)
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Fusionar un texto libre opcional en una actualización parcial.
///
/// `None` conserva el valor actual; una cadena vacía lo borra.
pub fn merge_optional_text(update: Option<String>, current: Option<String>) -> Option<String> {
    match update {
        None => current,
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value.trim().to_string()),
    }
}

/// Verificar que un rango de fechas de alquiler esté ordenado
pub fn ensure_date_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start >= end {
        return Err(validation_error("end_date", "end_date must be after start_date"));
    }
    Ok(())
}
