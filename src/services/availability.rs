//! Comprobación de disponibilidad
//!
//! Un vehículo no puede tener dos alquileres no terminales cuyos intervalos
//! se solapen. Los intervalos son cerrados: un alquiler que termina el día 10
//! bloquea otro que empieza el día 10 (no hay rotación en el mismo día).

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    models::rental::RentalInterval,
    utils::errors::{AppError, AppResult},
};

/// La nueva fecha de inicio cae dentro del intervalo existente
pub fn starts_within(existing: &RentalInterval, start: NaiveDate) -> bool {
    existing.start_date <= start && start <= existing.end_date
}

/// La nueva fecha de fin cae dentro del intervalo existente
pub fn ends_within(existing: &RentalInterval, end: NaiveDate) -> bool {
    existing.start_date <= end && end <= existing.end_date
}

/// El nuevo intervalo envuelve por completo al existente
pub fn contains(existing: &RentalInterval, start: NaiveDate, end: NaiveDate) -> bool {
    start <= existing.start_date && existing.end_date <= end
}

/// Solape de intervalos cerrados.
///
/// Equivale a `starts_within || ends_within || contains` siempre que
/// `start <= end`.
pub fn overlaps(existing: &RentalInterval, start: NaiveDate, end: NaiveDate) -> bool {
    existing.start_date <= end && existing.end_date >= start
}

/// Alquileres que entran en conflicto con `[start, end]`.
///
/// Ignora los alquileres terminales y el propio alquiler en edición.
pub fn conflicts<'a>(
    intervals: &'a [RentalInterval],
    start: NaiveDate,
    end: NaiveDate,
    exclude_rental_id: Option<Uuid>,
) -> Vec<&'a RentalInterval> {
    intervals
        .iter()
        .filter(|existing| existing.status.holds_vehicle())
        .filter(|existing| Some(existing.rental_id) != exclude_rental_id)
        .filter(|existing| overlaps(existing, start, end))
        .collect()
}

pub fn has_conflict(
    intervals: &[RentalInterval],
    start: NaiveDate,
    end: NaiveDate,
    exclude_rental_id: Option<Uuid>,
) -> bool {
    !conflicts(intervals, start, end, exclude_rental_id).is_empty()
}

/// Devuelve ConflictError con las referencias que bloquean el intervalo
pub fn ensure_available(
    intervals: &[RentalInterval],
    start: NaiveDate,
    end: NaiveDate,
    exclude_rental_id: Option<Uuid>,
) -> AppResult<()> {
    let blocking = conflicts(intervals, start, end, exclude_rental_id);
    if blocking.is_empty() {
        return Ok(());
    }

    let references: Vec<&str> = blocking.iter().map(|r| r.reference.as_str()).collect();
    Err(AppError::Conflict(format!(
        "Vehicle is not available from {} to {}: overlaps {}",
        start,
        end,
        references.join(", ")
    )))
}
