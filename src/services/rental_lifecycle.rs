//! Ciclo de vida del alquiler
//!
//! Tabla de transiciones RESERVED → ACTIVE → (EXTENDED) → COMPLETED, con
//! CANCELLED desde cualquier estado no terminal, y el efecto que cada
//! transición tiene sobre el estado del vehículo asociado.

use chrono::NaiveDate;

use crate::{
    models::{rental::RentalStatus, vehicle::VehicleStatus},
    utils::errors::{invalid_transition_error, validation_error, AppError, AppResult},
};

/// Cambio que una transición provoca en `vehicles.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleEffect {
    Unchanged,
    Set(VehicleStatus),
}

impl VehicleEffect {
    pub fn apply(self, current: VehicleStatus) -> VehicleStatus {
        match self {
            VehicleEffect::Unchanged => current,
            VehicleEffect::Set(status) => status,
        }
    }
}

pub fn can_transition(from: RentalStatus, to: RentalStatus) -> bool {
    use RentalStatus::*;

    matches!(
        (from, to),
        (Reserved, Active)
            | (Active, Completed)
            | (Extended, Completed)
            | (Active, Extended)
            | (Extended, Extended)
            | (Reserved, Cancelled)
            | (Active, Cancelled)
            | (Extended, Cancelled)
    )
}

/// Rechaza cualquier cambio de estado fuera de la tabla
pub fn ensure_transition(from: RentalStatus, to: RentalStatus) -> AppResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(invalid_transition_error(from, to))
    }
}

/// Una recogida exige que el coche no siga en la calle con otro alquiler
pub fn ensure_pickup_allowed(other_holds: &[RentalStatus]) -> AppResult<()> {
    if other_holds.iter().any(|s| s.is_on_road()) {
        return Err(AppError::Conflict(
            "Vehicle has not been returned from its previous rental".to_string(),
        ));
    }
    Ok(())
}

/// Sólo los alquileres cerrados se pueden borrar
pub fn ensure_deletable(status: RentalStatus) -> AppResult<()> {
    if status.is_terminal() {
        Ok(())
    } else {
        Err(AppError::InvalidTransition(format!(
            "Only COMPLETED or CANCELLED rentals can be deleted (current status: {})",
            status
        )))
    }
}

/// Fechas, sedes y opciones sólo se editan antes de la recogida
pub fn ensure_amendable(status: RentalStatus) -> AppResult<()> {
    if status == RentalStatus::Reserved {
        Ok(())
    } else {
        Err(AppError::InvalidTransition(format!(
            "Only RESERVED rentals can be amended (current status: {}); use extend for active rentals",
            status
        )))
    }
}

/// Tipo de cambio de fechas sobre un alquiler existente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleChangeKind {
    /// Edición libre antes de la recogida
    Amend,
    /// Prolongación de un alquiler en curso
    Extend,
}

/// Valida un cambio de fechas y devuelve el estado resultante del alquiler
pub fn plan_schedule_change(
    kind: ScheduleChangeKind,
    status: RentalStatus,
    current: (NaiveDate, NaiveDate),
    proposed: (NaiveDate, NaiveDate),
) -> AppResult<RentalStatus> {
    match kind {
        ScheduleChangeKind::Amend => {
            ensure_amendable(status)?;
            Ok(status)
        }
        ScheduleChangeKind::Extend => {
            ensure_transition(status, RentalStatus::Extended)?;
            if proposed.0 != current.0 {
                return Err(validation_error("start_date", "an extension cannot move the start date"));
            }
            if proposed.1 <= current.1 {
                return Err(validation_error("new_end_date", "new_end_date must be after the current end date"));
            }
            Ok(RentalStatus::Extended)
        }
    }
}

/// Efecto sobre el vehículo cuando un alquiler pasa a `target`.
///
/// `other_holds` son los estados del resto de alquileres no terminales del
/// mismo vehículo. Al liberar el vehículo, estos deciden si queda RENTED,
/// RESERVED o AVAILABLE. MAINTENANCE y OUT_OF_SERVICE sólo los cambia la
/// recogida.
pub fn vehicle_effect(
    target: RentalStatus,
    vehicle: VehicleStatus,
    other_holds: &[RentalStatus],
) -> VehicleEffect {
    match target {
        RentalStatus::Reserved if vehicle == VehicleStatus::Available => {
            VehicleEffect::Set(VehicleStatus::Reserved)
        }
        RentalStatus::Reserved | RentalStatus::Extended => VehicleEffect::Unchanged,
        RentalStatus::Active => VehicleEffect::Set(VehicleStatus::Rented),
        RentalStatus::Completed | RentalStatus::Cancelled => {
            if vehicle.is_fleet_hold() {
                VehicleEffect::Unchanged
            } else if other_holds.iter().any(|s| s.is_on_road()) {
                VehicleEffect::Set(VehicleStatus::Rented)
            } else if other_holds.contains(&RentalStatus::Reserved) {
                VehicleEffect::Set(VehicleStatus::Reserved)
            } else {
                VehicleEffect::Set(VehicleStatus::Available)
            }
        }
    }
}

/// Cambio manual de estado de flota (mantenimiento, baja, vuelta al servicio).
///
/// Devuelve el estado que debe guardarse: volver a AVAILABLE con reservas
/// pendientes deja el vehículo en RESERVED.
pub fn manual_vehicle_status(
    current: VehicleStatus,
    target: VehicleStatus,
    holds: &[RentalStatus],
) -> AppResult<VehicleStatus> {
    if target.is_rental_linked() {
        return Err(AppError::BadRequest(format!(
            "{} is set by rental transitions, not manually",
            target
        )));
    }
    if current == VehicleStatus::Rented || holds.iter().any(|s| s.is_on_road()) {
        return Err(AppError::Conflict(
            "Vehicle is currently rented; complete the rental first".to_string(),
        ));
    }
    if target == VehicleStatus::Available && holds.contains(&RentalStatus::Reserved) {
        return Ok(VehicleStatus::Reserved);
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use RentalStatus::*;

    const ALL: [RentalStatus; 5] = [Reserved, Active, Extended, Completed, Cancelled];

    #[test]
    fn test_transition_table() {
        let allowed = [
            (Reserved, Active),
            (Active, Completed),
            (Extended, Completed),
            (Active, Extended),
            (Extended, Extended),
            (Reserved, Cancelled),
            (Active, Cancelled),
            (Extended, Cancelled),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    can_transition(from, to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        for to in ALL {
            assert!(ensure_transition(Completed, to).is_err());
            assert!(ensure_transition(Cancelled, to).is_err());
        }
    }

    #[test]
    fn test_invalid_transition_error_kind() {
        assert!(matches!(
            ensure_transition(Reserved, Completed),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_deletion_guard() {
        assert!(ensure_deletable(Completed).is_ok());
        assert!(ensure_deletable(Cancelled).is_ok());
        assert!(ensure_deletable(Active).is_err());
        assert!(ensure_deletable(Reserved).is_err());
        assert!(ensure_deletable(Extended).is_err());
    }

    #[test]
    fn test_amendments_only_before_pickup() {
        assert!(ensure_amendable(Reserved).is_ok());
        assert!(ensure_amendable(Active).is_err());
        assert!(ensure_amendable(Cancelled).is_err());
    }

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn test_amend_keeps_status() {
        let status = plan_schedule_change(ScheduleChangeKind::Amend, Reserved, (may(1), may(5)), (may(2), may(6)));
        assert_eq!(status.unwrap(), Reserved);
        assert!(plan_schedule_change(ScheduleChangeKind::Amend, Active, (may(1), may(5)), (may(1), may(6))).is_err());
    }

    #[test]
    fn test_extend_moves_to_extended() {
        for from in [Active, Extended] {
            let status = plan_schedule_change(ScheduleChangeKind::Extend, from, (may(1), may(5)), (may(1), may(8)));
            assert_eq!(status.unwrap(), Extended);
        }
        assert!(plan_schedule_change(ScheduleChangeKind::Extend, Reserved, (may(1), may(5)), (may(1), may(8))).is_err());
    }

    #[test]
    fn test_extend_must_push_end_date_forward() {
        assert!(plan_schedule_change(ScheduleChangeKind::Extend, Active, (may(1), may(5)), (may(1), may(5))).is_err());
        assert!(plan_schedule_change(ScheduleChangeKind::Extend, Active, (may(1), may(5)), (may(2), may(9))).is_err());
    }

    #[test]
    fn test_paired_vehicle_status() {
        assert_eq!(
            vehicle_effect(Reserved, VehicleStatus::Available, &[]),
            VehicleEffect::Set(VehicleStatus::Reserved)
        );
        assert_eq!(
            vehicle_effect(Active, VehicleStatus::Reserved, &[]),
            VehicleEffect::Set(VehicleStatus::Rented)
        );
        assert_eq!(vehicle_effect(Extended, VehicleStatus::Rented, &[]), VehicleEffect::Unchanged);
        assert_eq!(
            vehicle_effect(Completed, VehicleStatus::Rented, &[]),
            VehicleEffect::Set(VehicleStatus::Available)
        );
        assert_eq!(
            vehicle_effect(Cancelled, VehicleStatus::Reserved, &[]),
            VehicleEffect::Set(VehicleStatus::Available)
        );
    }

    #[test]
    fn test_new_reservation_does_not_clobber_rented_vehicle() {
        assert_eq!(vehicle_effect(Reserved, VehicleStatus::Rented, &[Active]), VehicleEffect::Unchanged);
        assert_eq!(vehicle_effect(Reserved, VehicleStatus::Maintenance, &[]), VehicleEffect::Unchanged);
    }

    #[test]
    fn test_release_keeps_other_holds() {
        assert_eq!(
            vehicle_effect(Cancelled, VehicleStatus::Rented, &[Active]),
            VehicleEffect::Set(VehicleStatus::Rented)
        );
        assert_eq!(
            vehicle_effect(Completed, VehicleStatus::Rented, &[Reserved]),
            VehicleEffect::Set(VehicleStatus::Reserved)
        );
        assert_eq!(
            vehicle_effect(Cancelled, VehicleStatus::Maintenance, &[]),
            VehicleEffect::Unchanged
        );
    }

    #[test]
    fn test_effect_apply() {
        assert_eq!(VehicleEffect::Unchanged.apply(VehicleStatus::Rented), VehicleStatus::Rented);
        assert_eq!(
            VehicleEffect::Set(VehicleStatus::Available).apply(VehicleStatus::Rented),
            VehicleStatus::Available
        );
    }

    #[test]
    fn test_manual_status_rules() {
        assert_eq!(
            manual_vehicle_status(VehicleStatus::Available, VehicleStatus::Maintenance, &[]).unwrap(),
            VehicleStatus::Maintenance
        );
        assert!(matches!(
            manual_vehicle_status(VehicleStatus::Rented, VehicleStatus::Maintenance, &[Active]),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            manual_vehicle_status(VehicleStatus::Available, VehicleStatus::Rented, &[]),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(
            manual_vehicle_status(VehicleStatus::Maintenance, VehicleStatus::Available, &[Reserved]).unwrap(),
            VehicleStatus::Reserved
        );
        assert_eq!(
            manual_vehicle_status(VehicleStatus::OutOfService, VehicleStatus::Available, &[]).unwrap(),
            VehicleStatus::Available
        );
    }

    #[test]
    fn test_pickup_blocked_while_car_is_out() {
        assert!(ensure_pickup_allowed(&[]).is_ok());
        assert!(ensure_pickup_allowed(&[Reserved]).is_ok());
        assert!(matches!(ensure_pickup_allowed(&[Active]), Err(AppError::Conflict(_))));
        assert!(matches!(ensure_pickup_allowed(&[Reserved, Extended]), Err(AppError::Conflict(_))));
    }
}
