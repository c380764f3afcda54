//! Cálculo del importe de un alquiler
//!
//! total = días × (tarifa diaria del vehículo + recargo de la zona de recogida)
//!       + Σ precio × cantidad × (días si la opción es diaria)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{option::AdditionalOption, rental::billable_days, rental::RentalOptionLine},
    utils::errors::{bad_request_error, not_found_error, AppResult},
};

/// Datos de tarifa que el store carga para presupuestar un alquiler
#[derive(Debug, Clone)]
pub struct QuoteInputs {
    pub daily_rate: Decimal,
    pub zone_surcharge: Decimal,
    pub options: Vec<AdditionalOption>,
}

/// Opción pedida por el cliente en la reserva
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OptionSelection {
    pub option_id: Uuid,
    #[validate(range(min = 1, max = 10))]
    pub quantity: i32,
}

/// Congelar nombre y precio de las opciones elegidas.
///
/// Las selecciones repetidas de la misma opción se agrupan.
pub fn snapshot_options(
    selections: &[OptionSelection],
    catalog: &[AdditionalOption],
) -> AppResult<Vec<RentalOptionLine>> {
    let mut quantities: BTreeMap<Uuid, i32> = BTreeMap::new();
    for selection in selections {
        *quantities.entry(selection.option_id).or_insert(0) += selection.quantity;
    }

    quantities
        .into_iter()
        .map(|(option_id, quantity)| {
            let option = catalog
                .iter()
                .find(|o| o.id == option_id)
                .ok_or_else(|| not_found_error("Option", &option_id.to_string()))?;
            if !option.active {
                return Err(bad_request_error(&format!("Option '{}' is no longer offered", option.name)));
            }
            Ok(RentalOptionLine {
                option_id,
                name: option.name.clone(),
                quantity,
                unit_price: option.price,
                per_day: option.per_day,
            })
        })
        .collect()
}

pub fn option_line_total(line: &RentalOptionLine, days: i64) -> Decimal {
    let multiplier = if line.per_day { days } else { 1 };
    line.unit_price * Decimal::from(line.quantity) * Decimal::from(multiplier)
}

pub fn quote(
    start: NaiveDate,
    end: NaiveDate,
    daily_rate: Decimal,
    zone_surcharge: Decimal,
    lines: &[RentalOptionLine],
) -> Decimal {
    let days = billable_days(start, end);
    let base = (daily_rate + zone_surcharge) * Decimal::from(days);
    let extras: Decimal = lines.iter().map(|line| option_line_total(line, days)).sum();
    (base + extras).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn option(name: &str, cents: i64, per_day: bool, active: bool) -> AdditionalOption {
        AdditionalOption {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: Decimal::new(cents, 2),
            per_day,
            active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_base_price_with_zone_surcharge() {
        let total = quote(may(1), may(5), Decimal::new(4500, 2), Decimal::new(500, 2), &[]);
        assert_eq!(total, Decimal::new(20000, 2));
    }

    #[test]
    fn test_options_per_day_and_flat() {
        let gps = option("GPS", 500, true, true);
        let cleaning = option("Cleaning", 2000, false, true);
        let lines = snapshot_options(
            &[
                OptionSelection { option_id: gps.id, quantity: 1 },
                OptionSelection { option_id: cleaning.id, quantity: 1 },
            ],
            &[gps.clone(), cleaning.clone()],
        )
        .unwrap();

        // 3 días × 30 + 3 × 5 (GPS) + 20 (limpieza)
        let total = quote(may(1), may(4), Decimal::from(30), Decimal::ZERO, &lines);
        assert_eq!(total, Decimal::from(125));
    }

    #[test]
    fn test_repeated_selections_are_merged() {
        let seat = option("Child seat", 300, true, true);
        let lines = snapshot_options(
            &[
                OptionSelection { option_id: seat.id, quantity: 1 },
                OptionSelection { option_id: seat.id, quantity: 2 },
            ],
            &[seat.clone()],
        )
        .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].unit_price, Decimal::new(300, 2));
    }

    #[test]
    fn test_unknown_or_inactive_option_is_rejected() {
        let retired = option("Roof box", 1500, true, false);
        assert!(snapshot_options(
            &[OptionSelection { option_id: Uuid::new_v4(), quantity: 1 }],
            &[retired.clone()]
        )
        .is_err());
        assert!(snapshot_options(&[OptionSelection { option_id: retired.id, quantity: 1 }], &[retired]).is_err());
    }
}
