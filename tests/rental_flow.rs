use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use rental_backoffice::{
    dto::rental_dto::{
        AvailabilityRequest, CreateRentalRequest, ExtendRentalRequest, UpdateRentalRequest,
    },
    middleware::auth::AuthenticatedUser,
    models::{
        option::AdditionalOption,
        rental::RentalStatus,
        staff::StaffRole,
        vehicle::VehicleStatus,
    },
    repositories::{rental_store::RentalStore, InMemoryRentalStore, RentalFilters},
    services::{pricing::OptionSelection, RentalService},
    utils::errors::AppError,
};

fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

fn agent() -> AuthenticatedUser {
    AuthenticatedUser {
        staff_id: Uuid::new_v4(),
        email: "agent@rental.test".to_string(),
        role: StaffRole::Agent,
    }
}

fn manager() -> AuthenticatedUser {
    AuthenticatedUser {
        staff_id: Uuid::new_v4(),
        email: "manager@rental.test".to_string(),
        role: StaffRole::Manager,
    }
}

struct Fixture {
    store: InMemoryRentalStore,
    service: RentalService,
    vehicle: Uuid,
    customer: Uuid,
    location: Uuid,
}

async fn fixture() -> Fixture {
    let store = InMemoryRentalStore::new();
    let vehicle = store.add_vehicle(Decimal::new(4000, 2)).await;
    let customer = store.add_customer().await;
    let location = store.add_location(Decimal::new(500, 2)).await;
    let service = RentalService::new(Arc::new(store.clone()));
    Fixture {
        store,
        service,
        vehicle,
        customer,
        location,
    }
}

impl Fixture {
    fn booking(&self, start: NaiveDate, end: NaiveDate) -> CreateRentalRequest {
        CreateRentalRequest {
            vehicle_id: self.vehicle,
            customer_id: self.customer,
            pickup_location_id: self.location,
            return_location_id: None,
            start_date: start,
            end_date: end,
            options: Vec::new(),
            notes: None,
        }
    }

    async fn vehicle_status(&self) -> VehicleStatus {
        self.store.vehicle_status(self.vehicle).await.unwrap().unwrap()
    }
}

#[tokio::test]
async fn test_booking_prices_and_reserves_vehicle() {
    let f = fixture().await;

    let rental = f.service.create_rental(&agent(), f.booking(may(1), may(4))).await.unwrap();

    assert_eq!(rental.status, RentalStatus::Reserved);
    assert_eq!(rental.return_location_id, f.location);
    // 3 días × (40.00 + 5.00)
    assert_eq!(rental.total_amount, Decimal::new(13500, 2));
    assert!(rental.reference.starts_with("RNT-202405-"));
    assert_eq!(f.vehicle_status().await, VehicleStatus::Reserved);
}

#[tokio::test]
async fn test_overlapping_booking_is_rejected() {
    let f = fixture().await;
    f.service.create_rental(&agent(), f.booking(may(10), may(15))).await.unwrap();

    for (start, end) in [(may(12), may(13)), (may(8), may(11)), (may(14), may(20)), (may(5), may(25))] {
        let result = f.service.create_rental(&agent(), f.booking(start, end)).await;
        assert!(matches!(result, Err(AppError::Conflict(_))), "{} - {}", start, end);
    }
}

#[tokio::test]
async fn test_shared_boundary_day_conflicts() {
    let f = fixture().await;
    f.service.create_rental(&agent(), f.booking(may(10), may(15))).await.unwrap();

    let same_day_return = f.service.create_rental(&agent(), f.booking(may(15), may(18))).await;
    assert!(matches!(same_day_return, Err(AppError::Conflict(_))));

    let next_day = f.service.create_rental(&agent(), f.booking(may(16), may(18))).await;
    assert!(next_day.is_ok());
}

#[tokio::test]
async fn test_availability_reports_conflicts_and_excludes_own_rental() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(10), may(15))).await.unwrap();

    let mut request = AvailabilityRequest {
        vehicle_id: f.vehicle,
        start_date: may(14),
        end_date: may(16),
        exclude_rental_id: None,
    };
    let busy = f.service.check_availability(&request).await.unwrap();
    assert!(!busy.available);
    assert_eq!(busy.conflicts.len(), 1);
    assert_eq!(busy.conflicts[0].rental_id, rental.id);

    request.exclude_rental_id = Some(rental.id);
    let own = f.service.check_availability(&request).await.unwrap();
    assert!(own.available);
    assert!(own.conflicts.is_empty());
}

#[tokio::test]
async fn test_availability_rejects_inverted_range_and_unknown_vehicle() {
    let f = fixture().await;

    let inverted = AvailabilityRequest {
        vehicle_id: f.vehicle,
        start_date: may(10),
        end_date: may(9),
        exclude_rental_id: None,
    };
    assert!(matches!(
        f.service.check_availability(&inverted).await,
        Err(AppError::Validation(_))
    ));

    let unknown = AvailabilityRequest {
        vehicle_id: Uuid::new_v4(),
        start_date: may(10),
        end_date: may(12),
        exclude_rental_id: None,
    };
    assert!(matches!(
        f.service.check_availability(&unknown).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_identical_bookings_only_one_wins() {
    let f = fixture().await;
    let user = agent();

    let attempts = (0..8).map(|_| f.service.create_rental(&user, f.booking(may(20), may(22))));
    let results = join_all(attempts).await;

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn test_cancelled_rental_frees_the_dates() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(1), may(5))).await.unwrap();

    f.service
        .transition_rental(&agent(), rental.id, RentalStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(f.vehicle_status().await, VehicleStatus::Available);

    let rebooked = f.service.create_rental(&agent(), f.booking(may(1), may(5))).await;
    assert!(rebooked.is_ok());
}

#[tokio::test]
async fn test_pickup_and_return_drive_vehicle_status() {
    let f = fixture().await;
    let first = f.service.create_rental(&agent(), f.booking(may(1), may(3))).await.unwrap();
    let second = f.service.create_rental(&agent(), f.booking(may(10), may(12))).await.unwrap();

    let active = f.service.transition_rental(&agent(), first.id, RentalStatus::Active).await.unwrap();
    assert_eq!(active.status, RentalStatus::Active);
    assert_eq!(f.vehicle_status().await, VehicleStatus::Rented);

    f.service.transition_rental(&agent(), first.id, RentalStatus::Completed).await.unwrap();
    // La segunda reserva sigue pendiente
    assert_eq!(f.vehicle_status().await, VehicleStatus::Reserved);

    f.service.transition_rental(&agent(), second.id, RentalStatus::Cancelled).await.unwrap();
    assert_eq!(f.vehicle_status().await, VehicleStatus::Available);
}

#[tokio::test]
async fn test_illegal_transitions_are_rejected() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(1), may(3))).await.unwrap();

    let skip_pickup = f.service.transition_rental(&agent(), rental.id, RentalStatus::Completed).await;
    assert!(matches!(skip_pickup, Err(AppError::InvalidTransition(_))));

    f.service.transition_rental(&agent(), rental.id, RentalStatus::Cancelled).await.unwrap();
    let revive = f.service.transition_rental(&agent(), rental.id, RentalStatus::Active).await;
    assert!(matches!(revive, Err(AppError::InvalidTransition(_))));

    let extended = f.service.transition_rental(&agent(), rental.id, RentalStatus::Extended).await;
    assert!(matches!(extended, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_pickup_from_maintenance_sets_rented() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(1), may(3))).await.unwrap();
    f.store.set_vehicle_status(f.vehicle, VehicleStatus::Maintenance).await.unwrap();

    f.service.transition_rental(&agent(), rental.id, RentalStatus::Active).await.unwrap();
    assert_eq!(f.vehicle_status().await, VehicleStatus::Rented);
}

#[tokio::test]
async fn test_extend_active_rental() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(1), may(3))).await.unwrap();
    f.service.create_rental(&agent(), f.booking(may(8), may(9))).await.unwrap();
    f.service.transition_rental(&agent(), rental.id, RentalStatus::Active).await.unwrap();

    let extended = f
        .service
        .extend_rental(&agent(), rental.id, ExtendRentalRequest { new_end_date: may(5) })
        .await
        .unwrap();
    assert_eq!(extended.status, RentalStatus::Extended);
    assert_eq!(extended.end_date, may(5));
    assert_eq!(extended.total_amount, Decimal::new(18000, 2));

    // Choca con la reserva del día 8
    let too_far = f
        .service
        .extend_rental(&agent(), rental.id, ExtendRentalRequest { new_end_date: may(8) })
        .await;
    assert!(matches!(too_far, Err(AppError::Conflict(_))));

    let shorter = f
        .service
        .extend_rental(&agent(), rental.id, ExtendRentalRequest { new_end_date: may(4) })
        .await;
    assert!(matches!(shorter, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_reserved_rental_cannot_be_extended() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(1), may(3))).await.unwrap();

    let result = f
        .service
        .extend_rental(&agent(), rental.id, ExtendRentalRequest { new_end_date: may(6) })
        .await;
    assert!(matches!(result, Err(AppError::InvalidTransition(_))));
}

#[tokio::test]
async fn test_amend_moves_dates_ignoring_own_interval() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(10), may(15))).await.unwrap();

    let moved = f
        .service
        .update_rental(
            &agent(),
            rental.id,
            UpdateRentalRequest {
                start_date: Some(may(12)),
                end_date: Some(may(16)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((moved.start_date, moved.end_date), (may(12), may(16)));
    assert_eq!(moved.total_amount, Decimal::new(18000, 2));

    f.service.transition_rental(&agent(), rental.id, RentalStatus::Active).await.unwrap();
    let after_pickup = f
        .service
        .update_rental(
            &agent(),
            rental.id,
            UpdateRentalRequest {
                end_date: Some(may(20)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(after_pickup, Err(AppError::InvalidTransition(_))));
}

#[tokio::test]
async fn test_option_prices_are_frozen_at_booking() {
    let f = fixture().await;
    let gps = AdditionalOption {
        id: Uuid::new_v4(),
        name: "GPS".to_string(),
        description: None,
        price: Decimal::new(300, 2),
        per_day: true,
        active: true,
        created_at: Utc::now(),
    };
    let cleaning = AdditionalOption {
        id: Uuid::new_v4(),
        name: "Limpieza".to_string(),
        description: None,
        price: Decimal::new(2500, 2),
        per_day: false,
        active: true,
        created_at: Utc::now(),
    };
    let gps_id = f.store.add_option(gps).await;
    let cleaning_id = f.store.add_option(cleaning).await;

    let mut request = f.booking(may(1), may(3));
    request.options = vec![
        OptionSelection { option_id: gps_id, quantity: 1 },
        OptionSelection { option_id: cleaning_id, quantity: 1 },
    ];
    let rental = f.service.create_rental(&agent(), request).await.unwrap();

    // 2 × 45.00 + 2 × 3.00 + 25.00
    assert_eq!(rental.total_amount, Decimal::new(12100, 2));
    assert_eq!(rental.options.len(), 2);

    let unknown = {
        let mut request = f.booking(may(20), may(21));
        request.options = vec![OptionSelection { option_id: Uuid::new_v4(), quantity: 1 }];
        f.service.create_rental(&agent(), request).await
    };
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_requires_terminal_status_and_manager() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(1), may(3))).await.unwrap();

    let by_agent = f.service.delete_rental(&agent(), rental.id).await;
    assert!(matches!(by_agent, Err(AppError::Forbidden(_))));

    let still_open = f.service.delete_rental(&manager(), rental.id).await;
    assert!(matches!(still_open, Err(AppError::InvalidTransition(_))));

    f.service.transition_rental(&agent(), rental.id, RentalStatus::Cancelled).await.unwrap();
    f.service.delete_rental(&manager(), rental.id).await.unwrap();
    assert!(matches!(
        f.service.get_rental(rental.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_filters_by_status_and_window() {
    let f = fixture().await;
    let early = f.service.create_rental(&agent(), f.booking(may(1), may(3))).await.unwrap();
    let late = f.service.create_rental(&agent(), f.booking(may(20), may(22))).await.unwrap();
    f.service.transition_rental(&agent(), early.id, RentalStatus::Cancelled).await.unwrap();

    let all = f
        .service
        .list_rentals(&RentalFilters { limit: 50, ..Default::default() })
        .await
        .unwrap();
    assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![late.id, early.id]);

    let reserved = f
        .service
        .list_rentals(&RentalFilters {
            status: Some(RentalStatus::Reserved),
            limit: 50,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(reserved.len(), 1);
    assert_eq!(reserved[0].id, late.id);

    let window = f
        .service
        .list_rentals(&RentalFilters {
            from: Some(may(2)),
            to: Some(may(10)),
            limit: 50,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].id, early.id);
}

#[tokio::test]
async fn test_unknown_customer_or_location_is_not_found() {
    let f = fixture().await;

    let mut request = f.booking(may(1), may(2));
    request.customer_id = Uuid::new_v4();
    assert!(matches!(
        f.service.create_rental(&agent(), request).await,
        Err(AppError::NotFound(_))
    ));

    let mut request = f.booking(may(1), may(2));
    request.return_location_id = Some(Uuid::new_v4());
    assert!(matches!(
        f.service.create_rental(&agent(), request).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_check_create_check_scenario() {
    let f = fixture().await;
    let request = |start, end| AvailabilityRequest {
        vehicle_id: f.vehicle,
        start_date: start,
        end_date: end,
        exclude_rental_id: None,
    };

    assert!(f.service.check_availability(&request(may(1), may(5))).await.unwrap().available);
    f.service.create_rental(&agent(), f.booking(may(1), may(5))).await.unwrap();
    assert!(!f.service.check_availability(&request(may(3), may(7))).await.unwrap().available);
}

#[tokio::test]
async fn test_back_to_back_on_same_day_conflicts() {
    let f = fixture().await;
    f.service.create_rental(&agent(), f.booking(may(5), may(10))).await.unwrap();

    let result = f.service.create_rental(&agent(), f.booking(may(10), may(15))).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_amend_without_moving_dates_is_not_a_conflict() {
    let f = fixture().await;
    let rental = f.service.create_rental(&agent(), f.booking(may(5), may(10))).await.unwrap();

    let updated = f
        .service
        .update_rental(
            &agent(),
            rental.id,
            UpdateRentalRequest {
                notes: Some("Cliente llega tarde".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((updated.start_date, updated.end_date), (may(5), may(10)));
    assert_eq!(updated.notes.as_deref(), Some("Cliente llega tarde"));
    assert_eq!(updated.total_amount, rental.total_amount);
}

#[tokio::test]
async fn test_pickup_refused_until_previous_rental_returns() {
    let f = fixture().await;
    let first = f.service.create_rental(&agent(), f.booking(may(1), may(3))).await.unwrap();
    let second = f.service.create_rental(&agent(), f.booking(may(4), may(6))).await.unwrap();
    f.service.transition_rental(&agent(), first.id, RentalStatus::Active).await.unwrap();

    // Devolución con retraso: el coche sigue fuera
    let early = f.service.transition_rental(&agent(), second.id, RentalStatus::Active).await;
    assert!(matches!(early, Err(AppError::Conflict(_))));
    assert_eq!(
        f.service.get_rental(second.id).await.unwrap().status,
        RentalStatus::Reserved
    );

    f.service.transition_rental(&agent(), first.id, RentalStatus::Completed).await.unwrap();
    let picked = f.service.transition_rental(&agent(), second.id, RentalStatus::Active).await.unwrap();
    assert_eq!(picked.status, RentalStatus::Active);
    assert_eq!(f.vehicle_status().await, VehicleStatus::Rented);
}

#[tokio::test]
async fn test_amend_with_empty_notes_clears_them() {
    let f = fixture().await;
    let mut request = f.booking(may(5), may(10));
    request.notes = Some("Silla infantil en el maletero".to_string());
    let rental = f.service.create_rental(&agent(), request).await.unwrap();

    let kept = f
        .service
        .update_rental(&agent(), rental.id, UpdateRentalRequest::default())
        .await
        .unwrap();
    assert_eq!(kept.notes.as_deref(), Some("Silla infantil en el maletero"));

    let cleared = f
        .service
        .update_rental(
            &agent(),
            rental.id,
            UpdateRentalRequest {
                notes: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.notes, None);
}
