//! Store de alquileres sobre PostgreSQL.
//!
//! Cada test recibe una base de datos nueva con las migraciones aplicadas
//! (`DATABASE_URL` debe apuntar a un servidor PostgreSQL).

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use rental_backoffice::{
    dto::vehicle_dto::CreateVehicleRequest,
    models::{rental::RentalStatus, vehicle::VehicleStatus},
    repositories::{
        rental_store::RentalDraft, vehicle_repository::VehicleRepository, RentalRepository,
        RentalStore,
    },
    utils::errors::AppError,
};

fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

struct Seed {
    staff: Uuid,
    customer: Uuid,
    location: Uuid,
}

async fn seed(pool: &PgPool) -> Seed {
    let staff = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO staff (id, email, full_name, password_hash, role) \
         VALUES ($1, 'agent@rental.test', 'Agente', 'x', 'AGENT')",
    )
    .bind(staff)
    .execute(pool)
    .await
    .unwrap();

    let customer = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO customers (id, first_name, last_name, email, phone, driver_license_number) \
         VALUES ($1, 'Ana', 'García', 'ana@rental.test', '+34600000000', 'B-1234567')",
    )
    .bind(customer)
    .execute(pool)
    .await
    .unwrap();

    let location = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO locations (id, name, address, city) \
         VALUES ($1, 'Aeropuerto', 'Terminal 1', 'Madrid')",
    )
    .bind(location)
    .execute(pool)
    .await
    .unwrap();

    Seed {
        staff,
        customer,
        location,
    }
}

async fn add_vehicle(pool: &PgPool, plate: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO vehicles (id, license_plate, brand, model, category, fuel_type, daily_rate) \
         VALUES ($1, $2, 'Seat', 'Ibiza', 'ECONOMY', 'PETROL', 40.00)",
    )
    .bind(id)
    .bind(plate)
    .execute(pool)
    .await
    .unwrap();
    id
}

fn draft(seed: &Seed, vehicle_id: Uuid, start: NaiveDate, end: NaiveDate) -> RentalDraft {
    RentalDraft {
        reference: format!("RNT-TEST-{}", &Uuid::new_v4().simple().to_string()[..8]),
        vehicle_id,
        customer_id: seed.customer,
        pickup_location_id: seed.location,
        return_location_id: seed.location,
        start_date: start,
        end_date: end,
        total_amount: Decimal::new(10000, 2),
        notes: None,
        options: Vec::new(),
        created_by: seed.staff,
    }
}

/// INSERT directo, sin pasar por el bloqueo del repositorio
async fn insert_rental_row(
    pool: &PgPool,
    seed: &Seed,
    vehicle_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    status: RentalStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO rentals (id, reference, vehicle_id, customer_id, pickup_location_id, \
         return_location_id, start_date, end_date, status, total_amount) \
         VALUES ($1, $2, $3, $4, $5, $5, $6, $7, $8, 0)",
    )
    .bind(Uuid::new_v4())
    .bind(format!("RAW-{}", &Uuid::new_v4().simple().to_string()[..8]))
    .bind(vehicle_id)
    .bind(seed.customer)
    .bind(seed.location)
    .bind(start)
    .bind(end)
    .bind(status)
    .execute(pool)
    .await
    .map(|_| ())
}

async fn vehicle_status(pool: &PgPool, vehicle_id: Uuid) -> VehicleStatus {
    let (status,): (VehicleStatus,) = sqlx::query_as("SELECT status FROM vehicles WHERE id = $1")
        .bind(vehicle_id)
        .fetch_one(pool)
        .await
        .unwrap();
    status
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_identical_bookings_only_one_commits(pool: PgPool) {
    let seed = seed(&pool).await;
    let vehicle = add_vehicle(&pool, "1234-ABC").await;
    let repository = RentalRepository::new(pool.clone());

    let attempts = (0..6).map(|_| repository.book(draft(&seed, vehicle, may(20), may(22))));
    let results = join_all(attempts).await;

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 5);

    let (stored,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rentals WHERE vehicle_id = $1")
        .bind(vehicle)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 1);
    assert_eq!(vehicle_status(&pool, vehicle).await, VehicleStatus::Reserved);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_exclusion_constraint_maps_to_conflict(pool: PgPool) {
    let seed = seed(&pool).await;
    let vehicle = add_vehicle(&pool, "2345-BCD").await;

    insert_rental_row(&pool, &seed, vehicle, may(5), may(10), RentalStatus::Reserved)
        .await
        .unwrap();

    let err = insert_rental_row(&pool, &seed, vehicle, may(8), may(12), RentalStatus::Reserved)
        .await
        .unwrap_err();
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));

    // Los alquileres cerrados no cuentan para la constraint
    insert_rental_row(&pool, &seed, vehicle, may(8), may(12), RentalStatus::Cancelled)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_shared_boundary_day_rejected_in_storage(pool: PgPool) {
    let seed = seed(&pool).await;
    let vehicle = add_vehicle(&pool, "3456-CDE").await;
    let repository = RentalRepository::new(pool.clone());

    repository.book(draft(&seed, vehicle, may(5), may(10))).await.unwrap();

    let booked = repository.book(draft(&seed, vehicle, may(10), may(15))).await;
    assert!(matches!(booked, Err(AppError::Conflict(_))));

    let raw = insert_rental_row(&pool, &seed, vehicle, may(10), may(15), RentalStatus::Reserved)
        .await
        .unwrap_err();
    assert!(matches!(AppError::from(raw), AppError::Conflict(_)));

    assert!(repository.book(draft(&seed, vehicle, may(11), may(15))).await.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_holding_intervals_skip_closed_rentals(pool: PgPool) {
    let seed = seed(&pool).await;
    let vehicle = add_vehicle(&pool, "4567-DEF").await;
    let repository = RentalRepository::new(pool.clone());

    let cancelled = repository.book(draft(&seed, vehicle, may(1), may(3))).await.unwrap();
    repository.transition(cancelled.id, RentalStatus::Cancelled).await.unwrap();
    let open = repository.book(draft(&seed, vehicle, may(6), may(8))).await.unwrap();

    let intervals = repository.holding_intervals(vehicle).await.unwrap();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].rental_id, open.id);
    assert_eq!(intervals[0].status, RentalStatus::Reserved);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_available_excludes_held_and_workshop_vehicles(pool: PgPool) {
    let seed = seed(&pool).await;
    let booked = add_vehicle(&pool, "5678-EFG").await;
    let free = add_vehicle(&pool, "6789-FGH").await;
    let workshop = add_vehicle(&pool, "7890-GHI").await;
    sqlx::query("UPDATE vehicles SET status = 'MAINTENANCE' WHERE id = $1")
        .bind(workshop)
        .execute(&pool)
        .await
        .unwrap();

    RentalRepository::new(pool.clone())
        .book(draft(&seed, booked, may(10), may(15)))
        .await
        .unwrap();

    let vehicles = VehicleRepository::new(pool.clone());
    let ids: Vec<Uuid> = vehicles
        .find_available(may(14), may(16), None)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(ids, vec![free]);

    let later: Vec<Uuid> = vehicles
        .find_available(may(16), may(18), Some("ECONOMY"))
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(later.len(), 2);
    assert!(later.contains(&booked) && later.contains(&free));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lifecycle_updates_vehicle_row(pool: PgPool) {
    let seed = seed(&pool).await;
    let vehicle = add_vehicle(&pool, "8901-HIJ").await;
    let repository = RentalRepository::new(pool.clone());
    let vehicles = VehicleRepository::new(pool.clone());

    let rental = repository.book(draft(&seed, vehicle, may(1), may(4))).await.unwrap();
    repository.transition(rental.id, RentalStatus::Active).await.unwrap();
    assert_eq!(vehicle_status(&pool, vehicle).await, VehicleStatus::Rented);

    let manual = vehicles.set_status(vehicle, VehicleStatus::Maintenance).await;
    assert!(matches!(manual, Err(AppError::Conflict(_))));

    let deleted = repository.delete_rental(rental.id).await;
    assert!(matches!(deleted, Err(AppError::InvalidTransition(_))));

    repository.transition(rental.id, RentalStatus::Completed).await.unwrap();
    assert_eq!(vehicle_status(&pool, vehicle).await, VehicleStatus::Available);

    let workshop = vehicles.set_status(vehicle, VehicleStatus::Maintenance).await.unwrap();
    assert_eq!(workshop.status, VehicleStatus::Maintenance);

    repository.delete_rental(rental.id).await.unwrap();
    assert!(repository.find_rental(rental.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unique_and_foreign_key_violations(pool: PgPool) {
    let seed = seed(&pool).await;
    let vehicles = VehicleRepository::new(pool.clone());
    let request = CreateVehicleRequest {
        license_plate: "9012-IJK".to_string(),
        vin: None,
        brand: "Renault".to_string(),
        model: "Clio".to_string(),
        year: Some(2022),
        category: "ECONOMY".to_string(),
        fuel_type: "DIESEL".to_string(),
        transmission: Some("MANUAL".to_string()),
        seats: Some(5),
        mileage: None,
        daily_rate: Decimal::new(3500, 2),
        home_location_id: Some(seed.location),
    };
    let vehicle = vehicles.create(request.clone()).await.unwrap();

    let duplicate = vehicles.create(request).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let mut unknown_customer = draft(&seed, vehicle.id, may(1), may(2));
    unknown_customer.customer_id = Uuid::new_v4();
    let result = RentalRepository::new(pool.clone()).book(unknown_customer).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
