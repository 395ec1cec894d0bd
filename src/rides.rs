//! Ride lifecycle: provider-initiated create, update and delete.
//!
//! Bookings referencing a deleted ride are removed by the schema's
//! ON DELETE CASCADE, so `delete` is a single statement.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::params;
use thiserror::Error;

use crate::db::models::Ride;
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum RideError {
    #[error("Ride not found")]
    NotFound,

    #[error("Not the ride's provider")]
    NotOwner,

    #[error("Invalid ride: {0}")]
    Validation(String),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

/// Dates are stored canonically as YYYY-MM-DD and times as HH:MM so the
/// catalog can sort and compare them as plain text.
fn validate_date_time(date: &str, time: &str) -> Result<(), RideError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| RideError::Validation(format!("date must be YYYY-MM-DD, got {date:?}")))?;
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| RideError::Validation(format!("time must be HH:MM, got {time:?}")))?;
    Ok(())
}

/// Offer a new ride. Returns the ride id.
pub fn create(
    pool: &DbPool,
    provider_id: &str,
    start_location: &str,
    destination: &str,
    date: &str,
    time: &str,
    seats: i64,
) -> Result<String, RideError> {
    if seats < 1 {
        return Err(RideError::Validation(
            "a ride must offer at least one seat".into(),
        ));
    }
    validate_date_time(date, time)?;

    let conn = pool.get()?;
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO rides (id, provider_id, start_location, destination, date, time, available_seats)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![id, provider_id, start_location, destination, date, time, seats],
    )?;

    tracing::info!(ride_id = %id, provider_id, "ride offered");
    Ok(id)
}

/// Full overwrite of the five mutable fields, provider-only.
///
/// Outstanding bookings are deliberately left alone: lowering the seat
/// count below the number of existing bookings is allowed and not
/// reconciled. A provider may set seats to 0 to close the ride.
pub fn update(
    pool: &DbPool,
    ride_id: &str,
    provider_id: &str,
    start_location: &str,
    destination: &str,
    date: &str,
    time: &str,
    seats: i64,
) -> Result<(), RideError> {
    if seats < 0 {
        return Err(RideError::Validation("seat count cannot be negative".into()));
    }
    validate_date_time(date, time)?;

    let conn = pool.get()?;
    check_owner(&conn, ride_id, provider_id)?;

    conn.execute(
        "UPDATE rides SET start_location = ?1, destination = ?2, date = ?3, time = ?4, available_seats = ?5
         WHERE id = ?6",
        params![start_location, destination, date, time, seats, ride_id],
    )?;
    Ok(())
}

/// Delete a ride and, via cascade, every booking on it. Provider-only.
pub fn delete(pool: &DbPool, ride_id: &str, provider_id: &str) -> Result<(), RideError> {
    let conn = pool.get()?;
    check_owner(&conn, ride_id, provider_id)?;

    conn.execute("DELETE FROM rides WHERE id = ?1", params![ride_id])?;
    tracing::info!(ride_id, "ride deleted");
    Ok(())
}

pub fn get(pool: &DbPool, ride_id: &str) -> Result<Ride, RideError> {
    let conn = pool.get()?;
    conn.query_row(
        "SELECT id, provider_id, start_location, destination, date, time, available_seats
         FROM rides WHERE id = ?1",
        params![ride_id],
        |row| {
            Ok(Ride {
                id: row.get(0)?,
                provider_id: row.get(1)?,
                start_location: row.get(2)?,
                destination: row.get(3)?,
                date: row.get(4)?,
                time: row.get(5)?,
                available_seats: row.get(6)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => RideError::NotFound,
        e => RideError::Sql(e),
    })
}

fn check_owner(
    conn: &rusqlite::Connection,
    ride_id: &str,
    provider_id: &str,
) -> Result<(), RideError> {
    let owner: String = conn
        .query_row(
            "SELECT provider_id FROM rides WHERE id = ?1",
            params![ride_id],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RideError::NotFound,
            e => RideError::Sql(e),
        })?;

    if owner != provider_id {
        return Err(RideError::NotOwner);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings;
    use crate::db::test_support::{insert_user, test_pool};

    #[test]
    fn create_and_get_roundtrip() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");

        let id = create(&pool, &driver, "Priminsberg", "Trier", "2030-06-15", "08:15", 4).unwrap();
        let ride = get(&pool, &id).unwrap();
        assert_eq!(ride.provider_id, driver);
        assert_eq!(ride.start_location, "Priminsberg");
        assert_eq!(ride.destination, "Trier");
        assert_eq!(ride.date, "2030-06-15");
        assert_eq!(ride.time, "08:15");
        assert_eq!(ride.available_seats, 4);
    }

    #[test]
    fn create_rejects_non_positive_seats() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");

        let zero = create(&pool, &driver, "A", "B", "2030-06-15", "08:15", 0);
        assert!(matches!(zero, Err(RideError::Validation(_))));
        let negative = create(&pool, &driver, "A", "B", "2030-06-15", "08:15", -2);
        assert!(matches!(negative, Err(RideError::Validation(_))));
    }

    #[test]
    fn create_rejects_non_canonical_dates() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");

        // DD.MM.YYYY was the old on-disk format; it no longer sorts and
        // must be rejected at the boundary.
        let result = create(&pool, &driver, "A", "B", "15.06.2030", "08:15", 2);
        assert!(matches!(result, Err(RideError::Validation(_))));
        let bad_time = create(&pool, &driver, "A", "B", "2030-06-15", "8h15", 2);
        assert!(matches!(bad_time, Err(RideError::Validation(_))));
    }

    #[test]
    fn update_overwrites_all_fields() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let id = create(&pool, &driver, "A", "B", "2030-06-15", "08:15", 4).unwrap();

        update(&pool, &id, &driver, "C", "D", "2030-07-01", "17:45", 2).unwrap();
        let ride = get(&pool, &id).unwrap();
        assert_eq!(ride.start_location, "C");
        assert_eq!(ride.destination, "D");
        assert_eq!(ride.date, "2030-07-01");
        assert_eq!(ride.time, "17:45");
        assert_eq!(ride.available_seats, 2);
    }

    #[test]
    fn update_does_not_touch_existing_bookings() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let rider = insert_user(&pool, "rider");
        let id = create(&pool, &driver, "A", "B", "2030-06-15", "08:15", 3).unwrap();
        bookings::book(&pool, &rider, &id).unwrap();

        // Provider lowers capacity below outstanding bookings; accepted as-is
        update(&pool, &id, &driver, "A", "B", "2030-06-15", "08:15", 0).unwrap();
        assert_eq!(get(&pool, &id).unwrap().available_seats, 0);

        let remaining: i64 = pool
            .get()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM bookings WHERE ride_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(remaining, 1);
    }

    #[test]
    fn update_and_delete_are_owner_only() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let stranger = insert_user(&pool, "stranger");
        let id = create(&pool, &driver, "A", "B", "2030-06-15", "08:15", 4).unwrap();

        let update_result = update(&pool, &id, &stranger, "X", "Y", "2030-06-15", "08:15", 4);
        assert!(matches!(update_result, Err(RideError::NotOwner)));
        let delete_result = delete(&pool, &id, &stranger);
        assert!(matches!(delete_result, Err(RideError::NotOwner)));

        // Still intact
        assert_eq!(get(&pool, &id).unwrap().start_location, "A");
    }

    #[test]
    fn delete_cascades_to_bookings() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let rider = insert_user(&pool, "rider");
        let id = create(&pool, &driver, "A", "B", "2030-06-15", "08:15", 3).unwrap();
        bookings::book(&pool, &rider, &id).unwrap();

        delete(&pool, &id, &driver).unwrap();

        assert!(matches!(get(&pool, &id), Err(RideError::NotFound)));
        let orphans: i64 = pool
            .get()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM bookings WHERE ride_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn delete_unknown_ride_is_not_found() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let result = delete(&pool, "no-such-ride", &driver);
        assert!(matches!(result, Err(RideError::NotFound)));
    }
}
