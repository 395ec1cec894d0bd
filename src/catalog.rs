//! Ride catalog: the queries behind every ride listing, plus the eager
//! pruning that keeps expired and fully booked rides out of the store.

use chrono::Local;
use rusqlite::params;
use thiserror::Error;

use crate::db::models::{Passenger, Ride, RideListing};
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

fn today() -> String {
    Local::now().date_naive().to_string()
}

/// Remove every ride that is fully booked or whose date has passed.
/// Bookings on pruned rides go with them via the cascade. Runs as a
/// precondition of listing rather than on a schedule; rides are a
/// perishable resource, so stale rows only survive until the next read.
/// Returns the number of rides removed.
pub fn prune_expired_or_empty(pool: &DbPool) -> Result<usize, CatalogError> {
    let conn = pool.get()?;
    let pruned = conn.execute(
        "DELETE FROM rides WHERE available_seats <= 0 OR date < ?1",
        params![today()],
    )?;
    if pruned > 0 {
        tracing::debug!(pruned, "removed expired or full rides");
    }
    Ok(pruned)
}

/// Rides the given user may book right now: seats left, not yet departed,
/// not their own offer, not already booked by them. Ordered by date then
/// time; both are stored canonically so text order is chronological.
pub fn list_bookable(pool: &DbPool, user_id: &str) -> Result<Vec<RideListing>, CatalogError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT r.id, u.username, r.start_location, r.destination, r.date, r.time,
                r.available_seats, u.first_name, u.last_name, u.phone, u.email
         FROM rides r
         JOIN users u ON r.provider_id = u.id
         WHERE r.available_seats > 0
           AND r.date >= ?1
           AND r.provider_id != ?2
           AND NOT EXISTS (SELECT 1 FROM bookings b WHERE b.ride_id = r.id AND b.user_id = ?2)
         ORDER BY r.date, r.time",
    )?;

    let rides = stmt
        .query_map(params![today(), user_id], |row| {
            Ok(RideListing {
                ride_id: row.get(0)?,
                provider_username: row.get(1)?,
                start_location: row.get(2)?,
                destination: row.get(3)?,
                date: row.get(4)?,
                time: row.get(5)?,
                available_seats: row.get(6)?,
                provider_first_name: row.get(7)?,
                provider_last_name: row.get(8)?,
                provider_phone: row.get(9)?,
                provider_email: row.get(10)?,
                booking_id: None,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rides)
}

/// The user's upcoming booked rides, with the booking id so the caller
/// can cancel, and the provider's contact fields for display.
pub fn list_booked(pool: &DbPool, user_id: &str) -> Result<Vec<RideListing>, CatalogError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT r.id, u.username, r.start_location, r.destination, r.date, r.time,
                r.available_seats, u.first_name, u.last_name, u.phone, u.email, b.id
         FROM bookings b
         JOIN rides r ON b.ride_id = r.id
         JOIN users u ON r.provider_id = u.id
         WHERE b.user_id = ?1 AND r.date >= ?2
         ORDER BY r.date, r.time",
    )?;

    let rides = stmt
        .query_map(params![user_id, today()], |row| {
            Ok(RideListing {
                ride_id: row.get(0)?,
                provider_username: row.get(1)?,
                start_location: row.get(2)?,
                destination: row.get(3)?,
                date: row.get(4)?,
                time: row.get(5)?,
                available_seats: row.get(6)?,
                provider_first_name: row.get(7)?,
                provider_last_name: row.get(8)?,
                provider_phone: row.get(9)?,
                provider_email: row.get(10)?,
                booking_id: Some(row.get(11)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rides)
}

/// Rides the user offers, all of them, ordered like the other listings.
pub fn list_offered(pool: &DbPool, user_id: &str) -> Result<Vec<Ride>, CatalogError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, provider_id, start_location, destination, date, time, available_seats
         FROM rides WHERE provider_id = ?1
         ORDER BY date, time",
    )?;

    let rides = stmt
        .query_map(params![user_id], |row| {
            Ok(Ride {
                id: row.get(0)?,
                provider_id: row.get(1)?,
                start_location: row.get(2)?,
                destination: row.get(3)?,
                date: row.get(4)?,
                time: row.get(5)?,
                available_seats: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rides)
}

/// Everyone who booked a seat on the given ride.
pub fn passengers(pool: &DbPool, ride_id: &str) -> Result<Vec<Passenger>, CatalogError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT u.username, u.first_name, u.last_name, u.email, u.phone
         FROM bookings b
         JOIN users u ON b.user_id = u.id
         WHERE b.ride_id = ?1
         ORDER BY u.username",
    )?;

    let passengers = stmt
        .query_map(params![ride_id], |row| {
            Ok(Passenger {
                username: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                email: row.get(3)?,
                phone: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(passengers)
}
