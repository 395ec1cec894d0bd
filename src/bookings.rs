//! Booking ledger: the only code that creates or removes booking rows and
//! adjusts a ride's seat count, keeping the two in lockstep.

use rusqlite::params;
use thiserror::Error;

use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Ride not found")]
    RideNotFound,

    #[error("No seats available")]
    NoSeatsAvailable,

    #[error("Already booked")]
    DuplicateBooking,

    #[error("Not the booking's holder")]
    NotOwner,

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

/// Reserve one seat on a ride for a user. Returns the new booking id.
///
/// The seat check, the booking insert and the seat decrement all run
/// inside one IMMEDIATE transaction, so two callers racing on the last
/// seat cannot both get past the check.
pub fn book(pool: &DbPool, user_id: &str, ride_id: &str) -> Result<String, BookingError> {
    let conn = pool.get()?;

    conn.execute("BEGIN IMMEDIATE", [])?;

    let result: Result<String, BookingError> = (|| {
        let seats: i64 = match conn.query_row(
            "SELECT available_seats FROM rides WHERE id = ?1",
            params![ride_id],
            |row| row.get(0),
        ) {
            Ok(seats) => seats,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Err(BookingError::RideNotFound),
            Err(e) => return Err(e.into()),
        };

        if seats <= 0 {
            return Err(BookingError::NoSeatsAvailable);
        }

        let already_booked: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM bookings WHERE user_id = ?1 AND ride_id = ?2",
            params![user_id, ride_id],
            |row| row.get(0),
        )?;
        if already_booked {
            return Err(BookingError::DuplicateBooking);
        }

        let booking_id = uuid::Uuid::now_v7().to_string();
        conn.execute(
            "INSERT INTO bookings (id, user_id, ride_id) VALUES (?1, ?2, ?3)",
            params![booking_id, user_id, ride_id],
        )?;
        conn.execute(
            "UPDATE rides SET available_seats = available_seats - 1 WHERE id = ?1",
            params![ride_id],
        )?;

        Ok(booking_id)
    })();

    match result {
        Ok(id) => {
            conn.execute("COMMIT", [])?;
            tracing::debug!(booking_id = %id, ride_id, "seat booked");
            Ok(id)
        }
        Err(e) => {
            let _ = conn.execute("ROLLBACK", []);
            Err(e)
        }
    }
}

/// Cancel a booking: give the seat back to the ride (if the ride still
/// exists) and remove the booking row. Unknown ids are a no-op, so the
/// call is idempotent. Returns whether a booking was actually removed.
pub fn cancel(pool: &DbPool, booking_id: &str) -> Result<bool, BookingError> {
    cancel_inner(pool, booking_id, None)
}

/// Like [`cancel`], but only the user holding the booking may remove it.
/// Unknown ids stay a no-op for the caller; someone else's booking is
/// rejected untouched.
pub fn cancel_own(pool: &DbPool, user_id: &str, booking_id: &str) -> Result<bool, BookingError> {
    cancel_inner(pool, booking_id, Some(user_id))
}

fn cancel_inner(
    pool: &DbPool,
    booking_id: &str,
    expected_holder: Option<&str>,
) -> Result<bool, BookingError> {
    let conn = pool.get()?;

    conn.execute("BEGIN IMMEDIATE", [])?;

    let result: Result<bool, BookingError> = (|| {
        let row: Option<(String, String)> = match conn.query_row(
            "SELECT ride_id, user_id FROM bookings WHERE id = ?1",
            params![booking_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        ) {
            Ok(row) => Some(row),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let Some((ride_id, holder)) = row else {
            return Ok(false);
        };

        if let Some(expected) = expected_holder {
            if holder != expected {
                return Err(BookingError::NotOwner);
            }
        }

        // If the provider deleted the ride in the meantime there is no
        // seat to give back; the booking row must still go.
        conn.execute(
            "UPDATE rides SET available_seats = available_seats + 1 WHERE id = ?1",
            params![ride_id],
        )?;
        conn.execute(
            "DELETE FROM bookings WHERE id = ?1",
            params![booking_id],
        )?;

        Ok(true)
    })();

    match result {
        Ok(removed) => {
            conn.execute("COMMIT", [])?;
            if removed {
                tracing::debug!(booking_id, "booking cancelled");
            }
            Ok(removed)
        }
        Err(e) => {
            let _ = conn.execute("ROLLBACK", []);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_user, test_pool};
    use crate::rides;

    fn seats_of(pool: &DbPool, ride_id: &str) -> i64 {
        pool.get()
            .unwrap()
            .query_row(
                "SELECT available_seats FROM rides WHERE id = ?1",
                params![ride_id],
                |row| row.get(0),
            )
            .unwrap()
    }

    fn booking_count(pool: &DbPool, ride_id: &str) -> i64 {
        pool.get()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM bookings WHERE ride_id = ?1",
                params![ride_id],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn book_decrements_seats_and_inserts_booking() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let rider = insert_user(&pool, "rider");
        let ride = rides::create(&pool, &driver, "Priminsberg", "Luxembourg", "2030-05-01", "07:30", 3)
            .unwrap();

        let booking = book(&pool, &rider, &ride).unwrap();
        assert!(!booking.is_empty());
        assert_eq!(seats_of(&pool, &ride), 2);
        assert_eq!(booking_count(&pool, &ride), 1);
    }

    #[test]
    fn double_booking_is_rejected_and_seats_drop_once() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let rider = insert_user(&pool, "rider");
        let ride = rides::create(&pool, &driver, "A", "B", "2030-05-01", "07:30", 3).unwrap();

        book(&pool, &rider, &ride).unwrap();
        let second = book(&pool, &rider, &ride);
        assert!(matches!(second, Err(BookingError::DuplicateBooking)));
        assert_eq!(seats_of(&pool, &ride), 2);
        assert_eq!(booking_count(&pool, &ride), 1);
    }

    #[test]
    fn booking_a_full_ride_fails_and_leaves_state_unchanged() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let rider1 = insert_user(&pool, "rider1");
        let rider2 = insert_user(&pool, "rider2");
        let ride = rides::create(&pool, &driver, "A", "B", "2030-05-01", "07:30", 1).unwrap();

        book(&pool, &rider1, &ride).unwrap();
        let result = book(&pool, &rider2, &ride);
        assert!(matches!(result, Err(BookingError::NoSeatsAvailable)));
        assert_eq!(seats_of(&pool, &ride), 0);
        assert_eq!(booking_count(&pool, &ride), 1);
    }

    #[test]
    fn booking_an_unknown_ride_fails() {
        let (pool, _tmp) = test_pool();
        let rider = insert_user(&pool, "rider");
        let result = book(&pool, &rider, "no-such-ride");
        assert!(matches!(result, Err(BookingError::RideNotFound)));
    }

    #[test]
    fn cancel_returns_the_seat_and_is_idempotent() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let rider = insert_user(&pool, "rider");
        let ride = rides::create(&pool, &driver, "A", "B", "2030-05-01", "07:30", 2).unwrap();

        let booking = book(&pool, &rider, &ride).unwrap();
        assert_eq!(seats_of(&pool, &ride), 1);

        assert!(cancel(&pool, &booking).unwrap());
        assert_eq!(seats_of(&pool, &ride), 2);
        assert_eq!(booking_count(&pool, &ride), 0);

        // Second cancel on the same id is a no-op
        assert!(!cancel(&pool, &booking).unwrap());
        assert_eq!(seats_of(&pool, &ride), 2);
    }

    #[test]
    fn cancel_own_rejects_someone_elses_booking() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let rider = insert_user(&pool, "rider");
        let stranger = insert_user(&pool, "stranger");
        let ride = rides::create(&pool, &driver, "A", "B", "2030-05-01", "07:30", 2).unwrap();

        let booking = book(&pool, &rider, &ride).unwrap();

        // A different authenticated user cannot remove the reservation
        let result = cancel_own(&pool, &stranger, &booking);
        assert!(matches!(result, Err(BookingError::NotOwner)));
        assert_eq!(booking_count(&pool, &ride), 1);
        assert_eq!(seats_of(&pool, &ride), 1);

        // The holder can, and their unknown id afterwards is a no-op
        assert!(cancel_own(&pool, &rider, &booking).unwrap());
        assert_eq!(seats_of(&pool, &ride), 2);
        assert!(!cancel_own(&pool, &rider, &booking).unwrap());
    }

    #[test]
    fn cancel_after_ride_deletion_is_a_noop() {
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let rider = insert_user(&pool, "rider");
        let ride = rides::create(&pool, &driver, "A", "B", "2030-05-01", "07:30", 2).unwrap();

        let booking = book(&pool, &rider, &ride).unwrap();
        rides::delete(&pool, &ride, &driver).unwrap();

        // Cascade already removed the booking; cancelling it must not fail
        assert!(!cancel(&pool, &booking).unwrap());
    }

    #[test]
    fn seats_recycle_through_cancel() {
        // seats=2: A books, B books, C fails, A cancels, C books
        let (pool, _tmp) = test_pool();
        let driver = insert_user(&pool, "driver");
        let a = insert_user(&pool, "a");
        let b = insert_user(&pool, "b");
        let c = insert_user(&pool, "c");
        let ride = rides::create(&pool, &driver, "A", "B", "2030-05-01", "07:30", 2).unwrap();

        let booking_a = book(&pool, &a, &ride).unwrap();
        assert_eq!(seats_of(&pool, &ride), 1);
        book(&pool, &b, &ride).unwrap();
        assert_eq!(seats_of(&pool, &ride), 0);
        assert!(matches!(
            book(&pool, &c, &ride),
            Err(BookingError::NoSeatsAvailable)
        ));

        cancel(&pool, &booking_a).unwrap();
        assert_eq!(seats_of(&pool, &ride), 1);

        book(&pool, &c, &ride).unwrap();
        assert_eq!(seats_of(&pool, &ride), 0);
    }
}
