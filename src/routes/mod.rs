pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod profile;
pub mod rides;
pub mod vehicles;
