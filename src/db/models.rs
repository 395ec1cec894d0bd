use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub station: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub driving_license_date: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub user_id: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub first_registration: Option<String>,
    pub picture_inter1: Option<String>,
    pub picture_inter2: Option<String>,
    pub picture_exter1: Option<String>,
    pub picture_exter2: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: String,
    pub provider_id: String,
    pub start_location: String,
    pub destination: String,
    /// ISO 8601 date (YYYY-MM-DD); lexicographic order is chronological.
    pub date: String,
    /// HH:MM, 24-hour.
    pub time: String,
    pub available_seats: i64,
}

/// A ride as shown in the bookable catalog or a user's booked list:
/// the ride itself plus provider identity and contact projections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideListing {
    pub ride_id: String,
    pub provider_username: String,
    pub start_location: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub available_seats: i64,
    pub provider_first_name: Option<String>,
    pub provider_last_name: Option<String>,
    pub provider_phone: Option<String>,
    pub provider_email: Option<String>,
    /// Set only in the booked-rides list, where cancellation needs it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

/// A passenger on one of the provider's own rides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
