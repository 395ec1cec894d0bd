//! User accounts: registration, credential verification and profile edits.
//! Password hashing is delegated to bcrypt; the rest of the crate only
//! ever sees opaque hashes.

use rusqlite::params;
use thiserror::Error;

use crate::db::models::User;
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid profile: {0}")]
    Validation(String),

    #[error("Hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub station: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub driving_license_date: Option<String>,
}

/// Register a new user. Returns the new user id.
pub fn register(
    pool: &DbPool,
    username: &str,
    password: &str,
    profile: &ProfileFields,
) -> Result<String, UserError> {
    if username.trim().is_empty() {
        return Err(UserError::Validation("username must not be empty".into()));
    }
    if password.is_empty() {
        return Err(UserError::Validation("password must not be empty".into()));
    }

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

    let conn = pool.get()?;
    let id = uuid::Uuid::now_v7().to_string();
    let result = conn.execute(
        "INSERT INTO users (id, username, password_hash, first_name, last_name, station, email, phone, driving_license_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            username,
            hash,
            profile.first_name,
            profile.last_name,
            profile.station,
            profile.email,
            profile.phone,
            profile.driving_license_date,
        ],
    );

    match result {
        Ok(_) => {
            tracing::info!(user_id = %id, username, "user registered");
            Ok(id)
        }
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(UserError::UsernameTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// Check a username/password pair. Returns the user id on success.
pub fn verify_login(pool: &DbPool, username: &str, password: &str) -> Result<String, UserError> {
    let conn = pool.get()?;
    let row: Result<(String, String), rusqlite::Error> = conn.query_row(
        "SELECT id, password_hash FROM users WHERE username = ?1",
        params![username],
        |row| Ok((row.get(0)?, row.get(1)?)),
    );

    let (id, hash) = match row {
        Ok(pair) => pair,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(UserError::InvalidCredentials),
        Err(e) => return Err(e.into()),
    };

    if bcrypt::verify(password, &hash)? {
        Ok(id)
    } else {
        Err(UserError::InvalidCredentials)
    }
}

pub fn get(pool: &DbPool, user_id: &str) -> Result<User, UserError> {
    let conn = pool.get()?;
    conn.query_row(
        "SELECT id, username, password_hash, first_name, last_name, station, email, phone,
                driving_license_date, profile_picture, created_at
         FROM users WHERE id = ?1",
        params![user_id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                first_name: row.get(3)?,
                last_name: row.get(4)?,
                station: row.get(5)?,
                email: row.get(6)?,
                phone: row.get(7)?,
                driving_license_date: row.get(8)?,
                profile_picture: row.get(9)?,
                created_at: row.get(10)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => UserError::NotFound,
        e => UserError::Sql(e),
    })
}

/// Overwrite the editable profile fields.
pub fn update_profile(
    pool: &DbPool,
    user_id: &str,
    profile: &ProfileFields,
) -> Result<(), UserError> {
    let conn = pool.get()?;
    let updated = conn.execute(
        "UPDATE users SET first_name = ?1, last_name = ?2, station = ?3, email = ?4, phone = ?5,
                driving_license_date = ?6
         WHERE id = ?7",
        params![
            profile.first_name,
            profile.last_name,
            profile.station,
            profile.email,
            profile.phone,
            profile.driving_license_date,
            user_id,
        ],
    )?;

    if updated == 0 {
        return Err(UserError::NotFound);
    }
    Ok(())
}

/// Point the profile at a new picture. Only the path reference is stored;
/// the file itself lives outside this crate.
pub fn set_profile_picture(pool: &DbPool, user_id: &str, path: &str) -> Result<(), UserError> {
    let conn = pool.get()?;
    let updated = conn.execute(
        "UPDATE users SET profile_picture = ?1 WHERE id = ?2",
        params![path, user_id],
    )?;

    if updated == 0 {
        return Err(UserError::NotFound);
    }
    Ok(())
}
