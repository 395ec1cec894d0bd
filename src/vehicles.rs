//! Vehicles: owned by a single user, carrying up to four picture path
//! references. File storage is outside this crate.

use rusqlite::params;
use thiserror::Error;

use crate::db::models::Vehicle;
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("Vehicle not found")]
    NotFound,

    #[error("Not the vehicle's owner")]
    NotOwner,

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

#[derive(Debug, Clone, Default)]
pub struct VehicleFields {
    pub make: Option<String>,
    pub model: Option<String>,
    pub first_registration: Option<String>,
    pub picture_inter1: Option<String>,
    pub picture_inter2: Option<String>,
    pub picture_exter1: Option<String>,
    pub picture_exter2: Option<String>,
}

pub fn add(pool: &DbPool, user_id: &str, fields: &VehicleFields) -> Result<String, VehicleError> {
    let conn = pool.get()?;
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO vehicles (id, user_id, make, model, first_registration,
                picture_inter1, picture_inter2, picture_exter1, picture_exter2)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            user_id,
            fields.make,
            fields.model,
            fields.first_registration,
            fields.picture_inter1,
            fields.picture_inter2,
            fields.picture_exter1,
            fields.picture_exter2,
        ],
    )?;
    Ok(id)
}

pub fn list(pool: &DbPool, user_id: &str) -> Result<Vec<Vehicle>, VehicleError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, user_id, make, model, first_registration,
                picture_inter1, picture_inter2, picture_exter1, picture_exter2
         FROM vehicles WHERE user_id = ?1",
    )?;

    let vehicles = stmt
        .query_map(params![user_id], |row| {
            Ok(Vehicle {
                id: row.get(0)?,
                user_id: row.get(1)?,
                make: row.get(2)?,
                model: row.get(3)?,
                first_registration: row.get(4)?,
                picture_inter1: row.get(5)?,
                picture_inter2: row.get(6)?,
                picture_exter1: row.get(7)?,
                picture_exter2: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(vehicles)
}

pub fn update(
    pool: &DbPool,
    vehicle_id: &str,
    user_id: &str,
    fields: &VehicleFields,
) -> Result<(), VehicleError> {
    let conn = pool.get()?;
    check_owner(&conn, vehicle_id, user_id)?;

    conn.execute(
        "UPDATE vehicles SET make = ?1, model = ?2, first_registration = ?3,
                picture_inter1 = ?4, picture_inter2 = ?5, picture_exter1 = ?6, picture_exter2 = ?7
         WHERE id = ?8",
        params![
            fields.make,
            fields.model,
            fields.first_registration,
            fields.picture_inter1,
            fields.picture_inter2,
            fields.picture_exter1,
            fields.picture_exter2,
            vehicle_id,
        ],
    )?;
    Ok(())
}

pub fn delete(pool: &DbPool, vehicle_id: &str, user_id: &str) -> Result<(), VehicleError> {
    let conn = pool.get()?;
    check_owner(&conn, vehicle_id, user_id)?;

    conn.execute("DELETE FROM vehicles WHERE id = ?1", params![vehicle_id])?;
    Ok(())
}

fn check_owner(
    conn: &rusqlite::Connection,
    vehicle_id: &str,
    user_id: &str,
) -> Result<(), VehicleError> {
    let owner: String = conn
        .query_row(
            "SELECT user_id FROM vehicles WHERE id = ?1",
            params![vehicle_id],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => VehicleError::NotFound,
            e => VehicleError::Sql(e),
        })?;

    if owner != user_id {
        return Err(VehicleError::NotOwner);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_user, test_pool};

    fn fields() -> VehicleFields {
        VehicleFields {
            make: Some("Renault".into()),
            model: Some("Clio".into()),
            first_registration: Some("2019-04-01".into()),
            picture_exter1: Some("vehicles/clio.jpg".into()),
            ..VehicleFields::default()
        }
    }

    #[test]
    fn add_and_list() {
        let (pool, _tmp) = test_pool();
        let owner = insert_user(&pool, "owner");

        let id = add(&pool, &owner, &fields()).unwrap();
        let vehicles = list(&pool, &owner).unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, id);
        assert_eq!(vehicles[0].make.as_deref(), Some("Renault"));
        assert_eq!(vehicles[0].picture_exter1.as_deref(), Some("vehicles/clio.jpg"));
    }

    #[test]
    fn update_and_delete_are_owner_only() {
        let (pool, _tmp) = test_pool();
        let owner = insert_user(&pool, "owner");
        let stranger = insert_user(&pool, "stranger");
        let id = add(&pool, &owner, &fields()).unwrap();

        assert!(matches!(
            update(&pool, &id, &stranger, &fields()),
            Err(VehicleError::NotOwner)
        ));
        assert!(matches!(
            delete(&pool, &id, &stranger),
            Err(VehicleError::NotOwner)
        ));

        delete(&pool, &id, &owner).unwrap();
        assert!(list(&pool, &owner).unwrap().is_empty());
    }

    #[test]
    fn update_overwrites_fields() {
        let (pool, _tmp) = test_pool();
        let owner = insert_user(&pool, "owner");
        let id = add(&pool, &owner, &fields()).unwrap();

        let new_fields = VehicleFields {
            model: Some("Megane".into()),
            ..fields()
        };
        update(&pool, &id, &owner, &new_fields).unwrap();

        let vehicles = list(&pool, &owner).unwrap();
        assert_eq!(vehicles[0].model.as_deref(), Some("Megane"));
    }

    #[test]
    fn unknown_vehicle_is_not_found() {
        let (pool, _tmp) = test_pool();
        let owner = insert_user(&pool, "owner");
        assert!(matches!(
            delete(&pool, "ghost", &owner),
            Err(VehicleError::NotFound)
        ));
    }
}
