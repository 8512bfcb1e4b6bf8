//! Drone entity mapper: translates registry operations into statements
//! against `tbl_drones` and executes them.

use chrono::NaiveDate;
use fleet_core::Drone;
use sqlx::SqlitePool;
use tracing::warn;

use super::statement::{bind_params, bind_params_as, Delete, Insert, Select, Update};
use super::StoreError;

const TABLE: &str = "tbl_drones";

/// Result of an insert attempt.
///
/// A uniqueness violation is reported, not raised: the registry treats a
/// duplicate row as a logged no-op so bulk callers keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row stored; `id` is the store-assigned identifier.
    Inserted { id: i64 },
    /// A row with this identifier already existed; nothing was written.
    DuplicateIgnored,
}

/// Mapper bound to one connection pool.
#[derive(Clone)]
pub struct DroneMapper {
    pool: SqlitePool,
}

impl DroneMapper {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Next free identifier: max existing id + 1, or 1 on an empty table.
    pub async fn next_identity(&self) -> Result<i64, StoreError> {
        let (sql, _) = Select::new(TABLE).columns("MAX(id)").build();
        let max: Option<i64> = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(max.unwrap_or(0) + 1)
    }

    /// Insert a drone row. Duplicates are logged and swallowed.
    pub async fn insert(&self, drone: &Drone) -> Result<InsertOutcome, StoreError> {
        let (sql, params) = Insert::new(TABLE, &Drone::COLUMNS)
            .value(drone.id)
            .value(drone.serial_number.clone())
            .value(drone.model.clone())
            .value(drone.manufacturer.clone())
            .value(drone.max_altitude)
            .value(drone.max_speed)
            .value(drone.max_flight_time)
            .value(drone.max_flight_dist)
            .value(drone.payload)
            .value(drone.battery_capacity)
            .value(drone.n_rotors)
            .value(drone.purchase_date.map(|d| d.to_string()))
            .value(drone.year)
            .build();

        match bind_params(sqlx::query(&sql), &params)
            .execute(&self.pool)
            .await
        {
            Ok(result) => Ok(InsertOutcome::Inserted {
                id: result.last_insert_rowid(),
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!("Duplicate drone insert ignored: {}", db_err);
                Ok(InsertOutcome::DuplicateIgnored)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Fetch the raw column tuple for one identifier.
    pub async fn fetch_by_id(&self, drone_id: i64) -> Result<Option<DroneRow>, StoreError> {
        let (sql, params) = Select::new(TABLE)
            .columns(&Drone::COLUMNS.join(","))
            .filter("id=?", drone_id)
            .build();
        let row = bind_params_as(sqlx::query_as::<_, DroneRow>(&sql), &params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Partial column update by name.
    ///
    /// Field names come from the caller unchecked; an unknown column is
    /// rejected by the store and propagates as [`StoreError::Database`].
    pub async fn update(
        &self,
        drone_id: i64,
        fields: &[(String, String)],
    ) -> Result<(), StoreError> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut update = Update::new(TABLE);
        for (column, value) in fields {
            update = update.set(column, value.clone());
        }
        let (sql, params) = update.filter("id=?", drone_id).build();
        bind_params(sqlx::query(&sql), &params)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete the row for one identifier. Deleting a missing id is a no-op.
    pub async fn delete(&self, drone_id: i64) -> Result<(), StoreError> {
        let (sql, params) = Delete::new(TABLE).filter("id=?", drone_id).build();
        bind_params(sqlx::query(&sql), &params)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Fetch all rows ordered by the given column.
    ///
    /// `order_by` is interpolated as raw text; callers pass known column
    /// names only.
    pub async fn fetch_all(&self, order_by: &str) -> Result<Vec<DroneRow>, StoreError> {
        let (sql, params) = Select::new(TABLE)
            .columns(&Drone::COLUMNS.join(","))
            .order_by(order_by)
            .build();
        let rows = bind_params_as(sqlx::query_as::<_, DroneRow>(&sql), &params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
pub struct DroneRow {
    pub id: i64,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub max_altitude: Option<f64>,
    pub max_speed: Option<f64>,
    pub max_flight_time: Option<f64>,
    pub max_flight_dist: Option<f64>,
    pub payload: Option<f64>,
    pub battery_capacity: Option<f64>,
    pub n_rotors: Option<i64>,
    pub purchase_date: Option<String>,
    pub year: Option<i64>,
}

impl From<DroneRow> for Drone {
    fn from(row: DroneRow) -> Self {
        // Dates are stored as ISO text; anything unparseable reads as unset.
        let purchase_date = row
            .purchase_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Drone {
            id: Some(row.id),
            serial_number: row.serial_number,
            model: row.model,
            manufacturer: row.manufacturer,
            max_altitude: row.max_altitude,
            max_speed: row.max_speed,
            max_flight_time: row.max_flight_time,
            max_flight_dist: row.max_flight_dist,
            payload: row.payload,
            battery_capacity: row.battery_capacity,
            n_rotors: row.n_rotors,
            purchase_date,
            year: row.year,
        }
    }
}
