//! Per-drone control-lock state machine over `tbl_drones_mgn`.
//!
//! Status rows are seeded by the store when a drone row is created; this
//! module only transitions them. Acquisition is a conditional update so
//! the released→locked transition is atomic at the store layer: of any
//! number of concurrent acquirers, the row count lets exactly one observe
//! success.

use std::str::FromStr;

use fleet_core::ControlStatus;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use super::statement::{bind_params, Select, Update};
use super::StoreError;

const TABLE: &str = "tbl_drones_mgn";
const STATUS_COLUMN: &str = "status_mgn";

/// Result of a control acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The caller now holds exclusive control.
    Acquired,
    /// Another operator holds the lock, or no status row exists.
    Unavailable,
}

/// Lock machine bound to one connection pool.
#[derive(Clone)]
pub struct ControlLock {
    pool: SqlitePool,
}

impl ControlLock {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Current status for a drone, or `None` when no status row exists.
    pub async fn status(&self, drone_id: i64) -> Result<Option<ControlStatus>, StoreError> {
        let (sql, params) = Select::new(TABLE)
            .columns(STATUS_COLUMN)
            .filter("id=?", drone_id)
            .build();
        let row = bind_params(sqlx::query(&sql), &params)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            None => Ok(None),
            Some(row) => {
                let raw: String = row.try_get(STATUS_COLUMN)?;
                let status = ControlStatus::from_str(&raw).map_err(|_| {
                    StoreError::CorruptControlStatus {
                        id: drone_id,
                        raw,
                    }
                })?;
                Ok(Some(status))
            }
        }
    }

    /// Try to take exclusive control of a drone.
    ///
    /// Compare-and-swap: the write succeeds only if the current status is
    /// still `released` when the statement runs, closing the gap between a
    /// caller's status read and its lock write.
    pub async fn acquire(&self, drone_id: i64) -> Result<AcquireOutcome, StoreError> {
        let result = sqlx::query(
            "UPDATE tbl_drones_mgn SET status_mgn = ?1 WHERE id = ?2 AND status_mgn = ?3",
        )
        .bind(ControlStatus::Locked.as_str())
        .bind(drone_id)
        .bind(ControlStatus::Released.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            debug!("Control acquired for drone {}", drone_id);
            Ok(AcquireOutcome::Acquired)
        } else {
            warn!("Control unavailable for drone {}", drone_id);
            Ok(AcquireOutcome::Unavailable)
        }
    }

    /// Release control unconditionally. Idempotent: releasing an already
    /// released drone is a no-op.
    pub async fn release(&self, drone_id: i64) -> Result<(), StoreError> {
        self.set(drone_id, ControlStatus::Released).await
    }

    /// Set the status field for one drone identifier.
    pub async fn set(&self, drone_id: i64, status: ControlStatus) -> Result<(), StoreError> {
        let (sql, params) = Update::new(TABLE)
            .set(STATUS_COLUMN, status.as_str())
            .filter("id=?", drone_id)
            .build();
        bind_params(sqlx::query(&sql), &params)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
