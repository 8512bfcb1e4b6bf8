//! Domain-facing repository over the mapper and the control lock.
//!
//! The sole persistence entry point for the rest of the server: handlers
//! never touch the mapper or statement builders directly. Entity
//! reconstruction (row → [`Drone`]) happens here, and every control-state
//! transition goes through the lock machine.

use fleet_core::{ControlStatus, Drone};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::control::{AcquireOutcome, ControlLock};
use super::drones::{DroneMapper, InsertOutcome};
use super::StoreError;

#[derive(Clone)]
pub struct DroneRepository {
    mapper: DroneMapper,
    lock: ControlLock,
}

impl DroneRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            mapper: DroneMapper::new(pool.clone()),
            lock: ControlLock::new(pool),
        }
    }

    /// Next free drone identifier.
    pub async fn next_identity(&self) -> Result<i64, StoreError> {
        self.mapper.next_identity().await
    }

    /// Persist a drone.
    ///
    /// On success the store-assigned identifier is written back into the
    /// entity. On a duplicate the entity is left untouched and the typed
    /// outcome tells the caller nothing was stored.
    pub async fn add(&self, drone: &mut Drone) -> Result<InsertOutcome, StoreError> {
        let outcome = self.mapper.insert(drone).await?;
        if let InsertOutcome::Inserted { id } = outcome {
            drone.id = Some(id);
        }
        Ok(outcome)
    }

    /// Delete a drone. Idempotent.
    pub async fn remove(&self, drone_id: i64) -> Result<(), StoreError> {
        info!("Removing drone {}", drone_id);
        self.mapper.delete(drone_id).await
    }

    /// Fetch one drone, fully reconstructed, or `None` if no row matches.
    pub async fn get_by_id(&self, drone_id: i64) -> Result<Option<Drone>, StoreError> {
        match self.mapper.fetch_by_id(drone_id).await? {
            Some(row) => Ok(Some(row.into())),
            None => {
                warn!("No drone with id {} in tbl_drones", drone_id);
                Ok(None)
            }
        }
    }

    /// Partial field update; names come from the caller unchecked.
    pub async fn update(
        &self,
        drone_id: i64,
        fields: &[(String, String)],
    ) -> Result<(), StoreError> {
        info!("Updating drone {}", drone_id);
        self.mapper.update(drone_id, fields).await
    }

    /// All drones in store order, identifiers reset to unset.
    ///
    /// For contexts that must not expose or round-trip identifiers; use
    /// [`Self::list_all_with_identity`] when rows need to be referenced.
    pub async fn list_all(&self, order_by: &str) -> Result<Vec<Drone>, StoreError> {
        let rows = self.mapper.fetch_all(order_by).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let mut drone: Drone = row.into();
                drone.id = None;
                drone
            })
            .collect())
    }

    /// All drones in store order with identifiers intact.
    pub async fn list_all_with_identity(&self, order_by: &str) -> Result<Vec<Drone>, StoreError> {
        let rows = self.mapper.fetch_all(order_by).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Control status for a drone, or `None` when no status row exists.
    pub async fn control_status(&self, drone_id: i64) -> Result<Option<ControlStatus>, StoreError> {
        let status = self.lock.status(drone_id).await?;
        if status.is_none() {
            warn!("No control status row for drone {}", drone_id);
        }
        Ok(status)
    }

    /// Try to take exclusive control of a drone.
    pub async fn acquire_control(&self, drone_id: i64) -> Result<AcquireOutcome, StoreError> {
        self.lock.acquire(drone_id).await
    }

    /// Release control of a drone. Idempotent.
    pub async fn release_control(&self, drone_id: i64) -> Result<(), StoreError> {
        self.lock.release(drone_id).await
    }

    /// Set the control status directly.
    pub async fn set_control_status(
        &self,
        drone_id: i64,
        status: ControlStatus,
    ) -> Result<(), StoreError> {
        self.lock.set(drone_id, status).await
    }
}
