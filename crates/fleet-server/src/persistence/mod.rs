//! Persistence layer for the fleet server.
//!
//! SQLite-backed storage for the drone registry and the per-drone
//! control-lock state. Callers outside this module go through
//! [`DroneRepository`]; the mapper and statement builders are its
//! implementation detail.

pub mod control;
pub mod db;
pub mod drones;
pub mod repository;
pub mod statement;

pub use control::{AcquireOutcome, ControlLock};
pub use db::{init_database, Database};
pub use drones::{DroneMapper, InsertOutcome};
pub use repository::DroneRepository;

/// Storage failure taxonomy.
///
/// Constraint violations on insert are not errors: they surface as
/// [`InsertOutcome::DuplicateIgnored`] so the caller keeps running, which
/// preserves the registry's logged-and-continue policy for duplicates.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// The stored status text is outside the two-value state machine.
    #[error("drone {id} has unrecognized control status {raw:?}")]
    CorruptControlStatus { id: i64, raw: String },
}
