//! Shared application state.

use crate::persistence::DroneRepository;

pub struct AppState {
    repository: DroneRepository,
}

impl AppState {
    pub fn new(repository: DroneRepository) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &DroneRepository {
        &self.repository
    }
}
