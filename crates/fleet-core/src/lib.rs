pub mod models;

pub use models::{ControlStatus, Drone, ParseControlStatusError};
