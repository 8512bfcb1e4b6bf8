//! Core data models for the fleet registry.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered drone.
///
/// `id` is assigned by the store on insert and stays `None` until then.
/// Two drones are the same vehicle iff their `(serial_number, model)` pair
/// matches; `id` and the remaining attributes do not participate in
/// equality or hashing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Drone {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub max_altitude: Option<f64>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub max_flight_time: Option<f64>,
    #[serde(default)]
    pub max_flight_dist: Option<f64>,
    #[serde(default)]
    pub payload: Option<f64>,
    #[serde(default)]
    pub battery_capacity: Option<f64>,
    #[serde(default)]
    pub n_rotors: Option<i64>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub year: Option<i64>,
}

impl Drone {
    /// Column order for `tbl_drones`, matched by the mapper's INSERT and
    /// SELECT statements.
    pub const COLUMNS: [&'static str; 13] = [
        "id",
        "serial_number",
        "model",
        "manufacturer",
        "max_altitude",
        "max_speed",
        "max_flight_time",
        "max_flight_dist",
        "payload",
        "battery_capacity",
        "n_rotors",
        "purchase_date",
        "year",
    ];

    /// The identity pair drone equality is defined over.
    pub fn identity(&self) -> (Option<&str>, Option<&str>) {
        (self.serial_number.as_deref(), self.model.as_deref())
    }
}

impl PartialEq for Drone {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Drone {}

impl Hash for Drone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Drone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_dash(field: &Option<String>) -> &str {
            field.as_deref().unwrap_or("-")
        }
        write!(
            f,
            "id: {}, serial: {}, model: {}, manufacturer: {}, rotors: {}",
            self.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            or_dash(&self.serial_number),
            or_dash(&self.model),
            or_dash(&self.manufacturer),
            self.n_rotors
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
        )
    }
}

/// Remote-control arbitration state of a single drone.
///
/// Stored as text in `tbl_drones_mgn.status_mgn`; the enum is the only
/// status representation that crosses any API in this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlStatus {
    /// No operator holds the drone; control may be acquired.
    Released,
    /// One operator session holds exclusive control.
    Locked,
}

impl ControlStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlStatus::Released => "released",
            ControlStatus::Locked => "locked",
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized control status: {0:?}")]
pub struct ParseControlStatusError(pub String);

impl FromStr for ControlStatus {
    type Err = ParseControlStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "released" => Ok(ControlStatus::Released),
            "locked" => Ok(ControlStatus::Locked),
            other => Err(ParseControlStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn drone(id: Option<i64>, serial: &str, model: &str) -> Drone {
        Drone {
            id,
            serial_number: Some(serial.to_string()),
            model: Some(model.to_string()),
            ..Drone::default()
        }
    }

    fn hash_of(drone: &Drone) -> u64 {
        let mut hasher = DefaultHasher::new();
        drone.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality_ignores_id_and_attributes() {
        let a = drone(Some(1), "SN123", "ModelX");
        let mut b = drone(Some(2), "SN123", "ModelX");
        b.manufacturer = Some("Aerotek".to_string());
        b.n_rotors = Some(6);
        let c = drone(Some(3), "SN456", "ModelY");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_equal_identity_pairs_hash_equal() {
        let a = drone(Some(1), "SN123", "ModelX");
        let b = drone(Some(2), "SN123", "ModelX");
        let c = drone(Some(3), "SN456", "ModelY");

        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn test_display_includes_identity_fields() {
        let mut d = drone(Some(1), "SN123", "ModelX");
        d.manufacturer = Some("Aerotek".to_string());
        d.n_rotors = Some(4);

        assert_eq!(
            d.to_string(),
            "id: 1, serial: SN123, model: ModelX, manufacturer: Aerotek, rotors: 4"
        );
    }

    #[test]
    fn test_control_status_text_round_trip() {
        assert_eq!(ControlStatus::Released.as_str(), "released");
        assert_eq!(ControlStatus::Locked.as_str(), "locked");
        assert_eq!("released".parse(), Ok(ControlStatus::Released));
        assert_eq!("locked".parse(), Ok(ControlStatus::Locked));
        assert!("busy".parse::<ControlStatus>().is_err());
    }

    #[test]
    fn test_columns_match_entity_width() {
        assert_eq!(Drone::COLUMNS.len(), 13);
        assert_eq!(Drone::COLUMNS[0], "id");
    }
}
