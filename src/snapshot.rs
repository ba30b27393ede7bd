use crate::city::CityCode;
use crate::model::ModelName;
use crate::plane::Registration;
use crate::time::Instant;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// Complete serialized state of one simulation. Entities are stored by
/// identifier and resolved against the reference data on restore; derived
/// flight fields and the demand cache are recomputed rather than persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub planes: Vec<PlaneState>,
    pub flights: Vec<FlightState>,
    pub hubs: Vec<HubState>,
    pub cash: f64,
    pub week: u32,
    pub plane_counter: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneState {
    pub model: ModelName,
    pub registration: Registration,
    pub location: CityCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub origin: CityCode,
    pub destination: CityCode,
    pub plane: Registration,
    pub passengers: u32,
    pub start: Instant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubState {
    pub city: CityCode,
    pub level: u8,
}

impl Snapshot {
    pub fn load_from_file(path: &Path) -> io::Result<Snapshot> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_to_file(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)
    }
}
