use crate::city::City;
use crate::economy::EconomyConfig;
use crate::manager::manager::AirlineManager;
use crate::model::PlaneModel;
use crate::time::{Day, Instant};
use crate::world::World;
use std::sync::Arc;

pub fn city(
    name: &str,
    code: &str,
    population: u64,
    latitude: f64,
    longitude: f64,
    timezone: f64,
) -> City {
    City {
        name: Arc::from(name),
        population,
        latitude,
        longitude,
        code: Arc::from(code),
        timezone,
    }
}

pub fn model(
    name: &str,
    capacity: u32,
    range: f64,
    velocity: f64,
    price: f64,
    maintenance: f64,
    pilots: u32,
) -> PlaneModel {
    PlaneModel {
        name: Arc::from(name),
        capacity,
        range,
        velocity,
        price,
        maintenance,
        pilots,
    }
}

/// Three close European-ish cities plus one far one (for range checks). The
/// first model is the starter plane.
pub fn test_world() -> Arc<World> {
    Arc::new(World::new(
        vec![
            city("Alderton", "ALD", 4_000_000, 52.0, 13.0, 0.0),
            city("Bexley", "BEX", 3_000_000, 48.0, 11.0, 0.0),
            city("Corwick", "COR", 9_000_000, 51.5, -0.1, 0.0),
            city("Dunmore", "DUN", 2_000_000, -33.9, 151.2, 10.0),
        ],
        vec![
            model("Wren 200", 50, 3000.0, 10.0, 50_000.0, 200.0, 2),
            model("Kestrel 700", 180, 9000.0, 14.0, 250_000.0, 900.0, 2),
        ],
    ))
}

pub fn manager() -> AirlineManager {
    AirlineManager::new_game(test_world(), EconomyConfig::default()).expect("populated test world")
}

pub fn manager_with_cash(cash: f64) -> AirlineManager {
    let config = EconomyConfig {
        starting_cash: cash,
        ..EconomyConfig::default()
    };
    AirlineManager::new_game(test_world(), config).expect("populated test world")
}

pub fn at(day: Day, hour: u8, minute: u8) -> Instant {
    Instant::new(day, hour, minute).expect("valid test instant")
}
