use crate::city::{City, CityCode};
use crate::economy::EconomyConfig;
use crate::model::PlaneModel;
use crate::plane::{Plane, Registration};
use crate::time::Instant;
use std::fmt;
use std::fmt::Formatter;

/// A scheduled service. Cities and plane are referenced by identifier; the
/// identity key for lookup and deletion is (plane registration, start).
#[derive(Clone, Debug, PartialEq)]
pub struct Flight {
    pub origin: CityCode,
    pub destination: CityCode,
    pub plane: Registration,
    pub passengers: u32,
    pub start: Instant,
    pub distance: f64,
    /// Minutes, rounded from distance / velocity.
    pub duration: u32,
    pub end: Instant,
}

impl Flight {
    pub fn new(
        origin: &City,
        destination: &City,
        plane: &Plane,
        start: Instant,
        passengers: u32,
    ) -> Flight {
        let distance = origin.distance_to(destination);
        let duration = (distance / plane.model.velocity).round() as u32;
        Flight {
            origin: origin.code.clone(),
            destination: destination.code.clone(),
            plane: plane.registration.clone(),
            passengers,
            start,
            distance,
            duration,
            end: start.add_minutes(duration),
        }
    }

    pub fn revenue(&self, config: &EconomyConfig) -> f64 {
        f64::from(self.passengers) * config.fare_per_km(self.distance) * self.distance
    }

    pub fn variable_cost(&self, config: &EconomyConfig) -> f64 {
        self.distance * config.fuel_cost_per_km
    }

    /// Per-flight maintenance plus crew salary for the flight's duration.
    pub fn fixed_cost(&self, model: &PlaneModel, config: &EconomyConfig) -> f64 {
        model.maintenance
            + f64::from(model.pilots) * config.pilot_salary_per_minute * f64::from(self.duration)
    }

    pub fn profit(&self, model: &PlaneModel, config: &EconomyConfig) -> f64 {
        self.revenue(config) - self.variable_cost(config) - self.fixed_cost(model, config)
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{} ({}) [{}pax]",
            self.origin, self.destination, self.start, self.passengers
        )
    }
}
