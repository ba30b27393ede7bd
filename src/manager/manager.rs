use crate::city::{City, CityCode};
use crate::demand::{intraday_passenger_demand, route_weekly_demand};
use crate::economy::EconomyConfig;
use crate::error::SimError;
use crate::flight::Flight;
use crate::hub::Hub;
use crate::plane::{Plane, Registration};
use crate::snapshot::{FlightState, HubState, PlaneState, Snapshot};
use crate::time::Instant;
use crate::world::World;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How many of the world's cities get a seeded level-1 hub in a new game.
const SEEDED_HUBS: usize = 11;

/// One inconsistency found by the flight-plan validator.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanIssue {
    WrongStartCity {
        registration: String,
        parked: String,
        origin: String,
    },
    BrokenChain {
        registration: String,
        lands_in: String,
        departs_from: String,
    },
    Overlap {
        registration: String,
        first_end: Instant,
        next_start: Instant,
    },
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanIssue::WrongStartCity {
                registration,
                parked,
                origin,
            } => write!(
                f,
                "{registration}: parked in {parked} but the first flight departs from {origin}"
            ),
            PlanIssue::BrokenChain {
                registration,
                lands_in,
                departs_from,
            } => write!(
                f,
                "{registration}: lands in {lands_in} but the next flight departs from {departs_from}"
            ),
            PlanIssue::Overlap {
                registration,
                first_end,
                next_start,
            } => write!(
                f,
                "{registration}: flight ending {first_end} overlaps the departure at {next_start}"
            ),
        }
    }
}

/// Result of settling one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    /// The week that was settled (the counter has already moved past it).
    pub week: u32,
    pub flights: u32,
    pub revenue: f64,
    /// Variable plus fixed cost of the flights flown.
    pub flight_cost: f64,
    pub maintenance: f64,
    pub hub_upkeep: f64,
    pub profit: f64,
    pub balance: f64,
}

/// Aggregate root of one player's simulation. Reference data (cities, model
/// catalog) lives in the shared `World`; everything else is owned here and
/// round-trips through `Snapshot`.
pub struct AirlineManager {
    world: Arc<World>,
    config: EconomyConfig,
    planes: HashMap<Registration, Plane>,
    flights: Vec<Flight>,
    hubs: HashMap<CityCode, Hub>,
    demand: HashMap<CityCode, HashMap<CityCode, u32>>,
    cash: f64,
    week: u32,
    plane_counter: u32,
}

impl AirlineManager {
    /// Fresh default state: one starter plane parked in the first city and
    /// seeded level-1 hubs in the first few cities.
    pub fn new_game(world: Arc<World>, config: EconomyConfig) -> Result<Self, SimError> {
        let starter_model = world
            .models()
            .first()
            .cloned()
            .ok_or_else(|| SimError::ModelNotFound("starter".to_string()))?;
        let home = world
            .cities()
            .first()
            .cloned()
            .ok_or_else(|| SimError::CityNotFound("starter".to_string()))?;

        let mut manager = AirlineManager {
            cash: config.starting_cash,
            world,
            config,
            planes: HashMap::new(),
            flights: Vec::new(),
            hubs: HashMap::new(),
            demand: HashMap::new(),
            week: 1,
            plane_counter: 1,
        };

        let registration = manager.next_registration();
        manager.planes.insert(
            registration.clone(),
            Plane::new(starter_model, registration, home.code.clone()),
        );
        for city in manager.world.cities().iter().take(SEEDED_HUBS) {
            manager
                .hubs
                .insert(city.code.clone(), Hub::new(city.code.clone()));
        }
        manager.refresh_demand();
        Ok(manager)
    }

    fn next_registration(&mut self) -> Registration {
        let registration = Arc::from(format!("SL-{:03}", self.plane_counter));
        self.plane_counter += 1;
        registration
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// Fleet in stable registration order.
    pub fn planes(&self) -> Vec<&Plane> {
        let mut planes: Vec<&Plane> = self.planes.values().collect();
        planes.sort_by(|a, b| a.registration.cmp(&b.registration));
        planes
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn flights_for(&self, registration: &str) -> Vec<&Flight> {
        self.flights
            .iter()
            .filter(|f| f.plane.as_ref() == registration)
            .collect()
    }

    /// Hubs in stable city order.
    pub fn hubs(&self) -> Vec<&Hub> {
        let mut hubs: Vec<&Hub> = self.hubs.values().collect();
        hubs.sort_by(|a, b| a.city.cmp(&b.city));
        hubs
    }

    pub fn hub_in(&self, city: &CityCode) -> Option<&Hub> {
        self.hubs.get(city)
    }

    pub fn find_plane(&self, registration: &str) -> Option<&Plane> {
        self.planes.get(registration).or_else(|| {
            self.planes
                .values()
                .find(|p| p.registration.eq_ignore_ascii_case(registration))
        })
    }

    /// Cached weekly demand for the current week, by city name or code.
    pub fn route_demand(&self, origin: &str, destination: &str) -> Option<u32> {
        let origin = self.world.find_city(origin)?;
        let destination = self.world.find_city(destination)?;
        self.demand
            .get(&origin.code)
            .and_then(|row| row.get(&destination.code))
            .copied()
    }

    fn city(&self, key: &str) -> Result<Arc<City>, SimError> {
        self.world
            .find_city(key)
            .cloned()
            .ok_or_else(|| SimError::CityNotFound(key.to_string()))
    }

    fn plane(&self, registration: &str) -> Result<&Plane, SimError> {
        self.find_plane(registration)
            .ok_or_else(|| SimError::PlaneNotFound(registration.to_string()))
    }

    fn city_label(&self, code: &CityCode) -> String {
        self.world
            .find_city(code)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| code.to_string())
    }

    /// Buys a plane and parks it in the given city. The registration is
    /// generated from the fleet counter and returned.
    pub fn buy_plane(&mut self, model_key: &str, city_key: &str) -> Result<Registration, SimError> {
        let model = self
            .world
            .find_model(model_key)
            .cloned()
            .ok_or_else(|| SimError::ModelNotFound(model_key.to_string()))?;
        let city = self.city(city_key)?;
        if self.cash < model.price {
            return Err(SimError::InsufficientFunds {
                model: model.name.to_string(),
                price: model.price,
                balance: self.cash,
            });
        }

        self.cash -= model.price;
        let registration = self.next_registration();
        info!(
            "bought {} as {} in {}, balance {:.2}",
            model.name, registration, city.name, self.cash
        );
        self.planes.insert(
            registration.clone(),
            Plane::new(model, registration.clone(), city.code.clone()),
        );
        Ok(registration)
    }

    /// Only an idle plane can be sold; the resale value is credited.
    pub fn sell_plane(&mut self, registration: &str) -> Result<f64, SimError> {
        let plane = self.plane(registration)?;
        let scheduled = self.flights_for(&plane.registration).len();
        if scheduled > 0 {
            return Err(SimError::AssetInUse {
                registration: plane.registration.to_string(),
                flights: scheduled,
            });
        }

        let registration = plane.registration.clone();
        let value = plane.resale_value(&self.config);
        self.planes.remove(&registration);
        self.cash += value;
        info!("sold {registration} for {value:.2}, balance {:.2}", self.cash);
        Ok(value)
    }

    /// First investment founds a level-1 hub; later ones upgrade it.
    pub fn invest_in_hub(&mut self, city_key: &str) -> Result<&Hub, SimError> {
        let city = self.city(city_key)?;
        let hub = self
            .hubs
            .entry(city.code.clone())
            .and_modify(Hub::upgrade)
            .or_insert_with(|| Hub::new(city.code.clone()));
        info!("{} hub now level {} ({})", city.name, hub.level(), hub.tier_name());
        Ok(hub)
    }

    /// Schedules a flight. The passenger count is clamped to what the route
    /// can still absorb, which may be less than requested; callers must read
    /// the returned flight's actual count.
    pub fn create_flight(
        &mut self,
        origin_key: &str,
        destination_key: &str,
        registration: &str,
        start: Instant,
        requested: u32,
    ) -> Result<Flight, SimError> {
        let origin = self.city(origin_key)?;
        let destination = self.city(destination_key)?;
        let plane = self.plane(registration)?.clone();

        if requested > plane.model.capacity {
            return Err(SimError::CapacityExceeded {
                registration: plane.registration.to_string(),
                requested,
                capacity: plane.model.capacity,
            });
        }
        let distance = origin.distance_to(&destination);
        if !plane.can_fly(distance) {
            return Err(SimError::RangeExceeded {
                registration: plane.registration.to_string(),
                distance,
                range: plane.model.range,
            });
        }
        let hub_bonus = self
            .hubs
            .get(&origin.code)
            .map(Hub::passenger_bonus)
            .ok_or_else(|| SimError::HubMissing(origin.name.to_string()))?;
        if !self.hubs.contains_key(&destination.code) {
            return Err(SimError::HubMissing(destination.name.to_string()));
        }
        if self
            .flights
            .iter()
            .any(|f| f.plane == plane.registration && f.start == start)
        {
            return Err(SimError::DuplicateDeparture {
                registration: plane.registration.to_string(),
                start,
            });
        }

        let weekly = route_weekly_demand(&origin, &destination, self.week).unwrap_or(0);
        let potential = f64::from(intraday_passenger_demand(
            weekly,
            start.hour(),
            start.minute(),
            origin.timezone,
        )) * hub_bonus;
        let on_slot = self.scheduled_passengers(&origin.code, &destination.code, Some(start));
        let on_route = self.scheduled_passengers(&origin.code, &destination.code, None);
        let slot_available = ((potential - f64::from(on_slot))
            * self.config.residual_demand_ratio)
            .round()
            .max(0.0) as u32;
        let weekly_remaining = weekly.saturating_sub(on_route);
        let passengers = requested.min(slot_available).min(weekly_remaining);

        debug!(
            "{}->{} at {start}: weekly {weekly}, slot potential {potential:.1}, \
             already {on_slot}/{on_route}, granting {passengers} of {requested}",
            origin.code, destination.code
        );

        let flight = Flight::new(&origin, &destination, &plane, start, passengers);
        self.flights.push(flight.clone());
        Ok(flight)
    }

    /// Removes the flight keyed by (registration, start). Returns whether
    /// anything was removed.
    pub fn delete_flight(&mut self, registration: &str, start: Instant) -> bool {
        let before = self.flights.len();
        self.flights
            .retain(|f| !(f.plane.eq_ignore_ascii_case(registration) && f.start == start));
        before != self.flights.len()
    }

    /// Passengers already booked on the route, optionally restricted to one
    /// exact departure slot. Recomputed from the flight list every time.
    fn scheduled_passengers(
        &self,
        origin: &CityCode,
        destination: &CityCode,
        at: Option<Instant>,
    ) -> u32 {
        self.flights
            .iter()
            .filter(|f| &f.origin == origin && &f.destination == destination)
            .filter(|f| at.is_none_or(|start| f.start == start))
            .map(|f| f.passengers)
            .sum()
    }

    /// Checks every plane's flights for location and time continuity. An
    /// empty result means the plan can be flown as scheduled.
    pub fn check_flight_plan(&self) -> Vec<PlanIssue> {
        let mut issues = Vec::new();
        let mut registrations: Vec<&Registration> = self.planes.keys().collect();
        registrations.sort();

        for registration in registrations {
            let plane = &self.planes[registration];
            let mut chain: Vec<&Flight> = self
                .flights
                .iter()
                .filter(|f| &f.plane == registration)
                .collect();
            if chain.is_empty() {
                continue;
            }
            chain.sort_by_key(|f| f.start.to_minutes());

            if plane.location != chain[0].origin {
                issues.push(PlanIssue::WrongStartCity {
                    registration: registration.to_string(),
                    parked: self.city_label(&plane.location),
                    origin: self.city_label(&chain[0].origin),
                });
            }
            for pair in chain.windows(2) {
                if pair[0].destination != pair[1].origin {
                    issues.push(PlanIssue::BrokenChain {
                        registration: registration.to_string(),
                        lands_in: self.city_label(&pair[0].destination),
                        departs_from: self.city_label(&pair[1].origin),
                    });
                }
                if pair[0].end.to_minutes() > pair[1].start.to_minutes() {
                    issues.push(PlanIssue::Overlap {
                        registration: registration.to_string(),
                        first_end: pair[0].end,
                        next_start: pair[1].start,
                    });
                }
            }
        }
        issues
    }

    /// Scheduled profit minus the standing weekly costs, for the dashboard.
    pub fn expected_profit(&self) -> f64 {
        let flights: f64 = self
            .flights
            .iter()
            .filter_map(|f| {
                self.planes
                    .get(&f.plane)
                    .map(|p| f.profit(&p.model, &self.config))
            })
            .sum();
        flights - self.weekly_maintenance() - self.weekly_hub_upkeep()
    }

    pub fn weekly_maintenance(&self) -> f64 {
        self.planes.values().map(|p| p.model.maintenance).sum()
    }

    pub fn weekly_hub_upkeep(&self) -> f64 {
        self.hubs.values().map(Hub::weekly_cost).sum()
    }

    /// Settles the week: validates the plan, realizes every flight's
    /// economics, charges maintenance and hub upkeep, moves planes to their
    /// final destinations, then starts the next week with an empty schedule
    /// and fresh demand. Fails atomically if the plan is invalid.
    pub fn advance_week(&mut self) -> Result<Settlement, SimError> {
        let issues = self.check_flight_plan();
        if !issues.is_empty() {
            return Err(SimError::PlanInvalid(issues));
        }

        let mut revenue = 0.0;
        let mut flight_cost = 0.0;
        for flight in &self.flights {
            let plane = self
                .planes
                .get(&flight.plane)
                .ok_or_else(|| SimError::PlaneNotFound(flight.plane.to_string()))?;
            revenue += flight.revenue(&self.config);
            flight_cost +=
                flight.variable_cost(&self.config) + flight.fixed_cost(&plane.model, &self.config);
        }
        let maintenance = self.weekly_maintenance();
        let hub_upkeep = self.weekly_hub_upkeep();
        let profit = revenue - flight_cost - maintenance - hub_upkeep;

        for plane in self.planes.values_mut() {
            let last = self
                .flights
                .iter()
                .filter(|f| f.plane == plane.registration)
                .max_by_key(|f| f.start.to_minutes());
            if let Some(flight) = last {
                plane.location = flight.destination.clone();
            }
        }

        let settlement = Settlement {
            week: self.week,
            flights: self.flights.len() as u32,
            revenue,
            flight_cost,
            maintenance,
            hub_upkeep,
            profit,
            balance: self.cash + profit,
        };

        self.cash += profit;
        self.week += 1;
        self.flights.clear();
        self.refresh_demand();

        info!(
            "settled week {}: {} flights, profit {:.2}, balance {:.2}",
            settlement.week, settlement.flights, settlement.profit, settlement.balance
        );
        Ok(settlement)
    }

    fn refresh_demand(&mut self) {
        self.demand.clear();
        for origin in self.world.cities() {
            for destination in self.world.cities() {
                if let Some(demand) = route_weekly_demand(origin, destination, self.week) {
                    self.demand
                        .entry(origin.code.clone())
                        .or_default()
                        .insert(destination.code.clone(), demand);
                }
            }
        }
    }

    /// Everything needed to reconstruct this state exactly; the demand cache
    /// is re-derived on restore.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            planes: self
                .planes()
                .into_iter()
                .map(|p| PlaneState {
                    model: p.model.name.clone(),
                    registration: p.registration.clone(),
                    location: p.location.clone(),
                })
                .collect(),
            flights: self
                .flights
                .iter()
                .map(|f| FlightState {
                    origin: f.origin.clone(),
                    destination: f.destination.clone(),
                    plane: f.plane.clone(),
                    passengers: f.passengers,
                    start: f.start,
                })
                .collect(),
            hubs: self
                .hubs()
                .into_iter()
                .map(|h| HubState {
                    city: h.city.clone(),
                    level: h.level(),
                })
                .collect(),
            cash: self.cash,
            week: self.week,
            plane_counter: self.plane_counter,
        }
    }

    /// Rebuilds a manager from a snapshot, resolving identifiers against the
    /// given reference data. Derived flight fields are recomputed.
    pub fn restore(
        world: Arc<World>,
        config: EconomyConfig,
        snapshot: &Snapshot,
    ) -> Result<Self, SimError> {
        let mut planes = HashMap::new();
        for state in &snapshot.planes {
            let model = world
                .find_model(&state.model)
                .cloned()
                .ok_or_else(|| SimError::ModelNotFound(state.model.to_string()))?;
            let city = world
                .find_city(&state.location)
                .cloned()
                .ok_or_else(|| SimError::CityNotFound(state.location.to_string()))?;
            planes.insert(
                state.registration.clone(),
                Plane::new(model, state.registration.clone(), city.code.clone()),
            );
        }

        let mut flights = Vec::with_capacity(snapshot.flights.len());
        for state in &snapshot.flights {
            let origin = world
                .find_city(&state.origin)
                .ok_or_else(|| SimError::CityNotFound(state.origin.to_string()))?;
            let destination = world
                .find_city(&state.destination)
                .ok_or_else(|| SimError::CityNotFound(state.destination.to_string()))?;
            let plane = planes
                .get(&state.plane)
                .ok_or_else(|| SimError::PlaneNotFound(state.plane.to_string()))?;
            flights.push(Flight::new(
                origin,
                destination,
                plane,
                state.start,
                state.passengers,
            ));
        }

        let mut hubs = HashMap::new();
        for state in &snapshot.hubs {
            let city = world
                .find_city(&state.city)
                .ok_or_else(|| SimError::CityNotFound(state.city.to_string()))?;
            hubs.insert(
                city.code.clone(),
                Hub::at_level(city.code.clone(), state.level),
            );
        }

        let mut manager = AirlineManager {
            world,
            config,
            planes,
            flights,
            hubs,
            demand: HashMap::new(),
            cash: snapshot.cash,
            week: snapshot.week,
            plane_counter: snapshot.plane_counter,
        };
        manager.refresh_demand();
        Ok(manager)
    }
}
