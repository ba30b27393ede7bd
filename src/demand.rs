use crate::city::City;
use crate::hashing::FnvHasher;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;
use std::hash::Hasher;

// Distance response of route demand: strongest around PEAK_KM, falling off
// with a Gaussian of width WIDTH_KM. Routes past LONG_HAUL_KM get a bonus so
// large markets stay connected.
const PEAK_KM: f64 = 3000.0;
const WIDTH_KM: f64 = 2000.0;
const LONG_HAUL_KM: f64 = 6000.0;

// Intraday mixture: morning, midday and evening peaks with their widths.
const PEAK_HOURS: [f64; 3] = [7.0, 12.0, 18.0];
const PEAK_WIDTHS: [f64; 3] = [1.5, 4.0, 2.0];
const MIX_WEIGHT: f64 = 0.4;

/// Total passenger volume wanting to travel origin -> destination in the
/// given week. `None` for a city paired with itself.
///
/// The result is a pure function of (origin, destination, week): the weekly
/// wobble comes from a generator seeded off those values, so callers may
/// re-derive demand at any time instead of persisting it.
pub fn route_weekly_demand(origin: &City, destination: &City, week: u32) -> Option<u32> {
    if origin.code == destination.code {
        return None;
    }

    let o = origin.population as f64;
    let p = destination.population as f64;
    let d = origin.distance_to(destination).max(1.0);

    let distance_factor = (-(d - PEAK_KM).powi(2) / (2.0 * WIDTH_KM * WIDTH_KM)).exp();
    let pop_factor = (o.sqrt() * p.sqrt()) / 1000.0;

    let mut demand = pop_factor * (1.0 + 2.0 * distance_factor);
    if d > LONG_HAUL_KM {
        let hub_bonus = (o * p).log10() / 10.0;
        demand *= 1.0 + hub_bonus;
    }

    demand *= weekly_factor(&origin.name, &destination.name, week);

    Some(demand.max(0.0).round() as u32)
}

/// Uniform draw from [0.09, 0.11), deterministically seeded from the route
/// names and the week number.
fn weekly_factor(origin: &str, destination: &str, week: u32) -> f64 {
    let mut hasher = FnvHasher::new();
    hasher.write(origin.as_bytes());
    hasher.write(destination.as_bytes());
    hasher.write(&week.to_le_bytes());
    let mut rng = ChaCha8Rng::seed_from_u64(hasher.finish());
    rng.gen_range(0.09..0.11)
}

/// How many of the week's passengers want the given departure slot.
///
/// The daily density is sampled at the slot's local time and one hour
/// earlier and the two samples are summed, smoothing demand across the hour
/// boundary. Purely deterministic.
pub fn intraday_passenger_demand(
    weekly_demand: u32,
    hour: u8,
    minute: u8,
    timezone: f64,
) -> u32 {
    let local = (f64::from(hour) + f64::from(minute) / 60.0) - timezone;
    let density = daily_density(local) + daily_density(local - 1.0);
    (f64::from(weekly_demand) * density + 0.2).round() as u32
}

fn daily_density(t: f64) -> f64 {
    let t = t.rem_euclid(24.0);
    let bumps: f64 = PEAK_HOURS
        .iter()
        .zip(PEAK_WIDTHS)
        .map(|(&peak, width)| (-(t - peak).powi(2) / (2.0 * width * width)).exp())
        .sum();
    MIX_WEIGHT / PI.sqrt() * bumps + 0.1
}
