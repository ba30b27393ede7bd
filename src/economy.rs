use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse economy config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read economy config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Tunable economic parameters. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Routes shorter than this fly at the short-haul fare.
    pub short_haul_km: f64,
    /// Routes shorter than this (but at least short-haul) fly at the
    /// medium-haul fare; everything longer at the long-haul fare.
    pub medium_haul_km: f64,
    pub short_haul_fare: f64,
    pub medium_haul_fare: f64,
    pub long_haul_fare: f64,
    pub fuel_cost_per_km: f64,
    pub pilot_salary_per_minute: f64,
    pub starting_cash: f64,
    /// Fraction of the purchase price recovered when selling a plane.
    pub resale_ratio: f64,
    /// Fraction of unserved slot demand a new flight can actually capture;
    /// the rest books elsewhere.
    pub residual_demand_ratio: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        EconomyConfig {
            short_haul_km: 500.0,
            medium_haul_km: 1000.0,
            short_haul_fare: 0.25,
            medium_haul_fare: 0.20,
            long_haul_fare: 0.15,
            fuel_cost_per_km: 0.08,
            pilot_salary_per_minute: 0.67,
            starting_cash: 50_000.0,
            resale_ratio: 0.7,
            residual_demand_ratio: 0.8,
        }
    }
}

impl EconomyConfig {
    /// Ticket price per kilometer, tiered by route length.
    pub fn fare_per_km(&self, distance: f64) -> f64 {
        if distance < self.short_haul_km {
            self.short_haul_fare
        } else if distance < self.medium_haul_km {
            self.medium_haul_fare
        } else {
            self.long_haul_fare
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}
