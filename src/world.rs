use crate::city::City;
use crate::model::PlaneModel;
use log::info;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldLoadError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path:?}:{line}: malformed city record, expected name,population,lat,lon,code,tz")]
    MalformedCity { path: PathBuf, line: usize },
    #[error("failed to parse plane model {path:?}: {source}")]
    MalformedModel {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable reference-data bundle: the city registry and the aircraft
/// catalog, with lookup indices built once. Constructed at process start and
/// handed to every simulation instance; never mutated afterwards.
pub struct World {
    cities: Vec<Arc<City>>,
    models: Vec<Arc<PlaneModel>>,
    cities_by_key: HashMap<String, Arc<City>>,
    models_by_key: HashMap<String, Arc<PlaneModel>>,
}

impl World {
    pub fn new(cities: Vec<City>, models: Vec<PlaneModel>) -> World {
        let cities: Vec<Arc<City>> = cities.into_iter().map(Arc::new).collect();
        let models: Vec<Arc<PlaneModel>> = models.into_iter().map(Arc::new).collect();

        let mut cities_by_key = HashMap::new();
        for city in &cities {
            cities_by_key.insert(city.code.to_lowercase(), city.clone());
            cities_by_key.insert(city.name.to_lowercase(), city.clone());
        }
        let models_by_key = models
            .iter()
            .map(|m| (m.name.to_lowercase(), m.clone()))
            .collect();

        World {
            cities,
            models,
            cities_by_key,
            models_by_key,
        }
    }

    /// Loads the city table (flat comma-separated file) and the plane catalog
    /// (a directory of JSON records), prepending the starter model.
    pub fn load(cities_path: &Path, models_dir: &Path) -> Result<World, WorldLoadError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| WorldLoadError::Read {
                path: path.to_path_buf(),
                source,
            })
        };

        let mut cities = Vec::new();
        for (idx, record) in read(cities_path)?.lines().enumerate() {
            let record = record.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }
            let malformed = || WorldLoadError::MalformedCity {
                path: cities_path.to_path_buf(),
                line: idx + 1,
            };
            let fields: Vec<&str> = record.split(',').map(str::trim).collect();
            let &[name, population, latitude, longitude, code, timezone] = fields.as_slice()
            else {
                return Err(malformed());
            };
            cities.push(City {
                name: Arc::from(name),
                population: population.parse().map_err(|_| malformed())?,
                latitude: latitude.parse().map_err(|_| malformed())?,
                longitude: longitude.parse().map_err(|_| malformed())?,
                code: Arc::from(code),
                timezone: timezone.parse().map_err(|_| malformed())?,
            });
        }

        let mut model_paths: Vec<PathBuf> = std::fs::read_dir(models_dir)
            .map_err(|source| WorldLoadError::Read {
                path: models_dir.to_path_buf(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        model_paths.sort();

        let mut models = vec![PlaneModel::starter()];
        for path in model_paths {
            let model = serde_json::from_str(&read(&path)?).map_err(|source| {
                WorldLoadError::MalformedModel {
                    path: path.clone(),
                    source,
                }
            })?;
            models.push(model);
        }

        info!(
            "loaded {} cities and {} plane models",
            cities.len(),
            models.len()
        );
        Ok(World::new(cities, models))
    }

    pub fn cities(&self) -> &[Arc<City>] {
        &self.cities
    }

    pub fn models(&self) -> &[Arc<PlaneModel>] {
        &self.models
    }

    /// Case-insensitive lookup by short code or full name.
    pub fn find_city(&self, key: &str) -> Option<&Arc<City>> {
        self.cities_by_key.get(&key.to_lowercase())
    }

    /// Case-insensitive lookup by model name.
    pub fn find_model(&self, key: &str) -> Option<&Arc<PlaneModel>> {
        self.models_by_key.get(&key.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_world() -> World {
        World::new(
            vec![
                City {
                    name: Arc::from("Berlin"),
                    population: 3_700_000,
                    latitude: 52.52,
                    longitude: 13.405,
                    code: Arc::from("BER"),
                    timezone: 1.0,
                },
                City {
                    name: Arc::from("London"),
                    population: 8_900_000,
                    latitude: 51.507,
                    longitude: -0.128,
                    code: Arc::from("LHR"),
                    timezone: 0.0,
                },
            ],
            vec![PlaneModel::starter()],
        )
    }

    #[test]
    fn test_find_city_by_code_or_name() {
        let world = sample_world();
        assert_eq!(world.find_city("BER").unwrap().name.as_ref(), "Berlin");
        assert_eq!(world.find_city("ber").unwrap().name.as_ref(), "Berlin");
        assert_eq!(world.find_city("london").unwrap().code.as_ref(), "LHR");
        assert!(world.find_city("Atlantis").is_none());
    }

    #[test]
    fn test_find_model_case_insensitive() {
        let world = sample_world();
        assert!(world.find_model("dash 8 q200").is_some());
        assert!(world.find_model("Concorde").is_none());
    }
}
