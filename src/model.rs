use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;

pub type ModelName = Arc<str>;

/// Catalog entry for a purchasable aircraft type. Immutable reference data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneModel {
    pub name: ModelName,
    pub capacity: u32,
    /// Maximum range in km.
    pub range: f64,
    /// Cruise velocity in km per minute.
    pub velocity: f64,
    pub price: f64,
    /// Weekly upkeep per airframe.
    pub maintenance: f64,
    pub pilots: u32,
}

impl PlaneModel {
    /// The model every new airline starts with; not part of the shop files.
    pub fn starter() -> PlaneModel {
        PlaneModel {
            name: Arc::from("Dash 8 Q200"),
            capacity: 39,
            range: 2000.0,
            velocity: 3.0,
            price: 50_000.0,
            maintenance: 200.0,
            pilots: 2,
        }
    }
}

impl fmt::Display for PlaneModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
