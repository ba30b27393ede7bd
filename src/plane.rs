use crate::city::CityCode;
use crate::economy::EconomyConfig;
use crate::model::PlaneModel;
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;

pub type Registration = Arc<str>;

/// An owned airframe. Scheduled flights reference it by registration; the
/// manager resolves them on demand instead of keeping back-references here.
#[derive(Clone, Debug)]
pub struct Plane {
    pub model: Arc<PlaneModel>,
    pub registration: Registration,
    /// Where the plane is parked. Updated only at week settlement.
    pub location: CityCode,
}

impl Plane {
    pub fn new(model: Arc<PlaneModel>, registration: Registration, location: CityCode) -> Plane {
        Plane {
            model,
            registration,
            location,
        }
    }

    pub fn can_fly(&self, distance: f64) -> bool {
        distance <= self.model.range
    }

    pub fn resale_value(&self, config: &EconomyConfig) -> f64 {
        self.model.price * config.resale_ratio
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.registration, self.model.name)
    }
}
