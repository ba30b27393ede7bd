use crate::city::CityCode;

pub struct HubTier {
    pub name: &'static str,
    pub weekly_cost: f64,
}

/// Fixed upgrade ladder. Upkeep and tier name are always read from this
/// table at the hub's current level.
pub const HUB_TIERS: [HubTier; 10] = [
    HubTier { name: "Permission", weekly_cost: 50.0 },
    HubTier { name: "Access", weekly_cost: 100.0 },
    HubTier { name: "Outpost", weekly_cost: 200.0 },
    HubTier { name: "Link", weekly_cost: 500.0 },
    HubTier { name: "Base", weekly_cost: 1000.0 },
    HubTier { name: "Hublet", weekly_cost: 2000.0 },
    HubTier { name: "Gateway", weekly_cost: 5000.0 },
    HubTier { name: "Anchor", weekly_cost: 10000.0 },
    HubTier { name: "Hub", weekly_cost: 20000.0 },
    HubTier { name: "Main Hub", weekly_cost: 50000.0 },
];

/// A city-scoped facility that boosts capturable passenger demand.
///
/// The demand multiplier is quadratic in level at creation but each upgrade
/// only adds a flat 0.1, so an upgraded hub and a freshly created hub of the
/// same level can carry different multipliers. Snapshots store the level
/// only; restoring re-derives the quadratic value. Long-standing behavior,
/// kept as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct Hub {
    pub city: CityCode,
    level: u8,
    passenger_bonus: f64,
}

impl Hub {
    pub const MAX_LEVEL: u8 = 10;

    pub fn new(city: CityCode) -> Hub {
        Hub::at_level(city, 1)
    }

    pub fn at_level(city: CityCode, level: u8) -> Hub {
        let level = level.clamp(1, Hub::MAX_LEVEL);
        let bonus = (0.025 * f64::from(level).powi(2) * 10.0).round() / 10.0;
        Hub {
            city,
            level,
            passenger_bonus: 1.0 + bonus,
        }
    }

    /// No-op once the top tier is reached.
    pub fn upgrade(&mut self) {
        if self.level >= Hub::MAX_LEVEL {
            return;
        }
        self.level += 1;
        self.passenger_bonus += 0.1;
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn passenger_bonus(&self) -> f64 {
        self.passenger_bonus
    }

    pub fn tier(&self) -> &'static HubTier {
        &HUB_TIERS[usize::from(self.level - 1)]
    }

    pub fn tier_name(&self) -> &'static str {
        self.tier().name
    }

    pub fn weekly_cost(&self) -> f64 {
        self.tier().weekly_cost
    }
}
