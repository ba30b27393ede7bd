use crate::economy::EconomyConfig;
use crate::manager::manager::AirlineManager;
use crate::manager::tests::utils::{at, manager_with_cash, test_world};
use crate::snapshot::Snapshot;
use crate::time::Day;

#[test]
fn test_round_trip_through_json() {
    let mut m = manager_with_cash(1_000_000.0);
    m.buy_plane("Kestrel 700", "COR").unwrap();
    m.invest_in_hub("BEX").unwrap();
    m.create_flight("ALD", "BEX", "SL-001", at(Day::M, 8, 0), 10)
        .unwrap();

    let encoded = serde_json::to_string(&m.snapshot()).unwrap();
    let decoded: Snapshot = serde_json::from_str(&encoded).unwrap();
    let restored =
        AirlineManager::restore(test_world(), EconomyConfig::default(), &decoded).unwrap();

    assert_eq!(restored.cash(), m.cash());
    assert_eq!(restored.week(), m.week());

    let planes = restored.planes();
    assert_eq!(planes.len(), 2);
    assert_eq!(planes[0].registration.as_ref(), "SL-001");
    assert_eq!(planes[1].registration.as_ref(), "SL-002");
    assert_eq!(planes[1].model.name.as_ref(), "Kestrel 700");
    assert_eq!(planes[1].location.as_ref(), "COR");

    assert_eq!(restored.flights().len(), 1);
    let original = &m.flights()[0];
    let flight = &restored.flights()[0];
    assert_eq!(flight.passengers, original.passengers);
    assert_eq!(flight.start, original.start);
    // Derived fields come back from the reference data, not the file.
    assert_eq!(flight.distance, original.distance);
    assert_eq!(flight.end, original.end);

    assert_eq!(restored.hubs().len(), 4);
    let bexley = test_world().find_city("BEX").unwrap().code.clone();
    assert_eq!(restored.hub_in(&bexley).unwrap().level(), 2);

    // The registration counter survives, so no registration is ever reused.
    let mut restored = restored;
    let next = restored.buy_plane("Wren 200", "ALD").unwrap();
    assert_eq!(next.as_ref(), "SL-003");
}

#[test]
fn test_restore_rederives_quadratic_hub_bonus() {
    let mut m = manager_with_cash(1_000_000.0);
    for _ in 0..3 {
        m.invest_in_hub("ALD").unwrap();
    }
    let alderton = test_world().find_city("ALD").unwrap().code.clone();
    let upgraded = m.hub_in(&alderton).unwrap();
    assert_eq!(upgraded.level(), 4);
    assert!((upgraded.passenger_bonus() - 1.3).abs() < 1e-9);

    let restored =
        AirlineManager::restore(test_world(), EconomyConfig::default(), &m.snapshot()).unwrap();

    // Only the level is persisted; the multiplier snaps back to the
    // creation formula for that level.
    let hub = restored.hub_in(&alderton).unwrap();
    assert_eq!(hub.level(), 4);
    assert!((hub.passenger_bonus() - 1.4).abs() < 1e-9);
}

#[test]
fn test_restore_rejects_unknown_references() {
    let m = manager_with_cash(1_000_000.0);

    let mut snapshot = m.snapshot();
    snapshot.planes[0].model = std::sync::Arc::from("Concorde");
    assert!(AirlineManager::restore(test_world(), EconomyConfig::default(), &snapshot).is_err());

    let mut snapshot = m.snapshot();
    snapshot.hubs[0].city = std::sync::Arc::from("XXX");
    assert!(AirlineManager::restore(test_world(), EconomyConfig::default(), &snapshot).is_err());
}

#[test]
fn test_demand_cache_is_rebuilt_on_restore() {
    let m = manager_with_cash(1_000_000.0);
    let restored =
        AirlineManager::restore(test_world(), EconomyConfig::default(), &m.snapshot()).unwrap();
    assert_eq!(
        restored.route_demand("ALD", "BEX"),
        m.route_demand("ALD", "BEX")
    );
}
