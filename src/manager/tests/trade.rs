use crate::error::SimError;
use crate::manager::tests::utils::{at, manager, manager_with_cash};
use crate::time::Day;

#[test]
fn test_buy_plane_debits_and_parks() {
    let mut m = manager();
    let cash_before = m.cash();

    let registration = m.buy_plane("Wren 200", "COR").unwrap();

    assert_eq!(registration.as_ref(), "SL-002");
    assert_eq!(m.cash(), cash_before - 50_000.0);
    let plane = m.find_plane("SL-002").unwrap();
    assert_eq!(plane.location.as_ref(), "COR");
    assert_eq!(plane.model.name.as_ref(), "Wren 200");
    assert_eq!(m.planes().len(), 2);
}

#[test]
fn test_buy_rejects_insufficient_funds() {
    let mut m = manager();
    let cash_before = m.cash();

    let err = m.buy_plane("Kestrel 700", "ALD").unwrap_err();

    assert!(matches!(err, SimError::InsufficientFunds { price, .. } if price == 250_000.0));
    assert_eq!(m.cash(), cash_before);
    assert_eq!(m.planes().len(), 1);
}

#[test]
fn test_buy_rejects_unknown_model_and_city() {
    let mut m = manager_with_cash(1_000_000.0);
    assert!(matches!(
        m.buy_plane("Concorde", "ALD").unwrap_err(),
        SimError::ModelNotFound(_)
    ));
    assert!(matches!(
        m.buy_plane("Wren 200", "Atlantis").unwrap_err(),
        SimError::CityNotFound(_)
    ));
    assert_eq!(m.planes().len(), 1);
}

#[test]
fn test_registrations_are_never_reused() {
    let mut m = manager_with_cash(1_000_000.0);

    let second = m.buy_plane("Wren 200", "ALD").unwrap();
    assert_eq!(second.as_ref(), "SL-002");
    m.sell_plane("SL-002").unwrap();

    let third = m.buy_plane("Wren 200", "ALD").unwrap();
    assert_eq!(third.as_ref(), "SL-003");
}

#[test]
fn test_sell_idle_plane_credits_resale_value() {
    let mut m = manager_with_cash(1_000_000.0);
    m.buy_plane("Wren 200", "ALD").unwrap();
    let cash_before = m.cash();

    let value = m.sell_plane("SL-002").unwrap();

    assert_eq!(value, 0.7 * 50_000.0);
    assert_eq!(m.cash(), cash_before + value);
    assert!(m.find_plane("SL-002").is_none());
}

#[test]
fn test_sell_with_scheduled_flights_is_rejected() {
    let mut m = manager();
    m.create_flight("ALD", "BEX", "SL-001", at(Day::M, 8, 0), 10)
        .unwrap();

    let err = m.sell_plane("SL-001").unwrap_err();

    assert!(matches!(err, SimError::AssetInUse { flights: 1, .. }));
    assert!(m.find_plane("SL-001").is_some());

    // Deleting the flight frees the plane for sale.
    assert!(m.delete_flight("SL-001", at(Day::M, 8, 0)));
    m.sell_plane("SL-001").unwrap();
    assert!(m.planes().is_empty());
}

#[test]
fn test_sell_unknown_plane() {
    let mut m = manager();
    assert!(matches!(
        m.sell_plane("SL-999").unwrap_err(),
        SimError::PlaneNotFound(_)
    ));
}

#[test]
fn test_hub_investment_upgrades_in_place() {
    let mut m = manager();

    // All four test cities already have seeded level-1 hubs.
    let before = m.hubs().len();
    let level = m.invest_in_hub("ALD").unwrap().level();
    assert_eq!(level, 2);
    assert_eq!(m.hubs().len(), before);

    let bonus = m.invest_in_hub("ALD").unwrap().passenger_bonus();
    assert!((bonus - 1.2).abs() < 1e-9);
}

#[test]
fn test_hub_investment_founds_where_none_exists() {
    use crate::economy::EconomyConfig;
    use crate::manager::manager::AirlineManager;
    use crate::manager::tests::utils::test_world;

    let mut snapshot = manager().snapshot();
    snapshot.hubs.retain(|h| h.city.as_ref() != "COR");
    let mut m =
        AirlineManager::restore(test_world(), EconomyConfig::default(), &snapshot).unwrap();
    assert!(m.hub_in(&std::sync::Arc::from("COR")).is_none());

    let hub = m.invest_in_hub("Corwick").unwrap();
    assert_eq!(hub.level(), 1);
    assert_eq!(hub.tier_name(), "Permission");
}
