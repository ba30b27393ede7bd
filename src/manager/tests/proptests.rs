use crate::demand::route_weekly_demand;
use crate::error::SimError;
use crate::manager::tests::utils::{manager, test_world};
use crate::time::{Day, Instant, MINUTES_PER_WEEK};
use proptest::prelude::*;

fn arb_instant() -> impl Strategy<Value = Instant> {
    (0..7usize, 0..24u8, 0..60u8).prop_map(|(day, hour, minute)| {
        Instant::new(Day::ALL[day], hour, minute).expect("in range")
    })
}

proptest! {
    #[test]
    fn test_instant_minutes_round_trip(total in 0..MINUTES_PER_WEEK) {
        prop_assert_eq!(Instant::from_minutes(total).to_minutes(), total);
    }

    #[test]
    fn test_add_minutes_is_modular(start in arb_instant(), shift in 0..100_000u32) {
        let moved = start.add_minutes(shift);
        prop_assert_eq!(
            moved.to_minutes(),
            (start.to_minutes() + shift) % MINUTES_PER_WEEK
        );
    }

    #[test]
    fn test_weekly_demand_is_pure(week in 1..500u32, a in 0..4usize, b in 0..4usize) {
        let world = test_world();
        let origin = &world.cities()[a];
        let destination = &world.cities()[b];

        let first = route_weekly_demand(origin, destination, week);
        prop_assert_eq!(route_weekly_demand(origin, destination, week), first);
        if a == b {
            prop_assert_eq!(first, None);
        }
    }

    #[test]
    fn test_allocation_never_exceeds_request_or_capacity(
        requested in 0..400u32,
        start in arb_instant(),
    ) {
        let mut m = manager();
        let capacity = m.find_plane("SL-001").unwrap().model.capacity;

        match m.create_flight("ALD", "BEX", "SL-001", start, requested) {
            Ok(flight) => {
                prop_assert!(flight.passengers <= requested);
                prop_assert!(flight.passengers <= capacity);
            }
            Err(SimError::CapacityExceeded { .. }) => {
                prop_assert!(requested > capacity);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
