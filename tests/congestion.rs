use ledger_throttle_core::congestion::max_instantaneous_percent_used;
use ledger_throttle_core::throttles::{DeterministicThrottle, GasLimitDeterministicThrottle};
use ledger_throttle_core::{CongestibleThrottle, Timestamp};

#[test]
fn test_reports_through_trait_object() {
    let mut txn = DeterministicThrottle::with_tps(4).unwrap().with_name("ContractCall");
    let mut gas = GasLimitDeterministicThrottle::with_capacity(1_000).unwrap().with_name("Gas");
    let now = Timestamp::from_seconds(42);
    assert_eq!(txn.allow(1, now), Ok(true));
    assert_eq!(gas.allow(900, now), Ok(true));

    let views: [&dyn CongestibleThrottle; 2] = [&txn, &gas];
    assert_eq!(views[0].name(), "ContractCall");
    assert_eq!(views[0].mtps(), 4_000);
    assert_eq!(views[0].instantaneous_percent_used(), 25.0);
    assert_eq!(views[1].used(), 900);
    assert_eq!(views[1].capacity(), 1_000);
    assert_eq!(views[1].mtps(), 1_000_000);
    assert_eq!(views[1].instantaneous_percent_used(), 90.0);

    assert_eq!(max_instantaneous_percent_used(views), 90.0);
}

#[test]
fn test_max_percent_of_nothing_is_zero() {
    assert_eq!(max_instantaneous_percent_used(Vec::<&dyn CongestibleThrottle>::new()), 0.0);
}
