use ledger_throttle_core::throttles::{BucketThrottle, CAPACITY_UNITS_PER_TXN};
use ledger_throttle_core::{ConfigError, LeakyThrottle};

const ONE_SECOND_NANOS: u64 = 1_000_000_000;

#[test]
fn test_with_tps_has_one_second_of_capacity() {
    let throttle = BucketThrottle::with_tps(100).unwrap();
    assert_eq!(throttle.mtps(), 100_000);
    assert_eq!(throttle.bucket().total_capacity(), 100 * CAPACITY_UNITS_PER_TXN);
}

#[test]
fn test_named_constructors_agree() {
    let capacity = |t: BucketThrottle| t.bucket().total_capacity();

    let a = capacity(BucketThrottle::with_tps_and_burst_period(3, 2).unwrap());
    let b = capacity(BucketThrottle::with_tps_and_burst_period_ms(3, 2_000).unwrap());
    let c = capacity(BucketThrottle::with_mtps_and_burst_period(3_000, 2).unwrap());
    let d = capacity(BucketThrottle::with_mtps_and_burst_period_ms(3_000, 2_000).unwrap());
    let e = capacity(BucketThrottle::new(3_000, 2_000).unwrap());

    assert_eq!(a, 6 * CAPACITY_UNITS_PER_TXN);
    assert!([b, c, d, e].iter().all(|&x| x == a));
    assert_eq!(
        BucketThrottle::with_mtps(1_000).unwrap().bucket().total_capacity(),
        CAPACITY_UNITS_PER_TXN
    );
}

#[test]
fn test_capacity_below_one_transaction_is_rejected() {
    assert_eq!(
        BucketThrottle::with_mtps_and_burst_period_ms(1, 1).unwrap_err(),
        ConfigError::CannotAdmitOneTransaction { mtps: 1, burst_period_ms: 1 }
    );
    assert!(BucketThrottle::with_mtps(999).is_err());
    assert!(BucketThrottle::with_tps(0).is_err());
}

#[test]
fn test_sub_tps_with_long_burst_is_accepted() {
    // 0.5 TPS over a 2 second burst holds exactly one transaction
    let mut throttle = BucketThrottle::with_mtps_and_burst_period(500, 2).unwrap();
    assert!(throttle.allow(1, 0));
    assert!(!throttle.allow(1, ONE_SECOND_NANOS));
    assert!(throttle.allow(1, ONE_SECOND_NANOS));
}

#[test]
fn test_overflowing_rate_is_out_of_range() {
    assert!(matches!(
        BucketThrottle::with_mtps(u64::MAX),
        Err(ConfigError::CalculationOutOfRange { .. })
    ));
    assert!(matches!(
        BucketThrottle::with_mtps_and_burst_period_ms(1_000_000, u64::MAX / 1_000_000),
        Err(ConfigError::CalculationOutOfRange { .. })
    ));
    assert!(matches!(
        BucketThrottle::with_tps(u64::MAX),
        Err(ConfigError::CalculationOutOfRange { .. })
    ));
}

#[test]
fn test_allow_until_exhausted_then_leak() {
    let mut throttle = BucketThrottle::with_tps(100).unwrap();

    assert!(throttle.allow(100, 0));
    assert!(!throttle.allow(1, 0));

    // 10ms at 100 TPS restores exactly one transaction
    assert!(throttle.allow(1, 10_000_000));
    assert!(!throttle.allow(1, 0));
}

#[test]
fn test_partial_leak_is_not_enough() {
    let mut throttle = BucketThrottle::with_tps(100).unwrap();
    assert!(throttle.allow(100, 0));
    assert!(!throttle.allow(1, 9_999_999));
    // The leak persists across the rejection
    assert!(throttle.allow(1, 1));
}

#[test]
fn test_absurd_request_fails_closed() {
    let mut throttle = BucketThrottle::with_tps(100).unwrap();
    assert!(!throttle.allow(u64::MAX, 0));
    assert_eq!(throttle.bucket().capacity_used(), 0);
}

#[test]
fn test_huge_elapsed_time_fully_drains() {
    let mut throttle = BucketThrottle::with_tps(100).unwrap();
    assert!(throttle.allow(100, 0));
    throttle.leak_for(u64::MAX);
    assert_eq!(throttle.bucket().capacity_used(), 0);
}

#[test]
fn test_allow_instantaneous_ignores_time() {
    let mut throttle = BucketThrottle::with_tps(2).unwrap();
    assert!(throttle.allow_instantaneous(2));
    assert!(!throttle.allow_instantaneous(1));
}

#[test]
fn test_leak_capacity_refunds_units() {
    let mut throttle = BucketThrottle::with_tps(2).unwrap();
    assert!(throttle.allow(2, 0));
    throttle.leak_capacity(CAPACITY_UNITS_PER_TXN);
    assert_eq!(throttle.bucket().capacity_used(), CAPACITY_UNITS_PER_TXN);
    assert!(throttle.allow(1, 0));
}

#[test]
fn test_percent_used_projects_without_mutation() {
    let mut throttle = BucketThrottle::with_tps(100).unwrap();
    assert!(throttle.allow(50, 0));

    assert_eq!(throttle.instantaneous_percent_used(), 50.0);
    // 250ms leaks 25 transactions
    assert_eq!(throttle.percent_used(250_000_000), 25.0);
    assert_eq!(throttle.percent_used(u64::MAX), 0.0);
    assert_eq!(throttle.instantaneous_percent_used(), 50.0);
}

#[test]
fn test_reclaim_last_allowed_use() {
    let mut throttle = BucketThrottle::with_tps(10).unwrap();
    assert!(throttle.allow(3, 0));
    throttle.reset_last_allowed_use();

    assert!(throttle.allow(2, 0));
    assert!(throttle.allow(1, 0));
    assert_eq!(throttle.last_allowed_units(), 3 * CAPACITY_UNITS_PER_TXN);

    // Both grants since the reset come back
    throttle.reclaim_last_allowed_use();
    assert_eq!(throttle.last_allowed_units(), 0);
    assert_eq!(throttle.bucket().capacity_used(), 3 * CAPACITY_UNITS_PER_TXN);

    // A second reclaim is a no-op
    throttle.reclaim_last_allowed_use();
    assert_eq!(throttle.bucket().capacity_used(), 3 * CAPACITY_UNITS_PER_TXN);
}

#[test]
fn test_rejection_does_not_record_grant() {
    let mut throttle = BucketThrottle::with_tps(1).unwrap();
    assert!(!throttle.allow(2, 0));
    assert_eq!(throttle.last_allowed_units(), 0);
}
