use ledger_throttle_core::throttles::{GasLimitBucketThrottle, TIME_TO_EMPTY_NANOS};
use ledger_throttle_core::{ConfigError, LeakyThrottle};

const CAPACITY: u64 = 15_000_000;

fn new_gas(capacity: u64) -> GasLimitBucketThrottle {
    GasLimitBucketThrottle::new(capacity).unwrap()
}

#[test]
fn test_zero_capacity_is_rejected() {
    assert_eq!(GasLimitBucketThrottle::new(0).unwrap_err(), ConfigError::ZeroCapacity);
}

#[test]
fn test_capacity_is_gas_units() {
    let throttle = new_gas(CAPACITY);
    assert_eq!(throttle.bucket().total_capacity(), CAPACITY);
    // Conventional, not a real rate
    assert_eq!(throttle.mtps(), CAPACITY * 1_000);
}

#[test]
fn test_full_drain_after_time_to_empty() {
    let mut throttle = new_gas(CAPACITY);
    assert!(throttle.allow(CAPACITY, 0));
    assert!(!throttle.allow(1, 0));
    assert!(throttle.allow(CAPACITY, TIME_TO_EMPTY_NANOS));
}

#[test]
fn test_proportional_drain() {
    let mut throttle = new_gas(1_000_000);
    assert!(throttle.allow(1_000_000, 0));

    // 1ms drains a thousandth of the bucket
    assert!(!throttle.allow(1_001, 1_000_000));
    assert!(throttle.allow(1_000, 0));
    assert!(!throttle.allow(1, 0));
}

#[test]
fn test_exact_fit_is_admitted() {
    let mut throttle = new_gas(100);
    assert!(throttle.allow(60, 0));
    assert!(throttle.allow(40, 0));
    assert!(!throttle.allow(1, 0));
}

#[test]
fn test_request_above_capacity_is_rejected() {
    let mut throttle = new_gas(100);
    assert!(!throttle.allow(101, u64::MAX));
    assert_eq!(throttle.bucket().capacity_used(), 0);
}

#[test]
fn test_free_to_used_ratio() {
    let mut throttle = new_gas(100);
    assert_eq!(throttle.free_to_used_ratio(), u64::MAX);

    assert!(throttle.allow(20, 0));
    assert_eq!(throttle.free_to_used_ratio(), 4);

    assert!(throttle.allow(30, 0));
    assert_eq!(throttle.free_to_used_ratio(), 1);

    assert!(throttle.allow(50, 0));
    assert_eq!(throttle.free_to_used_ratio(), 0);
}

#[test]
fn test_percent_used_projection() {
    let mut throttle = new_gas(1_000);
    assert!(throttle.allow(800, 0));

    assert_eq!(throttle.instantaneous_percent_used(), 80.0);
    assert_eq!(throttle.percent_used(500_000_000), 30.0);
    assert_eq!(throttle.percent_used(TIME_TO_EMPTY_NANOS), 0.0);
    assert_eq!(throttle.bucket().capacity_used(), 800);
}

#[test]
fn test_leak_capacity_returns_unused_gas() {
    let mut throttle = new_gas(1_000);
    assert!(throttle.allow(300, 0));
    assert!(throttle.allow(500, 0));

    // Execution used only 200 of the 500 reserved
    throttle.leak_capacity(300);
    assert_eq!(throttle.bucket().capacity_used(), 500);
}

#[test]
fn test_reclaim_last_allowed_use() {
    let mut throttle = new_gas(1_000);
    assert!(throttle.allow(300, 0));
    throttle.reset_last_allowed_use();
    assert!(throttle.allow(500, 0));
    assert_eq!(throttle.last_allowed_units(), 500);

    throttle.reclaim_last_allowed_use();
    assert_eq!(throttle.bucket().capacity_used(), 300);
    assert_eq!(throttle.last_allowed_units(), 0);
}
