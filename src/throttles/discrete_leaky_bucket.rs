use crate::{BucketError, Uint};

/// A fixed-capacity ledger of used capacity units.
///
/// The bucket has no notion of time: callers decide how many units to leak.
/// Every mutation keeps `0 <= used <= capacity`.
///
/// # Example
///
/// ```rust
/// use ledger_throttle_core::throttles::DiscreteLeakyBucket;
///
/// let mut bucket = DiscreteLeakyBucket::new(100);
/// bucket.use_capacity(70).unwrap();
/// assert_eq!(bucket.capacity_free(), 30);
///
/// // Over-leaking clamps to empty
/// bucket.leak(1_000);
/// assert_eq!(bucket.capacity_used(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscreteLeakyBucket {
    /// Maximum number of units the bucket can hold.
    capacity: Uint,
    /// Units currently in use.
    used: Uint,
}

impl DiscreteLeakyBucket {
    /// Creates an empty bucket with the given capacity.
    pub fn new(capacity: Uint) -> Self {
        DiscreteLeakyBucket { capacity, used: 0 }
    }

    /// Creates a bucket with `used` units already consumed.
    ///
    /// # Errors
    ///
    /// [`BucketError::UsedOutOfRange`] if `used > capacity`.
    pub fn with_used(capacity: Uint, used: Uint) -> Result<Self, BucketError> {
        let mut bucket = DiscreteLeakyBucket::new(capacity);
        bucket.reset_used(used)?;
        Ok(bucket)
    }

    /// Consumes `units` of free capacity.
    ///
    /// # Errors
    ///
    /// [`BucketError::InsufficientCapacity`] if fewer than `units` are free;
    /// the bucket is left untouched.
    pub fn use_capacity(&mut self, units: Uint) -> Result<(), BucketError> {
        match self.used.checked_add(units) {
            Some(new_used) if new_used <= self.capacity => {
                self.used = new_used;
                Ok(())
            }
            _ => Err(BucketError::InsufficientCapacity {
                requested: units,
                free: self.capacity_free(),
            }),
        }
    }

    /// Drains up to `units`; leaking more than is used empties the bucket.
    #[inline]
    pub fn leak(&mut self, units: Uint) {
        self.used -= self.used.min(units);
    }

    /// Replaces the used amount.
    ///
    /// # Errors
    ///
    /// [`BucketError::UsedOutOfRange`] if `used > capacity`.
    pub fn reset_used(&mut self, used: Uint) -> Result<(), BucketError> {
        if used > self.capacity {
            return Err(BucketError::UsedOutOfRange {
                used,
                capacity: self.capacity,
            });
        }
        self.used = used;
        Ok(())
    }

    #[inline]
    pub fn capacity_free(&self) -> Uint {
        self.capacity - self.used
    }

    #[inline]
    pub fn capacity_used(&self) -> Uint {
        self.used
    }

    #[inline]
    pub fn total_capacity(&self) -> Uint {
        self.capacity
    }
}
