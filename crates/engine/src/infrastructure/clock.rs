//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_index(&self, len: usize) -> usize {
        use rand::Rng;
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing: always the same index, uuids counting up from 1.
#[cfg(test)]
pub struct FixedRandom {
    pub index: usize,
    next_uuid: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl FixedRandom {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            next_uuid: std::sync::atomic::AtomicU64::new(1),
        }
    }
}

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_index(&self, _len: usize) -> usize {
        self.index
    }

    fn gen_uuid(&self) -> Uuid {
        let n = self
            .next_uuid
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Uuid::from_u128(u128::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_range() {
        let random = SystemRandom::new();
        for _ in 0..200 {
            assert!(random.gen_index(55) < 55);
        }
        assert_eq!(random.gen_index(0), 0);
    }
}
