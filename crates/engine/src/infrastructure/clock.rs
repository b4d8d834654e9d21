//! Clock and random implementations.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::infrastructure::ports::{ClockPort, RandomPort};

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
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic random source. Same seed, same sequence of rolls.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl RandomPort for SeededRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.with_rng(|rng| rng.gen_range(min..=max))
    }

    fn gen_f64(&self) -> f64 {
        self.with_rng(|rng| rng.gen::<f64>())
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

/// Fixed random for testing.
///
/// Integer rolls return `roll` clamped into the requested range; float rolls
/// return `chance`.
#[cfg(test)]
pub struct FixedRandom {
    pub roll: i32,
    pub chance: f64,
}

#[cfg(test)]
impl FixedRandom {
    /// Lowest integer roll and a float roll that only guaranteed groups pass.
    pub fn low() -> Self {
        Self {
            roll: i32::MIN,
            chance: 0.99,
        }
    }

    pub fn with_roll(roll: i32) -> Self {
        Self { roll, chance: 0.99 }
    }
}

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.roll.clamp(min, max.max(min))
    }

    fn gen_f64(&self) -> f64 {
        self.chance
    }
}
