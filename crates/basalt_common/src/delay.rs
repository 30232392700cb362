//! Min/max and rise/fall delay types.
//!
//! Delays are integer picoseconds. [`DelayPair`] carries a min/max corner
//! pair; [`DelayQuad`] additionally separates rise and fall transitions.
//! Both support component-wise addition and subtraction.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A delay value in picoseconds.
pub type Delay = i64;

/// Minimum and maximum delay.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct DelayPair {
    /// Minimum (fast corner) delay.
    pub min: Delay,
    /// Maximum (slow corner) delay.
    pub max: Delay,
}

impl DelayPair {
    /// A pair with both corners zero.
    pub const ZERO: Self = Self { min: 0, max: 0 };

    /// Creates a pair with distinct min and max delays.
    pub fn new(min: Delay, max: Delay) -> Self {
        Self { min, max }
    }

    /// Creates a pair with equal min and max delays.
    pub fn from_delay(delay: Delay) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }
}

impl Add for DelayPair {
    type Output = DelayPair;

    fn add(self, other: DelayPair) -> DelayPair {
        DelayPair {
            min: self.min + other.min,
            max: self.max + other.max,
        }
    }
}

impl Sub for DelayPair {
    type Output = DelayPair;

    fn sub(self, other: DelayPair) -> DelayPair {
        DelayPair {
            min: self.min - other.min,
            max: self.max - other.max,
        }
    }
}

/// Four-quadrant delay: min and max for both rise and fall transitions.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct DelayQuad {
    /// Delay of the rising transition.
    pub rise: DelayPair,
    /// Delay of the falling transition.
    pub fall: DelayPair,
}

impl DelayQuad {
    /// A quad with all four corners zero.
    pub const ZERO: Self = Self {
        rise: DelayPair::ZERO,
        fall: DelayPair::ZERO,
    };

    /// Creates a quad from separate rise and fall pairs.
    pub fn new(rise: DelayPair, fall: DelayPair) -> Self {
        Self { rise, fall }
    }

    /// Creates a quad with all four corners equal to `delay`.
    pub fn from_delay(delay: Delay) -> Self {
        Self {
            rise: DelayPair::from_delay(delay),
            fall: DelayPair::from_delay(delay),
        }
    }

    /// The smallest delay across both transitions.
    pub fn min_delay(&self) -> Delay {
        self.rise.min.min(self.fall.min)
    }

    /// The largest delay across both transitions.
    pub fn max_delay(&self) -> Delay {
        self.rise.max.max(self.fall.max)
    }

    /// Collapses rise and fall into a single min/max pair.
    pub fn delay_pair(&self) -> DelayPair {
        DelayPair {
            min: self.min_delay(),
            max: self.max_delay(),
        }
    }
}

impl Add for DelayQuad {
    type Output = DelayQuad;

    fn add(self, other: DelayQuad) -> DelayQuad {
        DelayQuad {
            rise: self.rise + other.rise,
            fall: self.fall + other.fall,
        }
    }
}

impl Sub for DelayQuad {
    type Output = DelayQuad;

    fn sub(self, other: DelayQuad) -> DelayQuad {
        DelayQuad {
            rise: self.rise - other.rise,
            fall: self.fall - other.fall,
        }
    }
}
