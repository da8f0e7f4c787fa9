//! Self-validating wrappers around single measured quantities.
//!
//! Every type is built through `of`, which either returns the wrapper or a
//! [`ValidationError`]. Wrappers are immutable and compare by their value.

use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;

use super::validation::{check_f64, check_finite, check_i32, ValidationError};

pub const BODY_FAT_MIN: f64 = 0.0;
pub const BODY_FAT_MAX: f64 = 100.0;
pub const MUSCLE_MASS_MIN: f64 = 0.0;
pub const MUSCLE_MASS_MAX: f64 = 100.0;
pub const STEPS_MIN: i32 = 0;
pub const STEPS_MAX: i32 = 100_000;
pub const CALORIES_BURNED_MIN: i32 = 0;
pub const CALORIES_BURNED_MAX: i32 = 10_000;

// Finite floats only ever reach these wrappers, so bitwise identity is a
// valid Eq/Hash. Adding 0.0 folds -0.0 into 0.0.
macro_rules! float_identity {
    ($($ty:ident),+) => {
        $(
            impl Eq for $ty {}

            impl Hash for $ty {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    (self.0 + 0.0).to_bits().hash(state);
                }
            }
        )+
    };
}

/// Body weight in kilograms.
///
/// Only non-finite input is rejected here. The `(0, 500]` bound is a
/// request-level policy, see [`crate::dto::WEIGHT_MAX`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weight(f64);

impl Weight {
    pub fn of(value: f64) -> Result<Self, ValidationError> {
        check_finite("weight", value).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Body fat in percent, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFatPercentage(f64);

impl BodyFatPercentage {
    pub fn of(value: f64) -> Result<Self, ValidationError> {
        check_f64("body_fat_percentage", value, BODY_FAT_MIN, BODY_FAT_MAX).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Muscle mass, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuscleMass(f64);

impl MuscleMass {
    pub fn of(value: f64) -> Result<Self, ValidationError> {
        check_f64("muscle_mass", value, MUSCLE_MASS_MIN, MUSCLE_MASS_MAX).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

float_identity!(Weight, BodyFatPercentage, MuscleMass);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Steps(i32);

impl Steps {
    pub fn of(value: i32) -> Result<Self, ValidationError> {
        check_i32("steps", value, STEPS_MIN, STEPS_MAX).map(Self)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaloriesBurned(i32);

impl CaloriesBurned {
    pub fn of(value: i32) -> Result<Self, ValidationError> {
        check_i32("calories_burned", value, CALORIES_BURNED_MIN, CALORIES_BURNED_MAX).map(Self)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Local timestamp at which something was measured or started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeasuredAt(NaiveDateTime);

impl MeasuredAt {
    pub fn of(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// For inputs where the timestamp may be missing, e.g. a decoded request.
    pub fn required(field: &'static str, value: Option<NaiveDateTime>) -> Result<Self, ValidationError> {
        value
            .map(Self)
            .ok_or_else(|| ValidationError::new(field, "is required"))
    }

    pub fn value(&self) -> NaiveDateTime {
        self.0
    }
}
