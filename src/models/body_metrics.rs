use chrono::NaiveDateTime;

use super::validation::ValidationError;
use super::value_objects::{BodyFatPercentage, MeasuredAt, MuscleMass, Weight};

/// One body composition measurement.
///
/// Body fat and muscle mass are validated independently; their sum is not
/// constrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMetrics {
    weight: Weight,
    body_fat_percentage: BodyFatPercentage,
    muscle_mass: MuscleMass,
    measured_at: MeasuredAt,
}

impl BodyMetrics {
    pub fn of(
        weight: Weight,
        body_fat_percentage: BodyFatPercentage,
        muscle_mass: MuscleMass,
        measured_at: MeasuredAt,
    ) -> Self {
        Self {
            weight,
            body_fat_percentage,
            muscle_mass,
            measured_at,
        }
    }

    pub fn from_raw(
        weight: f64,
        body_fat_percentage: f64,
        muscle_mass: f64,
        measured_at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Ok(Self::of(
            Weight::of(weight)?,
            BodyFatPercentage::of(body_fat_percentage)?,
            MuscleMass::of(muscle_mass)?,
            MeasuredAt::of(measured_at),
        ))
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn body_fat_percentage(&self) -> BodyFatPercentage {
        self.body_fat_percentage
    }

    pub fn muscle_mass(&self) -> MuscleMass {
        self.muscle_mass
    }

    pub fn measured_at(&self) -> MeasuredAt {
        self.measured_at
    }
}
