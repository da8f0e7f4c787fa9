use chrono::NaiveDateTime;

use super::validation::{check_f64, check_i32, require_text, ValidationError};
use super::value_objects::{CaloriesBurned, MeasuredAt, Steps};

pub const DURATION_MINUTES_MAX: i32 = 24 * 60;
pub const DISTANCE_KM_MAX: f64 = 1000.0;

/// A single exercise session (walking, jogging, strength training, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    activity_type: String,
    started_at: MeasuredAt,
    duration_in_minutes: i32,
    /// Zero when distance does not apply.
    distance_km: f64,
    steps: Steps,
    calories_burned: CaloriesBurned,
}

impl Activity {
    pub fn of(
        activity_type: impl Into<String>,
        started_at: MeasuredAt,
        duration_in_minutes: i32,
        distance_km: f64,
        steps: Steps,
        calories_burned: CaloriesBurned,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            activity_type: require_text("type", activity_type.into())?,
            started_at,
            duration_in_minutes: check_i32(
                "duration_in_minutes",
                duration_in_minutes,
                0,
                DURATION_MINUTES_MAX,
            )?,
            distance_km: check_f64("distance_km", distance_km, 0.0, DISTANCE_KM_MAX)?,
            steps,
            calories_burned,
        })
    }

    /// Builds an activity from unwrapped primitives, validating each one.
    pub fn from_raw(
        activity_type: impl Into<String>,
        started_at: NaiveDateTime,
        duration_in_minutes: i32,
        distance_km: f64,
        steps: i32,
        calories_burned: i32,
    ) -> Result<Self, ValidationError> {
        Self::of(
            activity_type,
            MeasuredAt::of(started_at),
            duration_in_minutes,
            distance_km,
            Steps::of(steps)?,
            CaloriesBurned::of(calories_burned)?,
        )
    }

    pub fn activity_type(&self) -> &str {
        &self.activity_type
    }

    pub fn started_at(&self) -> MeasuredAt {
        self.started_at
    }

    pub fn duration_in_minutes(&self) -> i32 {
        self.duration_in_minutes
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn steps(&self) -> Steps {
        self.steps
    }

    pub fn calories_burned(&self) -> CaloriesBurned {
        self.calories_burned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(6, 45, 0)
            .unwrap()
    }

    #[test]
    fn test_valid_activity() {
        let activity = Activity::from_raw("jogging", morning(), 40, 6.2, 7_800, 420).unwrap();
        assert_eq!(activity.activity_type(), "jogging");
        assert_eq!(activity.started_at().value(), morning());
        assert_eq!(activity.duration_in_minutes(), 40);
        assert_eq!(activity.distance_km(), 6.2);
        assert_eq!(activity.steps().value(), 7_800);
        assert_eq!(activity.calories_burned().value(), 420);
    }

    #[test]
    fn test_blank_type_rejected() {
        let err = Activity::from_raw("  ", morning(), 10, 0.0, 0, 0).unwrap_err();
        assert_eq!(err.field, "type");
    }

    #[test]
    fn test_duration_bounds() {
        assert!(Activity::from_raw("yoga", morning(), 0, 0.0, 0, 0).is_ok());
        assert!(Activity::from_raw("yoga", morning(), 1440, 0.0, 0, 0).is_ok());
        assert!(Activity::from_raw("yoga", morning(), -1, 0.0, 0, 0).is_err());
        assert!(Activity::from_raw("yoga", morning(), 1441, 0.0, 0, 0).is_err());
    }

    #[test]
    fn test_distance_bounds_and_non_finite() {
        assert!(Activity::from_raw("cycling", morning(), 60, 1000.0, 0, 0).is_ok());
        assert!(Activity::from_raw("cycling", morning(), 60, 1000.5, 0, 0).is_err());
        assert!(Activity::from_raw("cycling", morning(), 60, -0.1, 0, 0).is_err());
        assert!(Activity::from_raw("cycling", morning(), 60, f64::NAN, 0, 0).is_err());
        assert!(Activity::from_raw("cycling", morning(), 60, f64::INFINITY, 0, 0).is_err());
    }

    #[test]
    fn test_invalid_value_objects_propagate() {
        let err = Activity::from_raw("walking", morning(), 30, 2.0, 100_001, 0).unwrap_err();
        assert_eq!(err.field, "steps");
        let err = Activity::from_raw("walking", morning(), 30, 2.0, 0, 10_001).unwrap_err();
        assert_eq!(err.field, "calories_burned");
    }
}
