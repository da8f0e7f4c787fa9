//! # Daily log API: Request/Response DTOs
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON
//! - Field checks are expressed via `validator` derive macros and run before
//!   the domain factories see any value
//! - Missing child lists deserialize to empty lists

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::value_objects::MeasuredAt;
use crate::models::{Activity, BodyMetrics, DailyLog, Meal, MentalNote, UserId, ValidationError};

/// Upper bound for a submitted weight. Zero and below are rejected too.
pub const WEIGHT_MAX: f64 = 500.0;

// ============================================================================
// Common
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// POST /api/daily-logs
#[derive(Debug, Deserialize)]
pub struct RegisterDailyLogRequest {
    pub user_id: UserId,
    pub log_date: NaiveDate,
    #[serde(flatten)]
    pub log: DailyLogPayload,
}

/// Everything in a daily log except its identity.
/// PUT /api/daily-logs/{user_id}/{log_date} takes this shape directly.
#[derive(Debug, Deserialize, Validate)]
pub struct DailyLogPayload {
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be 0-24"))]
    pub sleep_hours: f64,

    #[validate(range(min = 1, max = 10, message = "Mood level must be 1-10"))]
    pub mood_level: i32,

    /// Checked in `validate_all`, together with the weight policy.
    #[serde(default)]
    pub body_metrics: Vec<BodyMetricsRequest>,

    #[serde(default)]
    #[validate]
    pub activities: Vec<ActivityRequest>,

    #[serde(default)]
    #[validate]
    pub meals: Vec<MealRequest>,

    #[serde(default)]
    #[validate]
    pub mental_notes: Vec<MentalNoteRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BodyMetricsRequest {
    pub weight: f64,

    #[validate(range(min = 0.0, max = 100.0, message = "Body fat must be 0-100%"))]
    pub body_fat_percentage: f64,

    #[validate(range(min = 0.0, max = 100.0, message = "Muscle mass must be 0-100"))]
    pub muscle_mass: f64,

    #[validate(required(message = "Measurement time is required"))]
    pub measured_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivityRequest {
    /// Walking, jogging, strength training, ...
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Activity type is required"))]
    pub activity_type: String,

    #[validate(required(message = "Start time is required"))]
    pub started_at: Option<NaiveDateTime>,

    #[validate(range(min = 0, max = 1440, message = "Duration must be 0-1440 minutes"))]
    pub duration_in_minutes: i32,

    /// 0.0 when distance does not apply
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0, message = "Distance must be 0-1000 km"))]
    pub distance_km: f64,

    #[serde(default)]
    #[validate(range(min = 0, max = 100000, message = "Steps must be 0-100000"))]
    pub steps: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 10000, message = "Calories burned must be 0-10000"))]
    pub calories_burned: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MealRequest {
    #[validate(required(message = "Meal time is required"))]
    pub time: Option<NaiveTime>,

    #[validate(length(min = 1, message = "Meal content is required"))]
    pub content: String,

    #[validate(range(min = 0, max = 10000, message = "Calories must be 0-10000"))]
    pub calories: i32,

    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MentalNoteRequest {
    #[validate(required(message = "Record time is required"))]
    pub recorded_at: Option<NaiveDateTime>,

    #[validate(range(min = 0, max = 10, message = "Stress level must be 0-10"))]
    pub stress_level: i32,

    #[validate(range(min = 0, max = 10, message = "Motivation level must be 0-10"))]
    pub motivation_level: i32,

    pub note: Option<String>,
}

// ============================================================================
// Validation helpers
// ============================================================================

impl DailyLogPayload {
    /// Runs the derived checks on the payload and on every child entry.
    /// Child failures are reported under `body_metrics[i].field` style keys.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::merge_all(
            self.validate(),
            "body_metrics",
            self.body_metrics
                .iter()
                .map(|m| ValidationErrors::merge(Ok(()), "body_metrics", m.validate_entry()))
                .collect(),
        )
    }

    /// Builds the aggregate for the given identity through the domain
    /// factories.
    pub fn into_domain(
        self,
        user_id: UserId,
        log_date: NaiveDate,
    ) -> Result<DailyLog, ValidationError> {
        let body_metrics = self
            .body_metrics
            .into_iter()
            .map(BodyMetricsRequest::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        let activities = self
            .activities
            .into_iter()
            .map(ActivityRequest::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        let meals = self
            .meals
            .into_iter()
            .map(MealRequest::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        let mental_notes = self
            .mental_notes
            .into_iter()
            .map(MentalNoteRequest::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        DailyLog::of(
            user_id,
            log_date,
            self.sleep_hours,
            self.mood_level,
            body_metrics,
            activities,
            meals,
            mental_notes,
        )
    }
}

impl BodyMetricsRequest {
    /// Derived checks plus the weight policy: `(0, WEIGHT_MAX]`. The domain
    /// `Weight` itself stays unbounded, so this is checked here only.
    fn validate_entry(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if !(self.weight > 0.0 && self.weight <= WEIGHT_MAX) {
            let mut error = validator::ValidationError::new("range");
            error.message = Some(Cow::from(format!(
                "Weight must be greater than 0 and at most {WEIGHT_MAX}"
            )));
            errors.add("weight", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn into_domain(self) -> Result<BodyMetrics, ValidationError> {
        let measured_at = MeasuredAt::required("measured_at", self.measured_at)?;
        BodyMetrics::from_raw(
            self.weight,
            self.body_fat_percentage,
            self.muscle_mass,
            measured_at.value(),
        )
    }
}

impl ActivityRequest {
    fn into_domain(self) -> Result<Activity, ValidationError> {
        let started_at = MeasuredAt::required("started_at", self.started_at)?;
        Activity::from_raw(
            self.activity_type,
            started_at.value(),
            self.duration_in_minutes,
            self.distance_km,
            self.steps,
            self.calories_burned,
        )
    }
}

impl MealRequest {
    fn into_domain(self) -> Result<Meal, ValidationError> {
        let time = self
            .time
            .ok_or_else(|| ValidationError::new("time", "is required"))?;
        Meal::of(time, self.content, self.calories, self.photo_url)
    }
}

impl MentalNoteRequest {
    fn into_domain(self) -> Result<MentalNote, ValidationError> {
        let recorded_at = self
            .recorded_at
            .ok_or_else(|| ValidationError::new("recorded_at", "is required"))?;
        MentalNote::of(recorded_at, self.stress_level, self.motivation_level, self.note)
    }
}

// ============================================================================
// Responses
// ============================================================================

/// GET /api/daily-logs/{user_id}/{log_date}
#[derive(Debug, Serialize)]
pub struct DailyLogResponse {
    pub user_id: UserId,
    pub log_date: NaiveDate,
    pub sleep_hours: f64,
    pub mood_level: i32,
    pub body_metrics: Vec<BodyMetricsResponse>,
    pub activities: Vec<ActivityResponse>,
    pub meals: Vec<MealResponse>,
    pub mental_notes: Vec<MentalNoteResponse>,
}

/// GET /api/daily-logs/{user_id}/months/{year_month}, one entry per logged day
#[derive(Debug, Serialize)]
pub struct DailyLogSummaryResponse {
    pub log_date: NaiveDate,
    pub sleep_hours: f64,
    pub mood_level: i32,
}

#[derive(Debug, Serialize)]
pub struct BodyMetricsResponse {
    pub weight: f64,
    pub body_fat_percentage: f64,
    pub muscle_mass: f64,
    pub measured_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub started_at: NaiveDateTime,
    pub duration_in_minutes: i32,
    pub distance_km: f64,
    pub steps: i32,
    pub calories_burned: i32,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub time: NaiveTime,
    pub content: String,
    pub calories: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MentalNoteResponse {
    pub recorded_at: NaiveDateTime,
    pub stress_level: i32,
    pub motivation_level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&DailyLog> for DailyLogResponse {
    fn from(log: &DailyLog) -> Self {
        Self {
            user_id: log.user_id(),
            log_date: log.log_date(),
            sleep_hours: log.sleep_hours(),
            mood_level: log.mood_level(),
            body_metrics: log
                .body_metrics()
                .iter()
                .map(|m| BodyMetricsResponse {
                    weight: m.weight().value(),
                    body_fat_percentage: m.body_fat_percentage().value(),
                    muscle_mass: m.muscle_mass().value(),
                    measured_at: m.measured_at().value(),
                })
                .collect(),
            activities: log
                .activities()
                .iter()
                .map(|a| ActivityResponse {
                    activity_type: a.activity_type().to_string(),
                    started_at: a.started_at().value(),
                    duration_in_minutes: a.duration_in_minutes(),
                    distance_km: a.distance_km(),
                    steps: a.steps().value(),
                    calories_burned: a.calories_burned().value(),
                })
                .collect(),
            meals: log
                .meals()
                .iter()
                .map(|m| MealResponse {
                    time: m.time(),
                    content: m.content().to_string(),
                    calories: m.calories(),
                    photo_url: m.photo_url().map(String::from),
                })
                .collect(),
            mental_notes: log
                .mental_notes()
                .iter()
                .map(|n| MentalNoteResponse {
                    recorded_at: n.recorded_at(),
                    stress_level: n.stress_level(),
                    motivation_level: n.motivation_level(),
                    note: n.note().map(String::from),
                })
                .collect(),
        }
    }
}

impl From<&DailyLog> for DailyLogSummaryResponse {
    fn from(log: &DailyLog) -> Self {
        Self {
            log_date: log.log_date(),
            sleep_hours: log.sleep_hours(),
            mood_level: log.mood_level(),
        }
    }
}
