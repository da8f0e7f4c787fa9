use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

use super::activity::Activity;
use super::body_metrics::BodyMetrics;
use super::meal::Meal;
use super::mental_note::MentalNote;
use super::validation::{check_f64, check_i32, ValidationError};

pub type UserId = i64;

pub const SLEEP_HOURS_MAX: f64 = 24.0;
pub const MOOD_MIN: i32 = 1;
pub const MOOD_MAX: i32 = 10;

/// Identity of a daily log: one per user per calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DailyLogKey {
    pub user_id: UserId,
    pub log_date: NaiveDate,
}

impl DailyLogKey {
    pub fn new(user_id: UserId, log_date: NaiveDate) -> Self {
        Self { user_id, log_date }
    }
}

impl fmt::Display for DailyLogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.log_date)
    }
}

/// Aggregate root for everything recorded about one user on one day.
///
/// Immutable once built. An update replaces the whole aggregate; child
/// records have no identity outside their parent log.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLog {
    key: DailyLogKey,
    sleep_hours: f64,
    mood_level: i32,
    body_metrics: Vec<BodyMetrics>,
    activities: Vec<Activity>,
    meals: Vec<Meal>,
    mental_notes: Vec<MentalNote>,
}

impl DailyLog {
    #[allow(clippy::too_many_arguments)]
    pub fn of(
        user_id: UserId,
        log_date: NaiveDate,
        sleep_hours: f64,
        mood_level: i32,
        body_metrics: Vec<BodyMetrics>,
        activities: Vec<Activity>,
        meals: Vec<Meal>,
        mental_notes: Vec<MentalNote>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            key: DailyLogKey::new(user_id, log_date),
            sleep_hours: check_f64("sleep_hours", sleep_hours, 0.0, SLEEP_HOURS_MAX)?,
            mood_level: check_i32("mood_level", mood_level, MOOD_MIN, MOOD_MAX)?,
            body_metrics,
            activities,
            meals,
            mental_notes,
        })
    }

    /// Header-only log: date, sleep and mood with every child list empty.
    pub fn summary_of(
        user_id: UserId,
        log_date: NaiveDate,
        sleep_hours: f64,
        mood_level: i32,
    ) -> Result<Self, ValidationError> {
        Self::of(
            user_id,
            log_date,
            sleep_hours,
            mood_level,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    /// Copy of the header with the child lists dropped.
    pub fn to_summary(&self) -> Self {
        Self {
            key: self.key,
            sleep_hours: self.sleep_hours,
            mood_level: self.mood_level,
            body_metrics: Vec::new(),
            activities: Vec::new(),
            meals: Vec::new(),
            mental_notes: Vec::new(),
        }
    }

    pub fn key(&self) -> DailyLogKey {
        self.key
    }

    pub fn user_id(&self) -> UserId {
        self.key.user_id
    }

    pub fn log_date(&self) -> NaiveDate {
        self.key.log_date
    }

    pub fn sleep_hours(&self) -> f64 {
        self.sleep_hours
    }

    pub fn mood_level(&self) -> i32 {
        self.mood_level
    }

    pub fn body_metrics(&self) -> &[BodyMetrics] {
        &self.body_metrics
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn mental_notes(&self) -> &[MentalNote] {
        &self.mental_notes
    }
}

/// A calendar month, used to select a user's logs in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self).ok_or_else(|| {
            ValidationError::new("year_month", format!("{year}-{month:02} is not a valid month"))
        })
    }

    pub fn of_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || ValidationError::new("year_month", format!("'{s}' is not in YYYY-MM form"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(year, 4) || !digits(month, 2) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_of_with_empty_children() {
        let log = DailyLog::of(1, june_first(), 7.5, 4, vec![], vec![], vec![], vec![]).unwrap();
        assert_eq!(log.user_id(), 1);
        assert_eq!(log.log_date(), june_first());
        assert_eq!(log.sleep_hours(), 7.5);
        assert_eq!(log.mood_level(), 4);
        assert!(log.body_metrics().is_empty());
        assert!(log.activities().is_empty());
        assert!(log.meals().is_empty());
        assert!(log.mental_notes().is_empty());
    }

    #[test]
    fn test_sleep_hours_out_of_range() {
        let err = DailyLog::of(1, june_first(), 25.0, 4, vec![], vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err.field, "sleep_hours");
        assert!(DailyLog::summary_of(1, june_first(), -0.5, 4).is_err());
        assert!(DailyLog::summary_of(1, june_first(), f64::NAN, 4).is_err());
        assert!(DailyLog::summary_of(1, june_first(), 24.0, 4).is_ok());
        assert!(DailyLog::summary_of(1, june_first(), 0.0, 4).is_ok());
    }

    #[test]
    fn test_mood_level_out_of_range() {
        assert_eq!(DailyLog::summary_of(1, june_first(), 8.0, 0).unwrap_err().field, "mood_level");
        assert!(DailyLog::summary_of(1, june_first(), 8.0, 11).is_err());
        assert!(DailyLog::summary_of(1, june_first(), 8.0, 1).is_ok());
        assert!(DailyLog::summary_of(1, june_first(), 8.0, 10).is_ok());
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let lunch = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let breakfast = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        let meals = vec![
            Meal::of(lunch, "soba", 500, None).unwrap(),
            Meal::of(breakfast, "toast", 300, None).unwrap(),
        ];
        let log = DailyLog::of(1, june_first(), 7.0, 5, vec![], vec![], meals, vec![]).unwrap();
        let contents: Vec<_> = log.meals().iter().map(|m| m.content()).collect();
        assert_eq!(contents, ["soba", "toast"]);
    }

    #[test]
    fn test_to_summary_drops_children() {
        let meal = Meal::of(NaiveTime::from_hms_opt(8, 0, 0).unwrap(), "eggs", 200, None).unwrap();
        let log = DailyLog::of(3, june_first(), 6.0, 7, vec![], vec![], vec![meal], vec![]).unwrap();
        let summary = log.to_summary();
        assert_eq!(summary.key(), log.key());
        assert_eq!(summary.sleep_hours(), 6.0);
        assert_eq!(summary.mood_level(), 7);
        assert!(summary.meals().is_empty());
    }

    #[test]
    fn test_year_month_parse_and_bounds() {
        let ym: YearMonth = "2024-02".parse().unwrap();
        assert_eq!(ym.year(), 2024);
        assert_eq!(ym.month(), 2);
        assert_eq!(ym.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(ym.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(ym.to_string(), "2024-02");

        let december = YearMonth::new(2023, 12).unwrap();
        assert_eq!(december.last_day(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_year_month_rejects_garbage() {
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-00".parse::<YearMonth>().is_err());
        assert!("2024-6".parse::<YearMonth>().is_err());
        assert!("june".parse::<YearMonth>().is_err());
        assert!("2024-06-01".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_requires_plain_digits() {
        assert!("+2024-06".parse::<YearMonth>().is_err());
        assert!("-2024-06".parse::<YearMonth>().is_err());
        assert!("2024-+6".parse::<YearMonth>().is_err());
        assert!(" 2024-06".parse::<YearMonth>().is_err());
        assert!("24-06".parse::<YearMonth>().is_err());
        assert_eq!("0999-01".parse::<YearMonth>().unwrap().year(), 999);
    }

    #[test]
    fn test_year_month_of_date() {
        let ym = YearMonth::of_date(NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
        assert_eq!(ym, YearMonth::new(2024, 6).unwrap());
    }
}
