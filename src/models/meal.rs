use chrono::NaiveTime;

use super::validation::{check_i32, require_text, ValidationError};

pub const MEAL_CALORIES_MAX: i32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    time: NaiveTime,
    content: String,
    calories: i32,
    photo_url: Option<String>,
}

impl Meal {
    pub fn of(
        time: NaiveTime,
        content: impl Into<String>,
        calories: i32,
        photo_url: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            time,
            content: require_text("content", content.into())?,
            calories: check_i32("calories", calories, 0, MEAL_CALORIES_MAX)?,
            photo_url,
        })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn calories(&self) -> i32 {
        self.calories
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 15, 0).unwrap()
    }

    #[test]
    fn test_valid_meal() {
        let meal = Meal::of(noon(), "ramen", 850, Some("https://img.example/r.jpg".into())).unwrap();
        assert_eq!(meal.time(), noon());
        assert_eq!(meal.content(), "ramen");
        assert_eq!(meal.calories(), 850);
        assert_eq!(meal.photo_url(), Some("https://img.example/r.jpg"));
    }

    #[test]
    fn test_photo_is_optional() {
        let meal = Meal::of(noon(), "salad", 0, None).unwrap();
        assert_eq!(meal.photo_url(), None);
    }

    #[test]
    fn test_blank_content_rejected() {
        let err = Meal::of(noon(), "\t", 100, None).unwrap_err();
        assert_eq!(err.field, "content");
    }

    #[test]
    fn test_calorie_bounds() {
        assert!(Meal::of(noon(), "feast", 10_000, None).is_ok());
        assert!(Meal::of(noon(), "feast", 10_001, None).is_err());
        assert!(Meal::of(noon(), "feast", -5, None).is_err());
    }
}
