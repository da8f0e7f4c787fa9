use chrono::NaiveDateTime;

use super::validation::{check_i32, ValidationError};

pub const LEVEL_MIN: i32 = 0;
pub const LEVEL_MAX: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentalNote {
    recorded_at: NaiveDateTime,
    stress_level: i32,
    motivation_level: i32,
    note: Option<String>,
}

impl MentalNote {
    pub fn of(
        recorded_at: NaiveDateTime,
        stress_level: i32,
        motivation_level: i32,
        note: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            recorded_at,
            stress_level: check_i32("stress_level", stress_level, LEVEL_MIN, LEVEL_MAX)?,
            motivation_level: check_i32(
                "motivation_level",
                motivation_level,
                LEVEL_MIN,
                LEVEL_MAX,
            )?,
            note,
        })
    }

    pub fn recorded_at(&self) -> NaiveDateTime {
        self.recorded_at
    }

    pub fn stress_level(&self) -> i32 {
        self.stress_level
    }

    pub fn motivation_level(&self) -> i32 {
        self.motivation_level
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn evening() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_valid_note() {
        let note = MentalNote::of(evening(), 3, 8, Some("good focus".into())).unwrap();
        assert_eq!(note.recorded_at(), evening());
        assert_eq!(note.stress_level(), 3);
        assert_eq!(note.motivation_level(), 8);
        assert_eq!(note.note(), Some("good focus"));
    }

    #[test]
    fn test_level_bounds() {
        assert!(MentalNote::of(evening(), 0, 10, None).is_ok());
        assert_eq!(
            MentalNote::of(evening(), 11, 5, None).unwrap_err().field,
            "stress_level"
        );
        assert_eq!(
            MentalNote::of(evening(), 5, -1, None).unwrap_err().field,
            "motivation_level"
        );
    }
}
