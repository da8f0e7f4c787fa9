use std::fmt::Display;

/// Raised by every domain factory when an input violates its constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Inclusive bounds check for floating point inputs. NaN and infinities
/// never pass.
pub(crate) fn check_f64(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(out_of_range(field, min, max));
    }
    Ok(value)
}

pub(crate) fn check_i32(
    field: &'static str,
    value: i32,
    min: i32,
    max: i32,
) -> Result<i32, ValidationError> {
    if !(min..=max).contains(&value) {
        return Err(out_of_range(field, min, max));
    }
    Ok(value)
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    Ok(value)
}

pub(crate) fn require_text(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    Ok(value)
}

fn out_of_range<T: Display>(field: &'static str, min: T, max: T) -> ValidationError {
    ValidationError::new(field, format!("must be between {min} and {max}"))
}
