//! Input validation for user-supplied fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Number outside its allowed range.
    OutOfRange { field: String, min: i64, max: i64, actual: i64 },
    /// Malformed date or period.
    InvalidFormat { field: String, expected: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::OutOfRange { field, min, max, actual } => {
                write!(f, "{} must be between {} and {} (got {})", field, min, max, actual)
            }
            ValidationError::InvalidFormat { field, expected } => {
                write!(f, "{} must have the format {}", field, expected)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for diary content and chat text.
pub const MAX_CONTENT_LENGTH: usize = 20_000;

/// Maximum allowed length for titles, names and short labels.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum allowed length for feedback comments.
pub const MAX_COMMENT_LENGTH: usize = 2_000;

/// Require non-blank text no longer than `max` characters.
pub fn validate_required(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    validate_length(field, value, max)
}

/// Limit text to `max` characters.
pub fn validate_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

/// Validate a feedback score (1 to 5).
pub fn validate_score(score: i64) -> Result<(), ValidationError> {
    if !(1..=5).contains(&score) {
        return Err(ValidationError::OutOfRange {
            field: "puntuacion".to_string(),
            min: 1,
            max: 5,
            actual: score,
        });
    }
    Ok(())
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a calendar date shaped `YYYY-MM-DD`.
pub fn validate_date(field: &str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        expected: "YYYY-MM-DD",
    };

    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(invalid());
    }
    if !all_digits(year) || !all_digits(month) || !all_digits(day) {
        return Err(invalid());
    }

    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }

    Ok(())
}

/// Validate a metric period shaped `YYYY-Www`.
pub fn validate_period(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidFormat {
        field: "periodo".to_string(),
        expected: "YYYY-Www",
    };

    let (year, week) = value.split_once("-W").ok_or_else(invalid)?;
    if year.len() != 4 || week.len() != 2 || !all_digits(year) || !all_digits(week) {
        return Err(invalid());
    }
    let week: u32 = week.parse().map_err(|_| invalid())?;
    if week > 53 {
        return Err(invalid());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("contenido", "Hoy fue un buen día", MAX_CONTENT_LENGTH).is_ok());

        assert!(matches!(
            validate_required("contenido", "   ", MAX_CONTENT_LENGTH),
            Err(ValidationError::Empty(_))
        ));

        let long = "a".repeat(MAX_TITLE_LENGTH + 1);
        assert!(matches!(
            validate_required("titulo", &long, MAX_TITLE_LENGTH),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_length_counts_chars() {
        // Accented characters count once each.
        let text = "á".repeat(MAX_TITLE_LENGTH);
        assert!(validate_length("titulo", &text, MAX_TITLE_LENGTH).is_ok());
    }

    #[test]
    fn test_validate_score() {
        for score in 1..=5 {
            assert!(validate_score(score).is_ok());
        }
        assert!(matches!(
            validate_score(0),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_score(6).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("fecha", "2026-10-19").is_ok());
        assert!(validate_date("fecha", "2026-1-19").is_err());
        assert!(validate_date("fecha", "2026-13-01").is_err());
        assert!(validate_date("fecha", "19/10/2026").is_err());
        assert!(validate_date("fecha", "").is_err());
    }

    #[test]
    fn test_validate_period() {
        assert!(validate_period("2026-W42").is_ok());
        assert!(validate_period("2026-W00").is_ok());
        assert!(validate_period("2026-W54").is_err());
        assert!(validate_period("2026-42").is_err());
        assert!(validate_period("26-W42").is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::Empty("contenido".to_string());
        assert_eq!(err.to_string(), "contenido cannot be empty");

        let err = ValidationError::TooLong {
            field: "titulo".to_string(),
            max: 200,
            actual: 300,
        };
        assert_eq!(err.to_string(), "titulo is too long (300 chars, max 200)");

        let err = ValidationError::OutOfRange {
            field: "puntuacion".to_string(),
            min: 1,
            max: 5,
            actual: 9,
        };
        assert_eq!(err.to_string(), "puntuacion must be between 1 and 5 (got 9)");
    }
}
