//! Form validation: the only checks the client makes before a request.
//! "Required text is non-empty" and "numeric text parses".

use crate::errors::{AppError, AppResult};

/// Trimmed value, or a validation error carrying `message`.
pub fn required(value: &str, message: &str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(v.to_string())
}

/// Blank → None, anything else trimmed.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn parse_int(value: &str, message: &str) -> AppResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation(message))
}

/// Blank → None; present but unparsable is an error.
pub fn parse_optional_int(value: Option<&str>, message: &str) -> AppResult<Option<i32>> {
    match optional_text(value) {
        None => Ok(None),
        Some(v) => v
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::validation(message)),
    }
}

/// Blank → 0.0.
pub fn parse_number_or_zero(value: Option<&str>, message: &str) -> AppResult<f64> {
    match optional_text(value) {
        None => Ok(0.0),
        Some(v) => match v.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(AppError::validation(message)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("  Ana  ", "Name is required").unwrap(), "Ana");
        let err = required("   ", "Name is required").unwrap_err();
        assert_eq!(err.to_string(), "Validation: Name is required");
    }

    #[test]
    fn numbers_parse_or_fail_loudly() {
        assert_eq!(parse_int(" 3 ", "bad").unwrap(), 3);
        assert!(parse_int("3.5", "bad").is_err());
        assert_eq!(parse_optional_int(Some(""), "bad").unwrap(), None);
        assert_eq!(parse_optional_int(Some("12"), "bad").unwrap(), Some(12));
        assert!(parse_optional_int(Some("twelve"), "bad").is_err());
        assert_eq!(parse_number_or_zero(None, "bad").unwrap(), 0.0);
        assert_eq!(parse_number_or_zero(Some("14500"), "bad").unwrap(), 14500.0);
        assert!(parse_number_or_zero(Some("NaN"), "bad").is_err());
    }
}
