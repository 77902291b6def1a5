use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

pub const MAX_LABEL_LENGTH: usize = 40;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("empty_label"));
    }
    if trimmed.chars().count() > MAX_LABEL_LENGTH {
        return Err(ValidationError::new("label_too_long"));
    }
    Ok(())
}

/// Accepts calendar dates written as `YYYY-MM-DD`.
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    if !ISO_DATE.is_match(date) {
        return Err(ValidationError::new("invalid_date_format"));
    }
    if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(ValidationError::new("invalid_date"));
    }
    Ok(())
}

/// `YYYY-MM-DD` -> `DD/MM/YYYY`. Anything else is returned as is.
pub fn format_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{}/{}/{}", day, month, year),
        _ => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_label() {
        assert!(validate_label("Pizza").is_ok());
        assert!(validate_label("  Ramen  ").is_ok());
        assert!(validate_label("   ").is_err());
        assert!(validate_label(&"x".repeat(MAX_LABEL_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-02-29").is_ok());
        assert!(validate_date("2023-02-29").is_err());
        assert!(validate_date("29/02/2024").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-05-07"), "07/05/2024");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
