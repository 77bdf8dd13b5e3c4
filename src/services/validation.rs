use crate::error::{AppError, AppResult};

/// Upper bound for any single unit count a client submits.
pub const MAX_UNITS: i64 = 100_000;

/// Unit count in `min..=MAX_UNITS`.
pub fn units_in_range(value: i64, min: i64, field: &str) -> AppResult<i64> {
    if value < min || value > MAX_UNITS {
        return Err(AppError::validation(format!(
            "{} must be between {} and {}",
            field, min, MAX_UNITS
        )));
    }
    Ok(value)
}

/// Trimmed value, or `None` for missing/blank input.
pub fn optional_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

pub fn required_text<'a>(value: &'a str, message: &str) -> AppResult<&'a str> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(v)
}

// Shape check only: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    let v = value.trim();
    if v.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = v.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_counts_are_bounded_on_both_sides() {
        assert_eq!(units_in_range(0, 0, "units").unwrap(), 0);
        assert_eq!(units_in_range(MAX_UNITS, 1, "units").unwrap(), MAX_UNITS);
        assert!(units_in_range(0, 1, "units").is_err());
        assert!(units_in_range(MAX_UNITS + 1, 0, "units").is_err());
        assert!(units_in_range(i64::MAX, 1, "units").is_err());
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(optional_text(Some("   ")), None);
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some(" Riverside ")), Some("Riverside"));
    }

    #[test]
    fn required_text_rejects_blank() {
        assert!(required_text("  ", "name is required").is_err());
        assert_eq!(required_text(" St. Mary ", "x").unwrap(), "St. Mary");
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("bank@hospital.org"));
        assert!(!is_valid_email("bank@hospital"));
        assert!(!is_valid_email("@hospital.org"));
        assert!(!is_valid_email("a b@hospital.org"));
        assert!(!is_valid_email("a@b@c.org"));
    }
}
