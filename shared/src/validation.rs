use validator::ValidationError;

pub const MIN_POOL_SIZE: u32 = 1;
pub const MAX_POOL_SIZE: u32 = 999;
pub const MAX_WEIGHT: u32 = 999;
pub const MAX_SECONDS: u32 = 999;

/// Clamps a raw form number into `0..=max`.
pub fn clamp_form_number(value: i64, max: u32) -> u32 {
    value.clamp(0, i64::from(max)) as u32
}

/// Splits a newline separated roster, trimming names and dropping blank lines.
pub fn parse_roster(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::new("empty_label"));
    }
    Ok(())
}

/// Labels are the lookup key for wheel items, so they must not collide.
pub fn validate_unique_label<'a, I>(label: &str, existing: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    validate_label(label)?;
    if existing.into_iter().any(|other| other == label) {
        return Err(ValidationError::new("duplicate_label"));
    }
    Ok(())
}

pub fn validate_pool_size(size: u32) -> Result<(), ValidationError> {
    if !(MIN_POOL_SIZE..=MAX_POOL_SIZE).contains(&size) {
        return Err(ValidationError::new("invalid_pool_size"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_form_number() {
        assert_eq!(clamp_form_number(-4, MAX_WEIGHT), 0);
        assert_eq!(clamp_form_number(0, MAX_WEIGHT), 0);
        assert_eq!(clamp_form_number(12, MAX_WEIGHT), 12);
        assert_eq!(clamp_form_number(999, MAX_WEIGHT), 999);
        assert_eq!(clamp_form_number(1000, MAX_WEIGHT), 999);
        assert_eq!(clamp_form_number(i64::MAX, MAX_SECONDS), 999);
        assert_eq!(clamp_form_number(i64::MIN, MAX_SECONDS), 0);
    }

    #[test]
    fn test_parse_roster() {
        let names = parse_roster("  MARK \n\n เขต\n   \nตอง");
        assert_eq!(names, vec!["MARK", "เขต", "ตอง"]);
    }

    #[test]
    fn test_validate_unique_label() {
        let existing = ["a", "b"];
        assert!(validate_unique_label("c", existing.iter().copied()).is_ok());
        let err = validate_unique_label("a", existing.iter().copied()).unwrap_err();
        assert_eq!(err.code, "duplicate_label");
        let err = validate_unique_label("   ", existing.iter().copied()).unwrap_err();
        assert_eq!(err.code, "empty_label");
    }

    #[test]
    fn test_validate_pool_size() {
        assert!(validate_pool_size(1).is_ok());
        assert!(validate_pool_size(999).is_ok());
        assert!(validate_pool_size(0).is_err());
        assert!(validate_pool_size(1000).is_err());
    }
}
