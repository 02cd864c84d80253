//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::game::scoring::SESSION_SECONDS;

/// Longest accepted name or department, in characters.
pub const MAX_TEXT_LEN: usize = 100;

/// Validates a free-text profile field: non-blank once trimmed and reasonably short.
pub fn validate_profile_text(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }

    let len = trimmed.chars().count();
    if len > MAX_TEXT_LEN {
        let mut err = ValidationError::new("too_long");
        err.message =
            Some(format!("must be at most {MAX_TEXT_LEN} characters (got {len})").into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a completion time fits inside the session.
pub fn validate_time_taken(seconds: i64) -> Result<(), ValidationError> {
    if !(0..=i64::from(SESSION_SECONDS)).contains(&seconds) {
        let mut err = ValidationError::new("time_taken_range");
        err.message = Some(
            format!("timeTaken must be between 0 and {SESSION_SECONDS} seconds (got {seconds})")
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_profile_text() {
        assert!(validate_profile_text("Ada").is_ok());
        assert!(validate_profile_text("  Ada  ").is_ok());
        assert!(validate_profile_text("").is_err());
        assert!(validate_profile_text("   ").is_err());
        assert!(validate_profile_text(&"x".repeat(MAX_TEXT_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_time_taken_bounds() {
        assert!(validate_time_taken(0).is_ok());
        assert!(validate_time_taken(600).is_ok());
        assert!(validate_time_taken(-1).is_err());
        assert!(validate_time_taken(601).is_err());
    }
}
