use crate::error::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;

pub static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9\-_.]{1,150}$").unwrap());

pub static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());

pub static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// Path segment reserved for the current-user profile endpoint.
pub const RESERVED_USERNAME: &str = "me";

pub fn validate_username(username: &str) -> AppResult<()> {
    if username == RESERVED_USERNAME {
        return Err(AppError::Validation(format!(
            "Username \"{}\" is not allowed",
            RESERVED_USERNAME
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::Validation(format!(
            "Username contains invalid characters <{}>",
            username
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("chef").is_ok());
        assert!(validate_username("chef.master_1-a").is_ok());
        assert!(validate_username("me").is_err());
        assert!(validate_username("1chef").is_err());
        assert!(validate_username("c").is_err());
        assert!(validate_username("chef master").is_err());
    }

    #[test]
    fn test_color_pattern() {
        assert!(COLOR_RE.is_match("#E26C2D"));
        assert!(COLOR_RE.is_match("#fff"));
        assert!(!COLOR_RE.is_match("E26C2D"));
        assert!(!COLOR_RE.is_match("#GGGGGG"));
        assert!(!COLOR_RE.is_match("#12345"));
    }

    #[test]
    fn test_slug_pattern() {
        assert!(SLUG_RE.is_match("breakfast"));
        assert!(SLUG_RE.is_match("late_night-snack2"));
        assert!(!SLUG_RE.is_match("завтрак"));
        assert!(!SLUG_RE.is_match("two words"));
        assert!(!SLUG_RE.is_match(""));
    }
}
