//! Environment variable parsing utilities
//!
//! Small helpers for reading typed settings with defaults, so config loaders
//! never need `unwrap()`.

use std::str::FromStr;

/// Parse an environment variable with a default fallback
///
/// Missing and unparsable values both fall back to `default`.
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_with_default("PORT", 8000);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning None if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_default_when_missing() {
        std::env::remove_var("DB_POOL_TEST_MISSING");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_MISSING", 7u32), 7);
    }

    #[test]
    #[serial_test::serial]
    fn test_default_when_unparsable() {
        std::env::set_var("DB_POOL_TEST_GARBAGE", "seven");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_GARBAGE", 7u32), 7);
        std::env::remove_var("DB_POOL_TEST_GARBAGE");
    }

    #[test]
    #[serial_test::serial]
    fn test_value_is_trimmed() {
        std::env::set_var("DB_POOL_TEST_TRIM", " 42 ");
        assert_eq!(parse_env_optional::<u16>("DB_POOL_TEST_TRIM"), Some(42));
        std::env::remove_var("DB_POOL_TEST_TRIM");
    }
}
