//! Environment variable accessors and value parsing.
//!
//! Blank values are treated the same as unset ones, so a `.env` line like
//! `SCALE_URL=` disables the setting instead of producing an empty string.

use std::str::FromStr;

use crate::config::ConfigError;

/// Reads an environment variable, trimmed, or `None` when it is unset or blank.
pub fn get_optional_env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses `raw`, the value of the setting `name`.
///
/// A value that fails to parse becomes [`ConfigError::InvalidValue`] naming
/// the setting, so the message points at the variable or file key to fix.
pub fn parse_value<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid(name, raw, e.to_string()))
}

/// Parses a boolean switch. Accepts `1/0`, `true/false`, `yes/no` and
/// `on/off` in any case.
pub fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(name, raw, "expected true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn blank_var_counts_as_missing() {
        // SAFETY: env mutation is serialized with `#[serial]`.
        unsafe { std::env::set_var("SHARED_UTILS_TEST_BLANK", "   ") };
        assert!(get_optional_env_var("SHARED_UTILS_TEST_BLANK").is_none());

        unsafe { std::env::set_var("SHARED_UTILS_TEST_BLANK", " value ") };
        assert_eq!(
            get_optional_env_var("SHARED_UTILS_TEST_BLANK").as_deref(),
            Some("value")
        );
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_BLANK") };
    }

    #[test]
    fn parse_reports_bad_values_by_name() {
        let err = parse_value::<u32>("SHARED_UTILS_TEST_NUM", "twelve").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref name, ref value, .. }
                if name == "SHARED_UTILS_TEST_NUM" && value == "twelve"
        ));
        assert_eq!(parse_value::<u32>("SHARED_UTILS_TEST_NUM", " 12 ").unwrap(), 12);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("X", "Yes").unwrap());
        assert!(parse_flag("X", "on").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(!parse_flag("X", " FALSE ").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }
}
