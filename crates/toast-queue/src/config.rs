//! Queue configuration: visible bound and default display duration.

use std::time::Duration;

use crate::{Result, ToastError};

pub const MAX_VISIBLE_KEY: &str = "TOAST_MAX_VISIBLE";
pub const DEFAULT_DURATION_KEY: &str = "TOAST_DEFAULT_DURATION_MS";

const DEFAULT_MAX_VISIBLE: usize = 4;
const DEFAULT_DURATION_MS: u64 = 5000;
const MIN_DURATION: Duration = Duration::from_millis(1);

/// Runtime configuration for a [`ToastManager`](crate::ToastManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastConfig {
    /// Upper bound on simultaneously held (and therefore visible) toasts.
    pub max_visible: usize,
    /// Applied when a producer omits `duration_ms`.
    pub default_duration: Duration,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_visible: DEFAULT_MAX_VISIBLE,
            default_duration: Duration::from_millis(DEFAULT_DURATION_MS),
        }
    }
}

impl ToastConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup. Missing or empty keys keep
    /// their defaults; present values must pass [`validate_setting`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = non_empty(lookup(MAX_VISIBLE_KEY)) {
            check(MAX_VISIBLE_KEY, &v)?;
            config.max_visible = parse(MAX_VISIBLE_KEY, &v)?;
        }
        if let Some(v) = non_empty(lookup(DEFAULT_DURATION_KEY)) {
            check(DEFAULT_DURATION_KEY, &v)?;
            config.default_duration = Duration::from_millis(parse(DEFAULT_DURATION_KEY, &v)?);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    /// Set the fallback display duration, never shorter than 1ms.
    #[must_use]
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration.max(MIN_DURATION);
        self
    }
}

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> std::result::Result<(), String> {
    match key {
        MAX_VISIBLE_KEY => validate_int_range(value, 1, 32)?,
        DEFAULT_DURATION_KEY => validate_int_range(value, 1, 600_000)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> std::result::Result<(), String> {
    let v: i64 = value.trim().parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn check(key: &str, value: &str) -> Result<()> {
    validate_setting(key, value).map_err(|reason| ToastError::InvalidSetting {
        key: key.to_string(),
        reason,
    })
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ToastError::InvalidSetting {
        key: key.to_string(),
        reason: "must be an integer".into(),
    })
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ToastConfig::default();
        assert_eq!(config.max_visible, 4);
        assert_eq!(config.default_duration, Duration::from_millis(5000));
    }

    #[test]
    fn missing_and_empty_keys_keep_defaults() {
        let config = ToastConfig::from_lookup(lookup(&[(MAX_VISIBLE_KEY, " ")])).unwrap();
        assert_eq!(config, ToastConfig::default());
    }

    #[test]
    fn reads_both_settings() {
        let config = ToastConfig::from_lookup(lookup(&[
            (MAX_VISIBLE_KEY, "2"),
            (DEFAULT_DURATION_KEY, "1500"),
        ]))
        .unwrap();
        assert_eq!(config.max_visible, 2);
        assert_eq!(config.default_duration, Duration::from_millis(1500));
    }

    #[test]
    fn validate_setting_cases() {
        let cases = vec![
            (MAX_VISIBLE_KEY, "1", true),
            (MAX_VISIBLE_KEY, "32", true),
            (MAX_VISIBLE_KEY, "0", false),
            (MAX_VISIBLE_KEY, "33", false),
            (MAX_VISIBLE_KEY, "four", false),
            (DEFAULT_DURATION_KEY, "5000", true),
            (DEFAULT_DURATION_KEY, "0", false),
            (DEFAULT_DURATION_KEY, "-10", false),
            ("UNRELATED_KEY", "anything", true),
        ];

        for (key, value, ok) in cases {
            assert_eq!(
                validate_setting(key, value).is_ok(),
                ok,
                "{key}={value} should{} validate",
                if ok { "" } else { " not" }
            );
        }
    }

    #[test]
    fn invalid_value_reports_key() {
        let err = ToastConfig::from_lookup(lookup(&[(MAX_VISIBLE_KEY, "0")])).unwrap_err();
        match err {
            ToastError::InvalidSetting { key, reason } => {
                assert_eq!(key, MAX_VISIBLE_KEY);
                assert!(reason.contains("between 1 and 32"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn builder_never_allows_zero_bound() {
        assert_eq!(ToastConfig::default().with_max_visible(0).max_visible, 1);
    }

    #[test]
    fn builder_never_allows_zero_duration() {
        let config = ToastConfig::default().with_default_duration(Duration::ZERO);
        assert_eq!(config.default_duration, Duration::from_millis(1));

        let config = ToastConfig::default().with_default_duration(Duration::from_millis(250));
        assert_eq!(config.default_duration, Duration::from_millis(250));
    }
}
