//! Playground configuration
//!
//! Loaded from environment variables with defaults suitable for local play.

use crate::ConfigError;
use std::time::Duration;

// ============================================================================
// PLAYGROUND CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PlaygroundConfig {
    /// Upper bound for a single auto-brainstorm batch.
    pub max_brainstorm_count: usize,

    /// Whether an agent may vote on an idea it authored.
    pub allow_self_vote: bool,

    /// Budget for one text capability call before falling back to the heuristic.
    pub capability_timeout: Duration,

    /// Number of feed events retained. Older events are dropped.
    pub feed_capacity: usize,

    pub max_tags: usize,

    /// Free text is truncated to this many characters.
    pub max_text_len: usize,

    pub leaderboard_max_limit: usize,
    pub default_leaderboard_limit: usize,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            max_brainstorm_count: 3,
            allow_self_vote: true,
            capability_timeout: Duration::from_secs(5),
            feed_capacity: 500,
            max_tags: 8,
            max_text_len: 2000,
            leaderboard_max_limit: 50,
            default_leaderboard_limit: 20,
        }
    }
}

impl PlaygroundConfig {
    /// Create PlaygroundConfig from environment variables.
    ///
    /// Environment variables:
    /// - `ROAST_MAX_BRAINSTORM_COUNT` (default: 3)
    /// - `ROAST_ALLOW_SELF_VOTE`: "true" or "false" (default: true)
    /// - `ROAST_CAPABILITY_TIMEOUT_MS` (default: 5000)
    /// - `ROAST_FEED_CAPACITY` (default: 500)
    /// - `ROAST_MAX_TAGS` (default: 8)
    /// - `ROAST_MAX_TEXT_LEN` (default: 2000)
    /// - `ROAST_LEADERBOARD_MAX_LIMIT` (default: 50)
    /// - `ROAST_LEADERBOARD_DEFAULT_LIMIT` (default: 20)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let allow_self_vote = std::env::var("ROAST_ALLOW_SELF_VOTE")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(defaults.allow_self_vote);

        let capability_timeout = std::env::var("ROAST_CAPABILITY_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.capability_timeout);

        Self {
            max_brainstorm_count: env_usize("ROAST_MAX_BRAINSTORM_COUNT")
                .unwrap_or(defaults.max_brainstorm_count),
            allow_self_vote,
            capability_timeout,
            feed_capacity: env_usize("ROAST_FEED_CAPACITY").unwrap_or(defaults.feed_capacity),
            max_tags: env_usize("ROAST_MAX_TAGS").unwrap_or(defaults.max_tags),
            max_text_len: env_usize("ROAST_MAX_TEXT_LEN").unwrap_or(defaults.max_text_len),
            leaderboard_max_limit: env_usize("ROAST_LEADERBOARD_MAX_LIMIT")
                .unwrap_or(defaults.leaderboard_max_limit),
            default_leaderboard_limit: env_usize("ROAST_LEADERBOARD_DEFAULT_LIMIT")
                .unwrap_or(defaults.default_leaderboard_limit),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("max_brainstorm_count", self.max_brainstorm_count),
            ("feed_capacity", self.feed_capacity),
            ("max_tags", self.max_tags),
            ("max_text_len", self.max_text_len),
            ("leaderboard_max_limit", self.leaderboard_max_limit),
            ("default_leaderboard_limit", self.default_leaderboard_limit),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if self.capability_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "capability_timeout".to_string(),
                value: format!("{:?}", self.capability_timeout),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.default_leaderboard_limit > self.leaderboard_max_limit {
            return Err(ConfigError::InvalidValue {
                field: "default_leaderboard_limit".to_string(),
                value: self.default_leaderboard_limit.to_string(),
                reason: format!("exceeds leaderboard_max_limit ({})", self.leaderboard_max_limit),
            });
        }

        Ok(())
    }

    /// Resolve a caller-supplied leaderboard/list limit. Zero means zero.
    pub fn clamp_limit(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.default_leaderboard_limit)
            .min(self.leaderboard_max_limit)
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvVarGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let original = std::env::var(key).ok();
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
            Self { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.original.as_deref() {
                Some(v) => std::env::set_var(self.key, v),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.max_brainstorm_count, 3);
        assert!(config.allow_self_vote);
        assert_eq!(config.capability_timeout, Duration::from_secs(5));
        assert_eq!(config.feed_capacity, 500);
        assert_eq!(config.max_text_len, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_overlays_defaults() {
        let _count = EnvVarGuard::set("ROAST_MAX_BRAINSTORM_COUNT", Some("5"));
        let _vote = EnvVarGuard::set("ROAST_ALLOW_SELF_VOTE", Some("FALSE"));
        let _timeout = EnvVarGuard::set("ROAST_CAPABILITY_TIMEOUT_MS", Some("250"));
        let _garbage = EnvVarGuard::set("ROAST_MAX_TAGS", Some("lots"));

        let config = PlaygroundConfig::from_env();
        assert_eq!(config.max_brainstorm_count, 5);
        assert!(!config.allow_self_vote);
        assert_eq!(config.capability_timeout, Duration::from_millis(250));
        assert_eq!(config.max_tags, 8);
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = PlaygroundConfig {
            max_brainstorm_count: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_brainstorm_count"));

        let config = PlaygroundConfig {
            capability_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_limit() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.clamp_limit(None), 20);
        assert_eq!(config.clamp_limit(Some(0)), 0);
        assert_eq!(config.clamp_limit(Some(500)), 50);
        assert_eq!(config.clamp_limit(Some(7)), 7);
    }
}
