use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
const API_KEY_PLACEHOLDER: &str = "YOUR_PUBG_API_KEY_HERE";
const ADMIN_SECRET_PLACEHOLDER: &str = "change-me-admin-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Created default config at {0}; fill in the API key and webhook URL, then restart")]
    CreatedDefault(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {setting}: {reason}")]
    Invalid {
        setting: &'static str,
        reason: String,
    },
}

/// Operational configuration, loaded from a JSON file with env overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base_url: String,
    /// Platform shard used for every tracked player
    pub platform: String,
    pub match_webhook_url: String,
    /// Destination for weekly summaries; falls back to the match webhook
    pub weekly_webhook_url: Option<String>,
    pub check_interval_seconds: u64,
    /// Pause between consecutive stats API requests
    pub request_delay_seconds: f64,
    pub max_retries: u32,
    /// Pause between consecutive published messages
    pub post_delay_seconds: f64,
    pub posted_retention: usize,
    pub history_retention: usize,
    pub data_dir: PathBuf,
    pub bind_address: String,
    pub admin_jwt_secret: String,
    pub weekly_report: WeeklyReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeeklyReportConfig {
    pub weekday: Weekday,
    pub hour_utc: u32,
    pub lookback_days: i64,
    pub leaderboard_size: usize,
}

impl Default for WeeklyReportConfig {
    fn default() -> Self {
        Self {
            weekday: Weekday::Wed,
            hour_utc: 18,
            lookback_days: 7,
            leaderboard_size: 5,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            api_base_url: "https://api.pubg.com/shards".to_string(),
            platform: "steam".to_string(),
            match_webhook_url: String::new(),
            weekly_webhook_url: None,
            check_interval_seconds: 150,
            request_delay_seconds: 7.0,
            max_retries: 3,
            post_delay_seconds: 2.0,
            posted_retention: 200,
            history_retention: 1000,
            data_dir: PathBuf::from("."),
            bind_address: "0.0.0.0:3000".to_string(),
            admin_jwt_secret: ADMIN_SECRET_PLACEHOLDER.to_string(),
            weekly_report: WeeklyReportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path`, writing a default file if none exists.
    ///
    /// Environment variables `PUBG_API_KEY`, `MATCH_WEBHOOK_URL` and
    /// `ADMIN_JWT_SECRET` override the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Config file not found, creating default");
                Self::write_default(path)?;
                return Err(ConfigError::CreatedDefault(path.display().to_string()));
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let mut config: AppConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.apply_env_overrides();
        config.validate()?;

        info!(
            path = %path.display(),
            platform = %config.platform,
            check_interval_secs = config.check_interval_seconds,
            request_delay_secs = config.request_delay_seconds,
            max_retries = config.max_retries,
            "Configuration loaded"
        );

        Ok(config)
    }

    fn write_default(path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&AppConfig::default()).map_err(|source| {
            ConfigError::Parse {
                path: path.display().to_string(),
                source,
            }
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("PUBG_API_KEY") {
            self.api_key = api_key;
        }
        if let Ok(url) = std::env::var("MATCH_WEBHOOK_URL") {
            self.match_webhook_url = url;
        }
        if let Ok(secret) = std::env::var("ADMIN_JWT_SECRET") {
            self.admin_jwt_secret = secret;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() || self.api_key == API_KEY_PLACEHOLDER {
            return Err(ConfigError::Missing("api_key"));
        }
        if self.match_webhook_url.trim().is_empty() {
            return Err(ConfigError::Missing("match_webhook_url"));
        }
        if self.admin_jwt_secret.trim().is_empty()
            || self.admin_jwt_secret == ADMIN_SECRET_PLACEHOLDER
        {
            return Err(ConfigError::Missing("admin_jwt_secret"));
        }

        validate_delay("request_delay_seconds", self.request_delay_seconds)?;
        validate_delay("post_delay_seconds", self.post_delay_seconds)?;

        if self.weekly_report.hour_utc > 23 {
            return Err(ConfigError::Invalid {
                setting: "weekly_report.hour_utc",
                reason: format!("{} is not an hour of the day (0-23)", self.weekly_report.hour_utc),
            });
        }
        if self.weekly_report.lookback_days < 1 {
            return Err(ConfigError::Invalid {
                setting: "weekly_report.lookback_days",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay_seconds).unwrap_or_default()
    }

    pub fn post_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.post_delay_seconds).unwrap_or_default()
    }

    pub fn weekly_webhook_url(&self) -> &str {
        self.weekly_webhook_url
            .as_deref()
            .unwrap_or(&self.match_webhook_url)
    }

    pub fn roster_path(&self) -> PathBuf {
        self.data_dir.join("players.txt")
    }

    pub fn posted_matches_path(&self) -> PathBuf {
        self.data_dir.join("posted_matches.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("match_history.json")
    }
}

fn validate_delay(setting: &'static str, seconds: f64) -> Result<(), ConfigError> {
    Duration::try_from_secs_f64(seconds)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid {
            setting,
            reason: format!("{seconds} is not a usable number of seconds ({e})"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn valid() -> AppConfig {
        AppConfig {
            api_key: "key-123".to_string(),
            match_webhook_url: "http://hook".to_string(),
            admin_jwt_secret: "a-long-private-secret".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_key": "key-123", "match_webhook_url": "http://hook", "admin_jwt_secret": "s3cret-value", "max_retries": 5}"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.check_interval_seconds, 150);
        assert_eq!(config.platform, "steam");
        assert_eq!(config.weekly_report.weekday, Weekday::Wed);
        assert_eq!(config.weekly_webhook_url(), "http://hook");
    }

    #[test]
    fn test_missing_file_writes_default_and_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let result = AppConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::CreatedDefault(_))));
        assert!(path.exists());
    }

    #[test]
    fn test_placeholder_api_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_key": "YOUR_PUBG_API_KEY_HERE", "match_webhook_url": "http://hook"}"#,
        )
        .unwrap();

        // Env override must not be set for this test to be meaningful
        if std::env::var("PUBG_API_KEY").is_err() {
            assert!(matches!(
                AppConfig::load(&path),
                Err(ConfigError::Missing("api_key"))
            ));
        }
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(valid().validate().is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(ADMIN_SECRET_PLACEHOLDER)]
    fn test_default_or_empty_admin_secret_is_rejected(#[case] secret: &str) {
        let config = AppConfig {
            admin_jwt_secret: secret.to_string(),
            ..valid()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("admin_jwt_secret"))
        ));
    }

    #[test]
    fn test_shipped_default_admin_secret_fails_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_key": "key-123", "match_webhook_url": "http://hook"}"#,
        )
        .unwrap();

        if std::env::var("ADMIN_JWT_SECRET").is_err() {
            assert!(matches!(
                AppConfig::load(&path),
                Err(ConfigError::Missing("admin_jwt_secret"))
            ));
        }
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(1e300)]
    fn test_unusable_delays_are_rejected(#[case] seconds: f64) {
        let request = AppConfig {
            request_delay_seconds: seconds,
            ..valid()
        };
        let post = AppConfig {
            post_delay_seconds: seconds,
            ..valid()
        };

        assert!(matches!(
            request.validate(),
            Err(ConfigError::Invalid { setting: "request_delay_seconds", .. })
        ));
        assert!(matches!(
            post.validate(),
            Err(ConfigError::Invalid { setting: "post_delay_seconds", .. })
        ));
        assert_eq!(request.request_delay(), Duration::ZERO);
    }

    #[test]
    fn test_fractional_delay_is_kept() {
        let config = AppConfig {
            request_delay_seconds: 0.25,
            ..valid()
        };

        assert!(config.validate().is_ok());
        assert_eq!(config.request_delay(), Duration::from_millis(250));
    }

    #[rstest]
    #[case(23, true)]
    #[case(24, false)]
    #[case(99, false)]
    fn test_report_hour_must_be_in_day(#[case] hour_utc: u32, #[case] accepted: bool) {
        let config = AppConfig {
            weekly_report: WeeklyReportConfig {
                hour_utc,
                ..WeeklyReportConfig::default()
            },
            ..valid()
        };

        assert_eq!(config.validate().is_ok(), accepted);
    }

    #[test]
    fn test_derived_paths_live_under_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/var/lib/matchwatch"),
            ..AppConfig::default()
        };

        assert_eq!(
            config.history_path(),
            PathBuf::from("/var/lib/matchwatch/match_history.json")
        );
        assert_eq!(
            config.roster_path(),
            PathBuf::from("/var/lib/matchwatch/players.txt")
        );
    }
}
