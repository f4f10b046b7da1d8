//! Environment-based application configuration.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Fallback signing secret for local development only.
const DEV_JWT_SECRET: &str = "palaver-dev-secret";

/// Default delay before the auto-responder answers.
const DEFAULT_REPLY_DELAY_MS: u64 = 3000;

/// Runtime configuration read from `PALAVER_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the SQLite database file.
    pub data_dir: PathBuf,
    /// Secret used to sign session tokens.
    pub jwt_secret: String,
    /// Delay before the auto-responder answers a user message.
    pub reply_delay: Duration,
}

impl AppConfig {
    /// Build configuration from the environment.
    ///
    /// - `PALAVER_DATA_DIR`: database directory, defaults to `~/.palaver`
    /// - `PALAVER_JWT_SECRET`: token signing secret, defaults to a dev value
    /// - `PALAVER_REPLY_DELAY_MS`: auto-reply delay, defaults to 3000
    pub fn from_env() -> Self {
        let data_dir = std::env::var("PALAVER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".palaver")
            });

        let jwt_secret = std::env::var("PALAVER_JWT_SECRET").unwrap_or_else(|_| {
            warn!("PALAVER_JWT_SECRET not set, using development secret");
            DEV_JWT_SECRET.to_string()
        });

        let reply_delay = std::env::var("PALAVER_REPLY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_REPLY_DELAY_MS));

        Self {
            data_dir,
            jwt_secret,
            reply_delay,
        }
    }

    /// Connection URL for the SQLite database, creating the file on first use.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}/palaver.db?mode=rwc", self.data_dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_points_into_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/palaver-test"),
            jwt_secret: "s".to_string(),
            reply_delay: Duration::from_millis(10),
        };
        assert_eq!(
            config.database_url(),
            "sqlite:///tmp/palaver-test/palaver.db?mode=rwc"
        );
    }
}
