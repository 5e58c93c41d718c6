use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HISTORY_DIR: &str = ".logo-studio";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub dir: PathBuf,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub history: HistoryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_url = env::var("LOGO_API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = env::var("LOGO_REQUEST_TIMEOUT_SECS")
            .ok()
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), |raw| parse_timeout_secs(&raw));

        ApiConfig { base_url, timeout }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// A zero timeout would fail every call, so it keeps the default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            log::warn!("Ignoring zero request timeout, keeping {:?}", self.timeout);
        } else {
            self.timeout = timeout;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn parse_timeout_secs(raw: &str) -> Duration {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            log::warn!(
                "LOGO_REQUEST_TIMEOUT_SECS={:?} is not a positive number of seconds, using {}",
                raw,
                DEFAULT_TIMEOUT_SECS
            );
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            enabled: true,
        }
    }
}

impl HistoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let dir = env::var("LOGO_HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_DIR));
        let enabled = env::var("LOGO_HISTORY_ENABLED")
            .ok()
            .map_or(true, |val| val != "false");

        HistoryConfig { dir, enabled }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            api: ApiConfig::from_env(),
            history: HistoryConfig::from_env(),
        }
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(120));
        assert!(config.history.enabled);
    }

    #[test]
    fn builders_override() {
        let config = Config::new()
            .with_api(
                ApiConfig::new()
                    .with_base_url("http://logos.test")
                    .with_timeout(Duration::from_secs(5)),
            )
            .with_history(HistoryConfig::new().with_dir("/tmp/h").disabled());
        assert_eq!(config.api.base_url, "http://logos.test");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.history.dir, PathBuf::from("/tmp/h"));
        assert!(!config.history.enabled);
    }

    #[test]
    fn sub_second_timeout_is_kept_exactly() {
        let api = ApiConfig::new().with_timeout(Duration::from_millis(900));
        assert_eq!(api.timeout(), Duration::from_millis(900));
    }

    #[test]
    fn zero_timeout_keeps_the_default() {
        let api = ApiConfig::new().with_timeout(Duration::ZERO);
        assert_eq!(api.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        assert_eq!(parse_timeout_secs("0"), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(parse_timeout_secs("soon"), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(parse_timeout_secs(" 30 "), Duration::from_secs(30));
    }
}
