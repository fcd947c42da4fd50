use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    /// Base address of the chess server, without a trailing path.
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("RUSTY_CHESS_API_URL").ok(),
            env::var("RUSTY_CHESS_TIMEOUT_SECS").ok(),
        )
    }

    /// Build from raw variable values. Blank or unparsable values fall back
    /// to the defaults.
    pub fn from_values(api_url: Option<String>, timeout_secs: Option<String>) -> Self {
        Self {
            api_url: api_url
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout_secs: timeout_secs
                .and_then(|v| v.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Same config pointed at another server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL for an endpoint path such as `/board`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_server() {
        let config = Config::default();
        assert_eq!(config.url("/board"), "http://127.0.0.1:8080/board");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn values_override_defaults() {
        let config = Config::from_values(
            Some(" http://chess.local:9000 ".into()),
            Some("3".into()),
        );
        assert_eq!(config.api_url, "http://chess.local:9000");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn missing_values_use_defaults() {
        let config = Config::from_values(None, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn blank_url_falls_back() {
        let config = Config::from_values(Some("   ".into()), None);
        assert_eq!(config.api_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn bad_timeout_falls_back() {
        for raw in ["abc", "0", "-5", ""] {
            let config = Config::from_values(None, Some(raw.into()));
            assert_eq!(config.timeout_secs, 10, "timeout {raw:?} should fall back");
        }
    }

    #[test]
    fn url_ignores_trailing_slash() {
        let config = Config::default().with_api_url("http://localhost:9000/");
        assert_eq!(config.url("/move"), "http://localhost:9000/move");
    }
}
