use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {source}")]
    InvalidValue {
        var: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Path to the semicolon-delimited movies CSV
    pub data_path: PathBuf,
    /// How long a computed interval result stays cached
    pub cache_ttl: Duration,
    /// Requests allowed per client within one rate-limit window
    pub rate_limit_max: u32,
    /// Rate-limit window length
    pub rate_limit_window: Duration,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_path: PathBuf::from("data/movies.csv"),
            cache_ttl: Duration::from_secs(600),
            rate_limit_max: 100,
            rate_limit_window: Duration::from_secs(15 * 60),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults above for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            bind_addr: parse_var("BIND_ADDR", defaults.bind_addr)?,
            data_path: env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            cache_ttl: Duration::from_secs(parse_var(
                "CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )?),
            rate_limit_max: parse_var("RATE_LIMIT_MAX", defaults.rate_limit_max)?,
            rate_limit_window: Duration::from_secs(parse_var(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window.as_secs(),
            )?),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }
}

fn parse_var<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            source: Box::new(e),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_service() {
        let config = Config::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert_eq!(config.rate_limit_max, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(900));
    }

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        let value: u32 = parse_var("AWARDS_API_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
