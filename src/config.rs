use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub balance_cache_ttl_secs: u64,
    pub trend_window_days: u32,
    pub max_trend_window_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
            balance_cache_ttl_secs: 300,
            trend_window_days: 30,
            max_trend_window_days: 365,
        }
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        Self {
            port: parse_var("PORT").unwrap_or(defaults.port),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            balance_cache_ttl_secs: parse_var("BALANCE_CACHE_TTL_SECS").unwrap_or(defaults.balance_cache_ttl_secs),
            trend_window_days: parse_var("TREND_WINDOW_DAYS").unwrap_or(defaults.trend_window_days),
            max_trend_window_days: parse_var("MAX_TREND_WINDOW_DAYS").unwrap_or(defaults.max_trend_window_days),
        }
    }

    pub fn balance_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.balance_cache_ttl_secs)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
