use std::net::SocketAddr;
use std::time::Duration;

use chrono_tz::Tz;
use url::Url;

use crate::errors::ConfigError;

const DEFAULT_FEED_ORIGIN: &str = "http://localhost:8080";
const FEED_PATH: &str = "/api/buyback";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    feed_url: Url,
    pub feed_timeout: Option<Duration>,
    pub bind_addr: SocketAddr,
    pub timezone: Tz,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = match lookup("FEED_URL") {
            Some(url) => url,
            None => {
                let origin = lookup("FEED_ORIGIN")
                    .unwrap_or_else(|| DEFAULT_FEED_ORIGIN.to_string());
                format!("{}{}", origin.trim_end_matches('/'), FEED_PATH)
            }
        };
        let feed_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl(raw_url.clone(), e))?;

        let feed_timeout = match lookup("FEED_TIMEOUT_SECS") {
            Some(secs) => Some(
                secs.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidTimeout(secs.clone()))?,
            ),
            None => None,
        };

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        let tz_name = lookup("DISPLAY_TIMEZONE").unwrap_or_else(system_timezone);
        let timezone = tz_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone(tz_name.clone()))?;

        Ok(Self {
            feed_url,
            feed_timeout,
            bind_addr,
            timezone,
        })
    }

    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }
}

/// IANA name of the host zone, `UTC` when it cannot be detected.
fn system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}
