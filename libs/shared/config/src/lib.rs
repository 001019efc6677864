use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REFETCH_DELAY_MS: u64 = 2000;
const DEFAULT_CONSOLE_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub appointment_refetch_delay_ms: u64,
    pub console_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let backend_url = env::var("BACKEND_URL")
            .or_else(|_| env::var("REACT_APP_BACKEND_URL"))
            .unwrap_or_else(|_| {
                warn!("BACKEND_URL not set, using default");
                DEFAULT_BACKEND_URL.to_string()
            });

        let config = Self {
            backend_url: normalize_base_url(&backend_url),
            backend_timeout_secs: parse_var("BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT_SECS),
            appointment_refetch_delay_ms: parse_var(
                "APPOINTMENT_REFETCH_DELAY_MS",
                DEFAULT_REFETCH_DELAY_MS,
            ),
            console_port: parse_var("CONSOLE_PORT", DEFAULT_CONSOLE_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing backend URL");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_url.is_empty()
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    pub fn refetch_delay(&self) -> Duration {
        Duration::from_millis(self.appointment_refetch_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_timeout_secs: DEFAULT_BACKEND_TIMEOUT_SECS,
            appointment_refetch_delay_ms: DEFAULT_REFETCH_DELAY_MS,
            console_port: DEFAULT_CONSOLE_PORT,
        }
    }
}

/// Strips surrounding whitespace and trailing slashes so paths can be appended verbatim.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_var<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
