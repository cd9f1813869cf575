//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

use crate::error::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Backend ===
    /// Base URL of the student REST service.
    #[serde(default = "default_api_url")]
    pub student_api_url: String,

    /// Per-request HTTP timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Health Dashboard ===
    /// Services to probe, each as `Name=base_url`.
    #[serde(default = "default_health_services")]
    pub health_services: Vec<String>,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

/// A service probed by the health dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthService {
    /// Display name.
    pub name: String,
    /// Base URL; `/actuator/health` is appended.
    pub base_url: String,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_health_services() -> Vec<String> {
    vec!["Student Service=http://localhost:8080".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            student_api_url: default_api_url(),
            http_timeout_ms: default_http_timeout_ms(),
            health_services: default_health_services(),
            rust_log: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Configuration pointing every endpoint at one base URL.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            health_services: vec![format!("Student Service={base_url}")],
            student_api_url: base_url,
            ..Self::default()
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.student_api_url.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "STUDENT_API_URL is required".to_string(),
            ));
        }
        Url::parse(&self.student_api_url)?;

        if self.http_timeout_ms == 0 {
            return Err(AppError::InvalidConfig(
                "HTTP_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        for service in self.health_services()? {
            Url::parse(&service.base_url)?;
        }

        Ok(())
    }

    /// Parse the `Name=base_url` service list.
    pub fn health_services(&self) -> Result<Vec<HealthService>, AppError> {
        self.health_services
            .iter()
            .map(|entry| {
                let (name, base_url) = entry.split_once('=').ok_or_else(|| {
                    AppError::InvalidConfig(format!(
                        "HEALTH_SERVICES entry {entry:?} must look like Name=url"
                    ))
                })?;
                let (name, base_url) = (name.trim(), base_url.trim());
                if name.is_empty() || base_url.is_empty() {
                    return Err(AppError::InvalidConfig(format!(
                        "HEALTH_SERVICES entry {entry:?} has an empty name or url"
                    )));
                }
                Ok(HealthService {
                    name: name.to_string(),
                    base_url: base_url.to_string(),
                })
            })
            .collect()
    }
}
