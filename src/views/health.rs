//! Health dashboard: one UP/DOWN badge per backend service.

use std::fmt;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::render;
use crate::api::{paths, ApiRequest, Transport};
use crate::error::{ApiError, ViewError};

/// Body of `GET /actuator/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Badge shown next to a service name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// No answer yet.
    Checking,
    Up,
    Down,
}

impl Badge {
    /// Badge for a reported status; anything but "up" counts as down.
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            None => Badge::Checking,
            Some(s) if s.eq_ignore_ascii_case("up") => Badge::Up,
            Some(_) => Badge::Down,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Badge::Checking => "Checking...",
            Badge::Up => "UP",
            Badge::Down => "DOWN",
        })
    }
}

/// A service to probe.
#[derive(Debug)]
pub struct ServiceCheck<T> {
    /// Display name.
    pub name: String,
    /// Transport bound to the service's base URL.
    pub transport: Arc<T>,
}

impl<T> Clone for ServiceCheck<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

/// Last known status of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    /// Raw status string, `None` until the checks resolve.
    pub status: Option<String>,
}

impl ServiceStatus {
    pub fn badge(&self) -> Badge {
        Badge::from_status(self.status.as_deref())
    }
}

/// Dashboard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthState {
    pub services: Vec<ServiceStatus>,
    /// Message of the first failing check.
    pub error: Option<String>,
}

/// Runs all health checks in parallel and keeps the resulting badges.
///
/// If any single check fails, every badge goes back to `Checking` and the
/// error panel shows that failure.
#[derive(Debug)]
pub struct HealthView<T> {
    checks: Vec<ServiceCheck<T>>,
    state: HealthState,
    cancel: CancellationToken,
}

impl<T: Transport> HealthView<T> {
    pub fn new(checks: Vec<ServiceCheck<T>>, cancel: CancellationToken) -> Self {
        let state = HealthState {
            services: checks
                .iter()
                .map(|check| ServiceStatus {
                    name: check.name.clone(),
                    status: None,
                })
                .collect(),
            error: None,
        };
        Self {
            checks,
            state,
            cancel,
        }
    }

    /// Current dashboard state.
    pub fn state(&self) -> &HealthState {
        &self.state
    }

    /// Probe every service.
    #[instrument(skip(self), fields(services = self.checks.len()))]
    pub async fn mount(&mut self) -> Result<&HealthState, ViewError> {
        let probes = self.checks.iter().map(|check| async move {
            let value = check
                .transport
                .execute(&ApiRequest::get(paths::HEALTH))
                .await?;
            let health: HealthStatus = serde_json::from_value(value)?;
            Ok::<_, ApiError>(health.status)
        });

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ViewError::Cancelled),
            outcome = try_join_all(probes) => outcome,
        };

        match outcome {
            Ok(statuses) => {
                for (service, status) in self.state.services.iter_mut().zip(statuses) {
                    info!(service = %service.name, status = %status, "Health check");
                    service.status = Some(status);
                }
                self.state.error = None;
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %message, "Health check failed");
                for service in &mut self.state.services {
                    service.status = None;
                }
                self.state.error = Some(message);
            }
        }

        Ok(&self.state)
    }

    /// Drop any in-flight checks.
    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    pub fn render(&self) -> String {
        render::health_dashboard(&self.state)
    }
}
