//! Client-side routes and the application root that mounts views.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::api::{paths, ApiRequest, HttpTransport, RequestExecutor, Transport};
use crate::config::Config;
use crate::error::{AppError, RouteError, ViewError};
use crate::store::AppStore;
use crate::student::Student;
use crate::views::{request_failure, EditView, HealthView, ListView, ServiceCheck};

/// A client-side route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: the list/form view.
    Home,
    /// `/update/:id`: the edit view.
    Update(i64),
}

impl Route {
    /// Parse a path. A leading `:` on the id is tolerated (`/update/:7`).
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Route::Home);
        }

        let mut segments = trimmed.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("update"), Some(raw_id), None) => {
                let id = raw_id.trim_start_matches(':');
                id.parse()
                    .map(Route::Update)
                    .map_err(|_| RouteError::InvalidId(raw_id.to_string()))
            }
            _ => Err(RouteError::NotFound(path.to_string())),
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Update(id) => format!("/update/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

/// A view mounted for a route.
#[derive(Debug)]
pub enum Screen<T> {
    Home(ListView<T>),
    Update(EditView<T>),
}

/// Application root: owns the shared store and hands it to every view.
#[derive(Debug)]
pub struct App<T = HttpTransport> {
    transport: Arc<T>,
    health_checks: Vec<ServiceCheck<T>>,
    store: AppStore,
    cancel: CancellationToken,
}

impl App<HttpTransport> {
    /// Build the app from configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        config.validate()?;

        let transport = Arc::new(HttpTransport::new(config)?);
        let health_checks = config
            .health_services()?
            .into_iter()
            .map(|service| -> Result<ServiceCheck<HttpTransport>, AppError> {
                Ok(ServiceCheck {
                    transport: Arc::new(HttpTransport::with_base_url(
                        &service.base_url,
                        config.http_timeout_ms,
                    )?),
                    name: service.name,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::with_transport(transport, health_checks))
    }
}

impl<T: Transport> App<T> {
    /// Build the app over an existing transport.
    pub fn with_transport(transport: Arc<T>, health_checks: Vec<ServiceCheck<T>>) -> Self {
        Self {
            transport,
            health_checks,
            store: AppStore::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// The shared store.
    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// Load the shared list once at startup.
    #[instrument(skip(self))]
    pub async fn mount(&self) -> Result<usize, ViewError> {
        let exec = RequestExecutor::new(Arc::clone(&self.transport), self.cancel.child_token());
        let students: Vec<Student> = exec
            .send_as(ApiRequest::get(paths::GET_ALL))
            .await
            .ok_or_else(|| request_failure(&exec))?;

        let count = students.len();
        self.store.replace_students(students).await;
        info!(count, "Application mounted");
        Ok(count)
    }

    /// Mount the list/form view.
    pub fn home(&self) -> ListView<T> {
        ListView::new(
            Arc::clone(&self.transport),
            self.store.clone(),
            self.cancel.child_token(),
        )
    }

    /// Mount the edit view for a student.
    pub async fn update(&self, id: i64) -> Result<EditView<T>, ViewError> {
        EditView::mount(
            Arc::clone(&self.transport),
            self.store.clone(),
            self.cancel.child_token(),
            id,
        )
        .await
    }

    /// Mount the health dashboard.
    pub fn health(&self) -> HealthView<T> {
        HealthView::new(self.health_checks.clone(), self.cancel.child_token())
    }

    /// Mount whatever view a path routes to.
    pub async fn open(&self, path: &str) -> Result<Screen<T>, AppError> {
        match Route::parse(path)? {
            Route::Home => Ok(Screen::Home(self.home())),
            Route::Update(id) => Ok(Screen::Update(self.update(id).await?)),
        }
    }

    /// Cancel every in-flight request of every mounted view.
    pub fn shutdown(&self) {
        info!("Shutting down, cancelling in-flight requests");
        self.cancel.cancel();
    }
}
