//! Stub backend handlers.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::student::{NewStudent, Student};

/// In-memory state behind the stub backend.
#[derive(Debug, Clone)]
pub struct BackendState {
    /// Stored students in insertion order.
    pub students: Arc<RwLock<Vec<Student>>>,
    /// Next id to hand out.
    next_id: Arc<AtomicI64>,
    /// Whether the health endpoint reports UP.
    healthy: Arc<AtomicBool>,
}

impl BackendState {
    /// Create empty backend state.
    pub fn new() -> Self {
        Self {
            students: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create backend state pre-loaded with records; ids continue after the
    /// largest seeded id.
    pub fn with_students(students: Vec<Student>) -> Self {
        let next = students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            students: Arc::new(RwLock::new(students)),
            next_id: Arc::new(AtomicI64::new(next)),
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Set health state.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Check health state.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Error body, `{ "message": ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Handler failure rendered as a status plus [`ErrorResponse`].
#[derive(Debug)]
pub struct HandlerError {
    status: StatusCode,
    message: String,
}

impl HandlerError {
    fn not_found(id: i64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Student not found with id {id}"),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "UP" or "DOWN".
    pub status: &'static str,
}

fn check_payload(payload: &NewStudent) -> Result<(), HandlerError> {
    if payload.name.trim().is_empty() {
        return Err(HandlerError::bad_request("name must not be blank"));
    }
    if payload.email.trim().is_empty() {
        return Err(HandlerError::bad_request("email must not be blank"));
    }
    if payload.age == 0 {
        return Err(HandlerError::bad_request("age must be positive"));
    }
    Ok(())
}

/// `GET /getAll`.
pub async fn get_all(State(state): State<BackendState>) -> Json<Vec<Student>> {
    Json(state.students.read().await.clone())
}

/// `POST /add`.
pub async fn add(
    State(state): State<BackendState>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Result<Json<Student>, HandlerError> {
    let Json(payload) = payload?;
    check_payload(&payload)?;

    let student = payload.with_id(state.allocate_id());
    state.students.write().await.push(student.clone());
    info!(id = student.id, "Student added");
    Ok(Json(student))
}

/// `PUT /update/:id`.
pub async fn update(
    State(state): State<BackendState>,
    Path(id): Path<i64>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Result<Json<Student>, HandlerError> {
    let Json(payload) = payload?;
    check_payload(&payload)?;

    let mut students = state.students.write().await;
    let slot = students
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| HandlerError::not_found(id))?;
    *slot = payload.with_id(id);
    debug!(id, "Student updated");
    Ok(Json(slot.clone()))
}

/// `DELETE /delete/:id`. Answers with the removed record.
pub async fn remove(
    State(state): State<BackendState>,
    Path(id): Path<i64>,
) -> Result<Json<Student>, HandlerError> {
    let mut students = state.students.write().await;
    let index = students
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| HandlerError::not_found(id))?;
    let removed = students.remove(index);
    info!(id, "Student deleted");
    Ok(Json(removed))
}

/// `GET /actuator/health`.
pub async fn health(State(state): State<BackendState>) -> impl IntoResponse {
    let status = if state.is_healthy() { "UP" } else { "DOWN" };
    Json(HealthResponse { status })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_health_toggle() {
        let state = BackendState::new();
        assert!(state.is_healthy());

        state.set_healthy(false);
        assert!(!state.is_healthy());
    }

    #[test]
    fn seeded_ids_continue_after_max() {
        let state = BackendState::with_students(vec![Student {
            id: 41,
            name: "Ada".to_string(),
            age: 20,
            email: "a@x.com".to_string(),
            course: crate::student::Course::Other,
            account_no: 0,
        }]);
        assert_eq!(state.allocate_id(), 42);
        assert_eq!(state.allocate_id(), 43);
    }
}
