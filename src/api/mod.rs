//! Client side of the student REST API.
//!
//! This module handles:
//! - Request descriptions (path, method, body)
//! - The HTTP transport and a mock transport for testing
//! - The request executor that tracks loading and error state

pub mod executor;
pub mod mock;
pub mod request;
pub mod transport;

pub use executor::{RequestExecutor, RequestState};
pub use mock::{MockGate, MockTransport};
pub use request::{ApiRequest, Method};
pub use transport::{HttpTransport, Transport};

/// Backend paths.
pub mod paths {
    /// List every student.
    pub const GET_ALL: &str = "getAll";
    /// Create a student.
    pub const ADD: &str = "add";
    /// Service health probe.
    pub const HEALTH: &str = "actuator/health";

    /// Delete one student.
    pub fn delete(id: i64) -> String {
        format!("delete/{id}")
    }

    /// Update one student.
    pub fn update(id: i64) -> String {
        format!("update/{id}")
    }
}
