//! Student management client for a REST student service.
//!
//! The client keeps a shared, in-memory list of students consistent with the
//! backend. Views issue requests through a [`RequestExecutor`](api::RequestExecutor),
//! which tracks loading and error state and never lets a failure escape, and
//! write successful results into the [`AppStore`](store::AppStore).
//!
//! ```text
//! View ──► RequestExecutor ──► Transport ──► backend
//!   │                                          │
//!   └──────────── AppStore ◄── on success ─────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: Request executor, HTTP transport and mock transport
//! - [`store`]: Shared student list and edit slot
//! - [`student`]: Student records, courses and the draft form
//! - [`views`]: List/form, edit and health views
//! - [`router`]: Client-side routes and the application root
//! - [`backend`]: In-memory stub of the REST service
//! - [`metrics`]: Request counters and latency

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod metrics;
pub mod router;
pub mod store;
pub mod student;
pub mod views;

pub use config::Config;
pub use error::{AppError, Result};
