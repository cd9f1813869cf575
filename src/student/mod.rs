//! Student records and the draft form used to create or edit them.

pub mod draft;
pub mod types;

pub use draft::{Field, StudentDraft};
pub use types::{Course, NewStudent, Student};
