//! Plain-text rendering for the terminal.

use std::fmt::Write;

use super::health::HealthState;
use crate::student::{Course, Student, StudentDraft};

const RULE: &str =
    "----------------------------------------------------------------------";

/// Inline error panel.
pub fn error_panel(message: &str) -> String {
    format!("Error: {message}")
}

/// Student directory table with a total count.
pub fn student_table(students: &[Student]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Student Directory (Total Students: {})", students.len());
    let _ = writeln!(out, "{RULE}");

    if students.is_empty() {
        let _ = writeln!(out, "No Student registered yet");
        let _ = writeln!(out, "Add your first student with `student-desk add`");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>5}  {:<20} {:<26} {:>4}  {}",
        "ID", "Name", "Email", "Age", "Course"
    );
    for s in students {
        let _ = writeln!(
            out,
            "{:>5}  {:<20} {:<26} {:>4}  {}",
            s.id, s.name, s.email, s.age, s.course
        );
    }
    out
}

/// One student in detail.
pub fn student_detail(student: &Student) -> String {
    format!(
        "  ID: {}\n  Name: {}\n  Email: {}\n  Age: {}\n  Course: {}\n  Account No: {}\n",
        student.id, student.name, student.email, student.age, student.course, student.account_no
    )
}

/// Current draft values under a heading.
pub fn draft_form(title: &str, draft: &StudentDraft) -> String {
    format!(
        "{title}\n{RULE}\n  Name: {}\n  Email: {}\n  Age: {}\n  Course: {}\n  Account No: {}\n",
        draft.name, draft.email, draft.age, draft.course, draft.account_no
    )
}

/// Course options as offered by the form.
pub fn course_options() -> String {
    Course::ALL
        .iter()
        .map(|c| format!("  {c}\n"))
        .collect()
}

/// Service health dashboard.
pub fn health_dashboard(state: &HealthState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Service Health Dashboard");
    let _ = writeln!(out, "{RULE}");
    for service in &state.services {
        let _ = writeln!(out, "  {:<30} {}", service.name, service.badge());
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "{}", error_panel(error));
    }
    out
}
