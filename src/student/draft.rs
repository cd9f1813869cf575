//! Draft form state for the create and edit views.

use std::str::FromStr;

use serde::Serialize;
use strum::Display;

use super::types::{Course, NewStudent, Student};
use crate::error::ValidationError;

/// Form fields a view can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Name,
    Age,
    Email,
    Course,
    AccountNo,
}

/// Raw, unvalidated form input. Every field is kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentDraft {
    pub name: String,
    pub age: String,
    pub email: String,
    pub course: String,
    #[serde(rename = "accountNo")]
    pub account_no: String,
}

impl StudentDraft {
    /// Seed a draft from an existing record.
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            age: student.age.to_string(),
            email: student.email.clone(),
            course: student.course.label().to_string(),
            account_no: student.account_no.to_string(),
        }
    }

    /// Replace a single field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Age => self.age = value,
            Field::Email => self.email = value,
            Field::Course => self.course = value,
            Field::AccountNo => self.account_no = value,
        }
    }

    /// Reset every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when nothing has been typed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check required fields and coerce numbers.
    ///
    /// Name, email, age and course are required. An empty account number
    /// becomes 0.
    pub fn validate(&self) -> Result<NewStudent, ValidationError> {
        let name = required(Field::Name, &self.name)?;
        let email = required(Field::Email, &self.email)?;
        let age_raw = required(Field::Age, &self.age)?;
        let course_raw = required(Field::Course, &self.course)?;

        let age = match age_raw.parse::<u32>() {
            Ok(age) if age > 0 => age,
            _ => {
                return Err(ValidationError::InvalidNumber {
                    field: Field::Age,
                    value: age_raw.to_string(),
                })
            }
        };

        let account_raw = self.account_no.trim();
        let account_no = if account_raw.is_empty() {
            0
        } else {
            account_raw
                .parse::<i64>()
                .map_err(|_| ValidationError::InvalidNumber {
                    field: Field::AccountNo,
                    value: account_raw.to_string(),
                })?
        };

        let course = Course::from_str(course_raw)
            .map_err(|_| ValidationError::UnknownCourse(course_raw.to_string()))?;

        Ok(NewStudent {
            name: name.to_string(),
            age,
            email: email.to_string(),
            course,
            account_no,
        })
    }
}

fn required(field: Field, value: &str) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}
