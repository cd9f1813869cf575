//! Student record types as exchanged with the backend.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Course a student is enrolled in.
///
/// The wire form is the human-readable label, e.g. `"Data Science"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Course {
    #[serde(rename = "Computer Science")]
    #[strum(serialize = "Computer Science")]
    ComputerScience,
    #[serde(rename = "Software Engineering")]
    #[strum(serialize = "Software Engineering")]
    SoftwareEngineering,
    #[serde(rename = "Data Science")]
    #[strum(serialize = "Data Science")]
    DataScience,
    #[serde(rename = "Information Technology")]
    #[strum(serialize = "Information Technology")]
    InformationTechnology,
    #[serde(rename = "Cybersecurity")]
    #[strum(serialize = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Web Development")]
    #[strum(serialize = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile App Development")]
    #[strum(serialize = "Mobile App Development")]
    MobileAppDevelopment,
    #[serde(rename = "Artificial Intelligence")]
    #[strum(serialize = "Artificial Intelligence")]
    ArtificialIntelligence,
    #[serde(rename = "Machine Learning")]
    #[strum(serialize = "Machine Learning")]
    MachineLearning,
    #[serde(rename = "Database Administration")]
    #[strum(serialize = "Database Administration")]
    DatabaseAdministration,
    #[serde(rename = "Network Administration")]
    #[strum(serialize = "Network Administration")]
    NetworkAdministration,
    #[serde(rename = "Digital Marketing")]
    #[strum(serialize = "Digital Marketing")]
    DigitalMarketing,
    #[serde(rename = "Graphic Design")]
    #[strum(serialize = "Graphic Design")]
    GraphicDesign,
    #[serde(rename = "UI/UX Design")]
    #[strum(serialize = "UI/UX Design")]
    UiUxDesign,
    #[serde(rename = "Business Administration")]
    #[strum(serialize = "Business Administration")]
    BusinessAdministration,
    #[serde(rename = "Project Management")]
    #[strum(serialize = "Project Management")]
    ProjectManagement,
    #[serde(rename = "Other")]
    #[strum(serialize = "Other")]
    Other,
}

impl Course {
    /// Every course in the order the form offers them.
    pub const ALL: [Course; 17] = [
        Course::ComputerScience,
        Course::SoftwareEngineering,
        Course::DataScience,
        Course::InformationTechnology,
        Course::Cybersecurity,
        Course::WebDevelopment,
        Course::MobileAppDevelopment,
        Course::ArtificialIntelligence,
        Course::MachineLearning,
        Course::DatabaseAdministration,
        Course::NetworkAdministration,
        Course::DigitalMarketing,
        Course::GraphicDesign,
        Course::UiUxDesign,
        Course::BusinessAdministration,
        Course::ProjectManagement,
        Course::Other,
    ];

    /// Display label, identical to the wire form.
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

/// A student record as returned by the backend.
///
/// `id` is assigned by the backend; the client never invents one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Server-assigned identifier.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Email address.
    pub email: String,
    /// Enrolled course.
    pub course: Course,
    /// Account number.
    #[serde(rename = "accountNo", default)]
    pub account_no: i64,
}

/// Payload for creating or updating a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Email address.
    pub email: String,
    /// Enrolled course.
    pub course: Course,
    /// Account number.
    #[serde(rename = "accountNo", default)]
    pub account_no: i64,
}

impl NewStudent {
    /// Attach a backend-assigned id.
    pub fn with_id(self, id: i64) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
            course: self.course,
            account_no: self.account_no,
        }
    }
}

impl From<&Student> for NewStudent {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            age: student.age,
            email: student.email.clone(),
            course: student.course,
            account_no: student.account_no,
        }
    }
}
