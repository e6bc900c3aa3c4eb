//! # Records
//!
//! Flat student rows as exported from the enrolment spreadsheet.
//!
//! ## Schema
//! - Backing file is a JSON array of objects
//! - Keys: `Student ID`, `Student Phone`, `Parent Phone`, `Course`, `Class Name`
//! - Every value is a **string**, extra keys are ignored
//! - Phones are compared verbatim, so `"0123 456"` and `"0123456"` are different students
use serde::{Deserialize, Serialize};

pub const STUDENT_ID: &str = "Student ID";
pub const STUDENT_PHONE: &str = "Student Phone";
pub const PARENT_PHONE: &str = "Parent Phone";
pub const COURSE: &str = "Course";
pub const CLASS_NAME: &str = "Class Name";

pub const FIELDS: [&str; 5] = [STUDENT_ID, STUDENT_PHONE, PARENT_PHONE, COURSE, CLASS_NAME];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "Student ID")]
    pub student_id: String,

    #[serde(rename = "Student Phone")]
    pub student_phone: String,

    #[serde(rename = "Parent Phone")]
    pub parent_phone: String,

    #[serde(rename = "Course")]
    pub course: String,

    #[serde(rename = "Class Name")]
    pub class_name: String,
}

/// Records in file order. Loaded per request, never cached.
pub type Dataset = Vec<StudentRecord>;

/// Spreadsheet column header to read for each canonical field.
///
/// Serializes as `{"Student ID": "<column>", ...}` which is the shape the
/// processing service expects under `mapping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    #[serde(rename = "Student ID")]
    pub student_id: String,

    #[serde(rename = "Student Phone")]
    pub student_phone: String,

    #[serde(rename = "Parent Phone")]
    pub parent_phone: String,

    #[serde(rename = "Course")]
    pub course: String,

    #[serde(rename = "Class Name")]
    pub class_name: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            student_id: STUDENT_ID.to_string(),
            student_phone: STUDENT_PHONE.to_string(),
            parent_phone: PARENT_PHONE.to_string(),
            course: COURSE.to_string(),
            class_name: CLASS_NAME.to_string(),
        }
    }
}

impl FieldMapping {
    /// Points `field` at a differently named spreadsheet column.
    ///
    /// Returns `None` when `field` is not one of [`FIELDS`].
    pub fn with_column(mut self, field: &str, column: impl Into<String>) -> Option<Self> {
        let slot = match field {
            STUDENT_ID => &mut self.student_id,
            STUDENT_PHONE => &mut self.student_phone,
            PARENT_PHONE => &mut self.parent_phone,
            COURSE => &mut self.course,
            CLASS_NAME => &mut self.class_name,
            _ => return None,
        };
        *slot = column.into();

        Some(self)
    }
}
