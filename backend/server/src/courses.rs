//! # Courses
//!
//! Course and class pickers shown next to the phone inputs.
//!
//! ## Shape
//! - `courses`: distinct course labels, first appearance order
//! - `classesByCourse`: course to distinct class labels, first appearance order
//!
//! Derived from a single pass over the dataset on every request.
use indexmap::{IndexMap, IndexSet};
use roster::StudentRecord;
use serde::Serialize;

pub type CourseIndex = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Courses {
    pub courses: Vec<String>,
    pub classes_by_course: CourseIndex,
}

pub fn build_index(dataset: &[StudentRecord]) -> Courses {
    let mut seen: IndexMap<&str, IndexSet<&str>> = IndexMap::new();

    for record in dataset {
        seen.entry(record.course.as_str())
            .or_default()
            .insert(record.class_name.as_str());
    }

    let classes_by_course: CourseIndex = seen
        .into_iter()
        .map(|(course, classes)| {
            (
                course.to_string(),
                classes.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();

    Courses {
        courses: classes_by_course.keys().cloned().collect(),
        classes_by_course,
    }
}
