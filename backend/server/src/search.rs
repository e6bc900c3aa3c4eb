//! # Search
//!
//! Point lookup of a single student by phone pair.
//!
//! ## Matching
//! - Student phone and parent phone must both equal the record exactly, no trimming or reformatting
//! - Course and class are optional filters, an empty string counts as not given
//! - Filters are independent, a class that does not belong to the course simply matches nothing
//! - First record in file order wins, duplicates are not reported
use roster::StudentRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub student_phone: String,
    pub parent_phone: String,

    #[serde(default)]
    pub course: Option<String>,

    #[serde(default, rename = "class")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub student_id: String,
    pub enrolled_class: String,
}

impl From<&StudentRecord> for SearchResult {
    fn from(record: &StudentRecord) -> Self {
        Self {
            student_id: record.student_id.clone(),
            enrolled_class: record.class_name.clone(),
        }
    }
}

fn active(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|value| !value.is_empty())
}

pub fn find_match<'a>(
    dataset: &'a [StudentRecord],
    query: &SearchQuery,
) -> Option<&'a StudentRecord> {
    let course = active(&query.course);
    let class_name = active(&query.class_name);

    dataset.iter().find(|record| {
        record.student_phone == query.student_phone
            && record.parent_phone == query.parent_phone
            && course.is_none_or(|course| record.course == course)
            && class_name.is_none_or(|class_name| record.class_name == class_name)
    })
}
