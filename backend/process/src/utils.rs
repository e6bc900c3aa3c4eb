use std::collections::HashSet;

use anyhow::{Context, bail};
use roster::{FieldMapping, StudentRecord, records::FIELDS};

/// Applies `FIELD=COLUMN` overrides on top of the identity mapping.
pub fn parse_mapping(overrides: &[String]) -> anyhow::Result<FieldMapping> {
    let mut mapping = FieldMapping::default();

    for entry in overrides {
        let (field, column) = entry
            .split_once('=')
            .with_context(|| format!("Expected FIELD=COLUMN, got {entry:?}"))?;

        let (field, column) = (field.trim(), column.trim());
        if column.is_empty() {
            bail!("Empty column name for {field:?}");
        }

        mapping = mapping
            .with_column(field, column)
            .with_context(|| format!("Unknown field {field:?}, expected one of {FIELDS:?}"))?;
    }

    Ok(mapping)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub courses: usize,
    pub added: usize,
    pub removed: usize,
}

pub fn summarize(old: &[StudentRecord], new: &[StudentRecord]) -> Summary {
    let old_ids: HashSet<&str> = old.iter().map(|r| r.student_id.as_str()).collect();
    let new_ids: HashSet<&str> = new.iter().map(|r| r.student_id.as_str()).collect();
    let courses: HashSet<&str> = new.iter().map(|r| r.course.as_str()).collect();

    Summary {
        records: new.len(),
        courses: courses.len(),
        added: new_ids.difference(&old_ids).count(),
        removed: old_ids.difference(&new_ids).count(),
    }
}
