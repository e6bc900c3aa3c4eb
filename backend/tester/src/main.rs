use std::{env, path::PathBuf};

use roster::{DEFAULT_DATA_FILE, StudentRecord, write_dataset};

fn student(id: &str, phones: (&str, &str), course: &str, class_name: &str) -> StudentRecord {
    StudentRecord {
        student_id: id.to_string(),
        student_phone: phones.0.to_string(),
        parent_phone: phones.1.to_string(),
        course: course.to_string(),
        class_name: class_name.to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

    // same phone pair under two courses, only the course filter tells them apart
    let students = vec![
        student("S1001", ("0901000001", "0912000001"), "Math", "M1"),
        student("S1002", ("0901000002", "0912000002"), "Math", "M2"),
        student("S1003", ("0901000001", "0912000001"), "Science", "SC1"),
        student("S1004", ("0901000004", "0912000004"), "English", "E1"),
        student("S1005", ("0901000005", "0912000005"), "Math", "M1"),
    ];

    write_dataset(&path, &students).await?;

    println!("Students: {}", students.len());
    println!("Wrote {}", path.display());

    Ok(())
}
