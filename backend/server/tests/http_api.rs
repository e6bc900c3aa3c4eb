use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use roster::{Dataset, FieldMapping, RecordSource, StudentRecord, UpstreamError};
use serde_json::{Value, json};
use server::{app, config::Config, state::State};
use tempfile::TempDir;

const SECRET: &str = "test-api-key";

struct StubSource {
    dataset: Option<Dataset>,
    calls: AtomicUsize,
}

#[async_trait]
impl RecordSource for StubSource {
    async fn fetch(&self, _mapping: &FieldMapping) -> Result<Dataset, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.dataset.clone().ok_or(UpstreamError::NotConfigured)
    }
}

struct Harness {
    _dir: TempDir,
    data_file: PathBuf,
    source: Arc<StubSource>,
    server: TestServer,
}

fn record(id: &str, student: &str, parent: &str, course: &str, class_name: &str) -> StudentRecord {
    StudentRecord {
        student_id: id.to_string(),
        student_phone: student.to_string(),
        parent_phone: parent.to_string(),
        course: course.to_string(),
        class_name: class_name.to_string(),
    }
}

fn config(data_file: &Path, api_key: Option<&str>) -> Config {
    Config {
        port: 0,
        data_file: data_file.to_path_buf(),
        apps_script_url: None,
        api_key: api_key.map(str::to_string),
        upstream_timeout: Duration::from_secs(5),
    }
}

fn harness(contents: Option<&str>, api_key: Option<&str>, fresh: Option<Dataset>) -> Harness {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("data").join("student-data.json");

    if let Some(contents) = contents {
        std::fs::create_dir_all(data_file.parent().unwrap()).unwrap();
        std::fs::write(&data_file, contents).unwrap();
    }

    let source = Arc::new(StubSource {
        dataset: fresh,
        calls: AtomicUsize::new(0),
    });
    let state = State::with_source(
        config(&data_file, api_key),
        Some(source.clone() as Arc<dyn RecordSource>),
    );

    Harness {
        _dir: dir,
        data_file,
        source,
        server: TestServer::new(app(state)).unwrap(),
    }
}

fn dataset_json(dataset: &[StudentRecord]) -> String {
    serde_json::to_string(dataset).unwrap()
}

fn sample() -> String {
    dataset_json(&[
        record("S1", "111", "222", "Math", "M1"),
        record("S2", "333", "444", "Math", "M2"),
        record("S3", "111", "222", "Science", "SC1"),
        record("S4", "555", "666", "Math", "M1"),
    ])
}

fn api_key(value: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_static(value),
    )
}

#[tokio::test]
async fn test_courses_lists_distinct_courses_and_classes() {
    let harness = harness(Some(&sample()), None, None);

    let response = harness.server.get("/courses").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "courses": ["Math", "Science"],
            "classesByCourse": { "Math": ["M1", "M2"], "Science": ["SC1"] }
        })
    );
}

#[tokio::test]
async fn test_courses_on_malformed_file_is_500() {
    let harness = harness(Some("{ this is not json"), None, None);

    let response = harness.server.get("/courses").await;
    let body = response.json::<Value>();

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch courses and classes");
    assert!(body["details"].as_str().unwrap().contains("Malformed"));
}

#[tokio::test]
async fn test_courses_on_missing_file_is_500() {
    let harness = harness(None, None, None);

    let response = harness.server.get("/courses").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["details"].is_string());
}

#[tokio::test]
async fn test_search_finds_student() {
    let harness = harness(
        Some(&dataset_json(&[record("S1", "111", "222", "Math", "M1")])),
        None,
        None,
    );

    let response = harness
        .server
        .post("/search")
        .json(&json!({ "studentPhone": "111", "parentPhone": "222" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "studentId": "S1", "enrolledClass": "M1" })
    );
}

#[tokio::test]
async fn test_search_with_other_course_is_404() {
    let harness = harness(
        Some(&dataset_json(&[record("S1", "111", "222", "Math", "M1")])),
        None,
        None,
    );

    let response = harness
        .server
        .post("/search")
        .json(&json!({ "studentPhone": "111", "parentPhone": "222", "course": "Science" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "error": "Student not found" }));
}

#[tokio::test]
async fn test_search_filters_disambiguate_shared_phones() {
    let harness = harness(Some(&sample()), None, None);

    let first = harness
        .server
        .post("/search")
        .json(&json!({ "studentPhone": "111", "parentPhone": "222", "course": "", "class": "" }))
        .await;
    assert_eq!(first.json::<Value>()["studentId"], "S1");

    let science = harness
        .server
        .post("/search")
        .json(&json!({
            "studentPhone": "111",
            "parentPhone": "222",
            "course": "Science",
            "class": "SC1"
        }))
        .await;
    assert_eq!(science.status_code(), StatusCode::OK);
    assert_eq!(
        science.json::<Value>(),
        json!({ "studentId": "S3", "enrolledClass": "SC1" })
    );
}

#[tokio::test]
async fn test_search_with_malformed_body_is_500() {
    let harness = harness(Some(&sample()), None, None);

    let response = harness.server.post("/search").text("studentPhone=111").await;
    let body = response.json::<Value>();

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to search for student");
    assert!(body["details"].is_string());

    let response = harness
        .server
        .post("/search")
        .json(&json!({ "studentPhone": "111" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"], "Failed to search for student");
}

#[tokio::test]
async fn test_search_on_malformed_file_is_500() {
    let harness = harness(Some(r#"[{"Student ID": "S1"}]"#), None, None);

    let response = harness
        .server
        .post("/search")
        .json(&json!({ "studentPhone": "111", "parentPhone": "222" }))
        .await;
    let body = response.json::<Value>();

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to search for student");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_update_with_wrong_key_is_401_and_leaves_file() {
    let original = sample();
    let harness = harness(
        Some(&original),
        Some(SECRET),
        Some(vec![record("NEW", "1", "2", "Art", "A1")]),
    );
    let (name, value) = api_key("not-the-key");

    let response = harness.server.post("/update").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), json!({ "error": "Unauthorized" }));
    assert_eq!(std::fs::read_to_string(&harness.data_file).unwrap(), original);
    assert_eq!(harness.source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_update_without_key_is_401() {
    let harness = harness(Some(&sample()), Some(SECRET), Some(Vec::new()));

    let response = harness.server.post("/update").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_without_configured_key_is_401() {
    let harness = harness(Some(&sample()), None, Some(Vec::new()));
    let (name, value) = api_key("");

    let response = harness.server.post("/update").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_replaces_dataset() {
    let fresh = vec![record("NEW", "777", "888", "Art", "A1")];
    let harness = harness(None, Some(SECRET), Some(fresh.clone()));
    let (name, value) = api_key(SECRET);

    let response = harness.server.post("/update").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Data updated successfully" })
    );
    assert_eq!(roster::get_dataset(&harness.data_file).await.unwrap(), fresh);

    let search = harness
        .server
        .post("/search")
        .json(&json!({ "studentPhone": "777", "parentPhone": "888" }))
        .await;
    assert_eq!(search.json::<Value>()["studentId"], "NEW");
}

#[tokio::test]
async fn test_update_upstream_failure_is_500_and_leaves_file() {
    let original = sample();
    let harness = harness(Some(&original), Some(SECRET), None);
    let (name, value) = api_key(SECRET);

    let response = harness.server.post("/update").add_header(name, value).await;
    let body = response.json::<Value>();

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to update data");
    assert!(body["details"].is_string());
    assert_eq!(std::fs::read_to_string(&harness.data_file).unwrap(), original);
    assert_eq!(harness.source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_update_without_processing_service_is_500() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("student-data.json");
    let state = State::with_source(config(&data_file, Some(SECRET)), None);
    let server = TestServer::new(app(state)).unwrap();
    let (name, value) = api_key(SECRET);

    let response = server.post("/update").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!data_file.exists());
}
