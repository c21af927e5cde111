//! Remote backend tests against a mocked spreadsheet API.
//!
//! The store uses a blocking HTTP client, so every store call runs on a
//! blocking task while wiremock serves from the async runtime.

use serde_json::json;
use trimcoach::config::SheetsSettings;
use trimcoach::records::StreamKind;
use trimcoach::storage::{SheetsStore, StorageError, StreamStore};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SPREADSHEET_ID: &str = "sheet-test-1";
const TOKEN: &str = "test-token";

fn test_settings(server: &MockServer, dir: &tempfile::TempDir) -> SheetsSettings {
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, TOKEN).unwrap();
    SheetsSettings {
        spreadsheet_id: SPREADSHEET_ID.to_string(),
        token_file,
        api_base: server.uri(),
    }
}

/// Run a store operation off the async runtime (the client is blocking).
async fn blocking<T: Send + 'static>(
    store: SheetsStore,
    op: impl FnOnce(&SheetsStore) -> T + Send + 'static,
) -> T {
    tokio::task::spawn_blocking(move || op(&store)).await.unwrap()
}

#[tokio::test]
async fn test_read_all_parses_value_grid() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/{}/values/weight", SPREADSHEET_ID)))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "weight!A1:G2",
            "majorDimension": "ROWS",
            "values": [
                ["timestamp", "date", "weight_kg", "waist_cm", "sleep_h", "condition", "alcohol"],
                ["2024-01-01T08:00:00", "2024-01-01", "70.0", "80", "7", "3", "없음"]
            ]
        })))
        .mount(&server)
        .await;

    let store = SheetsStore::new(test_settings(&server, &dir));
    let table = blocking(store, |s| s.read_all(StreamKind::Weight)).await.unwrap();

    assert_eq!(table.columns, StreamKind::Weight.columns());
    assert_eq!(table.len(), 1);
    assert_eq!(table.cell(0, "weight_kg"), "70.0");
    assert_eq!(table.cell(0, "alcohol"), "없음");
}

#[tokio::test]
async fn test_read_missing_worksheet_is_empty_not_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/{}/values/workouts", SPREADSHEET_ID)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "Unable to parse range: workouts!A1", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let store = SheetsStore::new(test_settings(&server, &dir));
    let table = blocking(store, |s| s.read_all(StreamKind::Workouts)).await.unwrap();

    assert!(table.is_empty());
    assert_eq!(table.columns, StreamKind::Workouts.columns());
}

#[tokio::test]
async fn test_append_posts_one_row_user_entered() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let row = vec![
        "2024-01-01T08:00:00".to_string(),
        "2024-01-01".to_string(),
        "기타".to_string(),
        "닭가슴살 200g, 밥".to_string(),
        String::new(),
    ];

    Mock::given(method("POST"))
        .and(path(format!("/{}/values/meals:append", SPREADSHEET_ID)))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(body_json(json!({ "values": [row] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updates": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let store = SheetsStore::new(test_settings(&server, &dir));
    let row_arg = row.clone();
    blocking(store, move |s| s.append(StreamKind::Meals, &row_arg))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_auth_failure_preserves_api_message() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/{}/values/weight", SPREADSHEET_ID)))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": 401, "message": "Invalid Credentials", "status": "UNAUTHENTICATED" }
        })))
        .mount(&server)
        .await;

    let store = SheetsStore::new(test_settings(&server, &dir));
    let err = blocking(store, |s| s.read_all(StreamKind::Weight))
        .await
        .unwrap_err();

    assert!(matches!(&err, StorageError::Auth(msg) if msg == "Invalid Credentials"));
}

#[tokio::test]
async fn test_quota_failure_maps_to_quota_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path(format!("/{}/values/weight:append", SPREADSHEET_ID)))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let store = SheetsStore::new(test_settings(&server, &dir));
    let err = blocking(store, |s| s.append(StreamKind::Weight, &[String::from("x")]))
        .await
        .unwrap_err();

    assert!(matches!(&err, StorageError::Quota(msg) if msg == "Quota exceeded"));
}

#[tokio::test]
async fn test_init_skips_existing_header() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // Header already present: init must not append or batchUpdate
    Mock::given(method("GET"))
        .and(path(format!("/{}/values/meals", SPREADSHEET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["timestamp", "date", "meal_slot", "items", "notes"]]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let store = SheetsStore::new(test_settings(&server, &dir));
    blocking(store, |s| s.init_stream(StreamKind::Meals))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_init_creates_worksheet_and_header() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/{}/values/weight", SPREADSHEET_ID)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "Unable to parse range: weight!A1", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/{}:batchUpdate", SPREADSHEET_ID)))
        .and(body_json(json!({
            "requests": [ { "addSheet": { "properties": { "title": "weight" } } } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "replies": [{}] })))
        .expect(1)
        .mount(&server)
        .await;

    let header: Vec<&str> = StreamKind::Weight.columns().to_vec();
    Mock::given(method("POST"))
        .and(path(format!("/{}/values/weight:append", SPREADSHEET_ID)))
        .and(body_json(json!({ "values": [header] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updates": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let store = SheetsStore::new(test_settings(&server, &dir));
    blocking(store, |s| s.init_stream(StreamKind::Weight))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_close_releases_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/{}/values/weight", SPREADSHEET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["timestamp", "date", "weight_kg", "waist_cm", "sleep_h", "condition", "alcohol"]]
        })))
        .mount(&server)
        .await;

    let mut store = SheetsStore::new(test_settings(&server, &dir));
    tokio::task::spawn_blocking(move || {
        store.read_all(StreamKind::Weight).unwrap();
        // Explicit teardown after use, then the session rebuilds lazily
        store.close().unwrap();
        store.read_all(StreamKind::Weight).unwrap();
    })
    .await
    .unwrap();
}
