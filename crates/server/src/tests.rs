// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use rollcall::{HolidayOracle, OracleError};
use rollcall_domain::HolidayFact;
use rollcall_persistence::LocalBackend;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Oracle that knows no holidays.
struct EmptyOracle;

impl HolidayOracle for EmptyOracle {
    fn national(&self, _country_code: &str, _year: i32) -> Result<Vec<HolidayFact>, OracleError> {
        Ok(Vec::new())
    }

    fn regional(
        &self,
        _country_code: &str,
        _subdivision: &str,
        _year: i32,
    ) -> Result<Vec<HolidayFact>, OracleError> {
        Ok(Vec::new())
    }
}

/// Helper to create test app state over a temporary directory.
fn create_test_app_state() -> (tempfile::TempDir, AppState) {
    let dir: tempfile::TempDir = tempfile::tempdir().expect("Failed to create temp dir");
    let config: StorageConfig = StorageConfig::local(dir.path());
    let backend: LocalBackend = LocalBackend::new(dir.path()).expect("Failed to create backend");
    let roster: Roster = Roster::new(
        RecordStore::new(Arc::new(backend)),
        HolidaySource::new(Arc::new(EmptyOracle), CountryDirectory::builtin()),
        Arc::new(SystemClock),
    );
    let app_state: AppState = AppState {
        roster: Arc::new(roster),
        storage: config.describe(),
    };
    (dir, app_state)
}

/// Sends one request and returns the status and JSON body.
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (HttpStatusCode, Value) {
    let request: Request<Body> = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response: Response = app.clone().oneshot(request).await.unwrap();
    let status: HttpStatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn add_alice(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/members",
        Some(json!({ "name": "Alice", "country": "United States", "region": "California" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    body["member_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_add_member_then_list() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);

    let member_id: String = add_alice(&app).await;
    let (status, body) = send(&app, "GET", "/members", None).await;

    assert_eq!(member_id, "1");
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["members"]["1"]["name"], "Alice");
    assert_eq!(body["members"]["1"]["region"], "California");
}

#[tokio::test]
async fn test_add_member_with_blank_name_is_bad_request() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);

    let (status, body) = send(
        &app,
        "POST",
        "/members",
        Some(json!({ "name": " ", "country": "United States" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Name"));
}

#[tokio::test]
async fn test_member_locations_and_regions() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);
    add_alice(&app).await;

    let (_, locations) = send(&app, "GET", "/member_locations", None).await;
    let (_, regions) = send(&app, "GET", "/regions/Australia", None).await;

    assert_eq!(locations["countries"], json!(["United States"]));
    assert_eq!(locations["regions"], json!(["California (United States)"]));
    assert!(
        regions["regions"]
            .as_array()
            .unwrap()
            .contains(&json!("New South Wales"))
    );
}

#[tokio::test]
async fn test_manual_holiday_marks_member_unavailable() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);
    let member_id: String = add_alice(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/holidays",
        Some(json!({ "name": "Founders Day", "date": "2025-09-12", "country": "United States" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, body) = send(&app, "GET", "/availability/2025-09-12", None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body[&member_id]["available"], false);
    assert_eq!(body[&member_id]["reason"], "Holiday: Founders Day");

    let (_, listing) = send(&app, "GET", "/holidays/sorted", None).await;
    assert_eq!(listing[0]["name"], "Founders Day");
    assert_eq!(listing[0]["scope"], "national");
}

#[tokio::test]
async fn test_ooo_lifecycle() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);
    let member_id: String = add_alice(&app).await;

    let (status, entry) = send(
        &app,
        "POST",
        "/ooo",
        Some(json!({ "member_id": member_id, "start_date": "2025-08-01", "end_date": "2025-08-03" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(entry["reason"], "Vacation");

    let (status, details) = send(&app, "GET", "/ooo_details/1/2025-08-02", None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(details["duration_days"], 3);
    assert_eq!(details["member_name"], "Alice");

    let (status, _) = send(
        &app,
        "POST",
        "/ooo/delete",
        Some(json!({ "member_id": member_id, "date": "2025-08-09" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);

    let (status, removed) = send(
        &app,
        "POST",
        "/ooo/delete",
        Some(json!({ "member_id": member_id, "date": "2025-08-03" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(removed["entry"]["start_date"], "2025-08-01");

    let (_, history) = send(&app, "GET", "/history", None).await;
    let operations: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["operation_type"].as_str().unwrap())
        .collect();
    assert_eq!(operations.len(), 3);
    assert!(operations.contains(&"DELETE_OOO"));
}

#[tokio::test]
async fn test_single_day_ooo_and_cancel() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);
    let member_id: String = add_alice(&app).await;

    send(
        &app,
        "POST",
        "/ooo",
        Some(json!({ "member_id": member_id, "start_date": "2025-03-14", "reason": "Pi day" })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/ooo/cancel",
        Some(json!({ "member_id": member_id, "start_date": "2025-03-13", "end_date": "2025-03-14" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);

    let (status, removed) = send(
        &app,
        "POST",
        "/ooo/cancel",
        Some(json!({ "member_id": member_id, "start_date": "2025-03-14", "end_date": "2025-03-14" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(removed["entry"]["reason"], "Pi day");
}

#[tokio::test]
async fn test_add_ooo_for_unknown_member_is_not_found() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);

    let (status, body) = send(
        &app,
        "POST",
        "/ooo",
        Some(json!({ "member_id": "42", "start_date": "2025-08-01" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Member not found: 42");
}

#[tokio::test]
async fn test_reversed_ooo_range_is_bad_request() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);
    let member_id: String = add_alice(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/ooo",
        Some(json!({ "member_id": member_id, "start_date": "2025-08-05", "end_date": "2025-08-01" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_without_members_is_bad_request() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);

    let (status, body) = send(&app, "POST", "/generate_holidays", None).await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No members found. Add team members first.");
}

#[tokio::test]
async fn test_generate_reports_coverage() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);
    add_alice(&app).await;

    let (status, body) = send(&app, "POST", "/generate_holidays", None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["countries"], json!(["United States"]));
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .ends_with("covering 1 countries and 1 regions")
    );
}

#[tokio::test]
async fn test_month_view_has_every_day() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);
    add_alice(&app).await;

    let (status, body) = send(&app, "GET", "/month/2024/2", None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["days"].as_object().unwrap().len(), 29);
    assert_eq!(body["days"]["2024-02-29"]["1"]["available"], true);
}

#[tokio::test]
async fn test_invalid_month_and_date_are_bad_requests() {
    let (_dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);

    let (month_status, _) = send(&app, "GET", "/month/2025/13", None).await;
    let (date_status, _) = send(&app, "GET", "/availability/2025-02-30", None).await;

    assert_eq!(month_status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(date_status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_storage_info_reports_local_directory() {
    let (dir, app_state) = create_test_app_state();
    let app: Router = build_router(app_state);

    let (status, body) = send(&app, "GET", "/storage", None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["storage_type"], "local");
    assert_eq!(body["location"], dir.path().display().to_string());
    assert!(body.get("container").is_none());
}

#[test]
fn test_remote_storage_requires_account() {
    let args: Args =
        Args::try_parse_from(["rollcall-server", "--storage-type", "remote"]).unwrap();
    let args: Args = Args {
        storage_account: None,
        ..args
    };

    assert!(matches!(
        args.storage_config(),
        Err(PersistenceError::Configuration(_))
    ));
}

#[test]
fn test_remote_storage_flags_map_to_config() {
    let args: Args = Args::try_parse_from([
        "rollcall-server",
        "--storage-type",
        "azure",
        "--storage-account",
        "teamdata",
        "--storage-container",
        "roster",
    ])
    .unwrap();

    let config: StorageConfig = args.storage_config().unwrap();

    assert_eq!(config.kind, StorageKind::Remote);
    let remote: RemoteConfig = config.remote.unwrap();
    assert_eq!(remote.account, "teamdata");
    assert_eq!(remote.container, "roster");
    assert_eq!(remote.endpoint_url(), "https://teamdata.blob.core.windows.net");
}

#[test]
fn test_unknown_storage_type_is_rejected() {
    let args: Args =
        Args::try_parse_from(["rollcall-server", "--storage-type", "ftp"]).unwrap();

    assert!(args.storage_config().is_err());
}
