//! Folder endpoint tests.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_create_appends_and_lists_in_order() {
    let app = TestApp::new().await;
    app.create_folder("Invoices").await;
    app.create_folder("Contracts").await;
    app.create_folder("Receipts").await;

    assert_eq!(app.folder_names().await, ["Invoices", "Contracts", "Receipts"]);

    let response = app.request("GET", "/api/folders", None).await;
    let positions: Vec<i64> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, [0, 1, 2]);
    assert_eq!(response.body[0]["documents"], json!([]));
}

#[tokio::test]
async fn test_create_at_position_shifts_followers() {
    let app = TestApp::new().await;
    app.create_folder("A").await;
    app.create_folder("B").await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "First", "position": 0 })))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["position"], 0);

    assert_eq!(app.folder_names().await, ["First", "A", "B"]);
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(response.body["details"]["name"].is_array());
}

#[tokio::test]
async fn test_create_rejects_whitespace_only_name() {
    let app = TestApp::new().await;
    app.create_folder("A").await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "   " })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(response.body["details"]["name"].is_array());
    assert_eq!(app.folder_names().await, ["A"]);
}

#[tokio::test]
async fn test_create_trims_name() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "  Taxes " })))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["name"], "Taxes");
}

#[tokio::test]
async fn test_reorder_moves_folder_and_keeps_positions_dense() {
    let app = TestApp::new().await;
    let a = app.create_folder("A").await;
    app.create_folder("B").await;
    app.create_folder("C").await;
    app.create_folder("D").await;

    let response = app
        .request(
            "PUT",
            "/api/folders/reorder",
            Some(json!({ "id": a, "position": 2 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let returned: Vec<(String, i64)> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            (
                f["name"].as_str().unwrap().to_string(),
                f["position"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        returned,
        [
            ("B".to_string(), 0),
            ("C".to_string(), 1),
            ("A".to_string(), 2),
            ("D".to_string(), 3),
        ]
    );
    assert_eq!(app.folder_names().await, ["B", "C", "A", "D"]);
}

#[tokio::test]
async fn test_reorder_out_of_range_is_rejected() {
    let app = TestApp::new().await;
    let a = app.create_folder("A").await;
    app.create_folder("B").await;

    let response = app
        .request(
            "PUT",
            "/api/folders/reorder",
            Some(json!({ "id": a, "position": 5 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["max"], 1);
    assert_eq!(app.folder_names().await, ["A", "B"]);
}

#[tokio::test]
async fn test_reorder_unknown_folder_is_not_found() {
    let app = TestApp::new().await;
    app.create_folder("A").await;

    let response = app
        .request(
            "PUT",
            "/api/folders/reorder",
            Some(json!({ "id": uuid::Uuid::new_v4(), "position": 0 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_renames_and_moves() {
    let app = TestApp::new().await;
    app.create_folder("A").await;
    let b = app.create_folder("B").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{b}"),
            Some(json!({ "name": "Archive", "position": 0 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["name"], "Archive");
    assert_eq!(response.body["position"], 0);
    assert_eq!(app.folder_names().await, ["Archive", "A"]);
}

#[tokio::test]
async fn test_update_without_fields_is_rejected() {
    let app = TestApp::new().await;
    let a = app.create_folder("A").await;

    let response = app
        .request("PUT", &format!("/api/folders/{a}"), Some(json!({})))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_rejects_whitespace_only_name() {
    let app = TestApp::new().await;
    let a = app.create_folder("A").await;
    app.create_folder("B").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{a}"),
            Some(json!({ "name": "\t ", "position": 1 })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"]["name"].is_array());
    assert_eq!(app.folder_names().await, ["A", "B"]);
}

#[tokio::test]
async fn test_get_folder_with_malformed_id() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/folders/not-a-uuid", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["id"][0], "must be a UUID");
}

#[tokio::test]
async fn test_get_missing_folder() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", &format!("/api/folders/{}", uuid::Uuid::new_v4()), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_compacts_positions_and_removes_files() {
    let app = TestApp::new().await;
    app.create_folder("A").await;
    let b = app.create_folder("B").await;
    app.create_folder("C").await;
    app.upload_pdf(&b, "Q1 report", b"%PDF-1.4 first").await;
    assert_eq!(app.stored_file_count(), 1);

    let response = app.request("DELETE", &format!("/api/folders/{b}"), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let listing = app.request("GET", "/api/folders", None).await;
    let positions: Vec<(String, i64)> = listing
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            (
                f["name"].as_str().unwrap().to_string(),
                f["position"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(positions, [("A".to_string(), 0), ("C".to_string(), 1)]);
    assert_eq!(app.stored_file_count(), 0);

    let again = app.request("DELETE", &format!("/api/folders/{b}"), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}
