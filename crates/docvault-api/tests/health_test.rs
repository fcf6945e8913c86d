//! Health endpoint and cross-cutting middleware tests.

mod helpers;

use axum::http::StatusCode;

use helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_detailed_health_reports_components() {
    let app = TestApp::new().await;
    app.create_folder("A").await;

    let response = app.request("GET", "/api/health/detailed", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"]["provider"], "memory");
    assert_eq!(response.body["database"]["healthy"], true);
    assert_eq!(response.body["storage"]["provider"], "local");
    assert_eq!(response.body["folders"], 1);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = TestApp::new().await;

    for path in ["/api/health", "/api/folders/not-a-uuid", "/api/nowhere"] {
        let response = app.request("GET", path, None).await;
        assert_eq!(response.headers["x-content-type-options"], "nosniff");
        assert_eq!(response.headers["x-frame-options"], "DENY");
        assert_eq!(response.headers["x-xss-protection"], "1; mode=block");
    }
}
