//! Shared helpers for API integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use docvault_core::config::AppConfig;

const BOUNDARY: &str = "docvault-test-boundary";

/// A router backed by the in-memory store and a temporary storage root.
pub struct TestApp {
    /// The application router.
    pub router: Router,
    /// Storage root; removed on drop.
    pub storage_dir: TempDir,
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    pub body: Value,
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Build an app after letting the caller tweak the configuration.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let storage_dir = tempfile::tempdir().expect("create storage dir");

        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.storage.root_path = storage_dir.path().to_string_lossy().into_owned();
        tweak(&mut config);

        let state = docvault_api::build_state(config)
            .await
            .expect("build app state");
        let router = docvault_api::build_router(state);

        Self {
            router,
            storage_dir,
        }
    }

    /// Send a request with an optional JSON body.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body = body
            .map(|b| serde_json::to_vec(&b).expect("serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .expect("build request");

        self.send(req).await
    }

    /// Send a `multipart/form-data` request.
    pub async fn multipart(&self, method: &str, path: &str, parts: &[Part<'_>]) -> TestResponse {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    file_name,
                    content_type,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("build request");

        self.send(req).await
    }

    /// Create a folder and return its id.
    pub async fn create_folder(&self, name: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_str().expect("folder id").to_string()
    }

    /// Upload a PDF document into a folder and return the response body.
    pub async fn upload_pdf(&self, folder_id: &str, title: &str, data: &[u8]) -> Value {
        let response = self
            .multipart(
                "POST",
                "/api/documents",
                &[
                    Part::Text("title", title),
                    Part::Text("folderId", folder_id),
                    Part::File {
                        file_name: "report.pdf",
                        content_type: "application/pdf",
                        data,
                    },
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }

    /// Folder names in listing order.
    pub async fn folder_names(&self) -> Vec<String> {
        let response = self.request("GET", "/api/folders", None).await;
        assert_eq!(response.status, StatusCode::OK);
        response
            .body
            .as_array()
            .expect("folder array")
            .iter()
            .map(|f| f["name"].as_str().expect("name").to_string())
            .collect()
    }

    /// Number of files under the storage root.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.storage_dir.path())
            .expect("read storage dir")
            .count()
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}
