//! Server test utilities.

use super::mocks::{FaultyFiles, FaultyRecords};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use guestbook_core::config::{AppConfig, AuthConfig, RecordsConfig, ServerConfig, StorageConfig};
use guestbook_records::{RecordStore, SqliteStore};
use guestbook_server::{AppState, create_router};
use guestbook_storage::{FileStore, FilesystemBackend};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// API key configured on every test server.
#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-api-key";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub files: Arc<FaultyFiles>,
    pub records: Arc<FaultyRecords>,
    pub upload_dir: PathBuf,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let upload_dir = temp_dir.path().join("uploads");
        let backend: Arc<dyn FileStore> = Arc::new(
            FilesystemBackend::new(&upload_dir)
                .await
                .expect("Failed to create storage backend"),
        );
        let files = FaultyFiles::new(backend);

        let db_path = temp_dir.path().join("guestbook.db");
        let sqlite: Arc<dyn RecordStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create record store"),
        );
        let records = FaultyRecords::new(sqlite);

        let mut config = AppConfig {
            server: ServerConfig {
                step_timeout_secs: 1,
                ..Default::default()
            },
            storage: StorageConfig::Filesystem {
                path: upload_dir.clone(),
            },
            records: RecordsConfig::Sqlite { path: db_path },
            auth: AuthConfig::for_testing(),
        };
        modifier(&mut config);

        let state = AppState::new(config, files.clone(), records.clone());
        let router = create_router(state.clone());

        Self {
            router,
            state,
            files,
            records,
            upload_dir,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and decode the JSON response body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Send a JSON request carrying the test API key.
    pub async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(json_request(method, uri, body, Some(TEST_API_KEY)))
            .await
    }

    /// Upload `data` as the `image` field and return the generated filename.
    pub async fn upload(&self, original_name: &str, data: &[u8]) -> String {
        let (status, body) = self
            .send(multipart_request("image", original_name, data, Some(TEST_API_KEY)))
            .await;
        assert_eq!(status, StatusCode::OK, "upload failed: {body}");
        body["filename"].as_str().unwrap().to_string()
    }

    /// Create a submission through the API and return its id.
    pub async fn create(&self, name: &str, message: &str, filename: Option<&str>) -> String {
        let mut body = serde_json::json!({ "name": name, "message": message });
        if let Some(filename) = filename {
            body["filename"] = Value::from(filename);
        }
        let (status, body) = self.json("POST", "/api/createData", Some(body)).await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Path of a stored photo.
    pub fn photo_path(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    body: Option<Value>,
    api_key: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

/// Build a multipart upload request with a single file field.
#[allow(dead_code)]
pub fn multipart_request(
    field: &str,
    original_name: &str,
    data: &[u8],
    api_key: Option<&str>,
) -> Request<Body> {
    const BOUNDARY: &str = "guestbook-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{original_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }

    builder.body(Body::from(body)).unwrap()
}
