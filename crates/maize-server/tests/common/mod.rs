//! Shared harness for the HTTP-level tests: an in-memory database, a scripted
//! identity provider, a fixed classifier, and a temporary uploads directory.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use maize_auth::{IdentityClaims, IdentityProvider, NewAccount, ProviderError};
use maize_config::{Environment, MaizeConfig};
use maize_db::MaizeService;
use maize_server::classifier::{CATALOG, Classifier, Diagnosis};
use maize_server::{AppState, build_router};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const GOOD_TOKEN: &str = "good-token";
pub const NAMELESS_TOKEN: &str = "nameless-token";
pub const OUTAGE_TOKEN: &str = "outage";

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

pub struct StubProvider {
    tokens: HashMap<String, IdentityClaims>,
    pub verify_calls: AtomicUsize,
}

impl Default for StubProvider {
    fn default() -> Self {
        let tokens = HashMap::from([
            (
                GOOD_TOKEN.to_string(),
                IdentityClaims::new("abc123").with_email("a@x.com"),
            ),
            (
                NAMELESS_TOKEN.to_string(),
                IdentityClaims::new("def456").with_email("budi@tani.id"),
            ),
        ]);
        Self {
            tokens,
            verify_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    async fn verify(&self, credential: &str) -> Result<IdentityClaims, ProviderError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if credential == OUTAGE_TOKEN {
            return Err(ProviderError::Unavailable("connection refused".into()));
        }
        self.tokens
            .get(credential)
            .cloned()
            .ok_or_else(|| ProviderError::Rejected("token expired".into()))
    }

    async fn fetch_by_subject_id(
        &self,
        _subject_id: &str,
    ) -> Result<Option<IdentityClaims>, ProviderError> {
        Ok(None)
    }

    async fn create_account(&self, account: &NewAccount) -> Result<IdentityClaims, ProviderError> {
        if account.email == "taken@x.com" {
            return Err(ProviderError::Rejected(
                "That email address is taken.".into(),
            ));
        }
        Ok(IdentityClaims::new(format!("user_{}", account.name.to_lowercase()))
            .with_email(account.email.clone())
            .with_display_name(account.name.clone()))
    }

    async fn issue_sign_in_token(&self, subject_id: &str) -> Result<String, ProviderError> {
        Ok(format!("sit_{subject_id}"))
    }
}

/// Always answers with the same catalog entry.
pub struct FixedClassifier(pub Diagnosis);

impl Classifier for FixedClassifier {
    fn classify(&self, _image: &[u8]) -> Diagnosis {
        self.0
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub db: Arc<MaizeService>,
    pub provider: Arc<StubProvider>,
    pub uploads: TempDir,
}

pub async fn test_app() -> TestApp {
    test_app_with(|_| {}).await
}

pub async fn production_app() -> TestApp {
    test_app_with(|config| config.general.environment = Environment::Production).await
}

pub async fn test_app_with(configure: impl FnOnce(&mut MaizeConfig)) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = MaizeConfig::default();
    config.uploads.dir = uploads.path().to_path_buf();
    configure(&mut config);

    let db = Arc::new(MaizeService::new_local(":memory:").await.unwrap());
    let provider = Arc::new(StubProvider::default());
    let classifier = Arc::new(FixedClassifier(CATALOG[1]));
    let state =
        AppState::new(config, Arc::clone(&db), provider.clone()).with_classifier(classifier);

    TestApp {
        router: build_router(state),
        db,
        provider,
        uploads,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Raw body of an unauthenticated `GET`, for non-JSON routes.
    pub async fn fetch_raw(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub enum As<'a> {
    Anonymous,
    Bearer(&'a str),
    Dev(&'a str),
}

pub fn request(method: &str, uri: &str, who: &As<'_>, json: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    builder = match who {
        As::Anonymous => builder,
        As::Bearer(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        As::Dev(id) => builder.header("x-user-id", *id),
    };
    match json {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str, who: &As<'_>) -> Request<Body> {
    request("GET", uri, who, None)
}

pub const BOUNDARY: &str = "maizecare-test-boundary";

/// A `multipart/form-data` upload with one `file` part.
pub fn upload(uri: &str, who: &As<'_>, file_name: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let As::Dev(id) = who {
        builder = builder.header("x-user-id", *id);
    }
    if let As::Bearer(token) = who {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

/// A `multipart/form-data` body with only a text field.
pub fn form_without_file(uri: &str, who: &As<'_>) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nno image\r\n--{BOUNDARY}--\r\n"
    );
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let As::Dev(id) = who {
        builder = builder.header("x-user-id", *id);
    }
    builder.body(Body::from(body)).unwrap()
}
