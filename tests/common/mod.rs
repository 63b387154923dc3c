// Shared between test binaries; not every helper is used by each one.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use vitrina_back::{
    AppState,
    repo::{Catalog, MemoryCatalog},
    routes,
    services::ProductService,
    storage::MemoryStore,
    utils::jwt,
};

pub const BOUNDARY: &str = "vitrina-test-boundary";

/// Router wired against the in-memory catalog and file-store fakes, with one
/// seeded seller and two categories.
pub struct TestApp {
    pub router: Router,
    pub catalog: Arc<MemoryCatalog>,
    pub files: Arc<MemoryStore>,
    pub token: String,
    pub c1: i32,
    pub c2: i32,
}

impl TestApp {
    pub fn new() -> Self {
        std::env::set_var("JWT_SECRET", "test-secret-key");

        let catalog = Arc::new(MemoryCatalog::new());
        let c1 = catalog.add_category("Electronics");
        let c2 = catalog.add_category("Home & Garden");

        let password_hash = bcrypt::hash("sellerpass", 4).unwrap();
        let seller_id = catalog.add_seller("seller@example.com", "Test Seller", &password_hash);

        let files = Arc::new(MemoryStore::new());

        let state = AppState {
            products: ProductService::new(
                catalog.clone() as Arc<dyn Catalog>,
                files.clone() as Arc<dyn vitrina_back::storage::FileStore>,
            ),
            catalog: catalog.clone() as Arc<dyn Catalog>,
        };

        let router = routes::create_router().with_state(state);
        let token = jwt::generate_token(seller_id, "seller@example.com").unwrap();

        Self {
            router,
            catalog,
            files,
            token,
            c1,
            c2,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

/// Hand-assembled multipart/form-data body for submission requests.
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.buf
    }
}

/// Required scalar and feature fields with sensible defaults; tests override
/// the values under review.
pub fn filled_submission(category_id: i32) -> MultipartBody {
    MultipartBody::new()
        .text("category_id", &category_id.to_string())
        .text("name", "Cordless drill")
        .text("description", "18V cordless drill with two batteries")
        .text("brand", "Acme")
        .text("cost", "6.49")
        .text("price", "7.49")
        .text("stock", "5")
        .text("low_stock", "1")
        .text("condition", "new")
        .text("status", "true")
        .text("features[weight]", "1.2kg")
        .text("features[dimensions]", "20x6x19cm")
        .text("features[color]", "teal")
}

pub fn multipart_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Vec<u8>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::from(body)).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}
